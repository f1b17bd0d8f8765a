//! # Q&A Configuration
//!
//! Configuration for the Q&A service.

use serde::{Deserialize, Serialize};

use crate::domain::{ReplyDepthPolicy, DEFAULT_MAX_CONTENT_LEN};

/// Q&A service configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QnaConfig {
    /// Maximum answer length in characters (after trimming).
    pub max_content_len: usize,

    /// What to do with a reply to a reply.
    pub reply_depth_policy: ReplyDepthPolicy,

    /// Whether reply lists start expanded.
    pub expand_replies_by_default: bool,
}

impl Default for QnaConfig {
    fn default() -> Self {
        Self {
            max_content_len: DEFAULT_MAX_CONTENT_LEN,
            reply_depth_policy: ReplyDepthPolicy::Flatten,
            expand_replies_by_default: false,
        }
    }
}

impl QnaConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            max_content_len: 500,
            reply_depth_policy: ReplyDepthPolicy::Flatten,
            expand_replies_by_default: false,
        }
    }
}
