//! # Presenter Helpers
//!
//! Pure formatting and affordance rules a view renders from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Answer, Question, UserId};

/// Actions the view may offer on one answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerAffordances {
    /// Show the reply button.
    pub can_reply: bool,
    /// Show the helpful toggle.
    pub can_mark_helpful: bool,
    /// Show the accept button.
    pub can_accept: bool,
}

impl AnswerAffordances {
    /// Affordances of `answer` for `viewer` on `question`.
    ///
    /// Replies get none. Accept is offered only to the question author while
    /// the question is unresolved.
    pub fn for_answer(question: &Question, answer: &Answer, viewer: Option<&UserId>) -> Self {
        if answer.is_reply() {
            return Self::default();
        }
        let is_author = viewer.is_some_and(|v| question.is_author(v));
        Self {
            can_reply: true,
            can_mark_helpful: true,
            can_accept: is_author && !question.is_resolved,
        }
    }
}

/// Age of a post as shown next to it.
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created_at).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if hours < 24 * 7 {
        format!("{}d ago", hours / 24)
    } else {
        created_at.format("%Y-%m-%d").to_string()
    }
}

/// Heading above the answer list.
pub fn answers_heading(count: usize) -> String {
    if count == 1 {
        "1 Answer".to_string()
    } else {
        format!("{} Answers", count)
    }
}

/// Author label, falling back to "Anonymous".
pub fn display_name(author_name: Option<&str>) -> &str {
    match author_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => "Anonymous",
    }
}
