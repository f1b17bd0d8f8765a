//! # Domain Value Objects
//!
//! Identifiers, vote primitives and submission payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of an authenticated user.
    UserId
);
string_id!(
    /// Identifier of a question.
    QuestionId
);
string_id!(
    /// Identifier of an answer or reply.
    AnswerId
);

/// Direction of a single vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Thumbs up.
    Up,
    /// Thumbs down.
    Down,
}

impl VoteDirection {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }

    /// Stable label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }
}

/// Something that can receive votes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum VoteTarget {
    /// A question.
    Question(QuestionId),
    /// An answer or reply.
    Answer(AnswerId),
}

impl VoteTarget {
    /// Discriminant label ("question" / "answer").
    pub fn kind(&self) -> &'static str {
        match self {
            VoteTarget::Question(_) => "question",
            VoteTarget::Answer(_) => "answer",
        }
    }

    /// Raw identifier of the target.
    pub fn id(&self) -> &str {
        match self {
            VoteTarget::Question(id) => id.as_str(),
            VoteTarget::Answer(id) => id.as_str(),
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// How a vote changed the actor's membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    /// Actor had no vote; one was added.
    Added,
    /// Actor repeated their vote; it was removed.
    Removed,
    /// Actor held the opposite vote; it was moved.
    Flipped,
}

impl VoteOutcome {
    /// Stable label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteOutcome::Added => "added",
            VoteOutcome::Removed => "removed",
            VoteOutcome::Flipped => "flipped",
        }
    }
}

/// Voter membership of a target.
///
/// A user id appears in at most one of the two sets. The vote count is always
/// derived from the sets, never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Users currently voting up.
    #[serde(default)]
    pub upvoter_ids: BTreeSet<UserId>,
    /// Users currently voting down.
    #[serde(default)]
    pub downvoter_ids: BTreeSet<UserId>,
}

impl VoteTally {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tally from explicit voter lists.
    pub fn from_voters<U, D>(up: U, down: D) -> Self
    where
        U: IntoIterator<Item = UserId>,
        D: IntoIterator<Item = UserId>,
    {
        Self {
            upvoter_ids: up.into_iter().collect(),
            downvoter_ids: down.into_iter().collect(),
        }
    }

    /// `|up| - |down|`.
    pub fn vote_count(&self) -> i64 {
        self.upvoter_ids.len() as i64 - self.downvoter_ids.len() as i64
    }

    /// Direction currently held by `user`, if any.
    pub fn direction_of(&self, user: &UserId) -> Option<VoteDirection> {
        if self.upvoter_ids.contains(user) {
            Some(VoteDirection::Up)
        } else if self.downvoter_ids.contains(user) {
            Some(VoteDirection::Down)
        } else {
            None
        }
    }

    /// Voter set for `direction`.
    pub fn voters(&self, direction: VoteDirection) -> &BTreeSet<UserId> {
        match direction {
            VoteDirection::Up => &self.upvoter_ids,
            VoteDirection::Down => &self.downvoter_ids,
        }
    }

    pub(crate) fn voters_mut(&mut self, direction: VoteDirection) -> &mut BTreeSet<UserId> {
        match direction {
            VoteDirection::Up => &mut self.upvoter_ids,
            VoteDirection::Down => &mut self.downvoter_ids,
        }
    }
}

/// What to do with a reply whose parent is itself a reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyDepthPolicy {
    /// Re-target the reply to the parent's top-level answer.
    #[default]
    Flatten,
    /// Refuse the submission.
    Reject,
}

/// Payload for creating an answer or a reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnswer {
    /// Body text.
    pub content: String,
    /// Owning question.
    pub question_id: QuestionId,
    /// Top-level answer being replied to, if this is a reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_answer_id: Option<AnswerId>,
}

impl NewAnswer {
    /// Top-level answer payload.
    pub fn answer(question_id: QuestionId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            question_id,
            parent_answer_id: None,
        }
    }

    /// Reply payload.
    pub fn reply(question_id: QuestionId, parent: AnswerId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            question_id,
            parent_answer_id: Some(parent),
        }
    }

    /// Whether this payload is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_answer_id.is_some()
    }
}
