//! # Domain Entities
//!
//! Questions, answers and the two-level thread tree built from them.

use super::value_objects::{AnswerId, QuestionId, UserId, VoteTally};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolution state of a question.
///
/// `Unresolved -> Resolved` is the only transition; `Resolved` is terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "accepted_answer_id", rename_all = "lowercase")]
pub enum ResolutionState {
    /// No answer accepted yet.
    Unresolved,
    /// The author accepted the given answer.
    Resolved(AnswerId),
}

/// A forum question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier.
    pub id: QuestionId,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author of the question.
    pub author_id: UserId,
    /// Author display name, if the backend supplied one.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Voter membership.
    #[serde(default)]
    pub votes: VoteTally,
    /// Number of views; never decreases.
    #[serde(default)]
    pub view_count: u64,
    /// Number of answers reported by the backend.
    #[serde(default)]
    pub reply_count: u64,
    /// Set once an answer is accepted.
    #[serde(default)]
    pub is_resolved: bool,
    /// Present iff `is_resolved`.
    #[serde(default)]
    pub accepted_answer_id: Option<AnswerId>,
}

impl Question {
    /// Create an unresolved question with no votes.
    pub fn new(
        id: QuestionId,
        author_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            author_id,
            author_name: None,
            tags: Vec::new(),
            category: None,
            created_at,
            votes: VoteTally::new(),
            view_count: 0,
            reply_count: 0,
            is_resolved: false,
            accepted_answer_id: None,
        }
    }

    /// Attach tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach an author display name.
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    /// Derived vote count.
    pub fn vote_count(&self) -> i64 {
        self.votes.vote_count()
    }

    /// Whether `user` wrote this question.
    pub fn is_author(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// Current resolution state.
    pub fn resolution_state(&self) -> ResolutionState {
        match (&self.accepted_answer_id, self.is_resolved) {
            (Some(id), true) => ResolutionState::Resolved(id.clone()),
            _ => ResolutionState::Unresolved,
        }
    }
}

/// An answer to a question, or a reply to a top-level answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer identifier.
    pub id: AnswerId,
    /// Owning question.
    pub question_id: QuestionId,
    /// Present only for replies.
    #[serde(default)]
    pub parent_answer_id: Option<AnswerId>,
    /// Author of the answer.
    pub author_id: UserId,
    /// Author display name, if the backend supplied one.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Body text.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Voter membership.
    #[serde(default)]
    pub votes: VoteTally,
    /// True for at most one answer per question.
    #[serde(default)]
    pub is_accepted: bool,
    /// Shared helpful flag.
    #[serde(default)]
    pub is_helpful: bool,
    /// Replies embedded by the backend, if it chooses to nest them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Answer>,
}

impl Answer {
    /// Create a top-level answer.
    pub fn new(
        id: AnswerId,
        question_id: QuestionId,
        author_id: UserId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            question_id,
            parent_answer_id: None,
            author_id,
            author_name: None,
            content: content.into(),
            created_at,
            votes: VoteTally::new(),
            is_accepted: false,
            is_helpful: false,
            replies: Vec::new(),
        }
    }

    /// Create a reply to `parent`.
    pub fn reply(
        id: AnswerId,
        question_id: QuestionId,
        parent: AnswerId,
        author_id: UserId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            parent_answer_id: Some(parent),
            ..Self::new(id, question_id, author_id, content, created_at)
        }
    }

    /// Attach an author display name.
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    /// Whether this answer is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_answer_id.is_some()
    }

    /// Derived vote count.
    pub fn vote_count(&self) -> i64 {
        self.votes.vote_count()
    }
}

/// A top-level answer together with its direct replies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// The top-level answer.
    pub answer: Answer,
    /// Direct replies, in repository order.
    pub replies: Vec<Answer>,
}

impl Thread {
    /// Thread with no replies.
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            replies: Vec::new(),
        }
    }

    /// Number of replies.
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }
}

/// A reply left out of the tree: its parent is missing from the top-level
/// set, or its id collides with a top-level answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanReplyWarning {
    /// The dropped reply.
    pub answer_id: AnswerId,
    /// Parent id it pointed at.
    pub missing_parent_id: AnswerId,
}

impl std::fmt::Display for OrphanReplyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reply {} under parent {} was dropped",
            self.answer_id, self.missing_parent_id
        )
    }
}

/// Output of the thread assembler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadAssembly {
    /// Top-level threads, in repository order.
    pub threads: Vec<Thread>,
    /// Replies that were dropped.
    pub warnings: Vec<OrphanReplyWarning>,
}

impl ThreadAssembly {
    /// Find an answer (top-level or reply) by id.
    pub fn find(&self, id: &AnswerId) -> Option<&Answer> {
        self.iter().find(|a| &a.id == id)
    }

    /// Find the thread owning `id`, whether `id` is the top-level answer or a reply.
    pub fn thread_of(&self, id: &AnswerId) -> Option<&Thread> {
        self.threads
            .iter()
            .find(|t| &t.answer.id == id || t.replies.iter().any(|r| &r.id == id))
    }

    /// Every answer in the tree, each top-level answer followed by its replies.
    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.threads
            .iter()
            .flat_map(|t| std::iter::once(&t.answer).chain(t.replies.iter()))
    }

    /// Number of top-level threads.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Whether there are no top-level answers.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
