//! # Domain Errors
//!
//! Error taxonomy for the Q&A core and the user-facing notices derived from it.

use super::value_objects::{AnswerId, QuestionId, UserId};
use thiserror::Error;

/// Q&A core error types.
///
/// Every error means the intent did not happen: cached state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QnaError {
    /// No current user for an action that needs one.
    #[error("Authentication required")]
    Unauthenticated,

    /// The actor is not allowed to perform the action.
    #[error("User {actor} is not the question author ({author})")]
    Permission {
        /// Acting user
        actor: UserId,
        /// Question author
        author: UserId,
    },

    /// The question already has an accepted answer.
    #[error("Question {0} is already resolved")]
    AlreadyResolved(QuestionId),

    /// The repository was unreachable or refused the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The repository answered with data that breaks a domain invariant.
    #[error("Invalid repository response: {0}")]
    InvalidResponse(String),

    /// Question not found.
    #[error("Question not found: {0}")]
    QuestionNotFound(QuestionId),

    /// Answer not found.
    #[error("Answer not found: {0}")]
    AnswerNotFound(AnswerId),

    /// The answer belongs to a different question.
    #[error("Answer {answer} belongs to question {actual}, not {expected}")]
    AnswerQuestionMismatch {
        /// Answer being accepted
        answer: AnswerId,
        /// Question the caller expected
        expected: QuestionId,
        /// Question the answer actually belongs to
        actual: QuestionId,
    },

    /// Submitted content was blank.
    #[error("Answer content must not be empty")]
    EmptyContent,

    /// Submitted content exceeded the configured limit.
    #[error("Answer content too long: {len} > {max} characters")]
    ContentTooLong {
        /// Submitted length in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Reply targeted another reply and the depth policy rejects it.
    #[error("Cannot reply to reply {0}: nesting is limited to one level")]
    ReplyTooDeep(AnswerId),

    /// An operation needed a loaded question page.
    #[error("No question loaded")]
    NotLoaded,
}

impl QnaError {
    /// Errors shown to the user as a blocking notice.
    pub fn is_blocking_notice(&self) -> bool {
        matches!(self, QnaError::Unauthenticated | QnaError::Permission { .. })
    }

    /// Errors caused by the repository round trip rather than local checks.
    pub fn is_transport(&self) -> bool {
        matches!(self, QnaError::Transport(_) | QnaError::InvalidResponse(_))
    }

    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            QnaError::Unauthenticated => "unauthenticated",
            QnaError::Permission { .. } => "permission",
            QnaError::AlreadyResolved(_) => "already_resolved",
            QnaError::Transport(_) => "transport",
            QnaError::InvalidResponse(_) => "invalid_response",
            QnaError::QuestionNotFound(_) => "question_not_found",
            QnaError::AnswerNotFound(_) => "answer_not_found",
            QnaError::AnswerQuestionMismatch { .. } => "answer_question_mismatch",
            QnaError::EmptyContent => "empty_content",
            QnaError::ContentTooLong { .. } => "content_too_long",
            QnaError::ReplyTooDeep(_) => "reply_too_deep",
            QnaError::NotLoaded => "not_loaded",
        }
    }

    /// Text to show the user who attempted `intent`.
    pub fn user_notice(&self, intent: Intent) -> UserNotice {
        let message = match self {
            QnaError::Unauthenticated => match intent {
                Intent::Vote => "Please login to vote".to_string(),
                Intent::Reply => "Please login to reply".to_string(),
                Intent::MarkHelpful => "Please login to mark answers as helpful".to_string(),
                Intent::Accept => "Only the question author can mark it as resolved".to_string(),
            },
            QnaError::Permission { .. } => {
                "Only the question author can mark it as resolved".to_string()
            }
            QnaError::AlreadyResolved(_) => "This question has already been resolved".to_string(),
            QnaError::EmptyContent => "Please write an answer before submitting".to_string(),
            QnaError::ContentTooLong { max, .. } => {
                format!("Answers are limited to {} characters", max)
            }
            QnaError::ReplyTooDeep(_) => "Replies can only be added to answers".to_string(),
            QnaError::QuestionNotFound(_) => "Question not found".to_string(),
            QnaError::AnswerNotFound(_)
            | QnaError::AnswerQuestionMismatch { .. }
            | QnaError::NotLoaded
            | QnaError::Transport(_)
            | QnaError::InvalidResponse(_) => "Action failed, try again".to_string(),
        };
        UserNotice {
            message,
            blocking: self.is_blocking_notice(),
        }
    }
}

/// User intents issued by the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Vote on a question or answer.
    Vote,
    /// Submit an answer or reply.
    Reply,
    /// Accept an answer.
    Accept,
    /// Toggle the helpful flag.
    MarkHelpful,
}

/// Message surfaced to the user after a failed intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserNotice {
    /// Text to display.
    pub message: String,
    /// Whether the notice blocks until dismissed.
    pub blocking: bool,
}
