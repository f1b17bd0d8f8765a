//! # Outbound Ports
//!
//! The backend the core talks to. The repository is the system of record:
//! every value it returns is authoritative and replaces local state.

use async_trait::async_trait;

use crate::domain::{
    Answer, AnswerId, NewAnswer, QnaError, Question, QuestionId, UserId, VoteDirection, VoteTally,
};

/// Question repository - outbound port.
///
/// The acting user is passed explicitly; a real backend reads it from the
/// session instead. All methods fail with `QnaError::Transport` when the
/// backend is unreachable or refuses the request.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch a question.
    async fn get_question(&self, id: &QuestionId) -> Result<Question, QnaError>;

    /// Apply a vote to a question and return its updated tally.
    async fn vote_question(
        &self,
        actor: &UserId,
        id: &QuestionId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError>;

    /// Accept an answer and return the updated question.
    async fn resolve_question(
        &self,
        actor: &UserId,
        id: &QuestionId,
        accepted_answer_id: &AnswerId,
    ) -> Result<Question, QnaError>;

    /// List the answers of a question.
    ///
    /// Replies either carry `parent_answer_id` in a flat list or are
    /// embedded in their parent's `replies`.
    async fn list_answers(&self, question_id: &QuestionId) -> Result<Vec<Answer>, QnaError>;

    /// Create an answer or reply.
    async fn create_answer(&self, actor: &UserId, answer: NewAnswer) -> Result<Answer, QnaError>;

    /// Apply a vote to an answer and return its updated tally.
    async fn vote_answer(
        &self,
        actor: &UserId,
        id: &AnswerId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError>;

    /// Toggle the shared helpful flag and return the updated answer.
    async fn mark_answer_helpful(&self, actor: &UserId, id: &AnswerId) -> Result<Answer, QnaError>;
}
