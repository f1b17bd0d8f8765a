//! # Inbound Ports
//!
//! API trait defining what the view layer can ask of the Q&A core.

use async_trait::async_trait;

use crate::domain::{
    Answer, AnswerId, OrphanReplyWarning, QnaError, Question, QuestionId, ThreadAssembly, UserId,
    VoteDirection, VoteTally, VoteTarget,
};

/// Q&A API - inbound port.
///
/// Every mutating call waits for the repository round trip and updates
/// local state only from its response. The actor is `None` when nobody is
/// signed in.
#[async_trait]
pub trait QnaApi: Send + Sync {
    /// Load a question page (question + answers).
    async fn load(&mut self, question_id: &QuestionId) -> Result<(), QnaError>;

    /// Re-fetch the answers of the loaded question.
    async fn refresh_answers(&mut self) -> Result<(), QnaError>;

    /// Vote on the loaded question or one of its answers.
    async fn vote(
        &mut self,
        actor: Option<&UserId>,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError>;

    /// Accept an answer on the loaded question.
    async fn accept_answer(
        &mut self,
        actor: Option<&UserId>,
        answer_id: &AnswerId,
    ) -> Result<(), QnaError>;

    /// Toggle the helpful flag of an answer; returns the new value.
    async fn toggle_helpful(
        &mut self,
        actor: Option<&UserId>,
        answer_id: &AnswerId,
    ) -> Result<bool, QnaError>;

    /// Submit an answer (`parent == None`) or a reply.
    async fn submit_answer(
        &mut self,
        actor: Option<&UserId>,
        content: &str,
        parent: Option<&AnswerId>,
    ) -> Result<Answer, QnaError>;

    /// The loaded question, if any.
    fn question(&self) -> Option<&Question>;

    /// The current answer tree.
    fn threads(&self) -> ThreadAssembly;

    /// Replies dropped during the last load.
    fn warnings(&self) -> &[OrphanReplyWarning];
}
