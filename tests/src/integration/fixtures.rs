//! # Test Fixtures
//!
//! Seeded repositories for the scenario tests, plus a wrapper backend that
//! fails or corrupts selected operations on demand.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use qna_core::{
    Answer, AnswerId, InMemoryRepository, NewAnswer, QnaError, Question, QuestionId,
    QuestionRepository, UserId, VoteDirection, VoteTally,
};

/// Question author.
pub fn u1() -> UserId {
    UserId::new("U1")
}

/// Author of `A1`.
pub fn u2() -> UserId {
    UserId::new("U2")
}

/// Author of `A2`.
pub fn u3() -> UserId {
    UserId::new("U3")
}

/// Question id used by every fixture.
pub fn qid() -> QuestionId {
    QuestionId::new("Q")
}

/// Answer id shorthand.
pub fn aid(id: &str) -> AnswerId {
    AnswerId::new(id)
}

/// Question `Q` by `U1` with top-level answers `A1` (U2) and `A2` (U3).
pub fn seeded_repository() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    seed(&repo);
    repo
}

/// Populate `repo` with the standard page.
pub fn seed(repo: &InMemoryRepository) {
    let now = Utc::now();
    repo.register_user(u1(), "Ada");
    repo.register_user(u2(), "Grace");
    repo.insert_question(
        Question::new(
            qid(),
            u1(),
            "How do I share state between tasks?",
            "Several tokio tasks need the same map.",
            now - Duration::hours(3),
        )
        .with_author_name("Ada")
        .with_tags(["rust", "tokio"])
        .with_category("Concurrency"),
    );
    repo.insert_answer(
        Answer::new(aid("A1"), qid(), u2(), "Wrap it in Arc<RwLock<_>>.", now - Duration::hours(2))
            .with_author_name("Grace"),
    );
    repo.insert_answer(Answer::new(
        aid("A2"),
        qid(),
        u3(),
        "Use a channel and a single owner task.",
        now - Duration::hours(1),
    ));
}

/// Operations of [`QuestionRepository`], for failure injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `get_question`
    GetQuestion,
    /// `vote_question`
    VoteQuestion,
    /// `resolve_question`
    ResolveQuestion,
    /// `list_answers`
    ListAnswers,
    /// `create_answer`
    CreateAnswer,
    /// `vote_answer`
    VoteAnswer,
    /// `mark_answer_helpful`
    MarkHelpful,
}

/// Backend wrapper that fails selected operations.
///
/// Failed operations return `Transport` without touching the inner store.
/// `extra_answers` are appended to every `list_answers` response so tests
/// can feed the assembler data the in-memory store would never produce.
pub struct FlakyRepository {
    inner: InMemoryRepository,
    failing: Mutex<HashSet<Operation>>,
    extra_answers: Mutex<Vec<Answer>>,
}

impl FlakyRepository {
    /// Wrap a repository; nothing fails until [`FlakyRepository::fail`] is called.
    pub fn new(inner: InMemoryRepository) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            extra_answers: Mutex::new(Vec::new()),
        }
    }

    /// Make `op` fail from now on.
    pub fn fail(&self, op: Operation) {
        self.failing.lock().insert(op);
    }

    /// Make `op` succeed again.
    pub fn recover(&self, op: Operation) {
        self.failing.lock().remove(&op);
    }

    /// Append `answer` to every answer listing.
    pub fn inject_answer(&self, answer: Answer) {
        self.extra_answers.lock().push(answer);
    }

    /// The wrapped repository.
    pub fn inner(&self) -> &InMemoryRepository {
        &self.inner
    }

    fn check(&self, op: Operation) -> Result<(), QnaError> {
        if self.failing.lock().contains(&op) {
            return Err(QnaError::Transport(format!("{:?} unavailable", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for FlakyRepository {
    async fn get_question(&self, id: &QuestionId) -> Result<Question, QnaError> {
        self.check(Operation::GetQuestion)?;
        self.inner.get_question(id).await
    }

    async fn vote_question(
        &self,
        actor: &UserId,
        id: &QuestionId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        self.check(Operation::VoteQuestion)?;
        self.inner.vote_question(actor, id, direction).await
    }

    async fn resolve_question(
        &self,
        actor: &UserId,
        id: &QuestionId,
        accepted_answer_id: &AnswerId,
    ) -> Result<Question, QnaError> {
        self.check(Operation::ResolveQuestion)?;
        self.inner.resolve_question(actor, id, accepted_answer_id).await
    }

    async fn list_answers(&self, question_id: &QuestionId) -> Result<Vec<Answer>, QnaError> {
        self.check(Operation::ListAnswers)?;
        let mut answers = self.inner.list_answers(question_id).await?;
        answers.extend(self.extra_answers.lock().iter().cloned());
        Ok(answers)
    }

    async fn create_answer(&self, actor: &UserId, answer: NewAnswer) -> Result<Answer, QnaError> {
        self.check(Operation::CreateAnswer)?;
        self.inner.create_answer(actor, answer).await
    }

    async fn vote_answer(
        &self,
        actor: &UserId,
        id: &AnswerId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        self.check(Operation::VoteAnswer)?;
        self.inner.vote_answer(actor, id, direction).await
    }

    async fn mark_answer_helpful(&self, actor: &UserId, id: &AnswerId) -> Result<Answer, QnaError> {
        self.check(Operation::MarkHelpful)?;
        self.inner.mark_answer_helpful(actor, id).await
    }
}

/// Shared handle to a seeded flaky backend.
pub fn flaky() -> Arc<FlakyRepository> {
    Arc::new(FlakyRepository::new(seeded_repository()))
}
