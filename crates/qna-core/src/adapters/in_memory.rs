//! In-Memory Question Repository
//!
//! Implements the `QuestionRepository` port as an in-process system of
//! record. It enforces the same rules as the client core (vote toggling,
//! one-shot resolution, shared helpful flag, one-level replies) and can be
//! switched offline to exercise transport failures.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::algorithms::{accept_answer, apply_vote, resolve_reply_parent, toggle_helpful};
use crate::domain::{
    Answer, AnswerId, NewAnswer, QnaError, Question, QuestionId, ReplyDepthPolicy, UserId,
    VoteDirection, VoteTally, DEFAULT_MAX_CONTENT_LEN,
};
use crate::ports::outbound::QuestionRepository;

#[derive(Default)]
struct Store {
    questions: HashMap<QuestionId, Question>,
    /// Insertion order is creation order.
    answers: Vec<Answer>,
    display_names: HashMap<UserId, String>,
}

/// In-process repository backed by a `RwLock`.
pub struct InMemoryRepository {
    store: RwLock<Store>,
    /// Cleared to simulate an unreachable backend.
    available: AtomicBool,
    /// Return replies nested under their parent instead of a flat list.
    embed_replies: bool,
    /// Parent policy applied to replies created through the port.
    reply_policy: ReplyDepthPolicy,
    /// Number of port calls received (successful or not).
    calls: AtomicUsize,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Create an empty, reachable repository returning flat answer lists.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            available: AtomicBool::new(true),
            embed_replies: false,
            reply_policy: ReplyDepthPolicy::Flatten,
            calls: AtomicUsize::new(0),
        }
    }

    /// Return replies embedded in their parent's `replies`.
    pub fn with_embedded_replies(mut self) -> Self {
        self.embed_replies = true;
        self
    }

    /// Use `policy` for replies to replies.
    pub fn with_reply_policy(mut self, policy: ReplyDepthPolicy) -> Self {
        self.reply_policy = policy;
        self
    }

    /// Seed a question.
    pub fn insert_question(&self, question: Question) {
        self.store
            .write()
            .questions
            .insert(question.id.clone(), question);
    }

    /// Seed an answer as-is, bypassing validation.
    pub fn insert_answer(&self, answer: Answer) {
        self.store.write().answers.push(answer);
    }

    /// Register a display name attached to answers the user creates.
    pub fn register_user(&self, id: UserId, name: impl Into<String>) {
        self.store.write().display_names.insert(id, name.into());
    }

    /// Simulate the backend going away or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        if available {
            info!("[qna] in-memory repository back online");
        } else {
            warn!("[qna] in-memory repository offline");
        }
    }

    /// Snapshot of a stored question.
    pub fn question(&self, id: &QuestionId) -> Option<Question> {
        self.store.read().questions.get(id).cloned()
    }

    /// Snapshot of a stored answer.
    pub fn answer(&self, id: &AnswerId) -> Option<Answer> {
        self.store.read().answers.iter().find(|a| &a.id == id).cloned()
    }

    /// Number of port calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &str) -> Result<(), QnaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            debug!("[qna] {} refused: repository offline", operation);
            return Err(QnaError::Transport(format!(
                "{}: repository unavailable",
                operation
            )));
        }
        Ok(())
    }

    fn vote_question_sync(
        &self,
        actor: &UserId,
        id: &QuestionId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        let mut store = self.store.write();
        let question = store
            .questions
            .get_mut(id)
            .ok_or_else(|| QnaError::QuestionNotFound(id.clone()))?;
        let (tally, _) = apply_vote(Some(actor), &question.votes, direction)?;
        question.votes = tally.clone();
        Ok(tally)
    }

    fn vote_answer_sync(
        &self,
        actor: &UserId,
        id: &AnswerId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        let mut store = self.store.write();
        let answer = store
            .answers
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| QnaError::AnswerNotFound(id.clone()))?;
        let (tally, _) = apply_vote(Some(actor), &answer.votes, direction)?;
        answer.votes = tally.clone();
        Ok(tally)
    }

    fn resolve_sync(
        &self,
        actor: &UserId,
        id: &QuestionId,
        accepted: &AnswerId,
    ) -> Result<Question, QnaError> {
        let mut guard = self.store.write();
        let Store {
            questions, answers, ..
        } = &mut *guard;
        let question = questions
            .get_mut(id)
            .ok_or_else(|| QnaError::QuestionNotFound(id.clone()))?;
        accept_answer(Some(actor), question, accepted, answers)?;
        Ok(question.clone())
    }

    fn create_sync(&self, actor: &UserId, payload: NewAnswer) -> Result<Answer, QnaError> {
        let content = payload.content.trim();
        if content.is_empty() {
            return Err(QnaError::EmptyContent);
        }
        let len = content.chars().count();
        if len > DEFAULT_MAX_CONTENT_LEN {
            return Err(QnaError::ContentTooLong {
                len,
                max: DEFAULT_MAX_CONTENT_LEN,
            });
        }

        let mut guard = self.store.write();
        let Store {
            questions,
            answers,
            display_names,
        } = &mut *guard;

        let question = questions
            .get_mut(&payload.question_id)
            .ok_or_else(|| QnaError::QuestionNotFound(payload.question_id.clone()))?;

        let siblings: Vec<Answer> = answers
            .iter()
            .filter(|a| a.question_id == payload.question_id)
            .cloned()
            .collect();
        let parent = resolve_reply_parent(
            &siblings,
            payload.parent_answer_id.as_ref(),
            self.reply_policy,
        )?;

        let id = AnswerId::new(Uuid::new_v4().to_string());
        let mut answer = match parent {
            Some(parent) => Answer::reply(
                id,
                payload.question_id.clone(),
                parent,
                actor.clone(),
                content,
                Utc::now(),
            ),
            None => Answer::new(
                id,
                payload.question_id.clone(),
                actor.clone(),
                content,
                Utc::now(),
            ),
        };
        answer.author_name = display_names.get(actor).cloned();

        question.reply_count += 1;
        answers.push(answer.clone());
        Ok(answer)
    }

    fn toggle_helpful_sync(&self, actor: &UserId, id: &AnswerId) -> Result<Answer, QnaError> {
        let mut store = self.store.write();
        let answer = store
            .answers
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| QnaError::AnswerNotFound(id.clone()))?;
        toggle_helpful(Some(actor), answer)?;
        Ok(answer.clone())
    }

    fn view_sync(&self, id: &QuestionId) -> Result<Question, QnaError> {
        let mut store = self.store.write();
        let question = store
            .questions
            .get_mut(id)
            .ok_or_else(|| QnaError::QuestionNotFound(id.clone()))?;
        question.view_count += 1;
        Ok(question.clone())
    }

    fn list_sync(&self, question_id: &QuestionId) -> Result<Vec<Answer>, QnaError> {
        let store = self.store.read();
        if !store.questions.contains_key(question_id) {
            return Err(QnaError::QuestionNotFound(question_id.clone()));
        }
        let own: Vec<&Answer> = store
            .answers
            .iter()
            .filter(|a| &a.question_id == question_id)
            .collect();

        if !self.embed_replies {
            return Ok(own.into_iter().cloned().collect());
        }

        let mut nested: Vec<Answer> = own
            .iter()
            .filter(|a| !a.is_reply())
            .map(|a| (*a).clone())
            .collect();
        let mut unplaced = Vec::new();
        for reply in own.iter().filter(|a| a.is_reply()) {
            match nested
                .iter_mut()
                .find(|top| reply.parent_answer_id.as_ref() == Some(&top.id))
            {
                Some(top) => top.replies.push((*reply).clone()),
                None => unplaced.push((*reply).clone()),
            }
        }
        nested.extend(unplaced);
        Ok(nested)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn get_question(&self, id: &QuestionId) -> Result<Question, QnaError> {
        self.enter("get_question")?;
        self.view_sync(id)
    }

    async fn vote_question(
        &self,
        actor: &UserId,
        id: &QuestionId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        self.enter("vote_question")?;
        self.vote_question_sync(actor, id, direction)
    }

    async fn resolve_question(
        &self,
        actor: &UserId,
        id: &QuestionId,
        accepted_answer_id: &AnswerId,
    ) -> Result<Question, QnaError> {
        self.enter("resolve_question")?;
        self.resolve_sync(actor, id, accepted_answer_id)
    }

    async fn list_answers(&self, question_id: &QuestionId) -> Result<Vec<Answer>, QnaError> {
        self.enter("list_answers")?;
        self.list_sync(question_id)
    }

    async fn create_answer(&self, actor: &UserId, answer: NewAnswer) -> Result<Answer, QnaError> {
        self.enter("create_answer")?;
        self.create_sync(actor, answer)
    }

    async fn vote_answer(
        &self,
        actor: &UserId,
        id: &AnswerId,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        self.enter("vote_answer")?;
        self.vote_answer_sync(actor, id, direction)
    }

    async fn mark_answer_helpful(&self, actor: &UserId, id: &AnswerId) -> Result<Answer, QnaError> {
        self.enter("mark_answer_helpful")?;
        self.toggle_helpful_sync(actor, id)
    }
}
