//! # Q&A Service
//!
//! Application service orchestrating a question page: votes, acceptance,
//! helpful flags, answer submission and the thread tree.
//!
//! Every mutation validates locally, waits for the repository and merges
//! only the repository's response. A failed call leaves the cached page
//! exactly as it was.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use qna_telemetry::log_event;
use qna_telemetry::metrics::{
    HistogramTimer, ANSWERS_ACCEPTED, ANSWERS_SUBMITTED, HELPFUL_TOGGLES, ORPHAN_REPLIES,
    REJECTED_INTENTS, REPOSITORY_FAILURES, VOTES_APPLIED,
};

use super::presenter::AnswerAffordances;
use super::view_state::ViewState;
use crate::algorithms::{
    apply_acceptance, assemble, authorize_acceptance, classify_change, flatten_embedded,
    predict_outcome, resolve_reply_parent,
};
use crate::config::QnaConfig;
use crate::domain::{
    invariant_accepted_belongs, invariant_resolution_consistent, invariant_single_accepted,
    invariant_view_count_monotonic, invariant_votes_exclusive, require_actor, Answer, AnswerId,
    Intent, NewAnswer, OrphanReplyWarning, QnaError, Question, QuestionId, ThreadAssembly, UserId,
    VoteDirection, VoteTally, VoteTarget,
};
use crate::ports::{QnaApi, QuestionRepository};

/// Q&A Service - owns the cached page for one question.
pub struct QnaService<R: QuestionRepository> {
    /// Configuration.
    config: QnaConfig,
    /// System of record.
    repository: Arc<R>,
    /// Loaded question.
    question: Option<Question>,
    /// Answers and replies, flat, in repository order.
    answers: Vec<Answer>,
    /// Orphans found by the last load or refresh.
    warnings: Vec<OrphanReplyWarning>,
    /// Expand/collapse and draft state.
    view: ViewState,
}

impl<R: QuestionRepository> QnaService<R> {
    /// Create a service with nothing loaded.
    pub fn new(config: QnaConfig, repository: Arc<R>) -> Self {
        let view = ViewState::new(config.expand_replies_by_default);
        Self {
            config,
            repository,
            question: None,
            answers: Vec::new(),
            warnings: Vec::new(),
            view,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &QnaConfig {
        &self.config
    }

    /// Cached answers and replies, flat.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable view state (expand/collapse, drafts).
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Affordances of a cached answer for `viewer`.
    pub fn affordances(
        &self,
        viewer: Option<&UserId>,
        answer_id: &AnswerId,
    ) -> Option<AnswerAffordances> {
        let question = self.question.as_ref()?;
        let answer = self.answers.iter().find(|a| &a.id == answer_id)?;
        Some(AnswerAffordances::for_answer(question, answer, viewer))
    }

    /// Internal: the loaded question.
    fn loaded(&self) -> Result<&Question, QnaError> {
        self.question.as_ref().ok_or(QnaError::NotLoaded)
    }

    /// Internal: a cached answer.
    fn cached_answer(&self, id: &AnswerId) -> Result<&Answer, QnaError> {
        self.answers
            .iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| QnaError::AnswerNotFound(id.clone()))
    }

    /// Internal: trim and bound answer text.
    fn validate_content(&self, content: &str) -> Result<String, QnaError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(QnaError::EmptyContent);
        }
        let len = trimmed.chars().count();
        if len > self.config.max_content_len {
            return Err(QnaError::ContentTooLong {
                len,
                max: self.config.max_content_len,
            });
        }
        Ok(trimmed.to_string())
    }

    /// Internal: replace the cached answers with a fresh repository list.
    fn install_answers(
        &mut self,
        question: &Question,
        answers: Vec<Answer>,
    ) -> Result<(), QnaError> {
        let flat = flatten_embedded(&answers);
        invariant_single_accepted(question, &flat)?;
        invariant_accepted_belongs(question, &flat)?;

        let assembly = assemble(&flat);
        for warning in &assembly.warnings {
            log_event!(
                warn,
                "threads",
                "Dropping orphan reply",
                answer_id = %warning.answer_id,
                missing_parent_id = %warning.missing_parent_id
            );
        }
        ORPHAN_REPLIES.inc_by(assembly.warnings.len() as f64);

        self.view.retain_answers(flat.iter().map(|a| &a.id));
        self.answers = flat;
        self.warnings = assembly.warnings;
        Ok(())
    }

    /// Internal: re-fetch the loaded question and its answers.
    async fn fetch_answers(&mut self) -> Result<(), QnaError> {
        let question_id = self.loaded()?.id.clone();
        self.fetch_page(&question_id).await
    }

    /// Internal: fetch a question with its answers and replace the cached
    /// page. Answers are checked against the freshly fetched question, and
    /// nothing is replaced unless both calls succeed and agree.
    async fn fetch_page(&mut self, question_id: &QuestionId) -> Result<(), QnaError> {
        let fetched =
            round_trip("get_question", self.repository.get_question(question_id)).await?;
        if &fetched.id != question_id {
            return Err(QnaError::InvalidResponse(format!(
                "asked for question {}, got {}",
                question_id, fetched.id
            )));
        }
        invariant_resolution_consistent(&fetched)?;

        let answers =
            round_trip("list_answers", self.repository.list_answers(question_id)).await?;

        let switching = self.question.as_ref().is_some_and(|q| q.id != fetched.id);
        let question = match &self.question {
            Some(previous) if previous.id == fetched.id => {
                if !invariant_view_count_monotonic(previous.view_count, fetched.view_count) {
                    debug!(
                        "[qna] Keeping view count {} over stale {}",
                        previous.view_count, fetched.view_count
                    );
                }
                Question {
                    view_count: previous.view_count.max(fetched.view_count),
                    ..fetched
                }
            }
            _ => fetched,
        };

        if let Err(e) = self.install_answers(&question, answers) {
            error!("[qna] Inconsistent answers for {}: {}", question.id, e);
            return Err(e);
        }
        if switching {
            self.view = ViewState::new(self.config.expand_replies_by_default);
        }
        self.question = Some(question);
        Ok(())
    }
}

impl<R: QuestionRepository + 'static> QnaService<R> {
    /// Submit the open draft; on success the draft is cleared.
    ///
    /// # Errors
    /// - `EmptyContent` if no form is open
    /// - everything [`QnaApi::submit_answer`] returns
    pub async fn submit_draft(&mut self, actor: Option<&UserId>) -> Result<Answer, QnaError> {
        let draft = self
            .view
            .draft
            .clone()
            .ok_or_else(|| reject(Intent::Reply, QnaError::EmptyContent))?;
        self.submit_answer(actor, &draft.content, draft.replying_to.as_ref())
            .await
    }
}

/// Time a repository call and record its failure.
async fn round_trip<T, F>(operation: &'static str, call: F) -> Result<T, QnaError>
where
    F: Future<Output = Result<T, QnaError>>,
{
    let _timer = HistogramTimer::round_trip(operation);
    debug!("[qna] -> {}", operation);
    match call.await {
        Ok(value) => Ok(value),
        Err(e) => {
            error!("[qna] {} failed: {}", operation, e);
            REPOSITORY_FAILURES.with_label_values(&[operation]).inc();
            Err(e)
        }
    }
}

/// Record an intent refused before reaching the repository.
fn reject(intent: Intent, err: QnaError) -> QnaError {
    warn!("[qna] Rejected {:?}: {}", intent, err);
    REJECTED_INTENTS.with_label_values(&[err.reason()]).inc();
    err
}

#[async_trait]
impl<R: QuestionRepository + 'static> QnaApi for QnaService<R> {
    #[instrument(skip(self))]
    async fn load(&mut self, question_id: &QuestionId) -> Result<(), QnaError> {
        self.fetch_page(question_id).await?;
        info!(
            "[qna] Loaded question {} with {} answers",
            question_id,
            self.answers.len()
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn refresh_answers(&mut self) -> Result<(), QnaError> {
        self.fetch_answers().await
    }

    #[instrument(skip(self))]
    async fn vote(
        &mut self,
        actor: Option<&UserId>,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteTally, QnaError> {
        let actor = require_actor(actor).map_err(|e| reject(Intent::Vote, e))?;
        let question = self.loaded()?;

        let before = match &target {
            VoteTarget::Question(id) if id == &question.id => question.votes.clone(),
            VoteTarget::Question(id) => return Err(QnaError::QuestionNotFound(id.clone())),
            VoteTarget::Answer(id) => self.cached_answer(id)?.votes.clone(),
        };

        let tally = match &target {
            VoteTarget::Question(id) => {
                round_trip(
                    "vote_question",
                    self.repository.vote_question(actor, id, direction),
                )
                .await?
            }
            VoteTarget::Answer(id) => {
                round_trip("vote_answer", self.repository.vote_answer(actor, id, direction))
                    .await?
            }
        };
        invariant_votes_exclusive(&tally)?;

        let outcome = classify_change(&before, &tally, actor)
            .unwrap_or_else(|| predict_outcome(&before, actor, direction));
        VOTES_APPLIED
            .with_label_values(&[target.kind(), outcome.as_str()])
            .inc();
        log_event!(
            debug,
            "votes",
            "Vote applied",
            vote_target = %target,
            outcome = outcome.as_str(),
            before = before.vote_count(),
            after = tally.vote_count()
        );

        match &target {
            VoteTarget::Question(_) => {
                if let Some(question) = self.question.as_mut() {
                    question.votes = tally.clone();
                }
            }
            VoteTarget::Answer(id) => {
                if let Some(answer) = self.answers.iter_mut().find(|a| &a.id == id) {
                    answer.votes = tally.clone();
                }
            }
        }
        Ok(tally)
    }

    #[instrument(skip(self))]
    async fn accept_answer(
        &mut self,
        actor: Option<&UserId>,
        answer_id: &AnswerId,
    ) -> Result<(), QnaError> {
        let actor = require_actor(actor).map_err(|e| reject(Intent::Accept, e))?;
        let question = self.loaded()?;
        let answer = self.cached_answer(answer_id)?;
        authorize_acceptance(Some(actor), question, answer)
            .map_err(|e| reject(Intent::Accept, e))?;
        let question_id = question.id.clone();

        let updated = round_trip(
            "resolve_question",
            self.repository
                .resolve_question(actor, &question_id, answer_id),
        )
        .await?;
        invariant_resolution_consistent(&updated)?;
        if updated.id != question_id || updated.accepted_answer_id.as_ref() != Some(answer_id) {
            return Err(QnaError::InvalidResponse(format!(
                "resolve of {} returned question {} accepting {:?}",
                question_id, updated.id, updated.accepted_answer_id
            )));
        }

        let view_count = self
            .question
            .as_ref()
            .map_or(updated.view_count, |q| q.view_count.max(updated.view_count));
        let mut merged = Question { view_count, ..updated };
        apply_acceptance(&mut merged, answer_id, &mut self.answers);
        self.question = Some(merged);

        ANSWERS_ACCEPTED.inc();
        log_event!(
            info,
            "resolution",
            "Question resolved",
            question_id = %question_id,
            answer_id = %answer_id
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn toggle_helpful(
        &mut self,
        actor: Option<&UserId>,
        answer_id: &AnswerId,
    ) -> Result<bool, QnaError> {
        let actor = require_actor(actor).map_err(|e| reject(Intent::MarkHelpful, e))?;
        self.loaded()?;
        self.cached_answer(answer_id)?;

        let updated = round_trip(
            "mark_answer_helpful",
            self.repository.mark_answer_helpful(actor, answer_id),
        )
        .await?;
        if &updated.id != answer_id {
            return Err(QnaError::InvalidResponse(format!(
                "helpful toggle of {} returned answer {}",
                answer_id, updated.id
            )));
        }

        let is_helpful = updated.is_helpful;
        if let Some(answer) = self.answers.iter_mut().find(|a| &a.id == answer_id) {
            answer.is_helpful = is_helpful;
        }

        HELPFUL_TOGGLES.inc();
        log_event!(
            debug,
            "helpful",
            "Helpful flag toggled",
            answer_id = %answer_id,
            is_helpful = is_helpful
        );
        Ok(is_helpful)
    }

    #[instrument(skip(self, content))]
    async fn submit_answer(
        &mut self,
        actor: Option<&UserId>,
        content: &str,
        parent: Option<&AnswerId>,
    ) -> Result<Answer, QnaError> {
        let actor = require_actor(actor).map_err(|e| reject(Intent::Reply, e))?;
        let question_id = self.loaded()?.id.clone();
        let content = self
            .validate_content(content)
            .map_err(|e| reject(Intent::Reply, e))?;
        let parent = resolve_reply_parent(&self.answers, parent, self.config.reply_depth_policy)
            .map_err(|e| reject(Intent::Reply, e))?;

        let new_answer = match parent {
            Some(parent) => NewAnswer::reply(question_id, parent, content),
            None => NewAnswer::answer(question_id, content),
        };
        let kind = if new_answer.is_reply() { "reply" } else { "answer" };

        let created = round_trip(
            "create_answer",
            self.repository.create_answer(actor, new_answer),
        )
        .await?;
        ANSWERS_SUBMITTED.with_label_values(&[kind]).inc();
        info!("[qna] Created {} {}", kind, created.id);

        if let Err(e) = self.fetch_answers().await {
            warn!("[qna] Answer list refresh failed after submit: {}", e);
            if !self.answers.iter().any(|a| a.id == created.id) {
                self.answers.push(created.clone());
            }
        }
        self.view.cancel_draft();
        Ok(created)
    }

    fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    fn threads(&self) -> ThreadAssembly {
        assemble(&self.answers)
    }

    fn warnings(&self) -> &[OrphanReplyWarning] {
        &self.warnings
    }
}
