//! # Domain Invariants
//!
//! Business rules that must always hold true. Repository responses are
//! checked against these before they are merged into local state.

use super::entities::{Answer, Question};
use super::errors::QnaError;
use super::value_objects::{AnswerId, UserId, VoteTally};
use std::collections::HashMap;

/// Default maximum answer length in characters.
pub const DEFAULT_MAX_CONTENT_LEN: usize = 20_000;

/// Replies may nest one level below a top-level answer.
pub const MAX_REPLY_DEPTH: usize = 1;

/// Invariant: privileged actions need a current user.
pub fn require_actor(actor: Option<&UserId>) -> Result<&UserId, QnaError> {
    actor.ok_or(QnaError::Unauthenticated)
}

/// Invariant: a user is in at most one of the two voter sets.
pub fn invariant_votes_exclusive(tally: &VoteTally) -> Result<(), QnaError> {
    if let Some(user) = tally.upvoter_ids.intersection(&tally.downvoter_ids).next() {
        return Err(QnaError::InvalidResponse(format!(
            "user {} is both an upvoter and a downvoter",
            user
        )));
    }
    Ok(())
}

/// Invariant: `accepted_answer_id` is set iff the question is resolved.
pub fn invariant_resolution_consistent(question: &Question) -> Result<(), QnaError> {
    match (question.is_resolved, &question.accepted_answer_id) {
        (true, None) => Err(QnaError::InvalidResponse(format!(
            "question {} is resolved without an accepted answer",
            question.id
        ))),
        (false, Some(id)) => Err(QnaError::InvalidResponse(format!(
            "question {} is unresolved but references accepted answer {}",
            question.id, id
        ))),
        _ => Ok(()),
    }
}

/// Invariant: at most one answer per question is accepted, and only the one
/// the question points at.
pub fn invariant_single_accepted(question: &Question, answers: &[Answer]) -> Result<(), QnaError> {
    let accepted: Vec<&Answer> = answers
        .iter()
        .filter(|a| a.question_id == question.id && a.is_accepted)
        .collect();

    if accepted.len() > 1 {
        return Err(QnaError::InvalidResponse(format!(
            "question {} has {} accepted answers",
            question.id,
            accepted.len()
        )));
    }

    if let Some(answer) = accepted.first() {
        if question.accepted_answer_id.as_ref() != Some(&answer.id) {
            return Err(QnaError::InvalidResponse(format!(
                "answer {} is accepted but question {} does not reference it",
                answer.id, question.id
            )));
        }
    }

    Ok(())
}

/// Invariant: the accepted answer belongs to the question.
pub fn invariant_accepted_belongs(question: &Question, answers: &[Answer]) -> Result<(), QnaError> {
    let Some(accepted_id) = &question.accepted_answer_id else {
        return Ok(());
    };
    match answers.iter().find(|a| &a.id == accepted_id) {
        Some(answer) if answer.question_id != question.id => {
            Err(QnaError::AnswerQuestionMismatch {
                answer: answer.id.clone(),
                expected: question.id.clone(),
                actual: answer.question_id.clone(),
            })
        }
        // Not loaded locally; the repository owns the check.
        _ => Ok(()),
    }
}

/// Invariant: no answer sits more than [`MAX_REPLY_DEPTH`] levels below a
/// top-level answer.
pub fn invariant_reply_depth(answers: &[Answer]) -> Result<(), QnaError> {
    let parents: HashMap<&AnswerId, Option<&AnswerId>> = answers
        .iter()
        .map(|a| (&a.id, a.parent_answer_id.as_ref()))
        .collect();

    for answer in answers {
        let Some(direct) = &answer.parent_answer_id else {
            continue;
        };
        let mut depth = 0;
        let mut cursor = Some(direct);
        while let Some(parent) = cursor {
            depth += 1;
            if depth > MAX_REPLY_DEPTH {
                return Err(QnaError::ReplyTooDeep(direct.clone()));
            }
            cursor = parents.get(parent).copied().flatten();
        }
    }
    Ok(())
}

/// Invariant: view counts never decrease.
pub fn invariant_view_count_monotonic(previous: u64, next: u64) -> bool {
    next >= previous
}
