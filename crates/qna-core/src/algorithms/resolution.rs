//! # Resolution Controller
//!
//! `Unresolved -> Resolved` for a question, driven by its author.
//!
//! The transition is one-shot: once resolved, accepting any answer again
//! (the same one or a different one) is rejected. Reopening is not modeled.

use crate::domain::{require_actor, Answer, AnswerId, QnaError, Question, UserId};

/// Check that `actor` may accept `answer` on `question`.
///
/// # Errors
/// - `Unauthenticated` if there is no actor
/// - `Permission` if the actor is not the question author
/// - `AlreadyResolved` if the question already has an accepted answer
/// - `AnswerQuestionMismatch` if the answer belongs to another question
pub fn authorize_acceptance<'a>(
    actor: Option<&'a UserId>,
    question: &Question,
    answer: &Answer,
) -> Result<&'a UserId, QnaError> {
    let actor = require_actor(actor)?;

    if !question.is_author(actor) {
        return Err(QnaError::Permission {
            actor: actor.clone(),
            author: question.author_id.clone(),
        });
    }

    // A half-set resolution (flag without id or the reverse) still counts as resolved.
    if question.is_resolved || question.accepted_answer_id.is_some() {
        return Err(QnaError::AlreadyResolved(question.id.clone()));
    }

    if answer.question_id != question.id {
        return Err(QnaError::AnswerQuestionMismatch {
            answer: answer.id.clone(),
            expected: question.id.clone(),
            actual: answer.question_id.clone(),
        });
    }

    Ok(actor)
}

/// Accept `answer_id` on `question`, updating every answer in `answers`.
///
/// Nothing is modified unless all checks pass.
///
/// # Errors
/// - `AnswerNotFound` if `answer_id` is not in `answers`
/// - everything [`authorize_acceptance`] returns
pub fn accept_answer(
    actor: Option<&UserId>,
    question: &mut Question,
    answer_id: &AnswerId,
    answers: &mut [Answer],
) -> Result<(), QnaError> {
    let answer = answers
        .iter()
        .find(|a| &a.id == answer_id)
        .ok_or_else(|| QnaError::AnswerNotFound(answer_id.clone()))?;

    authorize_acceptance(actor, question, answer)?;
    apply_acceptance(question, answer_id, answers);
    Ok(())
}

/// Record `accepted` as the question's accepted answer without any checks.
///
/// Used to merge an authoritative repository response. Clears
/// `is_accepted` on every other answer of the question, replies included.
pub fn apply_acceptance(question: &mut Question, accepted: &AnswerId, answers: &mut [Answer]) {
    question.is_resolved = true;
    question.accepted_answer_id = Some(accepted.clone());

    for answer in answers.iter_mut().filter(|a| a.question_id == question.id) {
        answer.is_accepted = &answer.id == accepted;
    }
}
