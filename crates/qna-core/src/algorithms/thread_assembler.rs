//! # Thread Assembler
//!
//! Builds the two-level answer tree from the repository's answer list.
//!
//! Ordering is the repository's policy: top-level answers and replies keep
//! their input order. The assembler never decides what is visible; it always
//! returns the full tree.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::domain::{
    Answer, AnswerId, OrphanReplyWarning, QnaError, ReplyDepthPolicy, Thread, ThreadAssembly,
    MAX_REPLY_DEPTH,
};

/// Partition `answers` into top-level threads.
///
/// Replies attach to the top-level answer named by `parent_answer_id`. A
/// reply whose parent is not a top-level answer in the input is dropped and
/// reported as an [`OrphanReplyWarning`]. Replies the repository embedded in
/// `Answer::replies` are flattened first, so nested and flat inputs give the
/// same tree. Duplicate ids keep their first occurrence; a reply reusing a
/// top-level answer's id is dropped and reported as well.
pub fn assemble(answers: &[Answer]) -> ThreadAssembly {
    let flat = flatten_embedded(answers);

    let mut threads: Vec<Thread> = Vec::new();
    let mut index: HashMap<AnswerId, usize> = HashMap::new();

    for answer in flat.iter().filter(|a| !a.is_reply()) {
        if index.contains_key(&answer.id) {
            continue;
        }
        index.insert(answer.id.clone(), threads.len());
        threads.push(Thread::new(answer.clone()));
    }

    let mut placed: HashSet<AnswerId> = HashSet::new();
    let mut warnings = Vec::new();

    for reply in flat.iter().filter(|a| a.is_reply()) {
        let Some(parent) = reply.parent_answer_id.as_ref() else {
            continue;
        };
        if index.contains_key(&reply.id) {
            warn!(
                answer_id = %reply.id,
                parent_id = %parent,
                "[qna] reply id collides with a top-level answer, dropping reply"
            );
            warnings.push(OrphanReplyWarning {
                answer_id: reply.id.clone(),
                missing_parent_id: parent.clone(),
            });
            continue;
        }
        if !placed.insert(reply.id.clone()) {
            continue;
        }
        match index.get(parent) {
            Some(&slot) => threads[slot].replies.push(reply.clone()),
            None => warnings.push(OrphanReplyWarning {
                answer_id: reply.id.clone(),
                missing_parent_id: parent.clone(),
            }),
        }
    }

    ThreadAssembly { threads, warnings }
}

/// Flatten embedded replies into a single list.
///
/// Each answer is followed by its embedded replies; embedded replies without
/// a `parent_answer_id` inherit the embedding answer's id.
pub fn flatten_embedded(answers: &[Answer]) -> Vec<Answer> {
    let mut flat = Vec::with_capacity(answers.len());
    for answer in answers {
        push_flattened(answer, &mut flat);
    }
    flat
}

fn push_flattened(answer: &Answer, out: &mut Vec<Answer>) {
    let mut own = answer.clone();
    let embedded = std::mem::take(&mut own.replies);
    let own_id = own.id.clone();
    out.push(own);

    for mut reply in embedded {
        if reply.parent_answer_id.is_none() {
            reply.parent_answer_id = Some(own_id.clone());
        }
        push_flattened(&reply, out);
    }
}

/// Resolve the parent a new reply should attach to.
///
/// `None` means a top-level answer. A parent that is itself a reply is either
/// re-targeted to its own top-level parent or rejected, per `policy`.
///
/// # Errors
/// - `AnswerNotFound` if `requested` is not among `answers`
/// - `ReplyTooDeep` if `requested` is a reply and `policy` is `Reject`
pub fn resolve_reply_parent(
    answers: &[Answer],
    requested: Option<&AnswerId>,
    policy: ReplyDepthPolicy,
) -> Result<Option<AnswerId>, QnaError> {
    let Some(requested) = requested else {
        return Ok(None);
    };

    let parent = answers
        .iter()
        .find(|a| &a.id == requested)
        .ok_or_else(|| QnaError::AnswerNotFound(requested.clone()))?;

    let depth = usize::from(parent.is_reply()) + 1;
    match (&parent.parent_answer_id, policy) {
        _ if depth <= MAX_REPLY_DEPTH => Ok(Some(parent.id.clone())),
        (Some(top), ReplyDepthPolicy::Flatten) => Ok(Some(top.clone())),
        (_, ReplyDepthPolicy::Reject) | (None, _) => {
            Err(QnaError::ReplyTooDeep(parent.id.clone()))
        }
    }
}
