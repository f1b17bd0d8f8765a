//! # Vote Ledger
//!
//! Per-voter, per-target toggle semantics.
//!
//! | Actor holds     | Applies | Result                       |
//! |-----------------|---------|------------------------------|
//! | nothing         | `d`     | added to `d` voters          |
//! | `d`             | `d`     | removed from both sets       |
//! | `opposite(d)`   | `d`     | moved from `opposite(d)` to `d` |

use crate::domain::{require_actor, QnaError, UserId, VoteDirection, VoteOutcome, VoteTally};

/// Apply `direction` for `actor` to `tally`.
///
/// Returns the new tally and how the actor's membership changed. The input
/// tally is never modified, so a failed call leaves the caller's state as is.
///
/// # Errors
/// - `Unauthenticated` if there is no actor
pub fn apply_vote(
    actor: Option<&UserId>,
    tally: &VoteTally,
    direction: VoteDirection,
) -> Result<(VoteTally, VoteOutcome), QnaError> {
    let actor = require_actor(actor)?;
    let mut next = tally.clone();
    let outcome = predict_outcome(tally, actor, direction);

    match outcome {
        VoteOutcome::Removed => {
            next.voters_mut(direction).remove(actor);
        }
        VoteOutcome::Flipped => {
            next.voters_mut(direction.opposite()).remove(actor);
            next.voters_mut(direction).insert(actor.clone());
        }
        VoteOutcome::Added => {
            next.voters_mut(direction).insert(actor.clone());
        }
    }

    Ok((next, outcome))
}

/// Outcome `apply_vote` would produce, without touching the tally.
pub fn predict_outcome(tally: &VoteTally, actor: &UserId, direction: VoteDirection) -> VoteOutcome {
    match tally.direction_of(actor) {
        Some(held) if held == direction => VoteOutcome::Removed,
        Some(_) => VoteOutcome::Flipped,
        None => VoteOutcome::Added,
    }
}

/// Classify how `actor`'s membership changed between two tallies.
///
/// Returns `None` when the actor's direction is the same in both.
pub fn classify_change(
    before: &VoteTally,
    after: &VoteTally,
    actor: &UserId,
) -> Option<VoteOutcome> {
    match (before.direction_of(actor), after.direction_of(actor)) {
        (None, Some(_)) => Some(VoteOutcome::Added),
        (Some(_), None) => Some(VoteOutcome::Removed),
        (Some(a), Some(b)) if a != b => Some(VoteOutcome::Flipped),
        _ => None,
    }
}
