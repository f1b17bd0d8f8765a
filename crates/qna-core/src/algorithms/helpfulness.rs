//! # Helpfulness Tracker
//!
//! The helpful flag is shared: any authenticated user flips it for every
//! viewer. Unlike votes there is no per-user ballot, so two users toggling
//! in turn cancel each other out.

use crate::domain::{require_actor, Answer, QnaError, UserId};

/// Flip `answer.is_helpful` on behalf of `actor`.
///
/// Returns the new flag value.
///
/// # Errors
/// - `Unauthenticated` if there is no actor
pub fn toggle_helpful(actor: Option<&UserId>, answer: &mut Answer) -> Result<bool, QnaError> {
    require_actor(actor)?;
    answer.is_helpful = !answer.is_helpful;
    Ok(answer.is_helpful)
}
