//! # Algorithms Module
//!
//! Pure rules of the Q&A core. Both the client cache and the in-memory
//! repository apply them.

pub mod helpfulness;
pub mod resolution;
pub mod thread_assembler;
pub mod vote_ledger;

pub use helpfulness::toggle_helpful;
pub use resolution::{accept_answer, apply_acceptance, authorize_acceptance};
pub use thread_assembler::{assemble, flatten_embedded, resolve_reply_parent};
pub use vote_ledger::{apply_vote, classify_change, predict_outcome};
