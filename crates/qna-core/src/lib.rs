//! # QnA Core
//!
//! Interaction core of a community Q&A page: voting, threaded replies,
//! accepted answers and helpful flags.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Keep a client-side cache of one question page consistent with a remote
//! repository that is the system of record:
//! - Votes toggle per user and per target; the count is derived from the
//!   voter sets, never stored
//! - Replies nest exactly one level below a top-level answer
//! - A question is resolved at most once, by its author
//! - The helpful flag is shared by all viewers
//!
//! ## Consistency Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | No optimistic updates | State changes only from repository responses |
//! | Serialized intents | Mutations take `&mut self` and await the round trip |
//! | Authentication first | Anonymous intents never reach the repository |
//! | Failure is a no-op | Any `Err` leaves the cached page untouched |
//!
//! ## Module Structure
//!
//! ```text
//! qna-core/
//! ├── domain/          # Questions, answers, vote tallies, errors, invariants
//! ├── algorithms/      # Vote ledger, thread assembler, resolution, helpfulness
//! ├── ports/           # QnaApi (inbound) + QuestionRepository (outbound)
//! ├── application/     # QnaService, view state, presenter helpers
//! ├── adapters/        # InMemoryRepository
//! └── config.rs        # QnaConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryRepository;
pub use algorithms::{
    accept_answer, apply_acceptance, apply_vote, assemble, authorize_acceptance,
    classify_change, flatten_embedded, predict_outcome, resolve_reply_parent, toggle_helpful,
};
pub use application::{
    answers_heading, display_name, relative_time, visible_replies, AnswerAffordances,
    QnaService, ReplyDraft, ViewState,
};
pub use config::QnaConfig;
pub use domain::{
    Answer, AnswerId, Intent, NewAnswer, OrphanReplyWarning, QnaError, Question, QuestionId,
    ReplyDepthPolicy, ResolutionState, Thread, ThreadAssembly, UserId, UserNotice,
    VoteDirection, VoteOutcome, VoteTally, VoteTarget,
    DEFAULT_MAX_CONTENT_LEN, MAX_REPLY_DEPTH,
    invariant_votes_exclusive, invariant_resolution_consistent, invariant_single_accepted,
    invariant_accepted_belongs, invariant_reply_depth, invariant_view_count_monotonic,
};
pub use ports::{QnaApi, QuestionRepository};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
