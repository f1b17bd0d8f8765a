//! # Application Module
//!
//! The service orchestrating the domain and the repository port, plus the
//! presentation state a view renders from.

pub mod presenter;
pub mod service;
pub mod view_state;

pub use presenter::{answers_heading, display_name, relative_time, AnswerAffordances};
pub use service::QnaService;
pub use view_state::{visible_replies, ReplyDraft, ViewState};
