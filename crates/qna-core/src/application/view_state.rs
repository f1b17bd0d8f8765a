//! # View State
//!
//! Presentation state kept outside the domain model: which reply lists are
//! expanded and what the user is typing. Serializable so a view can persist
//! or restore it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Answer, AnswerId, Thread};

/// Answer/reply form being composed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyDraft {
    /// Top-level answer being replied to; `None` for a new answer.
    pub replying_to: Option<AnswerId>,
    /// Text typed so far.
    pub content: String,
}

/// Expand/collapse map and form state for one question page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Explicit expand/collapse choices per top-level answer.
    #[serde(default)]
    pub expanded: BTreeMap<AnswerId, bool>,
    /// Open answer/reply form, if any.
    #[serde(default)]
    pub draft: Option<ReplyDraft>,
    /// Fallback for answers with no explicit choice.
    #[serde(default)]
    pub expand_by_default: bool,
}

impl ViewState {
    /// Empty view state.
    pub fn new(expand_by_default: bool) -> Self {
        Self {
            expand_by_default,
            ..Self::default()
        }
    }

    /// Whether the replies of `answer_id` are shown.
    pub fn is_expanded(&self, answer_id: &AnswerId) -> bool {
        self.expanded
            .get(answer_id)
            .copied()
            .unwrap_or(self.expand_by_default)
    }

    /// Flip the reply list of `answer_id`; returns the new state.
    pub fn toggle_replies(&mut self, answer_id: &AnswerId) -> bool {
        let next = !self.is_expanded(answer_id);
        self.expanded.insert(answer_id.clone(), next);
        next
    }

    /// Open the form for a new top-level answer.
    pub fn open_answer_form(&mut self) {
        self.draft = Some(ReplyDraft::default());
    }

    /// Open the form for a reply to `answer_id`.
    pub fn open_reply_form(&mut self, answer_id: AnswerId) {
        self.draft = Some(ReplyDraft {
            replying_to: Some(answer_id),
            content: String::new(),
        });
    }

    /// Update the draft text; opens an answer form if none is open.
    pub fn set_draft_content(&mut self, content: impl Into<String>) {
        self.draft.get_or_insert_with(ReplyDraft::default).content = content.into();
    }

    /// Close the form and discard the draft.
    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    /// Whether an answer/reply form is open.
    pub fn is_form_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Forget expand choices for answers that no longer exist.
    pub fn retain_answers<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a AnswerId>,
    {
        let keep: std::collections::HashSet<&AnswerId> = ids.into_iter().collect();
        self.expanded.retain(|id, _| keep.contains(id));
    }
}

/// Replies of `thread` the view should render.
pub fn visible_replies<'a>(thread: &'a Thread, view: &ViewState) -> &'a [Answer] {
    if view.is_expanded(&thread.answer.id) {
        &thread.replies
    } else {
        &[]
    }
}
