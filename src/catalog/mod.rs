//! Catalog editing view-model.
//!
//! Holds the last fetched list and at most one open edit. Every mutation is
//! followed by a full refetch of the list; nothing is patched locally.
//! Mutating calls take `&mut self`, so a second submit or delete cannot start
//! while one is in flight.

pub mod draft;

use crate::api::CatalogApi;
use crate::error::ClientError;
use crate::guard::{self, Decision, Route};
use crate::session::SharedSession;
use crate::types::{Watch, WatchId};

pub use draft::{DraftField, WatchDraft};

pub const SAVE_FAILED: &str = "Failed to save watch";
pub const DELETE_FAILED: &str = "Failed to delete watch";
pub const LOAD_FAILED: &str = "Failed to load watches";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const NOTHING_TO_SUBMIT: &str = "No watch is being edited";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Create,
    Update(WatchId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub target: EditTarget,
    pub draft: WatchDraft,
    /// Message from the last failed submit
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Idle,
    Editing(Editor),
    Submitting(Editor),
}

/// What a submit or delete produced, for the view to report
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Saved(Watch),
    Deleted(WatchId),
    /// Delete was not confirmed; nothing was sent
    Cancelled,
    /// Draft failed local validation; nothing was sent
    Invalid(String),
    Failed(String),
    /// The API rejected the token; the session was cleared
    Redirect(Route),
}

pub struct CatalogViewModel<A: CatalogApi> {
    api: A,
    session: SharedSession,
    state: EditorState,
    watches: Vec<Watch>,
    load_error: Option<String>,
}

impl<A: CatalogApi> CatalogViewModel<A> {
    pub fn new(api: A, session: SharedSession) -> Self {
        Self {
            api,
            session,
            state: EditorState::Idle,
            watches: Vec::new(),
            load_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn watches(&self) -> &[Watch] {
        &self.watches
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, EditorState::Idle)
    }

    pub fn editor(&self) -> Option<&Editor> {
        match &self.state {
            EditorState::Editing(editor) | EditorState::Submitting(editor) => Some(editor),
            EditorState::Idle => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.editor().and_then(|e| e.error.as_deref())
    }

    /// Fetch the whole list. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<(), String> {
        match self.api.list_watches().await {
            Ok(watches) => {
                self.watches = watches;
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load watches: {}", e);
                if e.is_unauthorized() {
                    self.sign_out();
                }
                let message = e.user_message(LOAD_FAILED);
                self.load_error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub fn begin_create(&mut self) {
        self.state = EditorState::Editing(Editor {
            target: EditTarget::Create,
            draft: WatchDraft::default(),
            error: None,
        });
    }

    pub fn begin_edit(&mut self, watch: &Watch) {
        self.state = EditorState::Editing(Editor {
            target: EditTarget::Update(watch.id),
            draft: WatchDraft::from_watch(watch),
            error: None,
        });
    }

    /// Change one draft field. Returns false when no edit is open.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) -> bool {
        match &mut self.state {
            EditorState::Editing(editor) => {
                editor.draft.set(field, value);
                true
            }
            _ => false,
        }
    }

    /// Discard the draft
    pub fn cancel(&mut self) {
        self.state = EditorState::Idle;
    }

    /// Validate the draft, send it, and refetch on success.
    ///
    /// Local validation failures and server rejections both leave the draft
    /// open with the message attached.
    pub async fn submit(&mut self) -> Feedback {
        let mut editor = match std::mem::replace(&mut self.state, EditorState::Idle) {
            EditorState::Editing(editor) | EditorState::Submitting(editor) => editor,
            EditorState::Idle => return Feedback::Failed(NOTHING_TO_SUBMIT.to_string()),
        };

        let input = match editor.draft.validate() {
            Ok(input) => input,
            Err(e) => {
                let message = e.user_message(SAVE_FAILED);
                editor.error = Some(message.clone());
                self.state = EditorState::Editing(editor);
                return Feedback::Invalid(message);
            }
        };

        editor.error = None;
        let target = editor.target;
        self.state = EditorState::Submitting(editor);

        let result = match target {
            EditTarget::Create => self.api.create_watch(&input).await,
            EditTarget::Update(id) => self.api.update_watch(id, &input.into()).await,
        };

        match result {
            Ok(watch) => {
                tracing::info!(id = watch.id, ?target, "watch saved");
                self.state = EditorState::Idle;
                // A failed refetch is reported through load_error
                let _ = self.refresh().await;
                Feedback::Saved(watch)
            }
            Err(e) => self.reopen_with(e),
        }
    }

    /// Delete after confirmation, then refetch. The local list is only
    /// changed by that refetch.
    pub async fn delete(&mut self, id: WatchId, confirmed: bool) -> Feedback {
        if !confirmed {
            return Feedback::Cancelled;
        }

        match self.api.delete_watch(id).await {
            Ok(()) => {
                tracing::info!(id, "watch deleted");
                let _ = self.refresh().await;
                Feedback::Deleted(id)
            }
            Err(e) => {
                tracing::warn!(id, "delete failed: {}", e);
                if e.is_unauthorized() {
                    return self.sign_out();
                }
                Feedback::Failed(e.user_message(DELETE_FAILED))
            }
        }
    }

    fn reopen_with(&mut self, err: ClientError) -> Feedback {
        tracing::warn!("save failed: {}", err);
        let (message, feedback) = if err.is_unauthorized() {
            (SESSION_EXPIRED.to_string(), self.sign_out())
        } else {
            let message = err.user_message(SAVE_FAILED);
            (message.clone(), Feedback::Failed(message))
        };

        if let EditorState::Submitting(mut editor) =
            std::mem::replace(&mut self.state, EditorState::Idle)
        {
            editor.error = Some(message);
            self.state = EditorState::Editing(editor);
        }
        feedback
    }

    /// Drop the rejected token and re-run the guard for the admin view
    fn sign_out(&mut self) -> Feedback {
        if let Err(e) = self.session.clear_session() {
            tracing::warn!("failed to clear session: {}", e);
        }
        match guard::check(&self.session.snapshot(), true) {
            Decision::Redirect(route) => Feedback::Redirect(route),
            Decision::Allow => Feedback::Failed(SESSION_EXPIRED.to_string()),
        }
    }
}
