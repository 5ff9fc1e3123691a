//! Editing session - the single writer over the post repository.
//!
//! The session owns the active view, the open draft (if any), the list
//! filter, the theme preference and the current notice. Every change goes
//! through [`Session::dispatch`] (or the equivalent named method), so
//! transitions are explicit and run to completion synchronously.
//!
//! ```text
//!   NewPost / UseIdea / EditPost          Save / Cancel / Delete(active)
//! Dashboard ─────────────────────▶ Editor ─────────────────────────────▶ Dashboard
//! ```
//!
//! The editor view is active exactly when a draft is open.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    Draft, Notice, NoticeId, Post, PostBody, PostId, Status, StatusFilter, THEME_KEY, Theme,
    filtered_posts,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{KeyValueStore, KeyValueStoreExt, PostRepository};

/// Top-level screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Editor,
    Brainstorm,
    Analyzer,
}

/// A mutation of the open draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    SetText { index: usize, text: String },
    AttachImage { index: usize, reference: String },
    RemoveImage { index: usize },
    PushUnit,
    RemoveUnit { index: usize },
    ToggleTone(String),
    AddTone(String),
    RemoveTone(String),
    SetStatus(Status),
    Schedule(DateTime<Utc>),
    ClearSchedule,
    InsertHashtag { index: usize, tag: String },
}

impl DraftEdit {
    /// Applies the edit. Returns a notice message when the edit is worth
    /// announcing.
    pub fn apply(self, body: &mut PostBody) -> Result<Option<String>, DomainError> {
        match self {
            DraftEdit::SetText { index, text } => body.set_text(index, text)?,
            DraftEdit::AttachImage { index, reference } => body.attach_image(index, reference)?,
            DraftEdit::RemoveImage { index } => body.remove_image(index)?,
            DraftEdit::PushUnit => {
                body.push_unit();
            }
            DraftEdit::RemoveUnit { index } => {
                body.remove_unit(index)?;
            }
            DraftEdit::ToggleTone(label) => {
                body.tones_mut().toggle(&label)?;
            }
            DraftEdit::AddTone(label) => {
                body.tones_mut().add(&label)?;
            }
            DraftEdit::RemoveTone(label) => {
                body.tones_mut().remove(&label);
            }
            DraftEdit::SetStatus(status) => body.set_status(status),
            DraftEdit::Schedule(at) => body.schedule(at),
            DraftEdit::ClearSchedule => body.clear_schedule(),
            DraftEdit::InsertHashtag { index, tag } => {
                if let Some(hashtag) = body.insert_hashtag(index, &tag)? {
                    return Ok(Some(format!("'{hashtag}' added to post #{}", index + 1)));
                }
            }
        }
        Ok(None)
    }
}

/// Session actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NewPost,
    EditPost(PostId),
    Save,
    Cancel,
    UseIdea(String),
    Delete(PostId),
    ShowDashboard,
    OpenBrainstorm,
    OpenAnalyzer,
    SetFilter(StatusFilter),
    ToggleTheme,
    Edit(DraftEdit),
    DismissNotice(NoticeId),
}

/// Result of a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; nothing further to report.
    Applied,
    /// The action referred to something that does not exist; nothing changed.
    Ignored,
    /// A draft was committed. A notice was raised for it.
    Saved { post: Post, notice: NoticeId },
    /// A record was removed.
    Deleted { post: Post, closed_draft: bool },
    /// State changed and a notice was raised.
    Notified(NoticeId),
}

impl Outcome {
    /// The notice raised by this action, if any.
    pub fn notice(&self) -> Option<NoticeId> {
        match self {
            Outcome::Saved { notice, .. } | Outcome::Notified(notice) => Some(*notice),
            _ => None,
        }
    }
}

/// Application state with a single writer.
pub struct Session<R: PostRepository> {
    posts: R,
    prefs: Arc<dyn KeyValueStore>,
    view: View,
    draft: Option<Draft>,
    filter: StatusFilter,
    theme: Theme,
    notice: Option<Notice>,
}

impl<R: PostRepository> Session<R> {
    /// Build a session over `posts`, reading the theme preference from `prefs`.
    pub fn new(posts: R, prefs: Arc<dyn KeyValueStore>) -> Self {
        let theme = Theme::from_dark(prefs.read_or(THEME_KEY, Theme::default().is_dark()));

        Self {
            posts,
            prefs,
            view: View::Dashboard,
            draft: None,
            filter: StatusFilter::All,
            theme,
            notice: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn repository(&self) -> &R {
        &self.posts
    }

    /// All posts, newest first.
    pub fn posts(&self) -> &[Post] {
        self.posts.list()
    }

    /// Posts accepted by the current filter.
    pub fn visible_posts(&self) -> Vec<&Post> {
        filtered_posts(self.posts.list(), self.filter)
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, DomainError> {
        tracing::debug!(?action, view = ?self.view, "Dispatching action");

        match action {
            Action::NewPost => {
                self.new_post();
                Ok(Outcome::Applied)
            }
            Action::EditPost(id) => Ok(if self.edit_post(&id) {
                Outcome::Applied
            } else {
                Outcome::Ignored
            }),
            Action::Save => {
                let post = self.save()?;
                let notice = self.notify("Post saved!");
                Ok(Outcome::Saved { post, notice })
            }
            Action::Cancel | Action::ShowDashboard => {
                self.cancel();
                Ok(Outcome::Applied)
            }
            Action::UseIdea(text) => {
                self.use_idea(text);
                Ok(Outcome::Applied)
            }
            Action::Delete(id) => Ok(self.delete(&id)),
            Action::OpenBrainstorm => {
                self.open(View::Brainstorm);
                Ok(Outcome::Applied)
            }
            Action::OpenAnalyzer => {
                self.open(View::Analyzer);
                Ok(Outcome::Applied)
            }
            Action::SetFilter(filter) => {
                self.filter = filter;
                Ok(Outcome::Applied)
            }
            Action::ToggleTheme => {
                self.toggle_theme();
                Ok(Outcome::Applied)
            }
            Action::Edit(edit) => match self.edit(edit)? {
                Some(notice) => Ok(Outcome::Notified(notice)),
                None => Ok(Outcome::Applied),
            },
            Action::DismissNotice(id) => Ok(if self.dismiss_notice(id) {
                Outcome::Applied
            } else {
                Outcome::Ignored
            }),
        }
    }

    /// Open the editor on a fresh draft.
    pub fn new_post(&mut self) {
        self.open_draft(Draft::New(PostBody::new(Utc::now())));
    }

    /// Open the editor on a fresh draft seeded with `text`.
    pub fn use_idea(&mut self, text: impl Into<String>) {
        self.open_draft(Draft::New(PostBody::seeded(text, Utc::now())));
    }

    /// Open the editor on a copy of the saved record `id`.
    ///
    /// Returns false, leaving state untouched, when no such record exists.
    pub fn edit_post(&mut self, id: &PostId) -> bool {
        match self.posts.get(id) {
            Some(post) => {
                self.open_draft(Draft::Existing(post));
                true
            }
            None => {
                tracing::debug!(post_id = %id, "Edit requested for unknown post");
                false
            }
        }
    }

    /// Commit the open draft and return to the dashboard.
    pub fn save(&mut self) -> Result<Post, DomainError> {
        let draft = self.draft.take().ok_or(DomainError::NoActiveDraft)?;

        let saved = match draft {
            Draft::New(body) => self.posts.add(body),
            Draft::Existing(post) => match self.posts.update(post.clone()) {
                Ok(saved) => saved,
                Err(RepoError::NotFound(id)) => {
                    // Deleted elsewhere while open: keep the work as a new record.
                    tracing::warn!(post_id = %id, "Edited post no longer exists, saving as new");
                    let (_, body) = post.into_parts();
                    self.posts.add(body)
                }
            },
        };

        tracing::info!(post_id = %saved.id(), status = %saved.status(), "Post saved");
        self.view = View::Dashboard;
        Ok(saved)
    }

    /// Discard the open draft, if any, and return to the dashboard.
    pub fn cancel(&mut self) {
        if self.draft.take().is_some() {
            tracing::debug!("Draft discarded");
        }
        self.view = View::Dashboard;
    }

    /// Remove a saved record. Confirmation is the caller's job.
    ///
    /// If the record is open in the editor the draft is closed too.
    pub fn delete(&mut self, id: &PostId) -> Outcome {
        let closed_draft = self.draft.as_ref().and_then(Draft::id) == Some(id);
        if closed_draft {
            self.draft = None;
            self.view = View::Dashboard;
        }

        match self.posts.delete(id) {
            Ok(post) => {
                tracing::info!(post_id = %id, closed_draft, "Post deleted");
                Outcome::Deleted { post, closed_draft }
            }
            Err(RepoError::NotFound(_)) if closed_draft => Outcome::Applied,
            Err(RepoError::NotFound(_)) => {
                tracing::debug!(post_id = %id, "Delete requested for unknown post");
                Outcome::Ignored
            }
        }
    }

    /// Apply an edit to the open draft. Returns the id of any notice raised.
    pub fn edit(&mut self, edit: DraftEdit) -> Result<Option<NoticeId>, DomainError> {
        let draft = self.draft.as_mut().ok_or(DomainError::NoActiveDraft)?;
        let message = edit.apply(draft.body_mut())?;
        Ok(message.map(|m| self.notify(m)))
    }

    /// Show a notice, replacing the current one. The caller schedules the
    /// dismissal with the returned id.
    pub fn notify(&mut self, message: impl Into<String>) -> NoticeId {
        let notice = Notice::new(message);
        let id = notice.id;
        self.notice = Some(notice);
        id
    }

    /// Clear the notice if it is still the one identified by `id`.
    pub fn dismiss_notice(&mut self, id: NoticeId) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.id == id) {
            self.notice = None;
            true
        } else {
            false
        }
    }

    /// Flip the theme and persist the preference.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.prefs.write_json(THEME_KEY, &self.theme.is_dark()) {
            tracing::error!(error = %e, "Error saving theme preference");
        }
        self.theme
    }

    fn open_draft(&mut self, draft: Draft) {
        self.draft = Some(draft);
        self.view = View::Editor;
    }

    fn open(&mut self, view: View) {
        if self.draft.take().is_some() {
            tracing::debug!(?view, "Draft discarded on view switch");
        }
        self.view = view;
    }
}
