//! Cancellable delayed dismissal keyed by notice id.
//!
//! The timer never touches session state. When it fires it sends the notice
//! id back over a channel to the event loop, which dispatches the dismissal;
//! the session ignores ids that no longer match its current notice.

use std::time::Duration;

use planner_core::domain::NoticeId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Schedules one pending dismissal at a time.
pub struct DismissTimer {
    ttl: Duration,
    sender: mpsc::UnboundedSender<NoticeId>,
    pending: Option<(NoticeId, JoinHandle<()>)>,
}

impl DismissTimer {
    /// Create a timer and the receiver its expirations arrive on.
    pub fn new(ttl: Duration) -> (Self, mpsc::UnboundedReceiver<NoticeId>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let timer = Self {
            ttl,
            sender,
            pending: None,
        };
        (timer, receiver)
    }

    /// Schedule the dismissal of `id`, cancelling any earlier pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, id: NoticeId) {
        self.cancel();

        let sender = self.sender.clone();
        let ttl = self.ttl;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if sender.send(id).is_err() {
                tracing::debug!(notice_id = %id, "Dismissal dropped, receiver closed");
            }
        });

        tracing::trace!(notice_id = %id, ttl_ms = ttl.as_millis() as u64, "Dismissal scheduled");
        self.pending = Some((id, handle));
    }

    /// Cancel the pending dismissal, if any.
    pub fn cancel(&mut self) {
        if let Some((id, handle)) = self.pending.take() {
            handle.abort();
            tracing::trace!(notice_id = %id, "Dismissal cancelled");
        }
    }

    /// Id of the notice whose dismissal is pending.
    pub fn pending(&self) -> Option<NoticeId> {
        self.pending
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(id, _)| *id)
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
