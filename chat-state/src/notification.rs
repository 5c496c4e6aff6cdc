//! One-shot user notifications (the blocking alerts of the upload flow).

use tokio::sync::broadcast;
use tracing::debug;

use crate::constants::{UPLOAD_ERROR, UPLOAD_SUCCESS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    UploadSucceeded { title: String },
    /// `reason` is a short user-facing cause (HTTP status line, size limit);
    /// full error details only go to the log.
    UploadFailed { reason: Option<String> },
}

impl Notification {
    /// Fixed headline shown to the user.
    pub fn headline(&self) -> &'static str {
        match self {
            Notification::UploadSucceeded { .. } => UPLOAD_SUCCESS,
            Notification::UploadFailed { .. } => UPLOAD_ERROR,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::UploadFailed { .. })
    }
}

/// Fan-out of notifications to every subscribed view.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publishes to current subscribers; nobody listening is not an error.
    pub fn notify(&self, n: Notification) {
        if self.tx.send(n).is_err() {
            debug!("notification dropped: no subscribers");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(16)
    }
}
