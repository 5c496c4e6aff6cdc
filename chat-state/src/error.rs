//! Typed error for the chat-state crate.

use rag_api_client::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Errors from the backend API (transport, status, decoding).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Another conversation operation is still in flight.
    #[error("another conversation operation is in progress")]
    Busy,

    /// Upload was requested without a selected file.
    #[error("no file selected")]
    NoFile,

    /// Selected file exceeds the upload limit.
    #[error("{name} is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// The message index does not point at a rateable answer.
    #[error("message #{0} is not an answer from the backend")]
    NotAnAnswer(usize),

    /// Local file access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Short cause safe to show to the user. Backend errors are reduced to
    /// their status line; request URLs and response bodies are left out.
    pub fn user_reason(&self) -> Option<String> {
        match self {
            StoreError::Api(e) => e.status_line(),
            StoreError::FileTooLarge { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}
