//! Fixed user-facing texts and upload limits.

/// File extensions the upload control offers and reads as plain text.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".txt", ".md"];

/// Largest file accepted for upload (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// `file_type` sent when the file has no declared type.
pub const DEFAULT_FILE_TYPE: &str = "text";

/// Assistant-authored text appended when asking a question fails.
pub const API_ERROR: &str =
    "An error occurred. Please make sure the backend server is running.";

pub const UPLOAD_SUCCESS: &str = "Document uploaded successfully!";
pub const UPLOAD_ERROR: &str = "Upload failed.";
pub const FETCH_ERROR: &str = "Failed to fetch data.";
pub const NO_CONVERSATIONS: &str = "No conversations yet";
pub const NO_DOCUMENTS: &str = "No documents yet";
pub const PLACEHOLDER: &str = "Type your question...";
