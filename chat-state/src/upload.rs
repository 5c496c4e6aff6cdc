//! Files picked for upload and how their content is obtained client-side.

use std::path::{Path, PathBuf};

use crate::{
    constants::{ACCEPTED_EXTENSIONS, DEFAULT_FILE_TYPE},
    error::StoreError,
};

/// A file chosen by the user, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// File name without directories; becomes the document title.
    pub name: String,
    /// Declared media type, if known (e.g. `text/plain`).
    pub mime: Option<String>,
    pub size: u64,
}

impl SelectedFile {
    /// Stats `path` and derives the declared type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )
            .into());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            mime: mime_for_name(&name).map(str::to_string),
            path: path.to_path_buf(),
            name,
            size: meta.len(),
        })
    }

    /// Declared type is `text/plain` or the name ends with an accepted
    /// text extension.
    pub fn is_plain_text(&self) -> bool {
        if self.mime.as_deref() == Some("text/plain") {
            return true;
        }
        let lower = self.name.to_ascii_lowercase();
        ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }

    /// `file_type` sent to the backend.
    pub fn file_type(&self) -> String {
        self.mime
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string())
    }

    /// Document content: full text for plain-text files, a placeholder for
    /// everything else (binary content is never sent).
    pub async fn read_content(&self) -> Result<String, StoreError> {
        if !self.is_plain_text() {
            return Ok(unsupported_placeholder(&self.name));
        }
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Content submitted for files whose text cannot be extracted locally.
pub fn unsupported_placeholder(name: &str) -> String {
    format!("{name} was uploaded (unsupported file type: content extraction is not available)")
}

fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "pdf" => "application/pdf",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime)
}
