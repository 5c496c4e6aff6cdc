//! Unified error handling for `rag-api-client`.
//!
//! This module exposes a single top-level error type [`ApiError`] for the whole
//! library. Configuration problems are grouped in [`ConfigError`]. Small helpers
//! for reading/validating environment variables return the unified [`Result<T>`]
//! alias.
//!
//! All messages include the prefix `[RAG API]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `rag-api-client` crate.
///
/// Transport failures, non-success statuses and malformed bodies are kept
/// apart here so callers can log them precisely, even though the stores
/// collapse all of them into a single failure path.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (DNS, connect, reset, timeout).
    #[error("[RAG API] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The requested resource does not exist (HTTP 404).
    #[error("[RAG API] not found: {url}")]
    NotFound {
        /// Request URL.
        url: String,
    },

    /// Upstream returned a non-successful HTTP status.
    #[error("[RAG API] HTTP {} {reason} from {url}: {snippet}", .status.as_u16())]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Canonical reason phrase (e.g. `Internal Server Error`).
        reason: &'static str,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as JSON of the expected type.
    #[error("[RAG API] decode error: {0}")]
    Decode(String),

    /// Response decoded but is missing data the client relies on.
    #[error("[RAG API] invalid response: {0}")]
    InvalidResponse(String),

    /// Arguments rejected before any request was made.
    #[error("[RAG API] validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Builds the status error for a non-2xx response, mapping 404 to
    /// [`ApiError::NotFound`].
    pub fn from_status(status: StatusCode, url: impl Into<String>, body: &str) -> Self {
        let url = url.into();
        if status == StatusCode::NOT_FOUND {
            return ApiError::NotFound { url };
        }
        ApiError::HttpStatus {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown"),
            url,
            snippet: make_snippet(body),
        }
    }

    /// `"<code> <reason>"` for errors that carry an HTTP status, e.g.
    /// `500 Internal Server Error`. Nothing else about the response is kept.
    pub fn status_line(&self) -> Option<String> {
        match self {
            ApiError::NotFound { .. } => Some("404 Not Found".to_string()),
            ApiError::HttpStatus { status, reason, .. } => {
                Some(format!("{} {reason}", status.as_u16()))
            }
            _ => None,
        }
    }

    /// Returns `true` when the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (timeouts).
    #[error("[RAG API] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `RAG_API_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[RAG API] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `RAG_API_BASE_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Parses an optional `u64` from a raw variable value (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ApiError::Config`] with [`ConfigError::InvalidNumber`] if the
/// value is set but not a valid `u64`.
pub fn parse_opt_u64(name: &'static str, raw: Option<String>) -> Result<Option<u64>> {
    match raw {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            ApiError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ApiError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Trims a response body to a short single-line snippet for logs and errors.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX {
        flat
    } else {
        let cut: String = flat.chars().take(MAX).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_maps_to_dedicated_variant() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "http://x/api/conversations/c9/", "");
        assert!(err.is_not_found());
    }

    #[test]
    fn other_status_keeps_reason_phrase() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "http://x/api/ask/ask/", "upstream\n down");
        match err {
            ApiError::HttpStatus {
                status,
                reason,
                snippet,
                ..
            } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(reason, "Bad Gateway");
                assert_eq!(snippet, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_display_names_the_reason_once() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "http://x/api/documents/",
            "boom",
        );
        assert_eq!(
            err.to_string(),
            "[RAG API] HTTP 500 Internal Server Error from http://x/api/documents/: boom"
        );
        assert_eq!(err.status_line().as_deref(), Some("500 Internal Server Error"));

        let missing = ApiError::from_status(StatusCode::NOT_FOUND, "http://x/api/conversations/c9/", "");
        assert_eq!(missing.status_line().as_deref(), Some("404 Not Found"));
        assert_eq!(ApiError::Decode("bad".into()).status_line(), None);
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "a".repeat(1000);
        let s = make_snippet(&long);
        assert_eq!(s.chars().count(), 201);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("RAG_API_BASE_URL", "http://127.0.0.1:8000/api").is_ok());
        assert!(validate_http_endpoint("RAG_API_BASE_URL", "ftp://host").is_err());
    }

    #[test]
    fn optional_number_parsing() {
        assert_eq!(parse_opt_u64("T", None).unwrap(), None);
        assert_eq!(parse_opt_u64("T", Some("  ".into())).unwrap(), None);
        assert_eq!(parse_opt_u64("T", Some("30".into())).unwrap(), Some(30));
        assert!(parse_opt_u64("T", Some("soon".into())).is_err());
    }
}
