//! Default API config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `RAG_API_BASE_URL`     = API root (default [`DEFAULT_BASE_URL`])
//! - `RAG_API_TIMEOUT_SECS` = optional request timeout in seconds (u64)

use crate::{
    config::api_config::ApiConfig,
    error_handler::{ApiError, parse_opt_u64, validate_http_endpoint},
};

/// Backend root used when `RAG_API_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Constructs an [`ApiConfig`] from the process environment.
///
/// # Errors
///
/// - [`crate::error_handler::ConfigError::InvalidFormat`] if the base URL has no http(s) scheme
/// - [`crate::error_handler::ConfigError::InvalidNumber`] if the timeout is not a u64
pub fn config_from_env() -> Result<ApiConfig, ApiError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Same as [`config_from_env`] but reads variables through `lookup`.
pub fn config_from_lookup<F>(lookup: F) -> Result<ApiConfig, ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = lookup("RAG_API_BASE_URL")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    validate_http_endpoint("RAG_API_BASE_URL", &base_url)?;

    let timeout_secs = parse_opt_u64("RAG_API_TIMEOUT_SECS", lookup("RAG_API_TIMEOUT_SECS"))?;

    let mut cfg = ApiConfig::new(base_url);
    cfg.timeout_secs = timeout_secs;
    Ok(cfg)
}
