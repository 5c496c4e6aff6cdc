//! Process configuration: API settings plus terminal options.

use rag_api_client::{ApiConfig, ApiError, config::default_config::config_from_lookup};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// `RAG_QA_NO_COLOR` = `1`/`true` disables ANSI styling.
    pub no_color: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let no_color = lookup("RAG_QA_NO_COLOR")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            api: config_from_lookup(lookup)?,
            no_color,
        })
    }
}
