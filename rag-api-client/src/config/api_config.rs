/// Connection settings for the RAG QA backend.
///
/// # Fields
///
/// - `base_url`: API root, e.g. `http://127.0.0.1:8000/api` (no trailing slash).
/// - `timeout_secs`: Optional per-request timeout. `None` means requests wait
///   until the network stack itself gives up.
///
/// # Examples
///
/// ```
/// use rag_api_client::config::api_config::ApiConfig;
///
/// let cfg = ApiConfig::new("http://127.0.0.1:8000/api/");
/// assert_eq!(cfg.base_url, "http://127.0.0.1:8000/api");
/// assert_eq!(cfg.timeout_secs, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root without trailing slash.
    pub base_url: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Creates a config without timeout, normalizing the trailing slash.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim().trim_end_matches('/').to_string(),
            timeout_secs: None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Joins a relative API path (starting with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
