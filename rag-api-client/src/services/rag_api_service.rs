//! HTTP client for the RAG QA backend.
//!
//! Endpoints are derived from [`ApiConfig::base_url`]:
//! - GET  {base}/documents/               : list documents
//! - POST {base}/documents/               : create a document
//! - GET  {base}/documents/{id}/chunks/   : list chunks of a document
//! - GET  {base}/conversations/           : list conversations
//! - GET  {base}/conversations/{id}/      : conversation with questions/answers
//! - POST {base}/ask/ask/                 : ask a question
//! - POST {base}/feedback/                : rate an answer
//!
//! Every request carries `Content-Type: application/json`. Non-2xx statuses,
//! transport failures and undecodable bodies are normalized into [`ApiError`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Method, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, info};

use crate::{
    api::RagApi,
    config::api_config::ApiConfig,
    error_handler::{ApiError, Result, validate_http_endpoint},
    types::{
        AskRequest, AskResponseWire, AskResult, Conversation, ConversationDetail, Document,
        DocumentChunk, Feedback, FeedbackRequest, ListEnvelope, NewDocument,
    },
};

/// Thin client over `reqwest::Client`.
///
/// Built once from an [`ApiConfig`]; cloning is cheap and shares the
/// connection pool.
#[derive(Debug, Clone)]
pub struct RagApiClient {
    client: reqwest::Client,
    cfg: ApiConfig,
}

impl RagApiClient {
    /// Creates a new client from the given config.
    ///
    /// # Errors
    /// - [`ApiError::Config`] if `cfg.base_url` is not an http(s) URL
    /// - [`ApiError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: ApiConfig) -> Result<Self> {
        validate_http_endpoint("RAG_API_BASE_URL", &cfg.base_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        info!(
            base_url = %cfg.base_url,
            timeout_secs = ?cfg.timeout_secs,
            "RagApiClient initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Returns the config this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.cfg
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(Method::GET, path, None).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Some(body)).await
    }

    /// Single round trip: send, check status, decode.
    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let url = self.cfg.url(path);

        debug!(%method, %url, has_body = body.is_some(), "sending request");

        let mut req = self.client.request(method.clone(), &url);
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                error!(
                    %method,
                    %url,
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "request failed before a response arrived"
                );
                return Err(e.into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, url.clone(), &text);
            error!(
                %method,
                %url,
                %status,
                latency_ms = started.elapsed().as_millis(),
                "backend returned non-success status"
            );
            return Err(err);
        }

        let bytes = resp.bytes().await?;
        let out = serde_json::from_slice::<T>(&bytes).map_err(|e| {
            error!(
                %method,
                %url,
                error = %e,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode response body"
            );
            ApiError::Decode(format!("{path}: {e}"))
        })?;

        debug!(
            %method,
            %url,
            %status,
            latency_ms = started.elapsed().as_millis(),
            "request completed"
        );

        Ok(out)
    }
}

#[async_trait]
impl RagApi for RagApiClient {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        let list: ListEnvelope<Document> = self.get_json("/documents/").await?;
        Ok(list.into_vec())
    }

    async fn create_document(&self, doc: &NewDocument) -> Result<Document> {
        let created: Document = self.post_json("/documents/", doc).await?;
        info!(
            document_id = %created.id,
            title = %created.title,
            content_len = doc.content.len(),
            "document created"
        );
        Ok(created)
    }

    async fn document_chunks(&self, document_id: &str) -> Result<Vec<DocumentChunk>> {
        let path = format!("/documents/{}/chunks/", path_segment(document_id)?);
        let list: ListEnvelope<DocumentChunk> = self.get_json(&path).await?;
        Ok(list.into_vec())
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let list: ListEnvelope<Conversation> = self.get_json("/conversations/").await?;
        Ok(list.into_vec())
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail> {
        let path = format!("/conversations/{}/", path_segment(id)?);
        self.get_json(&path).await
    }

    async fn ask_question(&self, req: &AskRequest) -> Result<AskResult> {
        let started = Instant::now();
        let wire: AskResponseWire = self.post_json("/ask/ask/", req).await?;

        let AskResponseWire {
            question,
            conversation_id,
        } = wire;
        let answer = question.answer.ok_or_else(|| {
            ApiError::InvalidResponse(format!("question {} came back without an answer", question.id))
        })?;

        info!(
            question_id = %question.id,
            answer_id = %answer.id,
            sources = answer.sources.len(),
            conversation_id = ?conversation_id,
            latency_ms = started.elapsed().as_millis(),
            "question answered"
        );

        Ok(AskResult {
            question_id: question.id,
            question_text: question.text,
            asked_at: question.created_at,
            answer,
            conversation_id,
        })
    }

    async fn submit_feedback(&self, req: &FeedbackRequest) -> Result<Feedback> {
        if !(1..=5).contains(&req.rating) {
            return Err(ApiError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                req.rating
            )));
        }
        self.post_json("/feedback/", req).await
    }
}

/// Rejects identifiers that would change the request path.
fn path_segment(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(ApiError::Validation(format!("invalid identifier: {id:?}")));
    }
    Ok(id)
}
