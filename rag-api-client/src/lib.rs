//! Typed async client for the Smart RAG QA backend.
//!
//! The backend owns documents, chunking, retrieval, answer generation and
//! conversation persistence; this crate only speaks its REST API and maps the
//! JSON payloads into the types in [`types`].
//!
//! # Example
//! ```no_run
//! use rag_api_client::{ApiConfig, AskRequest, RagApi, RagApiClient};
//!
//! # async fn run() -> rag_api_client::Result<()> {
//! let api = RagApiClient::new(ApiConfig::new("http://127.0.0.1:8000/api"))?;
//! let res = api.ask_question(&AskRequest::new("What is RAG?", None)).await?;
//! println!("{} (conversation {:?})", res.answer.text, res.conversation_id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod types;

pub use api::RagApi;
pub use reqwest::StatusCode;
pub use config::api_config::ApiConfig;
pub use error_handler::{ApiError, ConfigError, Result};
pub use services::rag_api_service::RagApiClient;
pub use types::{
    AnswerRecord, AskRequest, AskResult, Conversation, ConversationDetail, Document,
    DocumentChunk, Feedback, FeedbackRequest, NewDocument, QuestionRecord, Source,
};
