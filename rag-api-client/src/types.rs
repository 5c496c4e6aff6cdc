//! Wire data model of the RAG QA backend (documents, conversations, Q&A).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Citation back to a document chunk that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub document_title: String,
    pub chunk_id: String,
    pub relevance_score: f64,
}

/// An uploaded document as listed by `GET /documents/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub chunks_count: u32,
    #[serde(default)]
    pub file_type: Option<String>,
    /// `true` once the backend has embedded the chunks.
    #[serde(default)]
    pub is_processed: Option<bool>,
}

/// Body of `POST /documents/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub file_type: String,
}

/// One backend-side segment of a document (`GET /documents/{id}/chunks/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub document: String,
    #[serde(default)]
    pub document_title: String,
    pub content: String,
    pub chunk_index: u32,
    pub created_at: DateTime<Utc>,
}

/// Summary form used by the conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions_count: u32,
}

/// Conversation with its ordered question/answer history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// A persisted question, optionally with its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub answer: Option<AnswerRecord>,
}

/// A generated answer with its citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub model_used: Option<String>,
    /// Backend generation time in seconds.
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// Body of `POST /ask/ask/`.
///
/// `conversation_id: None` is omitted from the JSON entirely, which tells the
/// backend to open a new conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl AskRequest {
    pub fn new(text: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            conversation_id,
        }
    }
}

/// Raw response of `POST /ask/ask/` as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AskResponseWire {
    pub question: QuestionRecord,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Validated result of asking a question: the answer is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct AskResult {
    pub question_id: String,
    pub question_text: String,
    pub asked_at: DateTime<Utc>,
    pub answer: AnswerRecord,
    pub conversation_id: Option<String>,
}

/// Body of `POST /feedback/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRequest {
    /// Answer identifier being rated.
    pub answer: String,
    /// 1 (bad) ..= 5 (excellent).
    pub rating: u8,
    pub comment: String,
}

/// Stored feedback as echoed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub answer: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// List payload: either the paginated `{ "results": [...] }` envelope or a
/// bare array. A missing or `null` `results` yields an empty list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Paged { results: Option<Vec<T>> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(v) => v,
            ListEnvelope::Paged { results } => results.unwrap_or_default(),
        }
    }
}
