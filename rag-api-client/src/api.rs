//! Backend capabilities the client relies on, one method per endpoint.
//!
//! [`RagApi`] is the seam between state stores and transport: the HTTP
//! implementation lives in [`crate::services::rag_api_service`], tests plug
//! in-memory fakes behind the same trait.

use async_trait::async_trait;

use crate::{
    error_handler::Result,
    types::{
        AskRequest, AskResult, Conversation, ConversationDetail, Document, DocumentChunk,
        Feedback, FeedbackRequest, NewDocument,
    },
};

/// Every operation makes exactly one round trip and never retries.
#[async_trait]
pub trait RagApi: Send + Sync {
    /// `GET /documents/`, empty when the backend returns no list.
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// `POST /documents/`, returns the backend-assigned document.
    async fn create_document(&self, doc: &NewDocument) -> Result<Document>;

    /// `GET /documents/{id}/chunks/`.
    async fn document_chunks(&self, document_id: &str) -> Result<Vec<DocumentChunk>>;

    /// `GET /conversations/`.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// `GET /conversations/{id}/`; unknown ids fail with
    /// [`crate::error_handler::ApiError::NotFound`].
    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail>;

    /// `POST /ask/ask/`; opens a conversation when `conversation_id` is `None`.
    async fn ask_question(&self, req: &AskRequest) -> Result<AskResult>;

    /// `POST /feedback/`.
    async fn submit_feedback(&self, req: &FeedbackRequest) -> Result<Feedback>;
}
