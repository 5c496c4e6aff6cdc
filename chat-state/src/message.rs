//! Chat thread entries and their construction from backend records.

use chrono::{DateTime, Utc};
use rag_api_client::{AnswerRecord, ConversationDetail, QuestionRecord, Source};
use uuid::Uuid;

use crate::constants::API_ERROR;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Question typed by the user.
    User,
    /// Answer generated by the backend.
    Answer,
    /// Fixed-text assistant message standing in for a failed answer.
    Error,
}

/// Generation details the backend attaches to an answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerMeta {
    pub model_used: Option<String>,
    /// Seconds.
    pub processing_time: Option<f64>,
}

/// One entry of the chat thread. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub kind: MessageKind,
    /// Citations; only answers carry them.
    pub sources: Option<Vec<Source>>,
    pub created_at: DateTime<Utc>,
    pub meta: Option<AnswerMeta>,
}

impl Message {
    /// Locally authored question, stamped with the submission time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            kind: MessageKind::User,
            sources: None,
            created_at: Utc::now(),
            meta: None,
        }
    }

    /// Assistant message replacing an answer that could not be obtained.
    pub fn api_error() -> Self {
        Self {
            id: format!("error-{}", Uuid::new_v4()),
            text: API_ERROR.to_string(),
            kind: MessageKind::Error,
            sources: None,
            created_at: Utc::now(),
            meta: None,
        }
    }

    /// Persisted question as returned inside a conversation.
    pub fn from_question(q: &QuestionRecord) -> Self {
        Self {
            id: q.id.clone(),
            text: q.text.clone(),
            kind: MessageKind::User,
            sources: None,
            created_at: q.created_at,
            meta: None,
        }
    }

    /// Backend answer; keeps the answer id so it can be rated later.
    pub fn from_answer(a: &AnswerRecord) -> Self {
        Self {
            id: a.id.clone(),
            text: a.text.clone(),
            kind: MessageKind::Answer,
            sources: Some(a.sources.clone()),
            created_at: a.created_at,
            meta: Some(AnswerMeta {
                model_used: a.model_used.clone(),
                processing_time: a.processing_time,
            }),
        }
    }

    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }
}

/// Flattens question/answer pairs: each question, then its answer if any,
/// in backend order.
pub fn flatten_conversation(detail: &ConversationDetail) -> Vec<Message> {
    let mut out = Vec::with_capacity(detail.questions.len() * 2);
    for q in &detail.questions {
        out.push(Message::from_question(q));
        if let Some(a) = &q.answer {
            out.push(Message::from_answer(a));
        }
    }
    out
}
