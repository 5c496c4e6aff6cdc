//! In-memory [`RagApi`] used by the store tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rag_api_client::{
    AnswerRecord, ApiError, AskRequest, AskResult, Conversation, ConversationDetail, Document,
    DocumentChunk, Feedback, FeedbackRequest, NewDocument, RagApi, Result, Source, StatusCode,
};
use tokio::sync::oneshot;

/// Scripted outcome of the next `ask_question` call.
pub enum AskScript {
    Answer {
        text: &'static str,
        conversation_id: &'static str,
    },
    /// Answer with an empty source list.
    Uncited {
        text: &'static str,
        conversation_id: &'static str,
    },
    Fail,
}

#[derive(Default)]
pub struct FakeApi {
    pub asks: Mutex<VecDeque<AskScript>>,
    pub ask_requests: Mutex<Vec<AskRequest>>,
    /// When set, the next `ask_question` waits for this before answering.
    pub ask_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// When set, the next `get_conversation` waits for this before answering.
    pub load_gate: Mutex<Option<oneshot::Receiver<()>>>,

    pub conversations: Mutex<HashMap<String, ConversationDetail>>,
    pub summaries: Mutex<Vec<Conversation>>,
    pub documents: Mutex<Vec<Document>>,
    pub created: Mutex<Vec<NewDocument>>,
    pub chunks: Mutex<HashMap<String, Vec<DocumentChunk>>>,
    pub feedback: Mutex<Vec<FeedbackRequest>>,

    pub fail_lists: AtomicBool,
    pub fail_create: AtomicBool,
    pub list_conversation_calls: AtomicUsize,
    pub list_document_calls: AtomicUsize,
}

pub fn server_error(path: &str) -> ApiError {
    ApiError::from_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("http://fake/api{path}"),
        "boom",
    )
}

impl FakeApi {
    pub fn script_ask(&self, s: AskScript) {
        self.asks.lock().unwrap().push_back(s);
    }

    /// Arms the ask gate and returns the trigger that releases it.
    pub fn hold_next_ask(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.ask_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn hold_next_load(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.load_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn add_conversation(&self, detail: ConversationDetail) {
        self.conversations
            .lock()
            .unwrap()
            .insert(detail.id.clone(), detail);
    }

    pub fn ask_count(&self) -> usize {
        self.ask_requests.lock().unwrap().len()
    }
}

pub fn at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn answer(id: &str, text: &str) -> AnswerRecord {
    AnswerRecord {
        id: id.into(),
        text: text.into(),
        sources: vec![Source {
            document_title: "intro.md".into(),
            chunk_id: "k1".into(),
            relevance_score: 0.9,
        }],
        created_at: at(),
        model_used: None,
        processing_time: None,
    }
}

#[async_trait]
impl RagApi for FakeApi {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        self.list_document_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(server_error("/documents/"));
        }
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn create_document(&self, doc: &NewDocument) -> Result<Document> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(server_error("/documents/"));
        }
        self.created.lock().unwrap().push(doc.clone());
        let mut docs = self.documents.lock().unwrap();
        let created = Document {
            id: format!("d{}", docs.len() + 1),
            title: doc.title.clone(),
            content: doc.content.clone(),
            uploaded_at: at(),
            chunks_count: 1,
            file_type: Some(doc.file_type.clone()),
            is_processed: Some(true),
        };
        docs.push(created.clone());
        Ok(created)
    }

    async fn document_chunks(&self, document_id: &str) -> Result<Vec<DocumentChunk>> {
        self.chunks
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                url: format!("http://fake/api/documents/{document_id}/chunks/"),
            })
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.list_conversation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(server_error("/conversations/"));
        }
        Ok(self.summaries.lock().unwrap().clone())
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDetail> {
        let gate = self.load_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.conversations
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                url: format!("http://fake/api/conversations/{id}/"),
            })
    }

    async fn ask_question(&self, req: &AskRequest) -> Result<AskResult> {
        self.ask_requests.lock().unwrap().push(req.clone());
        let gate = self.ask_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let script = self.asks.lock().unwrap().pop_front();
        let (answer, conversation_id) = match script {
            Some(AskScript::Answer {
                text,
                conversation_id,
            }) => (answer("a1", text), conversation_id),
            Some(AskScript::Uncited {
                text,
                conversation_id,
            }) => {
                let mut a = answer("a1", text);
                a.sources.clear();
                (a, conversation_id)
            }
            Some(AskScript::Fail) | None => return Err(server_error("/ask/ask/")),
        };
        Ok(AskResult {
            question_id: "q1".into(),
            question_text: req.text.clone(),
            asked_at: at(),
            answer,
            conversation_id: Some(conversation_id.into()),
        })
    }

    async fn submit_feedback(&self, req: &FeedbackRequest) -> Result<Feedback> {
        self.feedback.lock().unwrap().push(req.clone());
        Ok(Feedback {
            answer: req.answer.clone(),
            rating: req.rating,
            comment: req.comment.clone(),
            created_at: at(),
        })
    }
}
