//! Active chat thread: messages, active conversation id, in-flight flags.
//!
//! State is published through a `tokio::sync::watch` channel; views call
//! [`ConversationStore::subscribe`] and only ever see immutable snapshots.
//!
//! Only one conversation operation runs at a time:
//! - `send_message` is a no-op while a send or a load is in flight;
//! - `load_conversation` is rejected with [`StoreError::Busy`] in that case;
//! - `start_new_conversation` always applies immediately. A send or load that
//!   was in flight at that moment finishes, but its result is discarded.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use rag_api_client::{AskRequest, Feedback, FeedbackRequest, RagApi};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    error::StoreError,
    message::{Message, MessageKind, flatten_conversation},
};

/// Immutable view of the conversation store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub messages: Vec<Message>,
    /// `None` until the first answer of a new conversation arrives.
    pub conversation_id: Option<String>,
    /// A question is awaiting its answer; input is disabled.
    pub is_loading: bool,
    /// A past conversation is being fetched.
    pub is_fetching: bool,
}

impl ChatSnapshot {
    /// Input accepts a new question.
    pub fn is_idle(&self) -> bool {
        !self.is_loading && !self.is_fetching
    }
}

/// What happened to a `send_message` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty text or another operation in flight; nothing changed.
    Ignored,
    /// The answer was appended.
    Answered,
    /// The request failed; the fixed error message was appended.
    Failed,
    /// The thread was reset while waiting; the result was dropped.
    Discarded,
}

pub struct ConversationStore {
    api: Arc<dyn RagApi>,
    state: watch::Sender<ChatSnapshot>,
    /// Bumped whenever the thread is replaced; stale results are dropped.
    epoch: AtomicU64,
}

impl ConversationStore {
    pub fn new(api: Arc<dyn RagApi>) -> Self {
        let (state, _) = watch::channel(ChatSnapshot::default());
        Self {
            api,
            state,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.state.subscribe()
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> ChatSnapshot {
        self.state.borrow().clone()
    }

    /// Asks `text` in the active conversation (or a new one).
    ///
    /// The user message is appended before the request goes out and is
    /// never rolled back. When the answer opens a new conversation,
    /// `on_conversation_created` runs once after the state is updated.
    pub async fn send_message<F, Fut>(&self, text: &str, on_conversation_created: F) -> SendOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let user = Message::user(text);
        let mut started: Option<(u64, Option<String>)> = None;
        self.state.send_if_modified(|s| {
            if !s.is_idle() {
                return false;
            }
            s.messages.push(user);
            s.is_loading = true;
            started = Some((self.epoch.load(Ordering::SeqCst), s.conversation_id.clone()));
            true
        });

        let Some((epoch, conversation_id)) = started else {
            debug!("send ignored: another conversation operation is in flight");
            return SendOutcome::Ignored;
        };

        let t0 = Instant::now();
        let req = AskRequest::new(text, conversation_id);
        let result = self.api.ask_question(&req).await;

        let mut outcome = SendOutcome::Discarded;
        let mut created = false;
        self.state.send_modify(|s| {
            s.is_loading = false;
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return;
            }
            match &result {
                Ok(res) => {
                    s.messages.push(Message::from_answer(&res.answer));
                    if s.conversation_id.is_none() {
                        if let Some(id) = &res.conversation_id {
                            s.conversation_id = Some(id.clone());
                            created = true;
                        }
                    }
                    outcome = SendOutcome::Answered;
                }
                Err(_) => {
                    s.messages.push(Message::api_error());
                    outcome = SendOutcome::Failed;
                }
            }
        });

        match (&result, outcome) {
            (_, SendOutcome::Discarded) => {
                info!(
                    latency_ms = t0.elapsed().as_millis(),
                    "thread was reset while asking; result dropped"
                );
            }
            (Ok(res), _) => {
                info!(
                    answer_id = %res.answer.id,
                    conversation_id = ?res.conversation_id,
                    new_conversation = created,
                    latency_ms = t0.elapsed().as_millis(),
                    "answer appended"
                );
            }
            (Err(e), _) => {
                error!(error = %e, latency_ms = t0.elapsed().as_millis(), "failed to send message");
            }
        }

        if created {
            on_conversation_created().await;
        }
        outcome
    }

    /// Replaces the thread with the stored conversation `id`.
    ///
    /// On failure the thread is left untouched and the error is logged and
    /// returned.
    pub async fn load_conversation(&self, id: &str) -> Result<(), StoreError> {
        let mut epoch = None;
        self.state.send_if_modified(|s| {
            if !s.is_idle() {
                return false;
            }
            s.is_fetching = true;
            epoch = Some(self.epoch.load(Ordering::SeqCst));
            true
        });
        let Some(epoch) = epoch else {
            warn!(conversation_id = %id, "load rejected: another conversation operation is in flight");
            return Err(StoreError::Busy);
        };

        let t0 = Instant::now();
        match self.api.get_conversation(id).await {
            Ok(detail) => {
                let messages = flatten_conversation(&detail);
                let count = messages.len();
                let mut applied = false;
                self.state.send_modify(|s| {
                    s.is_fetching = false;
                    if self.epoch.load(Ordering::SeqCst) != epoch {
                        return;
                    }
                    self.epoch.fetch_add(1, Ordering::SeqCst);
                    s.messages = messages;
                    s.conversation_id = Some(id.to_string());
                    applied = true;
                });
                info!(
                    conversation_id = %id,
                    messages = count,
                    applied,
                    latency_ms = t0.elapsed().as_millis(),
                    "conversation loaded"
                );
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.is_fetching = false);
                error!(conversation_id = %id, error = %e, "failed to load conversation");
                Err(e.into())
            }
        }
    }

    /// Clears the thread and the active conversation. No network call.
    pub fn start_new_conversation(&self) {
        self.state.send_modify(|s| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            s.messages.clear();
            s.conversation_id = None;
        });
        debug!("started a new conversation");
    }

    /// Rates the answer at `index` (0-based position in the thread).
    pub async fn rate_answer(
        &self,
        index: usize,
        rating: u8,
        comment: impl Into<String>,
    ) -> Result<Feedback, StoreError> {
        let answer_id = {
            let s = self.state.borrow();
            match s.messages.get(index) {
                Some(m) if m.kind == MessageKind::Answer => m.id.clone(),
                _ => return Err(StoreError::NotAnAnswer(index)),
            }
        };

        let req = FeedbackRequest {
            answer: answer_id,
            rating,
            comment: comment.into(),
        };
        match self.api.submit_feedback(&req).await {
            Ok(fb) => {
                info!(answer_id = %fb.answer, rating = fb.rating, "feedback submitted");
                Ok(fb)
            }
            Err(e) => {
                error!(answer_id = %req.answer, error = %e, "failed to submit feedback");
                Err(e.into())
            }
        }
    }
}
