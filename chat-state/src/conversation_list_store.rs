//! Sidebar list of past conversations.

use std::{sync::Arc, time::Instant};

use rag_api_client::{Conversation, RagApi};
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::StoreError;

pub struct ConversationListStore {
    api: Arc<dyn RagApi>,
    state: watch::Sender<Vec<Conversation>>,
}

impl ConversationListStore {
    pub fn new(api: Arc<dyn RagApi>) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self { api, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Conversation>> {
        self.state.subscribe()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.borrow().clone()
    }

    /// Replaces the list in backend order; on failure the old list stays.
    pub async fn fetch_conversations(&self) -> Result<(), StoreError> {
        let t0 = Instant::now();
        match self.api.list_conversations().await {
            Ok(list) => {
                info!(
                    count = list.len(),
                    latency_ms = t0.elapsed().as_millis(),
                    "conversations refreshed"
                );
                self.state.send_replace(list);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch conversations");
                Err(e.into())
            }
        }
    }
}
