//! Uploaded documents, the upload flag and the last inspected chunk list.

use std::{sync::Arc, time::Instant};

use rag_api_client::{Document, DocumentChunk, NewDocument, RagApi};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::{
    constants::MAX_FILE_SIZE,
    error::StoreError,
    notification::{Notification, Notifier},
    upload::SelectedFile,
};

/// Chunks of one document, as last fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkListing {
    pub document_id: String,
    pub chunks: Vec<DocumentChunk>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSnapshot {
    pub documents: Vec<Document>,
    pub uploads_in_flight: u32,
    pub chunks: Option<ChunkListing>,
}

impl DocumentSnapshot {
    pub fn is_uploading(&self) -> bool {
        self.uploads_in_flight > 0
    }
}

pub struct DocumentStore {
    api: Arc<dyn RagApi>,
    state: watch::Sender<DocumentSnapshot>,
    notifier: Notifier,
}

impl DocumentStore {
    pub fn new(api: Arc<dyn RagApi>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(DocumentSnapshot::default());
        Self {
            api,
            state,
            notifier,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DocumentSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.state.borrow().clone()
    }

    /// Replaces the list with the backend's; on failure the old list stays.
    pub async fn fetch_documents(&self) -> Result<(), StoreError> {
        let t0 = Instant::now();
        match self.api.list_documents().await {
            Ok(docs) => {
                info!(
                    count = docs.len(),
                    latency_ms = t0.elapsed().as_millis(),
                    "documents refreshed"
                );
                self.state.send_modify(|s| s.documents = docs);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch documents");
                Err(e.into())
            }
        }
    }

    /// Uploads `file` and refreshes the list.
    ///
    /// `None` fails immediately without touching state. Every other outcome
    /// is also announced through the notifier.
    pub async fn upload_document(&self, file: Option<SelectedFile>) -> Result<Document, StoreError> {
        let Some(file) = file else {
            return Err(StoreError::NoFile);
        };

        self.state.send_modify(|s| s.uploads_in_flight += 1);
        let t0 = Instant::now();
        let result = self.upload_inner(&file).await;
        self.state
            .send_modify(|s| s.uploads_in_flight = s.uploads_in_flight.saturating_sub(1));

        match result {
            Ok(doc) => {
                info!(
                    document_id = %doc.id,
                    title = %doc.title,
                    latency_ms = t0.elapsed().as_millis(),
                    "document uploaded"
                );
                self.notifier.notify(Notification::UploadSucceeded {
                    title: doc.title.clone(),
                });
                Ok(doc)
            }
            Err(e) => {
                error!(file = %file.name, error = %e, "upload failed");
                self.notifier.notify(Notification::UploadFailed {
                    reason: e.user_reason(),
                });
                Err(e)
            }
        }
    }

    async fn upload_inner(&self, file: &SelectedFile) -> Result<Document, StoreError> {
        if file.size > MAX_FILE_SIZE {
            return Err(StoreError::FileTooLarge {
                name: file.name.clone(),
                size: file.size,
                limit: MAX_FILE_SIZE,
            });
        }

        let content = file.read_content().await?;
        let new_doc = NewDocument {
            title: file.name.clone(),
            content,
            file_type: file.file_type(),
        };
        let doc = self.api.create_document(&new_doc).await?;

        // Refresh failure is logged by fetch_documents; the upload itself succeeded.
        if self.fetch_documents().await.is_err() {
            warn!(document_id = %doc.id, "document list is stale after upload");
        }
        Ok(doc)
    }

    /// Fetches the chunks of `document_id` into the snapshot.
    pub async fn fetch_chunks(&self, document_id: &str) -> Result<(), StoreError> {
        let t0 = Instant::now();
        match self.api.document_chunks(document_id).await {
            Ok(chunks) => {
                info!(
                    document_id,
                    count = chunks.len(),
                    latency_ms = t0.elapsed().as_millis(),
                    "chunks fetched"
                );
                self.state.send_modify(|s| {
                    s.chunks = Some(ChunkListing {
                        document_id: document_id.to_string(),
                        chunks,
                    })
                });
                Ok(())
            }
            Err(e) => {
                error!(document_id, error = %e, "failed to fetch chunks");
                Err(e.into())
            }
        }
    }
}
