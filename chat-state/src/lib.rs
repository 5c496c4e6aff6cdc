//! Client-side state for the RAG QA chat.
//!
//! Three independent stores share one [`rag_api_client::RagApi`]:
//! - [`ConversationStore`]: the active thread and the ask flow;
//! - [`DocumentStore`]: uploaded documents and the upload flow;
//! - [`ConversationListStore`]: past conversations for the sidebar.
//!
//! Each store publishes snapshots through a `watch` channel. Upload outcomes
//! are additionally pushed through a [`Notifier`].

pub mod constants;
pub mod conversation_list_store;
pub mod conversation_store;
pub mod document_store;
pub mod error;
pub mod message;
pub mod notification;
pub mod upload;

#[cfg(test)]
mod fake_api;

pub use conversation_list_store::ConversationListStore;
pub use conversation_store::{ChatSnapshot, ConversationStore, SendOutcome};
pub use document_store::{ChunkListing, DocumentSnapshot, DocumentStore};
pub use error::StoreError;
pub use message::{AnswerMeta, Message, MessageKind};
pub use notification::{Notification, Notifier};
pub use upload::SelectedFile;
