//! Sidebar: header, tab switcher, conversation list, upload control and
//! document list.

use std::{fmt::Write, str::FromStr};

use chat_state::{
    ChunkListing, DocumentSnapshot,
    constants::{ACCEPTED_EXTENSIONS, NO_CONVERSATIONS, NO_DOCUMENTS},
};
use colored::Colorize;
use rag_api_client::{Conversation, Document};

pub const APP_TITLE: &str = "Smart RAG QA";

/// Which list the sidebar shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Chat,
    Documents,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Chat => "Conversations",
            Tab::Documents => "Documents",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" | "conversations" => Ok(Tab::Chat),
            "docs" | "documents" => Ok(Tab::Documents),
            other => Err(format!("unknown tab '{other}' (expected chat or docs)")),
        }
    }
}

pub fn render_tab_switcher(active: Tab) -> String {
    [Tab::Chat, Tab::Documents]
        .into_iter()
        .map(|t| {
            if t == active {
                format!("[{}]", t.label()).blue().bold().to_string()
            } else {
                format!(" {} ", t.label()).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Numbered list; the entry matching `active_id` is marked and highlighted.
pub fn render_conversation_list(conversations: &[Conversation], active_id: Option<&str>) -> String {
    if conversations.is_empty() {
        return NO_CONVERSATIONS.dimmed().to_string();
    }

    let mut out = String::new();
    for (i, conv) in conversations.iter().enumerate() {
        let active = active_id == Some(conv.id.as_str());
        let marker = if active { ">" } else { " " };
        let title = if active {
            conv.title.blue().bold().to_string()
        } else {
            conv.title.normal().to_string()
        };
        let _ = writeln!(out, "{marker} {:>2}. {title}", i + 1);
        let _ = writeln!(
            out,
            "       {}",
            format!("{} questions", conv.questions_count).dimmed()
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_upload_control(uploading: bool) -> String {
    if uploading {
        return "Uploading...".yellow().to_string();
    }
    format!(
        "Upload a file with /upload <path>\n({} files supported)",
        ACCEPTED_EXTENSIONS.join(", ")
    )
}

pub fn render_document_list(documents: &[Document]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS.dimmed().to_string();
    }

    let mut out = format!("{}\n", "Uploaded documents".bold());
    for (i, doc) in documents.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}", i + 1, doc.title);
        let mut detail = format!("{} chunks", doc.chunks_count);
        if doc.is_processed == Some(false) {
            detail.push_str(", processing");
        }
        let _ = writeln!(out, "      {}", detail.dimmed());
    }
    out.truncate(out.trim_end().len());
    out
}

/// Chunk listing of one document, in backend order.
pub fn render_chunks(listing: &ChunkListing) -> String {
    let title = listing
        .chunks
        .first()
        .map(|c| c.document_title.as_str())
        .unwrap_or(listing.document_id.as_str());
    let mut out = format!("{} {}\n", "Chunks of".bold(), title.bold());
    if listing.chunks.is_empty() {
        out.push_str(&"  no chunks".dimmed().to_string());
        return out;
    }
    for chunk in &listing.chunks {
        let _ = writeln!(out, "  #{} {}", chunk.chunk_index, chunk.id.dimmed());
        for line in chunk.content.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// Whole sidebar for the active tab.
pub fn render_sidebar(
    tab: Tab,
    conversations: &[Conversation],
    active_id: Option<&str>,
    docs: &DocumentSnapshot,
) -> String {
    let mut out = format!("{}\n", APP_TITLE.bold());
    out.push_str(&format!("{}\n", "/new  start a new conversation".dimmed()));
    out.push_str(&render_tab_switcher(tab));
    out.push_str("\n\n");
    match tab {
        Tab::Chat => out.push_str(&render_conversation_list(conversations, active_id)),
        Tab::Documents => {
            out.push_str(&render_upload_control(docs.is_uploading()));
            out.push_str("\n\n");
            out.push_str(&render_document_list(&docs.documents));
        }
    }
    out
}
