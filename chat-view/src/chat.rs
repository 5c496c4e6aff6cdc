//! Chat area: message list, message bubbles and the input line.

use std::fmt::Write;

use chat_state::{ChatSnapshot, Message, MessageKind, constants::PLACEHOLDER};
use colored::Colorize;

const EMPTY_TITLE: &str = "Type a question to start a conversation";
const EMPTY_HINT: &str = "Answers are based on the uploaded documents";

/// One message. `number` is the 1-based position used by `/rate`.
pub fn render_message_bubble(number: usize, message: &Message) -> String {
    let time = message.created_at.format("%H:%M");
    let header = match message.kind {
        MessageKind::User => format!("#{number} You · {time}").blue().bold(),
        MessageKind::Answer => format!("#{number} Assistant · {time}").green().bold(),
        MessageKind::Error => format!("#{number} Assistant · {time}").red().bold(),
    };

    let mut out = format!("{header}\n");
    for line in message.text.lines() {
        let _ = writeln!(out, "  {line}");
    }

    if let Some(sources) = message.sources.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "  {}", "Referenced documents:".bold());
        for src in sources {
            let _ = writeln!(
                out,
                "  {}",
                format!(
                    "• {} (relevance: {:.2})",
                    src.document_title, src.relevance_score
                )
                .dimmed()
            );
        }
    }

    if let Some(meta) = &message.meta {
        let parts: Vec<String> = meta
            .model_used
            .iter()
            .cloned()
            .chain(meta.processing_time.map(|t| format!("{t:.2}s")))
            .collect();
        if !parts.is_empty() {
            let _ = writeln!(out, "  {}", parts.join(" · ").dimmed());
        }
    }

    out.truncate(out.trim_end().len());
    out
}

pub fn render_message_list(chat: &ChatSnapshot) -> String {
    if chat.messages.is_empty() && !chat.is_fetching {
        return format!("{}\n{}", EMPTY_TITLE, EMPTY_HINT.dimmed());
    }

    let mut blocks: Vec<String> = chat
        .messages
        .iter()
        .enumerate()
        .map(|(i, m)| render_message_bubble(i + 1, m))
        .collect();
    if chat.is_loading {
        blocks.push("Assistant is thinking...".dimmed().italic().to_string());
    }
    if chat.is_fetching {
        blocks.push("Loading conversation...".dimmed().italic().to_string());
    }
    blocks.join("\n\n")
}

/// Prompt line; shows the placeholder and is marked disabled while a
/// question is in flight.
pub fn render_input_line(is_loading: bool) -> String {
    if is_loading {
        format!("{} {}", ">".dimmed(), "(waiting for the answer)".dimmed())
    } else {
        format!("{} {}", ">".bold(), PLACEHOLDER.dimmed())
    }
}

pub fn render_chat_area(chat: &ChatSnapshot) -> String {
    format!(
        "{}\n\n{}",
        render_message_list(chat),
        render_input_line(chat.is_loading)
    )
}
