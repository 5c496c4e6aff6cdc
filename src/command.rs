//! Parsing of the lines typed at the prompt.

use std::path::PathBuf;

use chat_view::Tab;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  <text>                       ask a question in the active conversation
  /new                         start a new conversation
  /open <n|id>                 open conversation number n (or by id)
  /tab chat|docs               switch the sidebar tab
  /upload <path>               upload a .txt or .md file
  /docs                        refresh the document list
  /convs                       refresh the conversation list
  /chunks <n|id>               show the chunks of document number n (or by id)
  /rate <n> <1-5> [comment]    rate answer message #n
  /help                        show this help
  /quit                        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    New,
    Open(String),
    Tab(Tab),
    /// `None` when no path was given.
    Upload(Option<PathBuf>),
    RefreshDocuments,
    RefreshConversations,
    Chunks(String),
    Rate {
        /// 1-based message number as shown in the thread.
        message: usize,
        rating: u8,
        comment: String,
    },
    Help,
    Quit,
    /// Blank line; re-renders the screen.
    Redraw,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command /{0}, type /help")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    InvalidTab(String),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Redraw);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Ask(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((n, a)) => (n, a.trim()),
        None => (rest, ""),
    };

    let cmd = match name {
        "new" => Command::New,
        "open" => Command::Open(required(args, "/open <n|id>")?),
        "tab" => Command::Tab(args.parse().map_err(CommandError::InvalidTab)?),
        "upload" => Command::Upload((!args.is_empty()).then(|| PathBuf::from(args))),
        "docs" => Command::RefreshDocuments,
        "convs" => Command::RefreshConversations,
        "chunks" => Command::Chunks(required(args, "/chunks <n|id>")?),
        "rate" => parse_rate(args)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(cmd)
}

fn required(args: &str, usage: &'static str) -> Result<String, CommandError> {
    if args.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(args.to_string())
    }
}

fn parse_rate(args: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "/rate <n> <1-5> [comment]";
    let mut parts = args.splitn(3, char::is_whitespace);
    let message = parts
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or(CommandError::Usage(USAGE))?;
    let rating = parts
        .next()
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or(CommandError::Usage(USAGE))?;
    let comment = parts.next().unwrap_or("").trim().to_string();
    Ok(Command::Rate {
        message,
        rating,
        comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(parse("  What is RAG? ").unwrap(), Command::Ask("What is RAG?".into()));
        assert_eq!(parse("   ").unwrap(), Command::Redraw);
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(parse("/open 2").unwrap(), Command::Open("2".into()));
        assert_eq!(parse("/tab docs").unwrap(), Command::Tab(Tab::Documents));
        assert_eq!(
            parse("/upload ./my notes.md").unwrap(),
            Command::Upload(Some(PathBuf::from("./my notes.md")))
        );
        assert_eq!(parse("/upload").unwrap(), Command::Upload(None));
        assert_eq!(parse("/chunks d1").unwrap(), Command::Chunks("d1".into()));
    }

    #[test]
    fn rate_with_and_without_comment() {
        assert_eq!(
            parse("/rate 2 5 very helpful answer").unwrap(),
            Command::Rate {
                message: 2,
                rating: 5,
                comment: "very helpful answer".into()
            }
        );
        assert_eq!(
            parse("/rate 4 1").unwrap(),
            Command::Rate {
                message: 4,
                rating: 1,
                comment: String::new()
            }
        );
        assert!(matches!(parse("/rate 0 5"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("/rate two 5"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn errors() {
        assert!(matches!(parse("/open"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("/tab settings"), Err(CommandError::InvalidTab(_))));
        assert_eq!(parse("/frobnicate").unwrap_err(), CommandError::Unknown("frobnicate".into()));
    }
}
