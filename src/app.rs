//! Root composition: owns the three stores, the sidebar tab and the
//! interactive loop that routes parsed commands to store operations.

use std::{
    io::{self, IsTerminal, Write},
    sync::Arc,
    time::Duration,
};

use chat_state::{
    ConversationListStore, ConversationStore, DocumentStore, Notification, Notifier, SelectedFile,
    SendOutcome, StoreError, constants::FETCH_ERROR,
};
use chat_view::{Tab, render_chat_area, render_chunks, render_sidebar};
use indicatif::{ProgressBar, ProgressStyle};
use rag_api_client::RagApi;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::TryRecvError},
};
use tracing::{info, warn};

use crate::command::{self, Command, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    chat: ConversationStore,
    docs: DocumentStore,
    convs: ConversationListStore,
    alerts: broadcast::Receiver<Notification>,
    tab: Tab,
    /// One-off text shown under the chat area until the next command.
    status: Option<String>,
}

impl App {
    pub fn new(api: Arc<dyn RagApi>) -> Self {
        let notifier = Notifier::default();
        Self {
            chat: ConversationStore::new(api.clone()),
            docs: DocumentStore::new(api.clone(), notifier.clone()),
            convs: ConversationListStore::new(api),
            alerts: notifier.subscribe(),
            tab: Tab::default(),
            status: None,
        }
    }

    /// Initial fetch of both sidebar lists. Failures are logged by the stores.
    pub async fn mount(&self) {
        let (c, d) = tokio::join!(self.convs.fetch_conversations(), self.docs.fetch_documents());
        if c.is_err() || d.is_err() {
            warn!("initial fetch incomplete; use /convs or /docs to retry");
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        self.mount().await;
        self.draw()?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let flow = match command::parse(&line) {
                Ok(cmd) => self.handle(cmd).await,
                Err(e) => {
                    self.status = Some(e.to_string());
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            self.draw()?;
        }
        info!("bye");
        Ok(())
    }

    pub async fn handle(&mut self, cmd: Command) -> Flow {
        self.status = None;
        match cmd {
            Command::Ask(text) => self.ask(&text).await,
            Command::New => {
                self.chat.start_new_conversation();
                let _ = self.convs.fetch_conversations().await;
            }
            Command::Open(arg) => self.open(&arg).await,
            Command::Tab(tab) => self.tab = tab,
            Command::Upload(path) => self.upload(path).await,
            Command::RefreshDocuments => {
                if self.docs.fetch_documents().await.is_err() {
                    self.status = Some(FETCH_ERROR.to_string());
                }
            }
            Command::RefreshConversations => {
                if self.convs.fetch_conversations().await.is_err() {
                    self.status = Some(FETCH_ERROR.to_string());
                }
            }
            Command::Chunks(arg) => self.chunks(&arg).await,
            Command::Rate {
                message,
                rating,
                comment,
            } => {
                let index = message.saturating_sub(1);
                self.status = Some(match self.chat.rate_answer(index, rating, comment).await {
                    Ok(fb) => format!("Rated message #{message}: {}/5", fb.rating),
                    Err(StoreError::NotAnAnswer(_)) => {
                        format!("message #{message} is not an answer from the backend")
                    }
                    Err(e) => e.to_string(),
                });
            }
            Command::Help => self.status = Some(HELP.to_string()),
            Command::Quit => return Flow::Quit,
            Command::Redraw => {}
        }
        Flow::Continue
    }

    async fn ask(&mut self, text: &str) {
        let spinner = spinner("Waiting for the answer...");
        let convs = &self.convs;
        let outcome = self
            .chat
            .send_message(text, || async move {
                let _ = convs.fetch_conversations().await;
            })
            .await;
        spinner.finish_and_clear();

        if outcome == SendOutcome::Ignored {
            self.status = Some("Please wait for the current request to finish.".into());
        }
    }

    async fn open(&mut self, arg: &str) {
        let ids: Vec<String> = self.convs.conversations().into_iter().map(|c| c.id).collect();
        let id = resolve(arg, &ids);
        // Load failures leave the thread as it was; the store logs them.
        if let Err(StoreError::Busy) = self.chat.load_conversation(&id).await {
            self.status = Some(StoreError::Busy.to_string());
        }
    }

    async fn upload(&mut self, path: Option<std::path::PathBuf>) {
        let file = match path {
            Some(p) => match SelectedFile::from_path(&p).await {
                Ok(f) => Some(f),
                Err(e) => {
                    self.status = Some(format!("Cannot open {}: {e}", p.display()));
                    return;
                }
            },
            None => None,
        };

        let spinner = spinner("Uploading...");
        let res = self.docs.upload_document(file).await;
        spinner.finish_and_clear();

        if let Err(StoreError::NoFile) = res {
            self.status = Some(StoreError::NoFile.to_string());
        }
    }

    async fn chunks(&mut self, arg: &str) {
        let ids: Vec<String> = self.docs.snapshot().documents.into_iter().map(|d| d.id).collect();
        let id = resolve(arg, &ids);
        self.status = Some(match self.docs.fetch_chunks(&id).await {
            Ok(()) => match self.docs.snapshot().chunks {
                Some(listing) => render_chunks(&listing),
                None => FETCH_ERROR.to_string(),
            },
            Err(_) => FETCH_ERROR.to_string(),
        });
    }

    /// Pending upload notifications, oldest first.
    fn drain_alerts(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            match self.alerts.try_recv() {
                Ok(n) => out.push(match &n {
                    Notification::UploadSucceeded { title } => format!("{} ({title})", n.headline()),
                    Notification::UploadFailed { reason: Some(reason) } => {
                        format!("{} ({reason})", n.headline())
                    }
                    Notification::UploadFailed { reason: None } => n.headline().to_string(),
                }),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "notifications dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        out
    }

    /// Full screen from the latest snapshots.
    pub fn render(&mut self) -> String {
        let chat = self.chat.snapshot();
        let mut screen = render_sidebar(
            self.tab,
            &self.convs.conversations(),
            chat.conversation_id.as_deref(),
            &self.docs.snapshot(),
        );
        screen.push_str("\n\n");
        screen.push_str(&"-".repeat(60));
        screen.push_str("\n\n");
        screen.push_str(&render_chat_area(&chat));
        for line in self.drain_alerts() {
            screen.push_str("\n\n");
            screen.push_str(&line);
        }
        if let Some(status) = &self.status {
            screen.push_str("\n\n");
            screen.push_str(status);
        }
        screen
    }

    fn draw(&mut self) -> io::Result<()> {
        let screen = self.render();
        let mut out = io::stdout().lock();
        if out.is_terminal() {
            write!(out, "\x1b[2J\x1b[H")?;
        }
        writeln!(out, "{screen}")?;
        out.flush()
    }
}

/// `n` within `1..=ids.len()` picks that entry; anything else is taken as an id.
fn resolve(arg: &str, ids: &[String]) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| ids.get(i))
        .cloned()
        .unwrap_or_else(|| arg.to_string())
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style.tick_chars("-\\|/ "));
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rag_api_client::{
        AnswerRecord, ApiError, AskRequest, AskResult, Conversation, ConversationDetail, Document,
        DocumentChunk, Feedback, FeedbackRequest, NewDocument, QuestionRecord, Result,
    };

    use super::*;

    #[derive(Default)]
    struct Backend {
        conversations: Mutex<Vec<Conversation>>,
        list_calls: Mutex<usize>,
    }

    fn at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::NotFound {
            url: format!("http://test/api/{what}"),
        }
    }

    #[async_trait]
    impl RagApi for Backend {
        async fn list_documents(&self) -> Result<Vec<Document>> {
            Ok(vec![])
        }
        async fn create_document(&self, _doc: &NewDocument) -> Result<Document> {
            Err(not_found("documents/"))
        }
        async fn document_chunks(&self, id: &str) -> Result<Vec<DocumentChunk>> {
            Err(not_found(id))
        }
        async fn list_conversations(&self) -> Result<Vec<Conversation>> {
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.conversations.lock().unwrap().clone())
        }
        async fn get_conversation(&self, id: &str) -> Result<ConversationDetail> {
            if id != "c7" {
                return Err(not_found(id));
            }
            Ok(ConversationDetail {
                id: "c7".into(),
                title: "Seventh".into(),
                created_at: at(),
                questions: vec![QuestionRecord {
                    id: "q1".into(),
                    text: "old question".into(),
                    created_at: at(),
                    answer: None,
                }],
            })
        }
        async fn ask_question(&self, req: &AskRequest) -> Result<AskResult> {
            self.conversations.lock().unwrap().push(Conversation {
                id: "c9".into(),
                title: req.text.clone(),
                created_at: at(),
                questions_count: 1,
            });
            Ok(AskResult {
                question_id: "q9".into(),
                question_text: req.text.clone(),
                asked_at: at(),
                answer: AnswerRecord {
                    id: "a9".into(),
                    text: "an answer".into(),
                    sources: vec![],
                    created_at: at(),
                    model_used: None,
                    processing_time: None,
                },
                conversation_id: Some("c9".into()),
            })
        }
        async fn submit_feedback(&self, req: &FeedbackRequest) -> Result<Feedback> {
            Ok(Feedback {
                answer: req.answer.clone(),
                rating: req.rating,
                comment: req.comment.clone(),
                created_at: at(),
            })
        }
    }

    fn summary(id: &str) -> Conversation {
        Conversation {
            id: id.into(),
            title: id.into(),
            created_at: at(),
            questions_count: 1,
        }
    }

    #[test]
    fn resolve_prefers_list_position() {
        let ids = vec!["c1".to_string(), "c2".to_string()];
        assert_eq!(resolve("2", &ids), "c2");
        assert_eq!(resolve("3", &ids), "3");
        assert_eq!(resolve("0", &ids), "0");
        assert_eq!(resolve("c9", &ids), "c9");
    }

    #[tokio::test]
    async fn open_by_number_loads_that_conversation() {
        let api = Arc::new(Backend::default());
        *api.conversations.lock().unwrap() = vec![summary("c1"), summary("c7")];
        let mut app = App::new(api);
        app.mount().await;

        app.handle(Command::Open("2".into())).await;
        let chat = app.chat.snapshot();
        assert_eq!(chat.conversation_id.as_deref(), Some("c7"));
        assert_eq!(chat.messages.len(), 1);
    }

    #[tokio::test]
    async fn first_answer_refreshes_sidebar() {
        let api = Arc::new(Backend::default());
        let mut app = App::new(api.clone());
        app.mount().await;
        assert_eq!(*api.list_calls.lock().unwrap(), 1);

        app.handle(Command::Ask("What is RAG?".into())).await;
        assert_eq!(*api.list_calls.lock().unwrap(), 2);
        assert_eq!(app.convs.conversations().len(), 1);

        app.handle(Command::Rate {
            message: 2,
            rating: 4,
            comment: String::new(),
        })
        .await;
        assert_eq!(app.status.as_deref(), Some("Rated message #2: 4/5"));
    }

    #[tokio::test]
    async fn new_conversation_clears_thread_and_refreshes() {
        let api = Arc::new(Backend::default());
        let mut app = App::new(api.clone());
        app.handle(Command::Ask("hello".into())).await;
        let calls = *api.list_calls.lock().unwrap();

        app.handle(Command::New).await;
        assert!(app.chat.snapshot().messages.is_empty());
        assert_eq!(app.chat.snapshot().conversation_id, None);
        assert_eq!(*api.list_calls.lock().unwrap(), calls + 1);
    }

    #[tokio::test]
    async fn upload_without_file_reports_it() {
        let mut app = App::new(Arc::new(Backend::default()));
        app.handle(Command::Upload(None)).await;
        assert_eq!(app.status, Some(StoreError::NoFile.to_string()));
    }

    #[tokio::test]
    async fn failed_upload_is_shown_once() {
        chat_view::set_color(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "text").unwrap();

        let mut app = App::new(Arc::new(Backend::default()));
        app.handle(Command::Upload(Some(path))).await;

        let first = app.render();
        assert!(first.contains(&format!(
            "{} (404 Not Found)",
            chat_state::constants::UPLOAD_ERROR
        )));
        assert!(!first.contains("http://test/api"));
        let second = app.render();
        assert!(!second.contains(chat_state::constants::UPLOAD_ERROR));
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut app = App::new(Arc::new(Backend::default()));
        assert_eq!(app.handle(Command::Quit).await, Flow::Quit);
        assert_eq!(app.handle(Command::Tab(Tab::Documents)).await, Flow::Continue);
        assert_eq!(app.tab, Tab::Documents);
    }
}
