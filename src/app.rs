use std::future::Future;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::mpsc;

use crate::models::{HistoryEntry, QuizRecord};
use crate::services::QuizClient;
use crate::tui::{AppAction, InputMode};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid http(s) Wikipedia URL.";

static ARTICLE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("article URL pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generate,
    History,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Generate => Tab::History,
            Tab::History => Tab::Generate,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Generate => 0,
            Tab::History => 1,
        }
    }
}

// Message for a completed service call
pub struct ServiceResponse {
    pub request_id: u64,
    pub result: ServiceResult,
}

pub enum ServiceResult {
    Generated(std::result::Result<Option<QuizRecord>, String>),
    History(std::result::Result<Vec<HistoryEntry>, String>),
    Details(std::result::Result<Option<QuizRecord>, String>),
}

pub struct App {
    // Data
    pub quiz: Option<QuizRecord>,
    pub history: Vec<HistoryEntry>,
    pub details: Option<QuizRecord>,

    // UI State
    pub tab: Tab,
    pub url_input: String,
    pub url_input_active: bool,
    pub last_submitted_url: Option<String>,
    pub error: Option<String>,
    pub history_error: Option<String>,
    pub selected_index: usize,
    pub quiz_scroll: u16,
    pub details_open: bool,
    pub details_scroll: u16,
    pub show_help: bool,
    spinner_index: usize,

    // Async state
    next_request_id: u64,
    pending_generate: Option<u64>,
    pending_history: Option<u64>,
    pending_details: Option<u64>,
    response_rx: mpsc::Receiver<ServiceResponse>,
    response_tx: mpsc::Sender<ServiceResponse>,

    // Services
    client: Arc<QuizClient>,
}

impl App {
    pub fn new(client: QuizClient) -> Self {
        let (response_tx, response_rx) = mpsc::channel(8);

        Self {
            quiz: None,
            history: Vec::new(),
            details: None,
            tab: Tab::Generate,
            url_input: String::new(),
            url_input_active: true,
            last_submitted_url: None,
            error: None,
            history_error: None,
            selected_index: 0,
            quiz_scroll: 0,
            details_open: false,
            details_scroll: 0,
            show_help: false,
            spinner_index: 0,
            next_request_id: 0,
            pending_generate: None,
            pending_history: None,
            pending_details: None,
            response_rx,
            response_tx,
            client: Arc::new(client),
        }
    }

    pub fn mode(&self) -> InputMode {
        if self.show_help {
            InputMode::Help
        } else if self.details_open {
            InputMode::Details
        } else if self.tab == Tab::Generate && self.url_input_active {
            InputMode::UrlInput
        } else {
            InputMode::Normal
        }
    }

    pub fn is_generating(&self) -> bool {
        self.pending_generate.is_some()
    }

    pub fn is_loading_history(&self) -> bool {
        self.pending_history.is_some() || self.pending_details.is_some()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_index % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.is_generating() || self.is_loading_history() {
            self.spinner_index = self.spinner_index.wrapping_add(1);
        }
    }

    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.history.get(self.selected_index)
    }

    pub fn service_url(&self) -> &str {
        self.client.base_url().as_str()
    }

    /// Applies a UI action. Returns true when the app should quit.
    pub fn handle_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => return true,

            AppAction::NextTab => self.switch_tab(self.tab.next()),
            AppAction::ShowGenerate => self.switch_tab(Tab::Generate),
            AppAction::ShowHistory => self.switch_tab(Tab::History),

            AppAction::EditUrl => {
                if self.tab == Tab::Generate {
                    self.url_input_active = true;
                }
            }

            AppAction::Select => match self.tab {
                Tab::Generate => self.url_input_active = true,
                Tab::History => self.open_details(),
            },

            AppAction::UrlInputChar(c) => self.url_input.push(c),

            AppAction::UrlInputBackspace => {
                self.url_input.pop();
            }

            AppAction::UrlInputConfirm => self.submit_url(),

            AppAction::UrlInputCancel => self.url_input_active = false,

            AppAction::MoveUp => self.move_by(-1),
            AppAction::MoveDown => self.move_by(1),

            AppAction::MoveToTop => {
                if self.details_open {
                    self.details_scroll = 0;
                } else if self.tab == Tab::History {
                    self.selected_index = 0;
                } else {
                    self.quiz_scroll = 0;
                }
            }

            AppAction::MoveToBottom => {
                if self.tab == Tab::History && !self.details_open && !self.history.is_empty() {
                    self.selected_index = self.history.len() - 1;
                }
            }

            AppAction::CloseDetails => {
                self.details_open = false;
                self.details = None;
                self.details_scroll = 0;
            }

            AppAction::OpenInBrowser => self.open_in_browser(),

            AppAction::ReloadHistory => {
                if self.tab == Tab::History {
                    self.load_history();
                }
            }

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,
        }

        false
    }

    fn switch_tab(&mut self, tab: Tab) {
        let changed = self.tab != tab;
        self.tab = tab;
        // The history list is fetched fresh every time the tab is entered
        if changed && tab == Tab::History {
            self.load_history();
        }
    }

    fn move_by(&mut self, delta: i32) {
        if self.details_open {
            self.details_scroll = scroll(self.details_scroll, delta);
            return;
        }

        match self.tab {
            Tab::Generate => self.quiz_scroll = scroll(self.quiz_scroll, delta),
            Tab::History => {
                let len = self.history.len();
                if len == 0 {
                    return;
                }
                if delta < 0 && self.selected_index > 0 {
                    self.selected_index -= 1;
                } else if delta > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }
        }
    }

    fn submit_url(&mut self) {
        self.error = None;
        self.quiz = None;
        self.quiz_scroll = 0;

        let url = self.url_input.trim().to_string();
        if !is_article_url(&url) {
            self.error = Some(INVALID_URL_MESSAGE.to_string());
            return;
        }

        self.url_input_active = false;
        self.last_submitted_url = Some(url.clone());

        let request_id = self.spawn_request(move |client| async move {
            ServiceResult::Generated(
                client.generate_quiz(&url).await.map_err(|e| e.to_string()),
            )
        });
        self.pending_generate = Some(request_id);
    }

    pub fn load_history(&mut self) {
        self.history_error = None;
        let request_id = self.spawn_request(|client| async move {
            ServiceResult::History(client.fetch_history().await.map_err(|e| e.to_string()))
        });
        self.pending_history = Some(request_id);
    }

    fn open_details(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };

        let id = entry.id;
        let request_id = self.spawn_request(move |client| async move {
            ServiceResult::Details(client.fetch_quiz_by_id(id).await.map_err(|e| e.to_string()))
        });
        self.pending_details = Some(request_id);
    }

    fn open_in_browser(&self) {
        let url = match self.tab {
            Tab::Generate => self.last_submitted_url.clone(),
            Tab::History => self.selected_entry().map(|e| e.url.clone()),
        };

        if let Some(url) = url.filter(|u| !u.is_empty()) {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open {}: {}", url, e);
            }
        }
    }

    fn spawn_request<F, Fut>(&mut self, request: F) -> u64
    where
        F: FnOnce(Arc<QuizClient>) -> Fut,
        Fut: Future<Output = ServiceResult> + Send + 'static,
    {
        self.next_request_id += 1;
        let request_id = self.next_request_id;

        let task = request(Arc::clone(&self.client));
        let tx = self.response_tx.clone();

        tokio::spawn(async move {
            let result = task.await;
            let _ = tx.send(ServiceResponse { request_id, result }).await;
        });

        request_id
    }

    /// Poll for completed service calls (non-blocking)
    pub fn poll_service_results(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.apply_response(response);
        }
    }

    fn apply_response(&mut self, response: ServiceResponse) {
        let ServiceResponse { request_id, result } = response;

        match result {
            ServiceResult::Generated(result) => {
                // Only the latest submission counts
                if self.pending_generate != Some(request_id) {
                    return;
                }
                self.pending_generate = None;
                match result {
                    Ok(quiz) => {
                        tracing::info!(
                            "Quiz ready: {} questions",
                            quiz.as_ref().map_or(0, |q| q.questions.len())
                        );
                        self.quiz = quiz;
                    }
                    Err(e) => {
                        tracing::error!("Failed to generate quiz: {}", e);
                        self.error = Some(e);
                    }
                }
            }

            ServiceResult::History(result) => {
                if self.pending_history != Some(request_id) {
                    return;
                }
                self.pending_history = None;
                match result {
                    Ok(mut entries) => {
                        // Oldest first, whatever order the service used
                        entries.sort_by_key(|e| e.id);
                        self.history = entries;
                        if self.selected_index >= self.history.len() {
                            self.selected_index = self.history.len().saturating_sub(1);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to load history: {}", e);
                        self.history_error = Some(e);
                    }
                }
            }

            ServiceResult::Details(result) => {
                if self.pending_details != Some(request_id) {
                    return;
                }
                self.pending_details = None;
                match result {
                    Ok(quiz) => {
                        self.details = quiz;
                        self.details_scroll = 0;
                        self.details_open = true;
                    }
                    Err(e) => {
                        tracing::error!("Failed to open quiz: {}", e);
                        self.history_error = Some(e);
                    }
                }
            }
        }
    }
}

fn scroll(offset: u16, delta: i32) -> u16 {
    if delta < 0 {
        offset.saturating_sub(delta.unsigned_abs() as u16)
    } else {
        offset.saturating_add(delta as u16)
    }
}

fn is_article_url(url: &str) -> bool {
    ARTICLE_URL.is_match(url)
}
