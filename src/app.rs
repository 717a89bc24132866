use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListState, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::catalog::{self, SearchKind, SearchResult, TmdbProxyClient};
use crate::config::Config;
use crate::error::Result;
use crate::media::{self, Activity, MediaRecord, MediaType, WatchStatus};
use crate::modal::{ModalField, ModalState};
use crate::notify::{Notifier, ToastKind};
use crate::session::{Session, User};
use crate::ui::dashboard::DashboardStats;
use crate::ui::search::SearchInput;
use crate::ui::{self, widgets};
use crate::verify::{PosterPrompt, PosterResolution, resolve_poster};

const ACTIVITY_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    LoginUsername,
    LoginPassword,
    RegisterUsername,
    RegisterEmail,
    RegisterPassword,
}

/// Login/register form state. All five inputs persist across tab switches
/// and are wiped together on logout.
#[derive(Debug)]
pub struct AuthState {
    pub tab: AuthTab,
    pub focus: AuthField,
    pub login_username: String,
    pub login_password: String,
    pub register_username: String,
    pub register_email: String,
    pub register_password: String,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            tab: AuthTab::Login,
            focus: AuthField::LoginUsername,
            login_username: String::new(),
            login_password: String::new(),
            register_username: String::new(),
            register_email: String::new(),
            register_password: String::new(),
        }
    }
}

impl AuthState {
    fn fields(&self) -> &'static [AuthField] {
        match self.tab {
            AuthTab::Login => &[AuthField::LoginUsername, AuthField::LoginPassword],
            AuthTab::Register => &[
                AuthField::RegisterUsername,
                AuthField::RegisterEmail,
                AuthField::RegisterPassword,
            ],
        }
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            AuthTab::Login => AuthTab::Register,
            AuthTab::Register => AuthTab::Login,
        };
        self.focus = self.fields()[0];
    }

    pub fn switch_to_login(&mut self) {
        self.tab = AuthTab::Login;
        self.focus = AuthField::LoginUsername;
    }

    fn focus_next(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    fn focus_prev(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::LoginUsername => &mut self.login_username,
            AuthField::LoginPassword => &mut self.login_password,
            AuthField::RegisterUsername => &mut self.register_username,
            AuthField::RegisterEmail => &mut self.register_email,
            AuthField::RegisterPassword => &mut self.register_password,
        }
    }

    pub fn clear_all(&mut self) {
        self.login_username.clear();
        self.login_password.clear();
        self.register_username.clear();
        self.register_email.clear();
        self.register_password.clear();
        self.focus = self.fields()[0];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Dashboard,
    TvShows,
    Movies,
    ContinueWatching,
    Search,
}

pub enum AppMessage {
    LoggedIn(User),
    Registered,
    AuthFailed(String),
    MediaLoaded(Vec<MediaRecord>),
    MediaLoadFailed(String),
    ActivitiesLoaded(Vec<Activity>),
    ActivitiesFailed(String),
    SearchResults(Vec<SearchResult>),
    SearchFailed(String),
    PosterConfirm(PosterPrompt),
    Saved { updated: bool },
    SaveFailed(String),
    SaveCancelled,
    Removed,
    RemoveFailed(String),
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub running: bool,
    pub view: View,
    pub accent: Color,

    pub auth: AuthState,
    pub notifier: Notifier,

    pub media: Vec<MediaRecord>,
    pub grid_indices: Vec<usize>,
    pub grid_state: ListState,
    pub tv_filter: WatchStatus,
    pub movie_filter: WatchStatus,
    pub stats: DashboardStats,
    pub activities: Vec<Activity>,

    pub search_query: String,
    pub search_year: String,
    pub search_input: SearchInput,
    pub search_kind: SearchKind,
    pub search_results: Vec<SearchResult>,
    pub search_state: ListState,
    pub search_loading: bool,
    pub search_failed: bool,
    pub searched_query: Option<String>,

    pub modal: ModalState,
    pub poster_prompt: Option<PosterPrompt>,
    pub confirm_delete: bool,
    pub show_help: bool,
    pub request_in_flight: bool,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub api: Arc<ApiClient>,
    pub catalog: Arc<TmdbProxyClient>,
}

impl App {
    pub fn new(config: Config, session: Session) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let api = Arc::new(ApiClient::new(config.server.base_url.clone()));
        let catalog = Arc::new(TmdbProxyClient::new(config.server.base_url.clone()));

        let view = if session.is_logged_in() {
            View::Dashboard
        } else {
            View::Auth
        };

        Self {
            config,
            session,
            running: true,
            view,
            accent,

            auth: AuthState::default(),
            notifier: Notifier::new(),

            media: Vec::new(),
            grid_indices: Vec::new(),
            grid_state: ListState::default(),
            tv_filter: WatchStatus::Watching,
            movie_filter: WatchStatus::ToWatch,
            stats: DashboardStats::default(),
            activities: Vec::new(),

            search_query: String::new(),
            search_year: String::new(),
            search_input: SearchInput::Query,
            search_kind: SearchKind::default(),
            search_results: Vec::new(),
            search_state: ListState::default(),
            search_loading: false,
            search_failed: false,
            searched_query: None,

            modal: ModalState::Closed,
            poster_prompt: None,
            confirm_delete: false,
            show_help: false,
            request_in_flight: false,

            msg_tx,
            msg_rx,

            api,
            catalog,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        if self.session.is_logged_in() {
            self.navigate_to(View::Dashboard);
        }

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events().await?;
            self.process_messages();
            self.notifier.prune();
        }

        Ok(())
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::LoggedIn(user) => {
                    self.request_in_flight = false;
                    info!(username = %user.username, "Logged in");
                    if let Err(e) = self.session.store(user) {
                        warn!("Could not persist session: {}", e);
                    }
                    self.notifier.success("Login successful!");
                    self.navigate_to(View::Dashboard);
                }
                AppMessage::Registered => {
                    self.request_in_flight = false;
                    self.notifier
                        .success("Registration successful! Please log in.");
                    self.auth.switch_to_login();
                }
                AppMessage::AuthFailed(msg) => {
                    self.request_in_flight = false;
                    self.notifier.error(msg);
                }
                AppMessage::MediaLoaded(media) => {
                    self.media = media;
                    self.recompute_grid();
                }
                AppMessage::MediaLoadFailed(msg) => {
                    error!(error = %msg, "Media load failed");
                    self.notifier.error(msg);
                }
                AppMessage::ActivitiesLoaded(activities) => {
                    self.activities = activities;
                }
                AppMessage::ActivitiesFailed(msg) => {
                    error!(error = %msg, "Activity load failed");
                    self.notifier.error(msg);
                }
                AppMessage::SearchResults(results) => {
                    self.search_loading = false;
                    self.search_results = results;
                    self.search_state = ListState::default();
                    if !self.search_results.is_empty() {
                        self.search_state.select(Some(0));
                    }
                }
                AppMessage::SearchFailed(msg) => {
                    self.search_loading = false;
                    self.search_failed = true;
                    error!(error = %msg, "Search failed");
                }
                AppMessage::PosterConfirm(prompt) => {
                    self.poster_prompt = Some(prompt);
                }
                AppMessage::Saved { updated } => {
                    self.request_in_flight = false;
                    self.modal.close();
                    self.notifier.success(if updated {
                        "Media updated successfully"
                    } else {
                        "Media added successfully"
                    });
                    self.reload_active_section();
                }
                AppMessage::SaveFailed(msg) => {
                    self.request_in_flight = false;
                    self.notifier.error(msg);
                }
                AppMessage::SaveCancelled => {
                    self.request_in_flight = false;
                    self.notifier.info("Save cancelled");
                }
                AppMessage::Removed => {
                    self.request_in_flight = false;
                    self.modal.close();
                    self.notifier.success("Media removed successfully");
                    self.reload_active_section();
                }
                AppMessage::RemoveFailed(msg) => {
                    self.request_in_flight = false;
                    self.notifier.error(msg);
                }
            }
        }
    }

    /// Re-fetch whatever the user is currently looking at. From the search
    /// view (or anywhere without its own grid) the dashboard data refreshes
    /// instead.
    fn reload_active_section(&mut self) {
        match self.view {
            View::Dashboard | View::TvShows | View::Movies | View::ContinueWatching => {
                self.navigate_to(self.view);
            }
            View::Search | View::Auth => self.load_dashboard(),
        }
    }

    /// Switch the visible section and dispatch its loader. Every navigation
    /// re-fetches; nothing is cached between views.
    pub fn navigate_to(&mut self, view: View) {
        self.view = view;
        match view {
            View::Dashboard => self.load_dashboard(),
            View::TvShows | View::Movies | View::ContinueWatching => self.load_media(),
            View::Search | View::Auth => {}
        }
    }

    fn load_media(&mut self) {
        let Some(user) = self.session.user() else {
            return;
        };

        let api = self.api.clone();
        let username = user.username.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match api.media(&username).await {
                Ok(media) => {
                    let _ = tx.send(AppMessage::MediaLoaded(media));
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::MediaLoadFailed(e.to_string()));
                }
            }
        });
    }

    fn load_dashboard(&mut self) {
        let Some(user) = self.session.user() else {
            return;
        };
        let username = user.username.clone();

        self.load_media();

        let api = self.api.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match api.activities(&username, ACTIVITY_LIMIT).await {
                Ok(activities) => {
                    let _ = tx.send(AppMessage::ActivitiesLoaded(activities));
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::ActivitiesFailed(e.to_string()));
                }
            }
        });
    }

    /// Derive the visible subset (and dashboard counts) from the freshly
    /// loaded collection.
    fn recompute_grid(&mut self) {
        self.stats = DashboardStats {
            tv_count: self
                .media
                .iter()
                .filter(|m| m.media_type == MediaType::Tv)
                .count(),
            movie_count: self
                .media
                .iter()
                .filter(|m| m.media_type == MediaType::Movie)
                .count(),
            continue_count: media::continue_watching(&self.media).len(),
        };

        self.grid_indices = match self.view {
            View::TvShows => media::tv_by_status(&self.media, self.tv_filter),
            View::Movies => media::movies_by_status(&self.media, self.movie_filter),
            View::ContinueWatching => media::continue_watching(&self.media),
            View::Dashboard | View::Search | View::Auth => Vec::new(),
        };

        self.grid_state = ListState::default();
        if !self.grid_indices.is_empty() {
            self.grid_state.select(Some(0));
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        if self.view == View::Auth {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(frame.area());

            ui::render_auth_view(frame, chunks[0], &self.auth, self.accent);
            self.render_footer(frame, chunks[1]);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_nav(frame, chunks[0]);

        let content = chunks[1];
        match self.view {
            View::Auth => {}
            View::Dashboard => {
                let username = self
                    .session
                    .user()
                    .map(|u| u.username.clone())
                    .unwrap_or_default();
                ui::render_dashboard_view(
                    frame,
                    content,
                    &username,
                    self.stats,
                    &self.activities,
                    self.accent,
                );
            }
            View::TvShows => {
                let title = format!("TV Shows — {}", self.tv_filter.label());
                ui::render_media_grid(
                    frame,
                    content,
                    &title,
                    &self.media,
                    &self.grid_indices,
                    &mut self.grid_state,
                    self.accent,
                );
            }
            View::Movies => {
                let title = format!("Movies — {}", self.movie_filter.label());
                ui::render_media_grid(
                    frame,
                    content,
                    &title,
                    &self.media,
                    &self.grid_indices,
                    &mut self.grid_state,
                    self.accent,
                );
            }
            View::ContinueWatching => {
                ui::render_media_grid(
                    frame,
                    content,
                    "Continue Watching",
                    &self.media,
                    &self.grid_indices,
                    &mut self.grid_state,
                    self.accent,
                );
            }
            View::Search => {
                ui::render_search_view(
                    frame,
                    content,
                    &self.search_query,
                    &self.search_year,
                    self.search_input,
                    self.search_kind,
                    &self.search_results,
                    &mut self.search_state,
                    self.search_loading,
                    self.search_failed,
                    self.searched_query.as_deref(),
                    self.accent,
                );
            }
        }

        if let Some(draft) = self.modal.draft() {
            ui::modal::render_media_modal(
                frame,
                draft,
                self.modal.is_edit(),
                self.request_in_flight,
                self.accent,
            );

            if self.confirm_delete {
                ui::modal::render_delete_dialog(frame, &draft.title);
            }
        }

        if let Some(prompt) = &self.poster_prompt {
            ui::modal::render_verify_dialog(frame, prompt, self.accent);
        }

        if self.show_help {
            self.render_help(frame);
        }

        self.render_footer(frame, chunks[2]);
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let sections = [
            (View::Dashboard, "d", "Dashboard"),
            (View::TvShows, "t", "TV Shows"),
            (View::Movies, "m", "Movies"),
            (View::ContinueWatching, "c", "Continue"),
            (View::Search, "/", "Search"),
        ];

        let mut spans = vec![Span::raw(" ")];
        for (view, key, label) in sections {
            let style = if self.view == view {
                Style::default()
                    .fg(Color::Black)
                    .bg(self.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {}:{} ", key, label), style));
            spans.push(Span::raw(" "));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        if let Some(toast) = self.notifier.current() {
            let color = match toast.kind {
                ToastKind::Info => Color::Cyan,
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            let line = Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    toast.message.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let hints: &[(&str, &str)] = match self.view {
            View::Auth => &[("Tab", "switch form"), ("Enter", "submit"), ("^c", "quit")],
            View::Dashboard => &[("?", "help"), ("L", "logout"), ("q", "quit")],
            View::TvShows | View::Movies => &[
                ("j/k", "navigate"),
                ("Enter", "edit"),
                ("f", "filter"),
                ("?", "help"),
            ],
            View::ContinueWatching => &[("j/k", "navigate"), ("Enter", "edit"), ("?", "help")],
            View::Search => &[("Enter", "search/add"), ("^t", "type"), ("Esc", "back")],
        };
        frame.render_widget(widgets::help_bar(hints), area);
    }

    fn render_help(&self, frame: &mut Frame) {
        use ratatui::widgets::{Block, Borders, Clear, Row, Table};

        let dialog_area = widgets::dialog_rect(frame.area(), 70, 22);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let rows = vec![
            Row::new(vec!["Global", "?", "Toggle Help"]),
            Row::new(vec!["", "q", "Quit"]),
            Row::new(vec!["", "d/t/m/c", "Dashboard / TV / Movies / Continue"]),
            Row::new(vec!["", "/", "Search the catalog"]),
            Row::new(vec!["", "L", "Log out"]),
            Row::new(vec!["", "r", "Reload current view"]),
            Row::new(vec!["Grids", "j/k", "Navigate"]),
            Row::new(vec!["", "Enter", "Edit selected"]),
            Row::new(vec!["", "f", "Cycle status filter"]),
            Row::new(vec!["Search", "Enter", "Search, or add selected"]),
            Row::new(vec!["", "Tab", "Toggle query/year input"]),
            Row::new(vec!["", "^t", "Cycle media type"]),
            Row::new(vec!["Modal", "Tab", "Next field"]),
            Row::new(vec!["", "←/→", "Change status / progress"]),
            Row::new(vec!["", "Enter", "Save"]),
            Row::new(vec!["", "x", "Remove (edit only)"]),
            Row::new(vec!["", "Esc", "Discard"]),
        ];

        let table = Table::new(
            rows,
            &[
                Constraint::Percentage(15),
                Constraint::Percentage(15),
                Constraint::Percentage(70),
            ],
        )
        .header(
            Row::new(vec!["Context", "Key", "Action"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(self.accent),
            ),
        );

        frame.render_widget(table, inner);
    }

    async fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.running = false;
                    return Ok(());
                }

                if self.show_help {
                    self.handle_help_input(key.code);
                } else if self.poster_prompt.is_some() {
                    self.handle_verify_input(key.code);
                } else if self.confirm_delete {
                    self.handle_delete_input(key.code);
                } else if self.modal.is_open() {
                    self.handle_modal_input(key);
                } else {
                    match self.view {
                        View::Auth => self.handle_auth_input(key),
                        View::Search => self.handle_search_input(key),
                        _ => self.handle_section_input(key.code),
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            self.show_help = false;
        }
    }

    fn handle_auth_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.auth.toggle_tab(),
            KeyCode::Down => self.auth.focus_next(),
            KeyCode::Up => self.auth.focus_prev(),
            KeyCode::Enter => match self.auth.tab {
                AuthTab::Login => self.submit_login(),
                AuthTab::Register => self.submit_register(),
            },
            KeyCode::Backspace => {
                self.auth.active_input_mut().pop();
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.auth.active_input_mut().push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        if self.request_in_flight {
            return;
        }

        let username = self.auth.login_username.trim().to_string();
        let password = self.auth.login_password.trim().to_string();
        if username.is_empty() || password.is_empty() {
            self.notifier.error("Enter username and password");
            return;
        }

        self.request_in_flight = true;
        let api = self.api.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match api.login(&username, &password).await {
                Ok(user) => {
                    let _ = tx.send(AppMessage::LoggedIn(user));
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::AuthFailed(e.to_string()));
                }
            }
        });
    }

    fn submit_register(&mut self) {
        if self.request_in_flight {
            return;
        }

        let username = self.auth.register_username.trim().to_string();
        let email = self.auth.register_email.trim().to_string();
        let password = self.auth.register_password.trim().to_string();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            self.notifier.error("Fill all registration fields");
            return;
        }

        self.request_in_flight = true;
        let api = self.api.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match api.register(&username, &email, &password).await {
                Ok(()) => {
                    let _ = tx.send(AppMessage::Registered);
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::AuthFailed(e.to_string()));
                }
            }
        });
    }

    pub fn logout(&mut self) {
        self.session.clear();
        self.auth.clear_all();
        self.media.clear();
        self.grid_indices.clear();
        self.activities.clear();
        self.stats = DashboardStats::default();
        self.search_results.clear();
        self.searched_query = None;
        self.modal.close();
        self.view = View::Auth;
        self.notifier.success("Logged out successfully");
    }

    fn handle_section_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('d') => self.navigate_to(View::Dashboard),
            KeyCode::Char('t') => self.navigate_to(View::TvShows),
            KeyCode::Char('m') => self.navigate_to(View::Movies),
            KeyCode::Char('c') => self.navigate_to(View::ContinueWatching),
            KeyCode::Char('/') => {
                self.view = View::Search;
                self.search_query.clear();
                self.search_year.clear();
                self.search_input = SearchInput::Query;
                self.search_results.clear();
                self.search_state = ListState::default();
                self.search_failed = false;
                self.searched_query = None;
            }
            KeyCode::Char('r') => self.navigate_to(self.view),
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('f') => {
                match self.view {
                    View::TvShows => {
                        self.tv_filter = self.tv_filter.next_for(MediaType::Tv);
                    }
                    View::Movies => {
                        self.movie_filter = self.movie_filter.next_for(MediaType::Movie);
                    }
                    _ => return,
                }
                self.load_media();
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_grid_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_grid_selection(-1),
            KeyCode::Enter => self.open_selected_record(),
            _ => {}
        }
    }

    fn move_grid_selection(&mut self, delta: i32) {
        let len = self.grid_indices.len();
        if len == 0 {
            return;
        }
        let next = match self.grid_state.selected() {
            Some(i) if delta > 0 => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.grid_state.select(Some(next));
    }

    fn open_selected_record(&mut self) {
        if self.view == View::Dashboard {
            return;
        }
        let Some(pos) = self.grid_state.selected() else {
            return;
        };
        let Some(record) = self
            .grid_indices
            .get(pos)
            .and_then(|i| self.media.get(*i))
        else {
            return;
        };

        self.modal = ModalState::open_edit(record);
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.navigate_to(View::Dashboard),
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_kind = self.search_kind.next();
            }
            KeyCode::Tab => {
                self.search_input = match self.search_input {
                    SearchInput::Query => SearchInput::Year,
                    SearchInput::Year => SearchInput::Query,
                };
            }
            KeyCode::Down => {
                if !self.search_results.is_empty() {
                    let len = self.search_results.len();
                    let next = self
                        .search_state
                        .selected()
                        .map(|i| (i + 1).min(len - 1))
                        .unwrap_or(0);
                    self.search_state.select(Some(next));
                }
            }
            KeyCode::Up => {
                let next = self
                    .search_state
                    .selected()
                    .map(|i| i.saturating_sub(1))
                    .unwrap_or(0);
                self.search_state.select(Some(next));
            }
            KeyCode::Backspace => {
                match self.search_input {
                    SearchInput::Query => self.search_query.pop(),
                    SearchInput::Year => self.search_year.pop(),
                };
            }
            KeyCode::Enter => {
                if self.search_results.is_empty() {
                    self.perform_search();
                } else {
                    self.open_selected_result();
                }
            }
            KeyCode::Char(c) => {
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    return;
                }
                match self.search_input {
                    SearchInput::Query => self.search_query.push(c),
                    SearchInput::Year => {
                        if c.is_ascii_digit() && self.search_year.len() < 4 {
                            self.search_year.push(c);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn perform_search(&mut self) {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            self.notifier.error("Please enter a search term");
            return;
        }
        if self.search_loading {
            return;
        }

        self.search_loading = true;
        self.search_failed = false;
        self.search_results.clear();
        self.search_state = ListState::default();
        self.searched_query = Some(query.clone());

        let kind = self.search_kind;
        let year = {
            let y = self.search_year.trim().to_string();
            (!y.is_empty()).then_some(y)
        };
        let provider = self.catalog.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match catalog::run_search(provider.as_ref(), kind, &query, year.as_deref()).await {
                Ok(results) => {
                    let _ = tx.send(AppMessage::SearchResults(results));
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::SearchFailed(e.to_string()));
                }
            }
        });
    }

    fn open_selected_result(&mut self) {
        let Some(pos) = self.search_state.selected() else {
            return;
        };
        let Some(result) = self.search_results.get(pos) else {
            return;
        };

        self.modal = ModalState::open_add(result);
    }

    fn handle_modal_input(&mut self, key: KeyEvent) {
        // Controls go inert while a save or remove is outstanding
        if self.request_in_flight {
            return;
        }

        match key.code {
            KeyCode::Esc => self.modal.close(),
            KeyCode::Enter => self.save_media(),
            KeyCode::Tab => {
                if let Some(draft) = self.modal.draft_mut() {
                    draft.focus_next();
                }
            }
            KeyCode::Char('x') if self.modal.is_edit() => {
                self.confirm_delete = true;
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if let Some(draft) = self.modal.draft_mut() {
                    match draft.focus {
                        ModalField::Status => {
                            if forward {
                                draft.cycle_status();
                            } else {
                                draft.cycle_status_back();
                            }
                        }
                        ModalField::Progress => {
                            draft.adjust_progress(if forward { 5 } else { -5 });
                        }
                        _ => {}
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(draft) = self.modal.draft_mut() {
                    match draft.focus {
                        ModalField::Watched => {
                            draft.watched_input.pop();
                        }
                        ModalField::Season => {
                            draft.season_input.pop();
                        }
                        ModalField::Episode => {
                            draft.episode_input.pop();
                        }
                        _ => {}
                    }
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(draft) = self.modal.draft_mut() {
                    match draft.focus {
                        ModalField::Watched => draft.watched_input.push(c),
                        ModalField::Season => draft.season_input.push(c),
                        ModalField::Episode => draft.episode_input.push(c),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Resolve the poster through the verification gate, then create or
    /// update the record. The whole flow runs off-thread; the modal learns
    /// the outcome through `AppMessage`s.
    fn save_media(&mut self) {
        if self.request_in_flight {
            return;
        }
        let Some(user) = self.session.user() else {
            return;
        };
        let Some(draft) = self.modal.draft() else {
            return;
        };

        self.request_in_flight = true;

        let api = self.api.clone();
        let username = user.username.clone();
        let draft = draft.clone();
        let is_edit = self.modal.is_edit();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let poster = match draft.poster_path.clone() {
                None => None,
                Some(candidate) => {
                    let prompt_tx = tx.clone();
                    let verdict = api.verify_image(&draft.title, &candidate);
                    let resolution = resolve_poster(
                        verdict,
                        &draft.title,
                        candidate.clone(),
                        move |prompt| {
                            let _ = prompt_tx.send(AppMessage::PosterConfirm(prompt));
                        },
                    )
                    .await;

                    match resolution {
                        PosterResolution::Approved(url) => Some(url),
                        PosterResolution::Cancelled => {
                            let _ = tx.send(AppMessage::SaveCancelled);
                            return;
                        }
                    }
                }
            };

            let payload = draft.build_payload(&username, poster);
            let result = if is_edit {
                api.update_media(&draft.id, &payload).await
            } else {
                api.add_media(&payload).await
            };

            match result {
                Ok(()) => {
                    let _ = tx.send(AppMessage::Saved { updated: is_edit });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::SaveFailed(e.to_string()));
                }
            }
        });
    }

    fn handle_verify_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                if let Some(prompt) = self.poster_prompt.take() {
                    prompt.confirm();
                }
            }
            KeyCode::Esc => {
                if let Some(prompt) = self.poster_prompt.take() {
                    prompt.dismiss();
                }
            }
            _ => {}
        }
    }

    fn handle_delete_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.confirm_delete = false;
            }
            KeyCode::Enter => {
                self.confirm_delete = false;
                self.remove_media();
            }
            _ => {}
        }
    }

    fn remove_media(&mut self) {
        if self.request_in_flight || !self.modal.is_edit() {
            return;
        }
        let Some(draft) = self.modal.draft() else {
            return;
        };

        self.request_in_flight = true;

        let api = self.api.clone();
        let id = draft.id.clone();
        let tx = self.msg_tx.clone();

        info!(id = %id, "Removing media");

        tokio::spawn(async move {
            match api.delete_media(&id).await {
                Ok(()) => {
                    let _ = tx.send(AppMessage::Removed);
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::RemoveFailed(e.to_string()));
                }
            }
        });
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

const MITA_FRAMES: [&str; 4] = [
    r#"

  ███╗   ███╗
  ████╗ ████║
  ██╔████╔██║
  ██║╚██╔╝██║
  ██║ ╚═╝ ██║
  ╚═╝     ╚═╝

"#,
    r#"

  ███╗   ███╗ ██╗
  ████╗ ████║ ██║
  ██╔████╔██║ ██║
  ██║╚██╔╝██║ ██║
  ██║ ╚═╝ ██║ ██║
  ╚═╝     ╚═╝ ╚═╝

"#,
    r#"

  ███╗   ███╗ ██╗ ████████╗
  ████╗ ████║ ██║ ╚══██╔══╝
  ██╔████╔██║ ██║    ██║
  ██║╚██╔╝██║ ██║    ██║
  ██║ ╚═╝ ██║ ██║    ██║
  ╚═╝     ╚═╝ ╚═╝    ╚═╝

"#,
    r#"

  ███╗   ███╗ ██╗ ████████╗  █████╗
  ████╗ ████║ ██║ ╚══██╔══╝ ██╔══██╗
  ██╔████╔██║ ██║    ██║    ███████║
  ██║╚██╔╝██║ ██║    ██║    ██╔══██║
  ██║ ╚═╝ ██║ ██║    ██║    ██║  ██║
  ╚═╝     ╚═╝ ╚═╝    ╚═╝    ╚═╝  ╚═╝

"#,
];

const MITA_TAGLINE: &str = "見た - watched";

pub fn play_splash(terminal: &mut DefaultTerminal, accent: Color) -> io::Result<()> {
    use ratatui::{layout::Alignment, text::Text, widgets::Paragraph};

    for frame in &MITA_FRAMES {
        terminal.draw(|f| {
            let area = f.area();
            let text = Text::styled(*frame, Style::default().fg(accent));

            let lines = frame.lines().count() as u16;
            let y_offset = area.height.saturating_sub(lines) / 2;

            let centered_area = Rect {
                x: 0,
                y: y_offset,
                width: area.width,
                height: lines + 2,
            };

            let para = Paragraph::new(text).alignment(Alignment::Center);
            f.render_widget(para, centered_area);
        })?;

        thread::sleep(Duration::from_millis(150));
    }

    terminal.draw(|f| {
        use ratatui::text::Text;
        use ratatui::widgets::Paragraph;

        let area = f.area();
        let frame_text = MITA_FRAMES[3];
        let lines = frame_text.lines().count() as u16;
        let y_offset = area.height.saturating_sub(lines + 2) / 2;

        let logo_area = Rect {
            x: 0,
            y: y_offset,
            width: area.width,
            height: lines,
        };

        let tagline_area = Rect {
            x: 0,
            y: y_offset + lines,
            width: area.width,
            height: 2,
        };

        let logo = Paragraph::new(Text::styled(frame_text, Style::default().fg(accent)))
            .alignment(ratatui::layout::Alignment::Center);
        let tagline = Paragraph::new(Line::styled(
            MITA_TAGLINE,
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(ratatui::layout::Alignment::Center);

        f.render_widget(logo, logo_area);
        f.render_widget(tagline, tagline_area);
    })?;

    thread::sleep(Duration::from_millis(600));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.json"));
        (App::new(Config::default(), session), dir)
    }

    fn logged_in_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::load(dir.path().join("session.json"));
        session
            .store(User {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
            })
            .unwrap();
        (App::new(Config::default(), session), dir)
    }

    fn record(id: &str, media_type: MediaType, status: WatchStatus, progress: u32) -> MediaRecord {
        MediaRecord {
            id: id.to_string(),
            media_type,
            title: id.to_string(),
            year: None,
            overview: None,
            poster_path: None,
            status,
            watched_episodes: 0,
            total_episodes: 0,
            progress,
            season: None,
            episode: None,
        }
    }

    #[test]
    fn starts_on_auth_view_when_logged_out() {
        let (app, _dir) = test_app();
        assert_eq!(app.view, View::Auth);
    }

    #[test]
    fn starts_on_dashboard_when_session_restored() {
        let (app, _dir) = logged_in_app();
        assert_eq!(app.view, View::Dashboard);
    }

    #[test]
    fn logout_clears_session_and_all_auth_fields() {
        let (mut app, _dir) = logged_in_app();
        app.view = View::Dashboard;
        app.auth.login_username = "ana".to_string();
        app.auth.login_password = "hunter2".to_string();
        app.auth.register_username = "ana2".to_string();
        app.auth.register_email = "ana@example.com".to_string();
        app.auth.register_password = "hunter3".to_string();

        app.logout();

        assert_eq!(app.view, View::Auth);
        assert!(!app.session.is_logged_in());
        assert!(app.auth.login_username.is_empty());
        assert!(app.auth.login_password.is_empty());
        assert!(app.auth.register_username.is_empty());
        assert!(app.auth.register_email.is_empty());
        assert!(app.auth.register_password.is_empty());
    }

    #[test]
    fn default_filters_match_each_section() {
        let (app, _dir) = test_app();
        assert_eq!(app.tv_filter, WatchStatus::Watching);
        assert_eq!(app.movie_filter, WatchStatus::ToWatch);
    }

    #[test]
    fn grid_follows_view_and_filter() {
        let (mut app, _dir) = logged_in_app();
        app.media = vec![
            record("tv-1", MediaType::Tv, WatchStatus::Watching, 0),
            record("tv-2", MediaType::Tv, WatchStatus::Completed, 0),
            record("movie-1", MediaType::Movie, WatchStatus::ToWatch, 40),
        ];

        app.view = View::TvShows;
        app.recompute_grid();
        assert_eq!(app.grid_indices, vec![0]);
        assert_eq!(app.grid_state.selected(), Some(0));

        app.view = View::Movies;
        app.recompute_grid();
        assert_eq!(app.grid_indices, vec![2]);

        app.view = View::ContinueWatching;
        app.recompute_grid();
        // The watching show plus the partially-watched movie
        assert_eq!(app.grid_indices, vec![0, 2]);
    }

    #[test]
    fn dashboard_counts_cover_all_statuses() {
        let (mut app, _dir) = logged_in_app();
        app.media = vec![
            record("tv-1", MediaType::Tv, WatchStatus::Watching, 0),
            record("tv-2", MediaType::Tv, WatchStatus::Dropped, 0),
            record("movie-1", MediaType::Movie, WatchStatus::Completed, 100),
        ];

        app.view = View::Dashboard;
        app.recompute_grid();
        assert_eq!(app.stats.tv_count, 2);
        assert_eq!(app.stats.movie_count, 1);
        assert_eq!(app.stats.continue_count, 1);
        assert!(app.grid_indices.is_empty());
    }

    #[test]
    fn auth_tab_toggle_moves_focus_to_first_field() {
        let mut auth = AuthState::default();
        auth.focus = AuthField::LoginPassword;
        auth.toggle_tab();
        assert_eq!(auth.tab, AuthTab::Register);
        assert_eq!(auth.focus, AuthField::RegisterUsername);
    }
}
