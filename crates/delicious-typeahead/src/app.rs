//! Terminal shell and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Searches run as tokio
//! tasks and report back over an unbounded channel the loop drains between
//! frames.

use std::{io, sync::Arc, time::Duration};

use crossterm::{
    event as ct_event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use delicious_core::config::TypeaheadConfig;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout},
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::{runtime::Handle, sync::mpsc};

use crate::{
    client::SearchClient,
    controller::{Action, SearchRequest, SearchResponse, Typeahead},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{results::ResultsList, search_box::SearchBox},
};

// ---------------------------------------------------------------------------
// Searcher
// ---------------------------------------------------------------------------

/// Runs search requests on the tokio runtime and sends each outcome back
/// tagged with its sequence number.
#[derive(Clone)]
pub struct Searcher {
    client: Arc<dyn SearchClient>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<SearchResponse>,
}

impl Searcher {
    pub fn new(
        client: Arc<dyn SearchClient>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SearchResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, runtime, tx }, rx)
    }

    pub fn issue(&self, request: SearchRequest) {
        let search = self.client.search(&request.query);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = search.await;
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(SearchResponse {
                seq: request.seq,
                result,
            });
        });
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Status {
    Info(String),
    Error(String),
}

pub struct App {
    typeahead: Typeahead,
    searcher: Searcher,
    responses: mpsc::UnboundedReceiver<SearchResponse>,
    server_url: String,
    show_descriptions: bool,
    theme: Theme,
    status: Option<Status>,
    quit: bool,
}

impl App {
    pub fn new(
        client: Arc<dyn SearchClient>,
        runtime: Handle,
        config: &TypeaheadConfig,
        theme: Theme,
    ) -> Self {
        let (searcher, responses) = Searcher::new(client, runtime);
        Self {
            typeahead: Typeahead::new(),
            searcher,
            responses,
            server_url: config.server_url.trim_end_matches('/').to_string(),
            show_descriptions: config.show_descriptions,
            theme,
            status: None,
            quit: false,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            while let Ok(response) = self.responses.try_recv() {
                self.typeahead.on_response(response);
            }

            terminal.draw(|frame| self.draw(frame))?;

            if self.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                if let Some(ev) = event::to_app_event(ct_event::read()?) {
                    tracing::debug!(event = ?ev, "key event");
                    self.handle(ev);
                }
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: AppEvent) {
        match self.typeahead.handle(&event) {
            Action::None => {}
            Action::Search(request) => {
                self.status = None;
                self.searcher.issue(request);
            }
            Action::Follow(href) => self.follow(&href),
            Action::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
        }
    }

    fn follow(&mut self, href: &str) {
        let url = format!("{}{}", self.server_url, href);
        match open::that(&url) {
            Ok(()) => {
                tracing::info!(%url, "opened store page");
                self.status = Some(Status::Info(format!("opened {url}")));
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "could not open browser");
                self.status = Some(Status::Error(format!("could not open {url}: {e}")));
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        // Vertical: 3-line search box | results | 1-line status
        let vert = Layout::default()
            .direction(LayoutDir::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let search_box = SearchBox::new(self.typeahead.input(), &self.theme);
        let cursor = search_box.cursor_position(vert[0]);
        frame.render_widget(search_box, vert[0]);
        frame.render_widget(
            ResultsList::new(self.typeahead.pane(), &self.theme, self.show_descriptions),
            vert[1],
        );

        let status = match &self.status {
            Some(Status::Info(msg)) => Line::styled(msg.as_str(), self.theme.status_info),
            Some(Status::Error(msg)) => Line::styled(msg.as_str(), self.theme.status_error),
            None => Line::styled(
                "↑/↓ select  enter open  esc clear  ctrl+c quit",
                self.theme.placeholder,
            ),
        };
        frame.render_widget(Paragraph::new(status), vert[2]);
        frame.set_cursor_position(cursor);
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
