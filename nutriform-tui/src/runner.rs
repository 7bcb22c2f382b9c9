//! Terminal loop: draws the app, feeds it keys, and runs its effects.
//!
//! Network requests run on a tokio runtime; their outcomes come back over a
//! channel and are dispatched on the UI loop, one at a time.

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nutriform::{
    Effect, Event, HttpBackend, Notice, PreferenceStore, ReportBackend, ThemePreference,
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use crate::app::App;
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Error type for the terminal front-end.
#[derive(Debug, Error)]
pub enum TuiError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Messages sent back to the UI loop by background tasks.
#[derive(Debug)]
enum Message {
    Session(Event),
    Notice(Notice),
}

pub struct Runner {
    runtime: Runtime,
    backend: HttpBackend,
    store: Box<dyn PreferenceStore>,
    report_path: PathBuf,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
}

impl Runner {
    pub fn new(
        runtime: Runtime,
        backend: HttpBackend,
        store: Box<dyn PreferenceStore>,
        report_path: PathBuf,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            runtime,
            backend,
            store,
            report_path,
            tx,
            rx,
        }
    }

    pub fn run(mut self, mut app: App) -> Result<(), TuiError> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal, &mut app);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut App,
    ) -> Result<(), TuiError> {
        while !app.should_quit() {
            terminal.draw(|frame| ui::draw(frame, app))?;

            if event::poll(POLL_INTERVAL)?
                && let TermEvent::Key(key) = event::read()?
            {
                let effects = app.handle_key(key, Instant::now());
                self.execute(effects, app);
            }

            while let Ok(message) = self.rx.try_recv() {
                let now = Instant::now();
                match message {
                    Message::Session(event) => {
                        let effects = app.dispatch(event, now);
                        self.execute(effects, app);
                    }
                    Message::Notice(notice) => app.notify(notice, now),
                }
            }

            app.dispatch(Event::Tick, Instant::now());
        }
        Ok(())
    }

    fn execute(&mut self, effects: Vec<Effect>, app: &mut App) {
        for effect in effects {
            match effect {
                Effect::SendRecommendation { ticket, request } => {
                    let backend = self.backend.clone();
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        let outcome = backend.recommend(&request).await;
                        let _ = tx.send(Message::Session(Event::RecommendationArrived {
                            ticket,
                            outcome,
                        }));
                    });
                }
                Effect::SendComparison { ticket, request } => {
                    let backend = self.backend.clone();
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        let outcome = backend.compare(&request).await;
                        let _ = tx.send(Message::Session(Event::ComparisonArrived {
                            ticket,
                            outcome,
                        }));
                    });
                }
                Effect::Navigate(path) => self.download(path),
                Effect::PersistTheme(mode) => {
                    if let Err(err) = ThemePreference::new(mode).persist(self.store.as_mut()) {
                        warn!(%err, "could not persist theme");
                        app.notify(Notice::warning(err.to_string()), Instant::now());
                    }
                }
                // Applied by the app itself.
                Effect::Focus(_) => {}
            }
        }
    }

    /// Fetch the report and save it next to the user's downloads.
    fn download(&self, path: String) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let target = self.report_path.clone();
        self.runtime.spawn(async move {
            let notice = match backend.download(&path).await {
                Ok(bytes) => match save(&target, &bytes).await {
                    Ok(()) => {
                        info!(path = %target.display(), "report saved");
                        Notice::success(format!("Report saved to {}", target.display()))
                    }
                    Err(err) => Notice::error(format!("Could not save report: {err}")),
                },
                Err(err) => Notice::error(
                    err.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Download failed: {err}")),
                ),
            };
            let _ = tx.send(Message::Notice(notice));
        });
    }
}

async fn save(target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, bytes).await
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), TuiError> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
