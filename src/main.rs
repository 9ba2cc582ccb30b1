pub mod app;
pub mod db;
pub mod metrics;
pub mod runtime;
pub mod scramble;
pub mod session;
pub mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::app::{App, Flow};
use crate::db::Store;
use crate::runtime::{AppEvent, CrosstermEvents, EventSource};

/// terminal typing speed trainer with scrambled passages and a local leaderboard
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// path to the sqlite store holding the text pool and leaderboard
    #[clap(long, default_value = "typedash.db")]
    db: PathBuf,

    /// username for the leaderboard; skips the in-app prompt
    #[clap(short, long)]
    username: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.db)?;

    let store = Store::open(&cli.db)
        .with_context(|| format!("opening score database at {}", cli.db.display()))?;

    enable_raw_mode().context("entering raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, cli.username);
    let result = run(&mut terminal, &mut app, &mut CrosstermEvents);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Draw a frame, block for one event, mutate, repeat. A resize only forces
/// the redraw on the next pass; keys are routed to the state machine.
fn run<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut E,
) -> Result<()> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match events.next_event()? {
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.handle_key(key) == Flow::Exit {
                    return Ok(());
                }
            }
        }
    }
}

/// Recoverable failures (fetch fallbacks, lost score writes) go to a log
/// file next to the database; the terminal belongs to the UI.
fn init_logging(db_path: &Path) -> Result<()> {
    let log_path = db_path.with_extension("log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file at {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["typedash"]);
        assert_eq!(cli.db, PathBuf::from("typedash.db"));
        assert_eq!(cli.username, None);
    }

    #[test]
    fn cli_accepts_db_and_username() {
        let cli = Cli::parse_from(["typedash", "--db", "/tmp/scores.db", "-u", "ann"]);
        assert_eq!(cli.db, PathBuf::from("/tmp/scores.db"));
        assert_eq!(cli.username.as_deref(), Some("ann"));
    }

    #[test]
    fn run_exits_on_escape() {
        let store = Store::open_in_memory().unwrap();
        let mut app = App::new(store, None);
        let mut events = runtime::QueuedEvents::new([key(KeyCode::Esc)]);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        run(&mut terminal, &mut app, &mut events).unwrap();
    }

    #[test]
    fn run_survives_resize_events() {
        let store = Store::open_in_memory().unwrap();
        let mut app = App::new(store, None);
        let mut events =
            runtime::QueuedEvents::new([AppEvent::Resize, AppEvent::Resize, key(KeyCode::Esc)]);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        run(&mut terminal, &mut app, &mut events).unwrap();
    }

    #[test]
    fn run_propagates_a_drained_event_source() {
        let store = Store::open_in_memory().unwrap();
        let mut app = App::new(store, None);
        let mut events = runtime::QueuedEvents::default();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        assert!(run(&mut terminal, &mut app, &mut events).is_err());
    }
}
