//! TTS Model TUI - Terminal User Interface for a TTS model server
//!
//! A Ratatui-based form that fetches the server's field schema, lets the user
//! pick a model and its dependent options, plays synthesized speech and copies
//! a subscription URL for the current settings.

mod api;
mod app;
mod audio;
mod clipboard;
mod config;
mod error;
mod platform;
mod state;
mod subscribe;
mod ui;

use anyhow::Result;
use app::App;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let mut config = TuiConfig::load().unwrap_or_else(|err| {
        tracing::warn!("Ignoring unreadable config: {err}");
        TuiConfig::default()
    });
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Fetch the schema once, like a form being mounted
    app.load_fields();
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    config.token = Some(app.token().to_string());
    if let Err(err) = config.save() {
        tracing::warn!("Failed to save config: {err}");
    }

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Apply finished fetches and invocations
        app.drain_events();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Log to a file in the data dir so output stays off the alternate screen;
/// fall back to stderr when it cannot be opened
fn init_logging() {
    let writer = match open_log_file() {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tts_model_tui=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
}

fn open_log_file() -> Option<File> {
    let path = TuiConfig::log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
