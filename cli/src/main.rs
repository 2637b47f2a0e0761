//! Signoff CLI - binary entry point and terminal session management.
//!
//! ```text
//! main() -> load config -> WorkflowController::from_config -> App
//!        -> TerminalSession::new() -> run_app() -> draw / handle_events
//! ```
//!
//! The loop is synchronous: every submit or approve runs to completion
//! (including the notification attempt) before the next frame is drawn.

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use signoff_config::{SignoffConfig, data_dir};
use signoff_engine::WorkflowController;
use signoff_tui::{App, draw, handle_events};

/// Checked before `RUST_LOG` so Signoff can be tuned without touching
/// other tools sharing the shell.
const LOG_FILTER_ENV: &str = "SIGNOFF_LOG";
const DEFAULT_LOG_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "signoff.log";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    match open_log_file(&log_file_candidates()) {
        Ok((log_path, file, skipped)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(log_filter())
                .init();

            tracing::info!(
                path = %log_path.display(),
                version = env!("CARGO_PKG_VERSION"),
                "Signoff starting"
            );
            for problem in skipped {
                tracing::warn!("Log location unusable: {problem}");
            }
        }
        // The terminal belongs to the TUI, so without a file the events
        // go nowhere.
        Err(_) => tracing_subscriber::registry().with(log_filter()).init(),
    }
}

/// Open the first usable log file, reporting why earlier candidates were
/// passed over.
fn open_log_file(candidates: &[PathBuf]) -> Result<(PathBuf, File, Vec<String>), Vec<String>> {
    let mut skipped = Vec::new();

    for candidate in candidates {
        match append_to(candidate) {
            Ok(file) => return Ok((candidate.clone(), file, skipped)),
            Err(err) => skipped.push(format!("{}: {err:#}", candidate.display())),
        }
    }

    Err(skipped)
}

fn append_to(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        create_log_dir(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("cannot open for append")
}

/// Log lines can echo client names and addresses; keep the directory
/// owner-only like the database directory.
#[cfg(unix)]
fn create_log_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_log_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

/// `<data dir>/logs/signoff.log`, then the same layout under the working
/// directory for hosts without a home directory.
fn log_file_candidates() -> Vec<PathBuf> {
    data_dir()
        .into_iter()
        .chain([PathBuf::from(".signoff")])
        .map(|dir| dir.join("logs").join(LOG_FILE_NAME))
        .collect()
}

fn load_config() -> SignoffConfig {
    match SignoffConfig::load() {
        Ok(Some(config)) => config,
        Ok(None) => SignoffConfig::default(),
        Err(err) => {
            tracing::error!("{err}; continuing with defaults");
            SignoffConfig::default()
        }
    }
}

/// RAII guard for raw mode, the alternate screen and bracketed paste.
///
/// Dropping it restores the terminal, including on early return.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let controller = WorkflowController::from_config(&config)
        .context("Failed to start the approval workflow")?;
    let mut app = App::new(controller);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app)
    };

    if let Err(err) = &result {
        tracing::error!("{err:?}");
    }
    tracing::info!("Shutting down");
    result
}

fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    while !app.should_quit() {
        terminal.draw(|frame| draw(frame, app))?;
        handle_events(app)?;
    }
    Ok(())
}
