use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use linedit::{editor::Session, terminal::Terminal, FsStorage, Limits, Settings};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    if let Some(log_file) = &settings.log_file {
        init_logging(log_file)?;
    }

    let mut terminal = Terminal::new().context("failed to set up the terminal")?;

    let default = Limits::default();
    let rows = default.visible_rows().min(terminal.text_rows());
    let limits = default.with_visible_rows(rows)?;

    let mut session = Session::open(FsStorage, &settings.path, limits);
    let outcome = session.run(&mut terminal);
    let restored = terminal.exit();

    info!(outcome = ?outcome.as_ref().ok(), "exiting");
    settle(outcome, restored).map(|_| ())
}

/// Session errors take precedence over failing to restore the terminal.
fn settle<T>(outcome: anyhow::Result<T>, restored: anyhow::Result<()>) -> anyhow::Result<T> {
    let value = outcome?;
    restored.context("failed to restore the terminal")?;
    Ok(value)
}

/// Logs go to a file; the terminal belongs to the editor.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
