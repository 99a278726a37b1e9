use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::buffer::{Direction, Document};
use crate::config::Limits;
use crate::event::{is_printable, Key, KeySource};
use crate::storage::{FsStorage, Storage};

/// Draws the document. Must not change it.
pub trait Renderer {
    fn render(&mut self, title: &str, document: &Document) -> anyhow::Result<()>;
}

/// Modal dialogs.
pub trait Prompt {
    /// Asks a yes/no question.
    fn confirm(&mut self, message: &str) -> anyhow::Result<bool>;

    /// Shows a message and waits for it to be dismissed.
    fn notify(&mut self, message: &str) -> anyhow::Result<()>;
}

/// How an editing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Left with Escape; unsaved changes are dropped.
    Discarded,
    /// The document was saved and the session closed.
    Saved,
}

/// One open file: the document plus where it lives.
pub struct Session<S: Storage = FsStorage> {
    document: Document,
    path: PathBuf,
    title: String,
    storage: S,
}

impl<S: Storage> Session<S> {
    pub fn open(storage: S, path: impl Into<PathBuf>, limits: Limits) -> Self {
        let path = path.into();
        let document = Document::load(&storage, &path, limits);
        let title = title_for(&path);

        info!(path = %path.display(), lines = document.line_count(), "session opened");

        Self {
            document,
            path,
            title,
            storage,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Renders, waits for a key, applies it; repeats until the session
    /// ends.
    pub fn run<F>(&mut self, frontend: &mut F) -> anyhow::Result<SessionOutcome>
    where
        F: KeySource + Renderer + Prompt,
    {
        loop {
            frontend.render(&self.title, &self.document)?;

            let key = frontend.next_key()?;
            if let Some(outcome) = self.handle_key(key, frontend)? {
                info!(?outcome, "session closed");
                return Ok(outcome);
            }
        }
    }

    /// Applies one key. Returns the outcome when the key ends the session.
    pub fn handle_key<P: Prompt>(
        &mut self,
        key: Key,
        prompt: &mut P,
    ) -> anyhow::Result<Option<SessionOutcome>> {
        let changed = match key {
            Key::Escape => return Ok(Some(SessionOutcome::Discarded)),
            Key::Save => return self.handle_save(prompt),

            Key::Up => self.document.move_cursor(Direction::Up),
            Key::Down => self.document.move_cursor(Direction::Down),
            Key::Left => self.document.move_cursor(Direction::Left),
            Key::Right => self.document.move_cursor(Direction::Right),

            Key::Enter => self.document.insert_newline(),
            Key::Backspace => self.document.backspace(),
            Key::Char(byte) if is_printable(byte) => self.document.insert_char(byte),
            Key::Char(_) => false,
        };

        if !changed {
            debug!(?key, "no effect");
        }

        Ok(None)
    }

    fn handle_save<P: Prompt>(&mut self, prompt: &mut P) -> anyhow::Result<Option<SessionOutcome>> {
        if !prompt.confirm("Save changes?")? {
            return Ok(None);
        }

        match self.document.save(&self.storage, &self.path) {
            Ok(()) => {
                prompt.notify("Saved!")?;
                Ok(Some(SessionOutcome::Saved))
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                prompt.notify(&format!("Save failed: {e}"))?;
                Ok(None)
            }
        }
    }
}

/// Final path component, used as the display title.
fn title_for(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
