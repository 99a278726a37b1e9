//! A small line editor over a bounded text buffer.
//!
//! Documents hold at most [`config::MAX_LINES`] lines of at most
//! `MAX_LINE_LEN - 1` bytes each. Edits that would exceed a ceiling are
//! refused instead of losing text.

pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod storage;
pub mod terminal;

pub use buffer::{Direction, Document, Position};
pub use config::{Limits, Settings};
pub use editor::{Prompt, Renderer, Session, SessionOutcome};
pub use error::{LimitsError, StorageError};
pub use event::{Key, KeySource};
pub use storage::{FsStorage, Storage};
