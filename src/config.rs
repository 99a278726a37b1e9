use std::path::PathBuf;

use anyhow::bail;

use crate::error::LimitsError;

/// Maximum number of lines a document may hold.
pub const MAX_LINES: usize = 256;
/// Line storage size, including room for a terminator. Lines hold at most
/// `MAX_LINE_LEN - 1` bytes.
pub const MAX_LINE_LEN: usize = 128;
/// Rows of text shown in the viewport.
pub const VISIBLE_ROWS: usize = 26;

/// Environment variable naming a file to write logs to.
pub const LOG_ENV: &str = "LINEDIT_LOG";

/// Capacity ceilings of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_lines: usize,
    max_line_len: usize,
    visible_rows: usize,
}

impl Limits {
    /// Smallest line storage: one byte of text plus the terminator.
    pub const MIN_LINE_LEN: usize = 2;

    pub fn new(
        max_lines: usize,
        max_line_len: usize,
        visible_rows: usize,
    ) -> Result<Self, LimitsError> {
        if max_lines == 0 {
            return Err(LimitsError::NoLines);
        }
        if max_line_len < Self::MIN_LINE_LEN {
            return Err(LimitsError::LineTooShort {
                got: max_line_len,
                min: Self::MIN_LINE_LEN,
            });
        }
        if visible_rows == 0 {
            return Err(LimitsError::NoRows);
        }

        Ok(Self {
            max_lines,
            max_line_len,
            visible_rows,
        })
    }

    /// Same ceilings, shown through a viewport of `rows` rows.
    pub fn with_visible_rows(self, rows: usize) -> Result<Self, LimitsError> {
        Self::new(self.max_lines, self.max_line_len, rows)
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Longest line that can be stored, in bytes.
    pub fn line_capacity(&self) -> usize {
        self.max_line_len - 1
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_lines: MAX_LINES,
            max_line_len: MAX_LINE_LEN,
            visible_rows: VISIBLE_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub path: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Builds settings from the process arguments and environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::parse(std::env::args().skip(1), std::env::var_os(LOG_ENV).map(PathBuf::from))
    }

    pub fn parse(
        mut args: impl Iterator<Item = String>,
        log_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let Some(path) = args.next() else {
            bail!("usage: linedit <FILE>");
        };

        if let Some(extra) = args.next() {
            bail!("unexpected argument `{extra}`\nusage: linedit <FILE>");
        }

        Ok(Self {
            path: PathBuf::from(path),
            log_file: log_file.filter(|p| !p.as_os_str().is_empty()),
        })
    }
}
