//! Bounded line buffer with a cursor and a scrolling viewport.
//!
//! A [`Document`] never holds more than [`Limits::max_lines`] lines and no
//! line grows past [`Limits::line_capacity`] bytes. Edits that would break
//! either ceiling are refused and leave the document untouched.

use tracing::debug;

use crate::config::Limits;

/// Cursor position: a line index and a byte column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Vec<u8>>,
    cursor: Position,
    scroll_offset: usize,
    modified: bool,
    limits: Limits,
}

impl Document {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// An empty document (one empty line) with the given ceilings.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            lines: vec![vec![]],
            cursor: Position::default(),
            scroll_offset: 0,
            modified: false,
            limits,
        }
    }

    /// Builds a document from already split lines.
    ///
    /// Lines longer than the line capacity are cut short and lines past
    /// the line ceiling are dropped. An empty input yields one empty line.
    /// The cursor starts at the top and the document is unmodified.
    pub fn from_lines<I, L>(lines: I, limits: Limits) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let capacity = limits.line_capacity();
        let mut doc_lines: Vec<Vec<u8>> = lines
            .into_iter()
            .take(limits.max_lines())
            .map(|line| {
                let mut line = line.into();
                line.truncate(capacity);
                line
            })
            .collect();

        if doc_lines.is_empty() {
            doc_lines.push(vec![]);
        }

        Self {
            lines: doc_lines,
            cursor: Position::default(),
            scroll_offset: 0,
            modified: false,
            limits,
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&[u8]> {
        self.lines.get(index).map(|l| l.as_slice())
    }

    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.lines.iter().map(|l| l.as_slice())
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Lines inside the viewport, paired with their document index.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &[u8])> {
        self.lines
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.limits.visible_rows())
            .map(|(i, l)| (i, l.as_slice()))
    }

    fn current_len(&self) -> usize {
        self.lines[self.cursor.line].len()
    }

    /// Moves the cursor one step. Returns false at a document edge.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        let Position { line, col } = self.cursor;

        let moved = match direction {
            Direction::Up if line > 0 => {
                self.cursor.line -= 1;
                self.cursor.col = col.min(self.current_len());
                true
            }
            Direction::Down if line + 1 < self.lines.len() => {
                self.cursor.line += 1;
                self.cursor.col = col.min(self.current_len());
                true
            }
            Direction::Left if col > 0 => {
                self.cursor.col -= 1;
                true
            }
            Direction::Left if line > 0 => {
                self.cursor.line -= 1;
                self.cursor.col = self.current_len();
                true
            }
            Direction::Right if col < self.current_len() => {
                self.cursor.col += 1;
                true
            }
            Direction::Right if line + 1 < self.lines.len() => {
                self.cursor = Position::new(line + 1, 0);
                true
            }
            _ => false,
        };

        if moved {
            self.follow_cursor();
        }
        moved
    }

    /// Inserts `byte` at the cursor. Refused when the line is full.
    pub fn insert_char(&mut self, byte: u8) -> bool {
        // One slot stays free for the shift.
        let limit = self.limits.max_line_len().saturating_sub(2);
        let Position { line, col } = self.cursor;
        let row = &mut self.lines[line];

        if row.len() >= limit {
            debug!(line, len = row.len(), "line full, character refused");
            return false;
        }

        row.insert(col, byte);
        self.cursor.col += 1;
        self.modified = true;
        true
    }

    /// Splits the current line at the cursor. Refused when the document is
    /// at its line ceiling.
    pub fn insert_newline(&mut self) -> bool {
        if self.lines.len() >= self.limits.max_lines() {
            debug!(lines = self.lines.len(), "document full, newline refused");
            return false;
        }

        let Position { line, col } = self.cursor;
        let rest = self.lines[line].split_off(col);
        self.lines.insert(line + 1, rest);

        self.cursor = Position::new(line + 1, 0);
        self.modified = true;
        self.follow_cursor();
        true
    }

    /// Deletes the byte before the cursor, or joins the current line onto
    /// the previous one when the cursor is at column zero.
    ///
    /// A join whose result would not fit in one line is refused rather
    /// than truncated.
    pub fn backspace(&mut self) -> bool {
        let Position { line, col } = self.cursor;

        if col > 0 {
            self.lines[line].remove(col - 1);
            self.cursor.col -= 1;
            self.modified = true;
            return true;
        }

        if line == 0 {
            return false;
        }

        let prev_len = self.lines[line - 1].len();
        let cur_len = self.lines[line].len();
        if prev_len + cur_len >= self.limits.line_capacity() {
            debug!(line, prev_len, cur_len, "merged line too long, join refused");
            return false;
        }

        let current = self.lines.remove(line);
        self.lines[line - 1].extend(current);

        self.cursor = Position::new(line - 1, prev_len);
        self.modified = true;
        self.follow_cursor();
        true
    }

    /// Scrolls the viewport the least amount that keeps the cursor visible.
    fn follow_cursor(&mut self) {
        let rows = self.limits.visible_rows();
        let max_offset = self.lines.len().saturating_sub(rows);

        self.scroll_offset = self.scroll_offset.min(max_offset);
        if self.cursor.line < self.scroll_offset {
            self.scroll_offset = self.cursor.line;
        } else if self.cursor.line >= self.scroll_offset + rows {
            self.scroll_offset = self.cursor.line + 1 - rows;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
