use std::io::{Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::buffer::Document;
use crate::editor::{Prompt, Renderer};
use crate::event::{is_printable, Key, KeySource, TerminalKeys};

const FOOTER: &str = "Ctrl-S:Save  Esc:Exit";
const MODIFIED_MARK: &str = "[*]";

/// Full-screen crossterm frontend. The terminal is restored when dropped.
pub struct Terminal {
    stdout: Stdout,
    width: u16,
    height: u16,
    keys: TerminalKeys,
    active: bool,
}

impl Terminal {
    pub fn new() -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut term = Self {
            stdout: std::io::stdout(),
            width,
            height,
            keys: TerminalKeys,
            active: false,
        };
        term.enter()?;
        Ok(term)
    }

    fn enter(&mut self) -> anyhow::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    pub fn exit(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Rows available for text between the header and the footer.
    pub fn text_rows(&self) -> usize {
        text_rows(self.height)
    }

    fn refresh_size(&mut self) -> anyhow::Result<()> {
        (self.width, self.height) = terminal::size()?;
        Ok(())
    }

    /// Fits `text` into the screen width, showing control bytes as `?`.
    fn clip(&self, text: &[u8]) -> String {
        text.iter()
            .take(self.width as usize)
            .map(|&b| if is_printable(b) { b as char } else { '?' })
            .collect()
    }

    fn draw_modal(&mut self, message: &str) -> anyhow::Result<()> {
        let row = self.height.saturating_sub(1);
        let line = format!("{:<width$}", message, width = self.width as usize);
        let line = self.clip(line.as_bytes());

        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(line.black().on_yellow()),
        )?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Renderer for Terminal {
    fn render(&mut self, title: &str, document: &Document) -> anyhow::Result<()> {
        self.refresh_size()?;
        queue!(self.stdout, Clear(ClearType::All))?;

        // Header
        let header = format!("{:<width$}", title, width = self.width as usize);
        let header = self.clip(header.as_bytes());
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            PrintStyledContent(header.white().on_blue()),
        )?;
        if document.is_modified() {
            let col = self.width.saturating_sub(MODIFIED_MARK.len() as u16 + 1);
            queue!(
                self.stdout,
                cursor::MoveTo(col, 0),
                PrintStyledContent(MODIFIED_MARK.yellow().on_blue()),
            )?;
        }

        // Text area, between the header and the footer
        let rows = self.text_rows();
        let pos = document.cursor();
        let first = window_start(document.scroll_offset(), pos.line, rows);

        let window = (first..first + rows).filter_map(|i| document.line(i).map(|l| (i, l)));
        for (row, (index, line)) in window.enumerate() {
            let y = row as u16 + 1;
            let text = self.clip(line);
            queue!(self.stdout, cursor::MoveTo(0, y))?;

            if index == pos.line {
                let padded = format!("{:<width$}", text, width = self.width as usize);
                queue!(self.stdout, PrintStyledContent(padded.reverse()))?;
            } else {
                queue!(self.stdout, Print(text))?;
            }
        }

        // Footer
        let footer = format!("{:<width$}", FOOTER, width = self.width as usize);
        let footer = self.clip(footer.as_bytes());
        let footer_row = self.height.saturating_sub(1);
        queue!(
            self.stdout,
            cursor::MoveTo(0, footer_row),
            PrintStyledContent(footer.white().on_dark_grey()),
        )?;

        let cursor_row = pos.line - first + 1;
        let cursor_col = pos.col.min(self.width.saturating_sub(1) as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(cursor_col as u16, cursor_row as u16),
            cursor::Show,
        )?;

        self.stdout.flush()?;
        Ok(())
    }
}

impl Prompt for Terminal {
    fn confirm(&mut self, message: &str) -> anyhow::Result<bool> {
        self.draw_modal(&format!("{message} (y/n)"))?;
        let answer = self.keys.next_key()?;
        Ok(matches!(answer, Key::Enter | Key::Char(b'y' | b'Y')))
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        self.draw_modal(message)?;
        self.keys.next_key()?;
        Ok(())
    }
}

impl KeySource for Terminal {
    fn next_key(&mut self) -> anyhow::Result<Key> {
        self.keys.next_key()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

fn text_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(2)).max(1)
}

/// First document line drawn in `rows` screen rows. Starts at the
/// document's scroll offset and moves down when the screen is shorter
/// than the viewport and the cursor would fall below it.
fn window_start(scroll_offset: usize, cursor_line: usize, rows: usize) -> usize {
    let rows = rows.max(1);
    if cursor_line < scroll_offset {
        cursor_line
    } else if cursor_line >= scroll_offset + rows {
        cursor_line + 1 - rows
    } else {
        scroll_offset
    }
}
