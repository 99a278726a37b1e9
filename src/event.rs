use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Logical key event consumed by the session loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,

    Enter,
    Backspace,
    Escape,
    Save,

    Char(u8),
}

impl Key {
    /// Translates a raw input byte. Returns `None` for unrecognised
    /// control bytes.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x1B => Some(Key::Escape),
            0x08 | 0x7F => Some(Key::Backspace),
            b'\r' | b'\n' => Some(Key::Enter),
            // Ctrl-S
            0x13 => Some(Key::Save),
            b if is_printable(b) => Some(Key::Char(b)),
            _ => None,
        }
    }
}

/// Printable 7-bit range accepted for insertion.
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Blocking source of key events.
pub trait KeySource {
    /// Waits for the next recognised key.
    fn next_key(&mut self) -> anyhow::Result<Key>;
}

/// Reads keys from the terminal with crossterm.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> anyhow::Result<Key> {
        loop {
            if let event::Event::Key(key_event) = event::read()? {
                if let Some(key) = translate_key(key_event) {
                    return Ok(key);
                }
            }
        }
    }
}

pub fn translate_key(key_event: KeyEvent) -> Option<Key> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),

        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Menu | KeyCode::F(2) => Some(Key::Save),
        KeyCode::Char('s' | 'S') if ctrl => Some(Key::Save),

        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) if c.is_ascii() => Key::from_byte(c as u8),

        _ => None,
    }
}
