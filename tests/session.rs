//! Editing sessions driven by scripted key sequences.

use std::collections::VecDeque;
use std::fs;

use anyhow::anyhow;
use linedit::{
    Document, FsStorage, Key, KeySource, Limits, Position, Prompt, Renderer, Session,
    SessionOutcome,
};

/// Frontend that replays keys and answers prompts from a script.
#[derive(Default)]
struct Scripted {
    keys: VecDeque<Key>,
    answers: VecDeque<bool>,
    notices: Vec<String>,
    frames: Vec<Frame>,
}

#[derive(Debug, Clone)]
struct Frame {
    title: String,
    cursor: Position,
    scroll_offset: usize,
    visible: Vec<usize>,
    modified: bool,
}

impl Scripted {
    fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Default::default()
        }
    }

    fn answering(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.answers = answers.into_iter().collect();
        self
    }
}

impl KeySource for Scripted {
    fn next_key(&mut self) -> anyhow::Result<Key> {
        self.keys.pop_front().ok_or_else(|| anyhow!("script exhausted"))
    }
}

impl Renderer for Scripted {
    fn render(&mut self, title: &str, document: &Document) -> anyhow::Result<()> {
        self.frames.push(Frame {
            title: title.to_string(),
            cursor: document.cursor(),
            scroll_offset: document.scroll_offset(),
            visible: document.visible_lines().map(|(i, _)| i).collect(),
            modified: document.is_modified(),
        });
        Ok(())
    }
}

impl Prompt for Scripted {
    fn confirm(&mut self, _message: &str) -> anyhow::Result<bool> {
        Ok(self.answers.pop_front().unwrap_or(false))
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}

fn typed(text: &str) -> impl Iterator<Item = Key> + '_ {
    text.bytes().map(Key::Char)
}

fn lines(doc: &Document) -> Vec<String> {
    doc.lines()
        .map(|l| String::from_utf8_lossy(l).into_owned())
        .collect()
}

#[test]
fn test_escape_discards_without_saving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "keep\n").unwrap();

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let mut ui = Scripted::new(typed("junk").chain([Key::Escape]));

    assert_eq!(session.run(&mut ui).unwrap(), SessionOutcome::Discarded);
    assert!(session.document().is_modified());
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep\n");
    assert!(ui.notices.is_empty());
}

#[test]
fn test_save_after_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let keys = typed("hello")
        .chain([Key::Enter])
        .chain(typed("world"))
        .chain([Key::Save]);
    let mut ui = Scripted::new(keys).answering([true]);

    assert_eq!(session.run(&mut ui).unwrap(), SessionOutcome::Saved);
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello\nworld\n");
    assert!(!session.document().is_modified());
    assert_eq!(ui.notices, ["Saved!"]);
    assert_eq!(ui.frames[0].title, "new.txt");
}

#[test]
fn test_declined_save_keeps_editing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let keys = typed("x").chain([Key::Save]).chain(typed("y")).chain([Key::Escape]);
    let mut ui = Scripted::new(keys).answering([false]);

    assert_eq!(session.run(&mut ui).unwrap(), SessionOutcome::Discarded);
    assert!(!path.exists());
    assert_eq!(lines(session.document()), ["xy"]);
}

#[test]
fn test_failed_save_stays_in_editing() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a file for writing.
    let path = dir.path().to_path_buf();

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let keys = typed("a").chain([Key::Save, Key::Escape]);
    let mut ui = Scripted::new(keys).answering([true]);

    assert_eq!(session.run(&mut ui).unwrap(), SessionOutcome::Discarded);
    assert_eq!(ui.notices.len(), 1);
    assert!(ui.notices[0].starts_with("Save failed"));
    assert!(session.document().is_modified());
}

#[test]
fn test_split_and_merge_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("three.txt");
    fs::write(&path, "abc\n\nde\n").unwrap();

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let mut ui = Scripted::default();
    assert_eq!(session.document().cursor(), Position::new(0, 0));

    for key in [Key::Right, Key::Right, Key::Right] {
        session.handle_key(key, &mut ui).unwrap();
    }
    assert_eq!(session.document().cursor(), Position::new(0, 3));

    session.handle_key(Key::Enter, &mut ui).unwrap();
    assert_eq!(lines(session.document()), ["abc", "", "", "de"]);
    assert_eq!(session.document().cursor(), Position::new(1, 0));

    session.handle_key(Key::Backspace, &mut ui).unwrap();
    assert_eq!(lines(session.document()), ["abc", "", "de"]);
    assert_eq!(session.document().cursor(), Position::new(0, 3));
}

#[test]
fn test_non_printable_bytes_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let mut ui = Scripted::default();

    for byte in [0x00, 0x09, 0x7F, 0x80, 0xFF] {
        let outcome = session.handle_key(Key::Char(byte), &mut ui).unwrap();
        assert_eq!(outcome, None);
    }
    assert_eq!(session.document(), &Document::new());
}

#[test]
fn test_render_follows_viewport() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.txt");
    let content: String = (0..40).map(|i| format!("line {i}\n")).collect();
    fs::write(&path, content).unwrap();

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let keys = std::iter::repeat(Key::Down).take(30).chain([Key::Escape]);
    let mut ui = Scripted::new(keys);

    session.run(&mut ui).unwrap();

    let last = ui.frames.last().unwrap();
    assert_eq!(last.cursor, Position::new(30, 0));
    assert_eq!(last.scroll_offset, 5);
    assert_eq!(last.visible.first(), Some(&5));
    assert_eq!(last.visible.len(), 26);
    assert!(!last.modified);

    for frame in &ui.frames {
        assert!(frame.visible.contains(&frame.cursor.line));
    }
}

#[test]
fn test_render_reflects_modified_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");

    let mut session = Session::open(FsStorage, &path, Limits::default());
    let mut ui = Scripted::new([Key::Char(b'q'), Key::Escape]);
    session.run(&mut ui).unwrap();

    let flags: Vec<bool> = ui.frames.iter().map(|f| f.modified).collect();
    assert_eq!(flags, [false, true]);
}

#[test]
fn test_input_error_ends_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::open(FsStorage, dir.path().join("a.txt"), Limits::default());
    let mut ui = Scripted::new(typed("ab"));

    assert!(session.run(&mut ui).is_err());
    assert_eq!(lines(session.document()), ["ab"]);
}
