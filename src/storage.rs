//! Conversion between flat text files and [`Document`]s.
//!
//! Lines end in LF, optionally preceded by CR, when read. Saving always
//! writes LF after every line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::buffer::Document;
use crate::config::Limits;
use crate::error::StorageError;

/// Where documents are read from and written to.
pub trait Storage {
    type Reader: BufRead;
    type Writer: Write;

    fn open_for_read(&self, path: &Path) -> Result<Self::Reader, StorageError>;
    fn open_for_write(&self, path: &Path) -> Result<Self::Writer, StorageError>;
}

/// Local filesystem storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl Storage for FsStorage {
    type Reader = BufReader<File>;
    type Writer = BufWriter<File>;

    fn open_for_read(&self, path: &Path) -> Result<Self::Reader, StorageError> {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| StorageError::from_io(path, e))
    }

    fn open_for_write(&self, path: &Path) -> Result<Self::Writer, StorageError> {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| StorageError::from_io(path, e))
    }
}

impl Document {
    /// Reads a document from `reader`.
    ///
    /// Reading stops once the line ceiling is reached. A read error ends
    /// the document at the last complete line. At most one line's worth of
    /// bytes is held at a time; the tail of an overlong line is skipped
    /// without being stored.
    pub fn load_from<R: BufRead>(mut reader: R, limits: Limits) -> Self {
        // Room for a full line plus its CR LF.
        let keep = limits.line_capacity() + 2;
        let mut lines = Vec::new();
        let mut buf = Vec::with_capacity(keep);

        while lines.len() < limits.max_lines() {
            match read_line_capped(&mut reader, keep, &mut buf) {
                Ok(false) => break,
                Ok(true) => lines.push(strip_line_end(&buf).to_vec()),
                Err(e) => {
                    warn!(error = %e, lines = lines.len(), "read failed, keeping lines read so far");
                    break;
                }
            }
        }

        Document::from_lines(lines, limits)
    }

    /// Loads `path` through `storage`. A file that cannot be opened
    /// gives an empty document.
    pub fn load<S: Storage>(storage: &S, path: &Path, limits: Limits) -> Self {
        match storage.open_for_read(path) {
            Ok(reader) => {
                let doc = Document::load_from(reader, limits);
                debug!(path = %path.display(), lines = doc.line_count(), "loaded");
                doc
            }
            Err(StorageError::NotFound { .. }) => {
                info!(path = %path.display(), "new file");
                Document::with_limits(limits)
            }
            Err(e) => {
                warn!(error = %e, "cannot open for reading, starting empty");
                Document::with_limits(limits)
            }
        }
    }

    /// Writes every line followed by LF.
    pub fn save_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in self.lines() {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    /// Saves to `path` through `storage` and clears the modified flag.
    /// On failure the flag is left as it was.
    pub fn save<S: Storage>(&mut self, storage: &S, path: &Path) -> Result<(), StorageError> {
        let writer = storage.open_for_write(path)?;
        self.save_to(writer)
            .map_err(|e| StorageError::from_io(path, e))?;

        self.mark_saved();
        info!(path = %path.display(), lines = self.line_count(), "saved");
        Ok(())
    }

    /// The saved form of the document.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.save_to(&mut out);
        out
    }
}

/// Reads one LF-terminated line, storing at most `keep` bytes of it in
/// `line` and consuming the rest. Returns false at end of input.
fn read_line_capped<R: BufRead>(reader: &mut R, keep: usize, line: &mut Vec<u8>) -> io::Result<bool> {
    line.clear();
    let mut read_any = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(end) => (&available[..=end], true),
            None => (available, false),
        };
        let room = keep.saturating_sub(line.len());
        line.extend_from_slice(&chunk[..chunk.len().min(room)]);

        let used = chunk.len();
        reader.consume(used);
        if done {
            return Ok(true);
        }
    }
}

fn strip_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
