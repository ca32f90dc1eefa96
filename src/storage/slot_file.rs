//! Slot File
//!
//! A data file viewed as an array of fixed-size slots.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::SyncStrategy;
use crate::error::{BibipError, Result};

/// Bounds-checked, offset-addressed access to one data file
///
/// Slot `n` occupies bytes `[n * line_len, (n + 1) * line_len)`. The file
/// is created lazily on the first write.
#[derive(Debug)]
pub struct SlotFile {
    /// Data file path
    path: PathBuf,
    /// Bytes per slot, newline included
    line_len: u64,
    /// Number of slots currently in the file
    slot_count: u64,
    /// fsync policy
    sync_strategy: SyncStrategy,
}

impl SlotFile {
    /// Open a data file; a missing file has zero slots
    pub fn open(path: &Path, line_len: usize, sync_strategy: SyncStrategy) -> Result<Self> {
        let line_len = line_len as u64;
        let file_len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        if file_len % line_len != 0 {
            return Err(BibipError::CorruptStore(format!(
                "{}: length {} is not a multiple of slot size {}",
                path.display(),
                file_len,
                line_len
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            line_len,
            slot_count: file_len / line_len,
            sync_strategy,
        })
    }

    /// Read the raw line stored in `slot`
    pub fn read_slot(&self, slot: u64) -> Result<String> {
        if slot >= self.slot_count {
            return Err(BibipError::MalformedRecord(format!(
                "slot {} out of bounds ({} slots in {})",
                slot,
                self.slot_count,
                self.path.display()
            )));
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(slot * self.line_len))?;

        let mut buf = vec![0u8; self.line_len as usize];
        file.read_exact(&mut buf)?;

        String::from_utf8(buf)
            .map_err(|e| BibipError::MalformedRecord(format!("slot {}: {}", slot, e)))
    }

    /// Overwrite `slot` in place with a line of the same width
    pub fn write_slot(&mut self, slot: u64, line: &str) -> Result<()> {
        self.check_width(line)?;
        if slot >= self.slot_count {
            return Err(BibipError::MalformedRecord(format!(
                "slot {} out of bounds ({} slots in {})",
                slot,
                self.slot_count,
                self.path.display()
            )));
        }

        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        file.seek(SeekFrom::Start(slot * self.line_len))?;
        file.write_all(line.as_bytes())?;
        self.sync(&file)?;

        debug!(path = %self.path.display(), slot, "slot overwritten");
        Ok(())
    }

    /// Append a line at the end of the file, returning its slot
    pub fn append(&mut self, line: &str) -> Result<u64> {
        self.check_width(line)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        self.sync(&file)?;

        let slot = self.slot_count;
        self.slot_count += 1;

        debug!(path = %self.path.display(), slot, "slot appended");
        Ok(slot)
    }

    /// Every line in slot order
    pub fn read_all(&self) -> Result<Vec<String>> {
        if self.slot_count == 0 {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path)?;
        if bytes.len() as u64 != self.slot_count * self.line_len {
            return Err(BibipError::CorruptStore(format!(
                "{}: changed size outside this store",
                self.path.display()
            )));
        }

        bytes
            .chunks(self.line_len as usize)
            .enumerate()
            .map(|(slot, chunk)| {
                String::from_utf8(chunk.to_vec())
                    .map_err(|e| BibipError::MalformedRecord(format!("slot {}: {}", slot, e)))
            })
            .collect()
    }

    /// Replace the whole file; slot numbers become the positions in `lines`
    pub fn rewrite(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.check_width(line)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        for line in lines {
            writer.write_all(line.as_bytes())?;
        }
        writer.flush()?;
        self.sync(writer.get_ref())?;

        self.slot_count = lines.len() as u64;

        debug!(path = %self.path.display(), slots = self.slot_count, "data file rewritten");
        Ok(())
    }

    /// Number of slots in the file
    pub fn slot_count(&self) -> u64 {
        self.slot_count
    }

    /// Data file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_width(&self, line: &str) -> Result<()> {
        if line.len() as u64 != self.line_len {
            return Err(BibipError::MalformedRecord(format!(
                "line is {} bytes, slot size is {}",
                line.len(),
                self.line_len
            )));
        }
        Ok(())
    }

    fn sync(&self, file: &File) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }
}
