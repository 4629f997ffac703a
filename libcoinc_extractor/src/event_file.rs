use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::constants::EVENT_RECORD_BYTES;
use super::error::EventFileError;

/// EventFile streams a list-mode event file in record-aligned chunks.
///
/// The requested chunk size is rounded down to a whole number of event
/// records, so a record is never split across two chunks. Reads are
/// sequential; the file is consumed front to back exactly once. Memory use
/// is bounded by the chunk size no matter how large the file is.
#[derive(Debug)]
pub struct EventFile {
    handle: File,
    chunk_bytes: usize,
    size_bytes: u64,
    bytes_read: u64,
}

impl EventFile {
    /// Open an event file for chunked reading
    pub fn open(path: &Path, chunk_bytes: usize) -> Result<Self, EventFileError> {
        if !path.exists() {
            return Err(EventFileError::BadFilePath(path.to_path_buf()));
        }
        if chunk_bytes < EVENT_RECORD_BYTES {
            return Err(EventFileError::ChunkTooSmall(chunk_bytes));
        }
        let handle = File::open(path)?;
        let size_bytes = handle.metadata()?.len();
        Ok(EventFile {
            handle,
            chunk_bytes: chunk_bytes - (chunk_bytes % EVENT_RECORD_BYTES),
            size_bytes,
            bytes_read: 0,
        })
    }

    /// Read the next chunk of the file.
    ///
    /// Returns a `Result<Option<Vec<u8>>>`. The Option is None once the file
    /// is exhausted. Every returned chunk is an exact multiple of the event
    /// record size; a trailing partial record at end-of-file is an error, not
    /// a short chunk.
    pub fn get_next_chunk(&mut self) -> Result<Option<Vec<u8>>, EventFileError> {
        let mut buffer = vec![0u8; self.chunk_bytes];
        let mut filled: usize = 0;
        loop {
            let count = self.handle.read(&mut buffer[filled..])?;
            if count == 0 {
                break;
            }
            filled += count;
            if filled == buffer.len() {
                break;
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled % EVENT_RECORD_BYTES != 0 {
            return Err(EventFileError::TrailingBytes(filled % EVENT_RECORD_BYTES));
        }

        buffer.truncate(filled);
        self.bytes_read += filled as u64;
        Ok(Some(buffer))
    }

    /// Total size of the file in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Bytes handed out so far, for progress reporting
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// The record-aligned chunk size actually in use
    pub fn chunk_bytes(&self) -> usize {
        self.chunk_bytes
    }
}
