//! Readable handle over an indexed payload

use super::{seek_target, FileInfo, VirtualFile};
use crate::error::{Result, TarFsError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use tracing::trace;

/// Open regular file
///
/// Shares the archive buffer; cloning a handle copies only the cursor.
#[derive(Debug, Clone)]
pub struct AssetFile {
    path: String,
    content: Bytes,
    pos: u64,
    mod_time: DateTime<Utc>,
}

impl AssetFile {
    pub fn new(path: impl Into<String>, content: Bytes, mod_time: DateTime<Utc>) -> Self {
        AssetFile {
            path: path.into(),
            content,
            pos: 0,
            mod_time,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whole payload, independent of the cursor
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    fn remaining(&self) -> &[u8] {
        // pos never exceeds len; seek rejects targets past the end
        &self.content[self.pos as usize..]
    }
}

impl VirtualFile for AssetFile {
    fn stat(&self) -> FileInfo {
        FileInfo::new(&self.path, self.len(), false, self.mod_time)
    }

    fn readdir(&mut self, _count: isize) -> Result<Vec<FileInfo>> {
        Err(TarFsError::NotADirectory(self.path.clone()))
    }

    fn close(&mut self) -> Result<()> {
        trace!("Closing {}", self.path);
        Ok(())
    }
}

impl Read for AssetFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl BufRead for AssetFile {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.remaining())
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt as u64).min(self.len());
    }
}

impl Seek for AssetFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.pos = seek_target(&self.path, pos, self.pos, self.len())?;
        Ok(self.pos)
    }
}
