//! Synthetic directory handle

use super::{seek_target, FileInfo, VirtualFile};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::io::{self, BufRead, Read, Seek, SeekFrom};
use tracing::trace;

/// Open directory
///
/// Directories produced by [`TarFs::open`](crate::TarFs::open) carry no
/// children. The archive is not scanned for entries under the prefix.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    path: String,
    mod_time: DateTime<Utc>,
    children: Vec<FileInfo>,
    children_read: usize,
}

impl AssetDirectory {
    pub fn new(path: impl Into<String>, mod_time: DateTime<Utc>) -> Self {
        Self::with_children(path, mod_time, Vec::new())
    }

    /// Directory that lists `children` in order
    ///
    /// [`TarFs`](crate::TarFs) never calls this; its directories are always
    /// empty. It is the constructor for external [`FileSystem`](crate::FileSystem)
    /// implementors that synthesize listings of their own and want the same
    /// paginated `readdir`.
    pub fn with_children(
        path: impl Into<String>,
        mod_time: DateTime<Utc>,
        children: Vec<FileInfo>,
    ) -> Self {
        AssetDirectory {
            path: path.into(),
            mod_time,
            children,
            children_read: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of children already returned by `readdir`
    pub fn children_read(&self) -> usize {
        self.children_read
    }
}

impl VirtualFile for AssetDirectory {
    fn stat(&self) -> FileInfo {
        FileInfo::new(&self.path, 0, true, self.mod_time)
    }

    fn readdir(&mut self, count: isize) -> Result<Vec<FileInfo>> {
        let unread = self.children.len() - self.children_read;
        let take = if count <= 0 {
            unread
        } else {
            unread.min(count as usize)
        };

        let start = self.children_read;
        self.children_read += take;
        trace!("Listed {} of {} children in {}", take, self.children.len(), self.path);
        Ok(self.children[start..start + take].to_vec())
    }

    fn close(&mut self) -> Result<()> {
        trace!("Closing {}", self.path);
        Ok(())
    }
}

/// Directories have no content: reads hit end of file immediately.
impl Read for AssetDirectory {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl BufRead for AssetDirectory {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&[])
    }

    fn consume(&mut self, _amt: usize) {}
}

impl Seek for AssetDirectory {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(seek_target(&self.path, pos, 0, 0)?)
    }
}
