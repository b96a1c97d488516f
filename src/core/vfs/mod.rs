//! Virtual file layer
//!
//! Handles returned by [`TarFs::open`](crate::TarFs::open). Files and
//! directories share one capability set, [`VirtualFile`], and are unified by
//! the [`Handle`] enum:
//!
//! - [`AssetFile`] reads and seeks over an indexed payload
//! - [`AssetDirectory`] is synthetic and lists no children
//!
//! Directories are never discovered from the archive: a path ending in a
//! separator always opens an empty directory, whether or not entries share
//! its prefix.

mod dir;
mod file;


pub use dir::AssetDirectory;
pub use file::AssetFile;

use crate::error::{Result, TarFsError};
use crate::path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Read, Seek, SeekFrom};

/// Permission bits reported for every entry
pub const DEFAULT_MODE: u32 = 0o644;

/// Directory bit, as in POSIX `S_IFDIR`
pub const MODE_DIR: u32 = 0o040000;

/// Stat record for a file or directory handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    name: String,
    mode: u32,
    mod_time: DateTime<Utc>,
    size: u64,
    is_dir: bool,
}

impl FileInfo {
    pub(crate) fn new(path: &str, size: u64, is_dir: bool, mod_time: DateTime<Utc>) -> Self {
        let mode = if is_dir {
            DEFAULT_MODE | MODE_DIR
        } else {
            DEFAULT_MODE
        };
        FileInfo {
            name: path::base_name(path).to_string(),
            mode,
            mod_time,
            size,
            is_dir,
        }
    }

    /// Base name of the path
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn mod_time(&self) -> DateTime<Utc> {
        self.mod_time
    }

    /// Size in bytes, 0 for directories
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// File abstraction consumed by static file servers
///
/// All operations are in-memory and complete synchronously.
pub trait VirtualFile: Read + Seek {
    /// Metadata snapshot; never fails
    fn stat(&self) -> FileInfo;

    /// Read up to `count` directory entries
    ///
    /// `count <= 0` returns everything not yet read. Once the listing is
    /// exhausted an empty vector is returned rather than an error.
    fn readdir(&mut self, count: isize) -> Result<Vec<FileInfo>>;

    /// Release the handle. Nothing is held open, so this always succeeds.
    fn close(&mut self) -> Result<()>;
}

/// An open file or synthetic directory
#[derive(Debug, Clone)]
pub enum Handle {
    File(AssetFile),
    Directory(AssetDirectory),
}

impl Handle {
    pub fn path(&self) -> &str {
        match self {
            Handle::File(f) => f.path(),
            Handle::Directory(d) => d.path(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Directory(_))
    }

    pub fn as_file(&self) -> Option<&AssetFile> {
        match self {
            Handle::File(f) => Some(f),
            Handle::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&AssetDirectory> {
        match self {
            Handle::File(_) => None,
            Handle::Directory(d) => Some(d),
        }
    }
}

impl VirtualFile for Handle {
    fn stat(&self) -> FileInfo {
        match self {
            Handle::File(f) => f.stat(),
            Handle::Directory(d) => d.stat(),
        }
    }

    fn readdir(&mut self, count: isize) -> Result<Vec<FileInfo>> {
        match self {
            Handle::File(f) => f.readdir(count),
            Handle::Directory(d) => d.readdir(count),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self {
            Handle::File(f) => f.close(),
            Handle::Directory(d) => d.close(),
        }
    }
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Handle::File(f) => f.read(buf),
            Handle::Directory(d) => d.read(buf),
        }
    }
}

impl Seek for Handle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Handle::File(f) => f.seek(pos),
            Handle::Directory(d) => d.seek(pos),
        }
    }
}

impl BufRead for Handle {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Handle::File(f) => f.fill_buf(),
            Handle::Directory(d) => d.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Handle::File(f) => f.consume(amt),
            Handle::Directory(d) => d.consume(amt),
        }
    }
}

/// Resolve a seek against a view of `len` bytes
///
/// Valid targets are `0..=len`.
pub(crate) fn seek_target(path: &str, pos: SeekFrom, current: u64, len: u64) -> Result<u64> {
    let target = match pos {
        SeekFrom::Start(n) => i128::from(n),
        SeekFrom::Current(delta) => i128::from(current) + i128::from(delta),
        SeekFrom::End(delta) => i128::from(len) + i128::from(delta),
    };

    if target < 0 || target > i128::from(len) {
        return Err(TarFsError::InvalidOffset {
            path: path.to_string(),
            offset: target,
            len,
        });
    }
    Ok(target as u64)
}
