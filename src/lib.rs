//! # tarfs - Read-only Filesystem over an In-Memory Tar Archive
//!
//! `tarfs-rs` turns a single tar archive held in memory into a virtual
//! filesystem that static file servers can read from:
//!
//! - **Zero-copy indexing**: payloads are sliced straight out of the archive
//!   buffer, never copied
//! - **Open by path** with lexical path cleaning
//! - **Read, seek, stat and readdir** through the [`VirtualFile`] trait
//! - **Synthetic directories**: any path ending in `/` opens an empty directory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::io::Read;
//! use tarfs_rs::{TarFs, VirtualFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let archive: Vec<u8> = Vec::new();
//! // Index the archive once
//! let fs = TarFs::new(archive)?;
//!
//! // Open and read a file
//! let mut file = fs.open("/css/site.css")?;
//! let mut css = String::new();
//! file.read_to_string(&mut css)?;
//! println!("{} bytes", file.stat().size());
//!
//! // Raw payload access, no handle
//! let logo = fs.get("img/logo.png");
//! # Ok(())
//! # }
//! ```
//!
//! ## Embedding
//!
//! ```rust,ignore
//! use bytes::Bytes;
//! use tarfs_rs::TarFs;
//!
//! static ASSETS: &[u8] = include_bytes!("../assets.tar");
//!
//! // No copy of the archive is made: every file is a view into ASSETS.
//! let fs = TarFs::new(Bytes::from_static(ASSETS))?;
//! ```
//!
//! ## Directories
//!
//! Directories are never enumerated from the archive. Opening a path that
//! ends in `/` always succeeds and yields a directory that lists no
//! children, even when the archive holds entries under that prefix.

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{config, error, index, vfs};

pub use crate::core::{
    config::TarFsOptions,
    error::{Result, TarFsError},
    index::{EntryTable, BLOCK_SIZE},
    path,
    vfs::{AssetDirectory, AssetFile, FileInfo, Handle, VirtualFile, DEFAULT_MODE, MODE_DIR},
};

use crate::core::path::Lookup;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Read-only filesystem backed by a tar archive
///
/// Built once; every query afterwards is an in-memory lookup. `TarFs` is
/// `Send + Sync` and can be shared behind an `Arc`. Handles keep the archive
/// buffer alive on their own, so they may outlive the filesystem.
///
/// # Examples
///
/// ```rust,no_run
/// use tarfs_rs::{Result, TarFs};
///
/// # fn main() -> Result<()> {
/// # let archive: Vec<u8> = Vec::new();
/// let fs = TarFs::new(archive)?;
/// let index = fs.open("index.html")?;
/// let assets = fs.open("assets/")?;
/// assert!(assets.is_dir());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TarFs {
    entries: EntryTable,
    mod_time: DateTime<Utc>,
}

impl TarFs {
    /// Index an archive with default options
    ///
    /// Every handle reports the construction instant as its modification
    /// time. Use [`TarFs::builder`] to pin it.
    pub fn new(data: impl Into<Bytes>) -> Result<Self> {
        TarFsBuilder::new().build(data)
    }

    pub fn builder() -> TarFsBuilder {
        TarFsBuilder::new()
    }

    /// Open a file or synthetic directory
    ///
    /// The path is cleaned first (see [`path::normalize`]). Paths ending in
    /// `/` open an empty directory without consulting the archive; any other
    /// path must name an indexed entry.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry matches the cleaned path.
    pub fn open<P: AsRef<str>>(&self, path: P) -> Result<Handle> {
        let path = path.as_ref();
        debug!("Opening {}", path);

        match path::normalize(path) {
            Lookup::Directory(dir) => {
                debug!("Returning directory for {}", dir);
                Ok(Handle::Directory(AssetDirectory::new(dir, self.mod_time)))
            }
            Lookup::File(name) => match self.entries.get(&name) {
                Some(content) => {
                    debug!("Found {} ({} bytes)", name, content.len());
                    Ok(Handle::File(AssetFile::new(
                        name,
                        content.clone(),
                        self.mod_time,
                    )))
                }
                None => {
                    debug!("{} not found", name);
                    Err(TarFsError::NotFound(name))
                }
            },
        }
    }

    /// Raw payload for an exact entry name
    ///
    /// No path cleaning is applied: `name` must match the tar header.
    pub fn get(&self, name: &str) -> Option<Bytes> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed entry names in unspecified order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.paths()
    }

    /// Modification time reported by every handle
    pub fn mod_time(&self) -> DateTime<Utc> {
        self.mod_time
    }

    pub fn entries(&self) -> &EntryTable {
        &self.entries
    }
}

/// Builder for [`TarFs`]
///
/// # Examples
///
/// ```rust,no_run
/// use chrono::{TimeZone, Utc};
/// use tarfs_rs::{Result, TarFsBuilder};
///
/// # fn main() -> Result<()> {
/// # let archive: Vec<u8> = Vec::new();
/// let fs = TarFsBuilder::new()
///     .mod_time(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
///     .ignore_zeros()
///     .build(archive)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TarFsBuilder {
    options: TarFsOptions,
}

impl TarFsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from options loaded elsewhere, e.g. [`TarFsOptions::from_toml`]
    pub fn options(mut self, options: TarFsOptions) -> Self {
        self.options = options;
        self
    }

    /// Fix the modification time reported by every handle
    pub fn mod_time(mut self, mod_time: DateTime<Utc>) -> Self {
        self.options.mod_time = Some(mod_time);
        self
    }

    /// Keep reading past zero blocks (concatenated archives)
    pub fn ignore_zeros(mut self) -> Self {
        self.options.ignore_zeros = true;
        self
    }

    /// Index `data` and build the filesystem
    ///
    /// # Errors
    ///
    /// `MalformedHeader` when the archive cannot be decoded.
    pub fn build(self, data: impl Into<Bytes>) -> Result<TarFs> {
        let entries = EntryTable::build_with(data, &self.options)?;
        let mod_time = self.options.mod_time.unwrap_or_else(Utc::now);
        info!(
            "Built tar filesystem with {} files ({} byte archive)",
            entries.len(),
            entries.data().len()
        );
        Ok(TarFs { entries, mod_time })
    }
}

/// Filesystem interface consumed by static file servers
///
/// Implementations map a request path to a [`VirtualFile`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::io;
/// use tarfs_rs::{FileSystem, TarFs, VirtualFile};
///
/// fn serve<F: FileSystem>(fs: &F, path: &str, out: &mut impl io::Write) -> io::Result<u64> {
///     let mut file = fs.open(path)?;
///     if file.stat().is_dir() {
///         return Ok(0);
///     }
///     io::copy(&mut file, out)
/// }
///
/// # let archive: Vec<u8> = Vec::new();
/// let fs = TarFs::new(archive)?;
/// serve(&fs, "/index.html", &mut io::stdout())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait FileSystem {
    type File: VirtualFile;

    /// Open a file or directory by path
    fn open(&self, path: &str) -> Result<Self::File>;
}

impl FileSystem for TarFs {
    type File = Handle;

    fn open(&self, path: &str) -> Result<Handle> {
        self.open(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::{Read, Seek, SeekFrom};
    use tar::{Builder, Header};

    fn archive(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = Builder::new(Vec::new());
        for (path, data) in files {
            let mut header = Header::new_ustar();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn site() -> TarFs {
        TarFs::builder()
            .mod_time(Utc.with_ymd_and_hms(2023, 3, 4, 5, 6, 7).unwrap())
            .build(archive(&[
                ("index.html", b"<h1>hi</h1>"),
                ("foo/bar.txt", b"bar contents"),
                ("assets/app.js", b"main()"),
            ]))
            .unwrap()
    }

    #[test]
    fn test_open_file() -> Result<()> {
        let fs = site();
        let mut file = fs.open("foo/bar.txt")?;

        assert!(!file.is_dir());
        assert_eq!(file.stat().size(), 12);
        assert_eq!(file.stat().name(), "bar.txt");

        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "bar contents");
        Ok(())
    }

    #[test]
    fn test_open_missing() {
        let fs = site();
        match fs.open("missing.txt") {
            Err(TarFsError::NotFound(path)) => assert_eq!(path, "missing.txt"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_separator() -> Result<()> {
        let fs = site();
        let a = fs.open("/foo/bar.txt")?;
        let b = fs.open("foo/bar.txt")?;
        assert_eq!(a.path(), b.path());
        assert_eq!(a.stat(), b.stat());
        Ok(())
    }

    #[test]
    fn test_directory_is_synthetic() -> Result<()> {
        let fs = site();

        // Has entries under the prefix, still lists nothing.
        let mut assets = fs.open("assets/")?;
        assert!(assets.is_dir());
        assert!(assets.readdir(0)?.is_empty());
        assert!(assets.readdir(-1)?.is_empty());

        // No entries under the prefix at all.
        let mut nowhere = fs.open("/does/not/exist/")?;
        assert!(nowhere.stat().is_dir());
        assert!(nowhere.readdir(5)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_directory_without_separator_is_lookup() {
        let fs = site();
        assert!(matches!(fs.open("assets"), Err(TarFsError::NotFound(_))));
    }

    #[test]
    fn test_root() -> Result<()> {
        let fs = site();
        let root = fs.open("/")?;
        assert!(root.is_dir());
        assert_eq!(root.path(), "/");
        Ok(())
    }

    #[test]
    fn test_injected_mod_time() -> Result<()> {
        let fs = site();
        let expected = Utc.with_ymd_and_hms(2023, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(fs.mod_time(), expected);
        assert_eq!(fs.open("index.html")?.stat().mod_time(), expected);
        assert_eq!(fs.open("assets/")?.stat().mod_time(), expected);
        Ok(())
    }

    #[test]
    fn test_default_mod_time_is_build_time() {
        let before = Utc::now();
        let fs = TarFs::new(archive(&[("a", b"a")])).unwrap();
        let after = Utc::now();
        assert!(fs.mod_time() >= before && fs.mod_time() <= after);
    }

    #[test]
    fn test_get_is_exact() {
        let fs = site();
        assert_eq!(fs.get("foo/bar.txt").unwrap().as_ref(), b"bar contents");
        assert!(fs.get("/foo/bar.txt").is_none());
        assert!(fs.get("nope").is_none());
    }

    #[test]
    fn test_queries() {
        let fs = site();
        assert_eq!(fs.len(), 3);
        assert!(!fs.is_empty());
        assert!(fs.contains("index.html"));

        let mut paths: Vec<&str> = fs.paths().collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["assets/app.js", "foo/bar.txt", "index.html"]);
    }

    #[test]
    fn test_handle_outlives_fs() {
        let mut file = {
            let fs = site();
            fs.open("index.html").unwrap()
        };
        let mut out = Vec::new();
        file.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"<h1>hi</h1>");
    }

    #[test]
    fn test_handles_have_independent_cursors() {
        let fs = site();
        let mut a = fs.open("index.html").unwrap();
        let mut b = fs.open("index.html").unwrap();

        a.seek(SeekFrom::End(-5)).unwrap();
        let mut tail = String::new();
        a.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "</h1>");

        let mut whole = String::new();
        b.read_to_string(&mut whole).unwrap();
        assert_eq!(whole, "<h1>hi</h1>");
    }

    #[test]
    fn test_builder_from_toml() -> Result<()> {
        let opts = TarFsOptions::from_toml("mod_time = \"2000-01-01T00:00:00Z\"")?;
        let fs = TarFsBuilder::new()
            .options(opts)
            .build(archive(&[("a", b"a")]))?;
        assert_eq!(
            fs.mod_time(),
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_file_system_trait() -> Result<()> {
        fn open_twice<F: FileSystem>(fs: &F, path: &str) -> Result<(FileInfo, FileInfo)> {
            Ok((fs.open(path)?.stat(), fs.open(path)?.stat()))
        }

        let fs = site();
        let (a, b) = open_twice(&fs, "/index.html")?;
        assert_eq!(a, b);
        assert_eq!(a.size(), 11);
        Ok(())
    }

    #[test]
    fn test_shared_across_threads() {
        let fs = std::sync::Arc::new(site());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let fs = std::sync::Arc::clone(&fs);
                std::thread::spawn(move || {
                    let mut out = Vec::new();
                    fs.open("foo/bar.txt").unwrap().read_to_end(&mut out).unwrap();
                    out
                })
            })
            .collect();

        for worker in workers {
            assert_eq!(worker.join().unwrap(), b"bar contents");
        }
    }
}
