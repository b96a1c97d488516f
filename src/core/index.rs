//! Archive indexer
//!
//! Walks the tar headers of an in-memory archive and records, for every
//! regular file, a slice of the original buffer holding its payload. Payload
//! bytes are never copied: each value in the [`EntryTable`] is a
//! reference-counted [`Bytes`] view into the buffer the table owns.
//!
//! ```text
//! offset ──► ┌──────────────┐
//!            │ header (512) │  decoded by the tar crate
//!            ├──────────────┤ ◄── start = offset + raw_file_position
//!            │ payload      │
//!            │ (size bytes) │
//!            ├──────────────┤ ◄── end = start + size
//!            │ padding      │
//! next   ──► └──────────────┘     align_up(end, 512)
//! ```

use crate::config::TarFsOptions;
use crate::error::{Result, TarFsError};
use ahash::AHashMap;
use bytes::Bytes;
use std::io::{self, Cursor};
use tar::{Archive, EntryType};
use tracing::{debug, info, trace, warn};

/// Tar block size; every header and payload is padded to a multiple of it
pub const BLOCK_SIZE: u64 = 512;

/// Round `offset` up to the next block boundary
#[inline]
pub fn align_up(offset: u64) -> u64 {
    offset.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Path → payload mapping built once from an archive
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    data: Bytes,
    entries: AHashMap<String, Bytes>,
}

impl EntryTable {
    /// Index `data` with default options
    pub fn build(data: impl Into<Bytes>) -> Result<Self> {
        Self::build_with(data, &TarFsOptions::default())
    }

    /// Index `data`
    ///
    /// # Errors
    ///
    /// Returns `MalformedHeader` when the tar decoder rejects a header or an
    /// entry's declared size runs past the end of `data`. No partial table is
    /// returned.
    pub fn build_with(data: impl Into<Bytes>, options: &TarFsOptions) -> Result<Self> {
        let data = data.into();
        let total = data.len() as u64;
        let mut entries = AHashMap::new();
        let mut offset = 0u64;

        while offset < total {
            let remaining = &data[offset as usize..];
            let mut archive = Archive::new(Cursor::new(remaining));
            archive.set_ignore_zeros(options.ignore_zeros);

            let mut iter = archive
                .entries_with_seek()
                .map_err(|e| TarFsError::malformed(offset, e))?;

            let entry = match iter.next() {
                None => {
                    trace!("End of archive at offset {}", offset);
                    break;
                }
                Some(Err(e)) => return Err(TarFsError::malformed(offset, e)),
                Some(Ok(entry)) => entry,
            };

            let entry_type = entry.header().entry_type();
            let content = is_content(entry_type);

            // Sparse entries report their expanded size; only the stored
            // bytes follow the header.
            let start = offset + entry.raw_file_position();
            let size = if content {
                entry.size()
            } else {
                entry
                    .header()
                    .entry_size()
                    .map_err(|e| TarFsError::malformed(offset, e))?
            };
            let end = start
                .checked_add(size)
                .filter(|&end| end <= total)
                .ok_or_else(|| {
                    TarFsError::malformed(
                        offset,
                        io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("entry payload of {size} bytes extends past end of archive"),
                        ),
                    )
                })?;

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();

            if content {
                trace!("Indexed {} ({} bytes at {})", name, size, start);
                let view = data.slice(start as usize..end as usize);
                if entries.insert(name.clone(), view).is_some() {
                    warn!("Duplicate archive entry {}, keeping the later one", name);
                }
            } else {
                trace!("Skipping {:?} entry {}", entry_type, name);
            }

            offset = align_up(end);
        }

        info!("Indexed {} entries from {} byte archive", entries.len(), total);
        Ok(EntryTable { data, entries })
    }

    /// Payload for an exact entry name
    pub fn get(&self, name: &str) -> Option<&Bytes> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in unspecified order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bytes)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The archive buffer every view points into
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

fn is_content(entry_type: EntryType) -> bool {
    let content = entry_type.is_file() || entry_type.is_contiguous();
    if !content && entry_type.is_gnu_sparse() {
        debug!("GNU sparse entries are not supported, skipping");
    }
    content
}
