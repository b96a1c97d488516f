use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarFsError {
    /// The tar decoder rejected the header at `offset`, or the entry's
    /// payload runs past the end of the buffer.
    #[error("Unable to read tar header at offset {offset}: {source}")]
    MalformedHeader {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("File {0} not found")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid seek offset {offset} for {path} (valid range 0..={len})")]
    InvalidOffset { path: String, offset: i128, len: u64 },

    #[error("Invalid options: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unable to serialize options: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl TarFsError {
    pub(crate) fn malformed(offset: u64, source: io::Error) -> Self {
        TarFsError::MalformedHeader { offset, source }
    }
}

/// Lets handle errors flow through `std::io::Read`/`Seek` while keeping the
/// original variant reachable via `io::Error::get_ref`.
impl From<TarFsError> for io::Error {
    fn from(err: TarFsError) -> Self {
        let kind = match &err {
            TarFsError::NotFound(_) => io::ErrorKind::NotFound,
            TarFsError::InvalidOffset { .. } => io::ErrorKind::InvalidInput,
            TarFsError::MalformedHeader { .. }
            | TarFsError::Config(_)
            | TarFsError::Serialize(_) => io::ErrorKind::InvalidData,
            TarFsError::NotADirectory(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

pub type Result<T> = std::result::Result<T, TarFsError>;
