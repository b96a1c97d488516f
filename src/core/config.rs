//! Construction options for a [`TarFs`](crate::TarFs)
//!
//! Options can be assembled in code through [`TarFsBuilder`](crate::TarFsBuilder)
//! or loaded from a TOML document:
//!
//! ```toml
//! # RFC 3339, quoted
//! mod_time = "2024-05-01T12:00:00Z"
//! ignore_zeros = false
//! ```

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TarFsOptions {
    /// Modification time reported by every handle. `None` means the instant
    /// the filesystem is built.
    pub mod_time: Option<DateTime<Utc>>,

    /// Skip zero blocks instead of treating them as the end of the archive,
    /// so archives concatenated back to back are indexed in full.
    pub ignore_zeros: bool,
}

impl TarFsOptions {
    /// Parse options from a TOML document
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Serialize options back to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
