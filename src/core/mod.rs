//! Core implementation: archive indexing and the virtual file layer

pub mod config;
pub mod error;
pub mod index;
pub mod path;
pub mod vfs;
