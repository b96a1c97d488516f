//! Query path normalization
//!
//! Entry names are stored exactly as they appear in the tar headers, without
//! a leading separator. Paths handed to [`TarFs::open`](crate::TarFs::open)
//! are cleaned lexically before lookup so that `/foo/./bar.txt`,
//! `foo//bar.txt` and `foo/bar.txt` all resolve to the same entry.

/// Separator used by tar entry names
pub const SEPARATOR: char = '/';

/// Name reported for the archive root
pub const ROOT: &str = "/";

/// Result of normalizing a query path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Synthetic directory, always ends with [`SEPARATOR`]
    Directory(String),
    /// Entry table key
    File(String),
}

impl Lookup {
    pub fn as_str(&self) -> &str {
        match self {
            Lookup::Directory(path) | Lookup::File(path) => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Lookup::Directory(_))
    }
}

/// Clean a query path and decide whether it names a directory
///
/// # Rules
/// - Empty and `.` components are dropped, repeated separators collapse
/// - `..` removes the previous component; at the root it is dropped
/// - The leading separator is stripped
/// - A trailing separator makes the lookup a directory
/// - An empty result is the root directory `/`
///
/// # Examples
///
/// ```
/// use tarfs_rs::path::{normalize, Lookup};
///
/// assert_eq!(normalize("/foo/./bar.txt"), Lookup::File("foo/bar.txt".into()));
/// assert_eq!(normalize("assets//css/"), Lookup::Directory("assets/css/".into()));
/// assert_eq!(normalize("/../etc/passwd"), Lookup::File("etc/passwd".into()));
/// assert_eq!(normalize("/"), Lookup::Directory("/".into()));
/// ```
pub fn normalize(path: &str) -> Lookup {
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split(SEPARATOR) {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }

    if parts.is_empty() {
        return Lookup::Directory(ROOT.to_string());
    }

    let cleaned = parts.join("/");
    if path.ends_with(SEPARATOR) {
        Lookup::Directory(cleaned + "/")
    } else {
        Lookup::File(cleaned)
    }
}

/// Final path component, ignoring a trailing separator
///
/// The root keeps its own name.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return if path.is_empty() { "" } else { ROOT };
    }
    match trimmed.rfind(SEPARATOR) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
