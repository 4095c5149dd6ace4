//! Path addressing for DOM value trees.
//!
//! A [`Path`] is an ordered list of [`PathEntry`] steps: object keys, array
//! indices, or the end-of-array sentinel. Paths have a pointer string form
//! with RFC 6901 escaping (`~0` for `~`, `~1` for `/`). Keys that would read
//! back as an index or `-` are written with a leading `~2`.
//!
//! # Example
//!
//! ```
//! use dom_path::{Path, PathEntry};
//!
//! let path = Path::parse("/entities/3/components/-").unwrap();
//! assert_eq!(path[1], PathEntry::Index(3));
//! assert_eq!(path.last(), Some(&PathEntry::EndOfArray));
//! assert_eq!(path.to_string(), "/entities/3/components/-");
//! ```

use thiserror::Error;

pub mod name;
pub mod path;
pub mod types;
pub mod validate;

pub use name::Name;
pub use path::Path;
pub use types::{PathEntry, KEY_MARKER};
pub use validate::{is_valid_index, validate_pointer};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path must be empty or start with '/': {0:?}")]
    MissingLeadingSlash(String),
    #[error("invalid escape sequence in path component {0:?}")]
    InvalidEscape(String),
    #[error("root path has no parent")]
    NoParent,
}

/// Unescapes a pointer path component.
///
/// `~1` becomes `/` and `~0` becomes `~`. Any other use of `~` is an error.
///
/// # Example
///
/// ```
/// use dom_path::unescape_component;
///
/// assert_eq!(unescape_component("a~0b").unwrap(), "a~b");
/// assert_eq!(unescape_component("c~1d").unwrap(), "c/d");
/// assert!(unescape_component("e~f").is_err());
/// ```
pub fn unescape_component(component: &str) -> Result<String, PathError> {
    if !component.contains('~') {
        return Ok(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(PathError::InvalidEscape(component.to_string())),
        }
    }
    Ok(out)
}

/// Escapes a pointer path component.
///
/// `~` is replaced with `~0` and `/` with `~1`.
///
/// # Example
///
/// ```
/// use dom_path::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// assert_eq!(escape_component("no-escapes"), "no-escapes");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}
