//! Path entry type.

use std::fmt;

use crate::name::Name;
use crate::{escape_component, is_valid_index, unescape_component, PathError};

/// Component prefix marking a key that would otherwise read as an index or
/// the end-of-array sentinel.
pub const KEY_MARKER: &str = "~2";

/// One step of a [`Path`](crate::Path).
///
/// Keys address object members and node properties, indices address array
/// elements and node children. `EndOfArray` is the position one past the
/// last element and is only meaningful as an insertion point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathEntry {
    Key(Name),
    Index(usize),
    EndOfArray,
}

impl PathEntry {
    pub fn key(name: impl Into<Name>) -> Self {
        PathEntry::Key(name.into())
    }

    pub fn is_key(&self) -> bool {
        matches!(self, PathEntry::Key(_))
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathEntry::Index(_))
    }

    pub fn is_end_of_array(&self) -> bool {
        matches!(self, PathEntry::EndOfArray)
    }

    pub fn as_key(&self) -> Option<&Name> {
        match self {
            PathEntry::Key(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathEntry::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// The entry as an object member name.
    ///
    /// Indices map to their decimal form and the end-of-array sentinel to
    /// `-`, which is how they read when a path built for an array is
    /// resolved against an object.
    pub fn to_key(&self) -> Name {
        match self {
            PathEntry::Key(name) => name.clone(),
            PathEntry::Index(i) => Name::from(i.to_string()),
            PathEntry::EndOfArray => Name::from("-"),
        }
    }

    /// Parse one escaped pointer component.
    ///
    /// `-` becomes [`PathEntry::EndOfArray`], canonical non-negative
    /// integers become [`PathEntry::Index`], everything else is a key. A
    /// leading [`KEY_MARKER`] forces a key, so `~20` is the key `"0"`.
    pub fn parse_component(component: &str) -> Result<Self, PathError> {
        if let Some(key) = component.strip_prefix(KEY_MARKER) {
            return Ok(PathEntry::Key(Name::from(unescape_component(key)?)));
        }
        if component == "-" {
            return Ok(PathEntry::EndOfArray);
        }
        if is_valid_index(component) {
            if let Ok(index) = component.parse::<usize>() {
                return Ok(PathEntry::Index(index));
            }
        }
        Ok(PathEntry::Key(Name::from(unescape_component(component)?)))
    }
}

impl From<usize> for PathEntry {
    fn from(index: usize) -> Self {
        PathEntry::Index(index)
    }
}

/// String conversions always produce a key; use
/// [`PathEntry::parse_component`] to interpret digits and `-`.
impl From<&str> for PathEntry {
    fn from(key: &str) -> Self {
        PathEntry::Key(Name::from(key))
    }
}

impl From<String> for PathEntry {
    fn from(key: String) -> Self {
        PathEntry::Key(Name::from(key))
    }
}

impl From<Name> for PathEntry {
    fn from(key: Name) -> Self {
        PathEntry::Key(key)
    }
}

impl From<&Name> for PathEntry {
    fn from(key: &Name) -> Self {
        PathEntry::Key(key.clone())
    }
}

fn is_positional(key: &str) -> bool {
    key == "-" || is_valid_index(key)
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathEntry::Key(name) => {
                if is_positional(name) {
                    f.write_str(KEY_MARKER)?;
                }
                f.write_str(&escape_component(name))
            }
            PathEntry::Index(i) => write!(f, "{i}"),
            PathEntry::EndOfArray => f.write_str("-"),
        }
    }
}
