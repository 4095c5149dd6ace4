//! Ordered sequence of path entries.

use std::fmt;
use std::ops::{Div, DivAssign, Index, IndexMut};
use std::str::FromStr;

use crate::name::Name;
use crate::types::PathEntry;
use crate::validate::validate_pointer;
use crate::PathError;

/// A location inside a DOM value tree.
///
/// A path is plain data: it carries no reference to the tree it is used
/// against and is only meaningful relative to some root value.
///
/// # Example
///
/// ```
/// use dom_path::{Path, PathEntry};
///
/// let path = Path::new() / "items" / 0usize / PathEntry::EndOfArray;
/// assert_eq!(path.to_string(), "/items/0/-");
/// assert_eq!(Path::parse("/items/0/-").unwrap(), path);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    entries: Vec<PathEntry>,
}

impl Path {
    /// The root path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<PathEntry>) -> Self {
        Self { entries }
    }

    /// Parse the pointer string form (`""`, `"/a/0/-"`, ...).
    pub fn parse(pointer: &str) -> Result<Self, PathError> {
        validate_pointer(pointer)?;
        if pointer.is_empty() {
            return Ok(Self::new());
        }
        pointer[1..]
            .split('/')
            .map(PathEntry::parse_component)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_entries)
    }

    pub fn push(&mut self, entry: impl Into<PathEntry>) {
        self.entries.push(entry.into());
    }

    pub fn pop(&mut self) -> Option<PathEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&PathEntry> {
        self.entries.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut PathEntry> {
        self.entries.last_mut()
    }

    /// Returns the path without its last entry.
    ///
    /// # Errors
    ///
    /// [`PathError::NoParent`] for the root path.
    pub fn parent(&self) -> Result<Path, PathError> {
        if self.entries.is_empty() {
            return Err(PathError::NoParent);
        }
        Ok(Self::from_entries(self.entries[..self.entries.len() - 1].to_vec()))
    }

    /// A copy of this path with `entry` appended.
    pub fn child(&self, entry: impl Into<PathEntry>) -> Path {
        let mut path = self.clone();
        path.push(entry);
        path
    }

    /// True if `self` is equal to `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.entries.len() >= self.entries.len()
            && other.entries[..self.entries.len()] == self.entries[..]
    }

    /// True if `self` is a strict ancestor of `other`.
    pub fn is_strict_prefix_of(&self, other: &Path) -> bool {
        self.entries.len() < other.entries.len() && self.is_prefix_of(other)
    }

    pub fn append(&mut self, other: &Path) {
        self.entries.extend(other.entries.iter().cloned());
    }
}

impl Index<usize> for Path {
    type Output = PathEntry;

    fn index(&self, index: usize) -> &PathEntry {
        &self.entries[index]
    }
}

impl IndexMut<usize> for Path {
    fn index_mut(&mut self, index: usize) -> &mut PathEntry {
        &mut self.entries[index]
    }
}

macro_rules! impl_div_entry {
    ($($ty:ty),*) => {$(
        impl Div<$ty> for Path {
            type Output = Path;

            fn div(mut self, rhs: $ty) -> Path {
                self.push(rhs);
                self
            }
        }

        impl Div<$ty> for &Path {
            type Output = Path;

            fn div(self, rhs: $ty) -> Path {
                self.child(rhs)
            }
        }

        impl DivAssign<$ty> for Path {
            fn div_assign(&mut self, rhs: $ty) {
                self.push(rhs);
            }
        }
    )*};
}

impl_div_entry!(PathEntry, usize, &str, String, Name, &Name);

impl Div<&Path> for Path {
    type Output = Path;

    fn div(mut self, rhs: &Path) -> Path {
        self.append(rhs);
        self
    }
}

impl Div<&Path> for &Path {
    type Output = Path;

    fn div(self, rhs: &Path) -> Path {
        self.clone() / rhs
    }
}

impl DivAssign<&Path> for Path {
    fn div_assign(&mut self, rhs: &Path) {
        self.append(rhs);
    }
}

impl From<Vec<PathEntry>> for Path {
    fn from(entries: Vec<PathEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl FromIterator<PathEntry> for Path {
    fn from_iter<I: IntoIterator<Item = PathEntry>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl Extend<PathEntry> for Path {
    fn extend<I: IntoIterator<Item = PathEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for Path {
    type Item = PathEntry;
    type IntoIter = std::vec::IntoIter<PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathEntry;
    type IntoIter = std::slice::Iter<'a, PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "/{entry}")?;
        }
        Ok(())
    }
}
