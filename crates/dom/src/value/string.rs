//! String storage for [`Value::String`](super::Value::String).

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A DOM string, either shared (reference counted) or a borrowed
/// `'static` view that is never copied.
#[derive(Clone)]
pub enum DomString {
    Shared(Arc<str>),
    Static(&'static str),
}

impl DomString {
    pub fn as_str(&self) -> &str {
        match self {
            DomString::Shared(s) => s,
            DomString::Static(s) => s,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, DomString::Static(_))
    }

    /// True when both strings use the same shared allocation.
    pub fn ptr_eq(&self, other: &DomString) -> bool {
        match (self, other) {
            (DomString::Shared(a), DomString::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// An owned copy that shares nothing with `self`.
    pub(crate) fn detached(&self) -> DomString {
        match self {
            DomString::Shared(s) => DomString::Shared(Arc::from(&**s)),
            DomString::Static(s) => DomString::Static(s),
        }
    }
}

impl Deref for DomString {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for DomString {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_str() == other.as_str()
    }
}

impl From<&str> for DomString {
    fn from(s: &str) -> Self {
        DomString::Shared(Arc::from(s))
    }
}

impl From<String> for DomString {
    fn from(s: String) -> Self {
        DomString::Shared(Arc::from(s))
    }
}

impl From<Arc<str>> for DomString {
    fn from(s: Arc<str>) -> Self {
        DomString::Shared(s)
    }
}

impl fmt::Debug for DomString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for DomString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
