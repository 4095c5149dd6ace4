//! Patch operation types and errors.

use std::fmt;
use std::str::FromStr;

use dom_path::{Path, PathError};
use thiserror::Error;

use crate::value::{Type, Value};

// ── Errors ────────────────────────────────────────────────────────────────

/// Why a single operation could not be applied.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("no value at {path:?}")]
    NotFound { path: String },
    #[error("cannot address {path:?} inside a {kind} value")]
    InvalidTarget { path: String, kind: Type },
    #[error("index out of range at {path:?}")]
    IndexOutOfRange { path: String },
    #[error("end-of-array position not allowed at {path:?}")]
    EndOfArrayNotAllowed { path: String },
    #[error("operation cannot target the root")]
    RootNotAllowed,
    #[error("cannot move {from:?} into its own child {path:?}")]
    MoveIntoChild { from: String, path: String },
    #[error("test failed at {path:?}")]
    TestFailed { path: String },
}

impl PatchError {
    pub(crate) fn not_found(path: &Path) -> Self {
        PatchError::NotFound {
            path: path.to_string(),
        }
    }
}

/// Why a DOM representation could not be read back as a patch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchParseError {
    #[error("expected an array, got {0}")]
    NotAnArray(Type),
    #[error("expected an object, got {0}")]
    NotAnObject(Type),
    #[error("missing field {0:?}")]
    MissingField(&'static str),
    #[error("field {field:?} must be {expected}, got {actual}")]
    InvalidFieldType {
        field: &'static str,
        expected: Type,
        actual: Type,
    },
    #[error("unknown operation {0:?}")]
    UnknownOp(String),
    #[error("invalid path in field {field:?}: {source}")]
    InvalidPath {
        field: &'static str,
        #[source]
        source: PathError,
    },
    #[error("operation {index}: {source}")]
    Operation {
        index: usize,
        #[source]
        source: Box<PatchParseError>,
    },
}

// ── Operation type ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOperationType {
    Add,
    Remove,
    Replace,
    Copy,
    Move,
    Test,
}

impl PatchOperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOperationType::Add => "add",
            PatchOperationType::Remove => "remove",
            PatchOperationType::Replace => "replace",
            PatchOperationType::Copy => "copy",
            PatchOperationType::Move => "move",
            PatchOperationType::Test => "test",
        }
    }

    pub fn has_value(&self) -> bool {
        matches!(
            self,
            PatchOperationType::Add | PatchOperationType::Replace | PatchOperationType::Test
        )
    }

    pub fn has_source_path(&self) -> bool {
        matches!(self, PatchOperationType::Copy | PatchOperationType::Move)
    }
}

impl FromStr for PatchOperationType {
    type Err = PatchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(PatchOperationType::Add),
            "remove" => Ok(PatchOperationType::Remove),
            "replace" => Ok(PatchOperationType::Replace),
            "copy" => Ok(PatchOperationType::Copy),
            "move" => Ok(PatchOperationType::Move),
            "test" => Ok(PatchOperationType::Test),
            other => Err(PatchParseError::UnknownOp(other.to_string())),
        }
    }
}

impl fmt::Display for PatchOperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

/// One edit against a DOM tree.
///
/// `path` is always the location written (or tested). Copy and Move also
/// carry the `from` location they read.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOperation {
    Add { path: Path, value: Value },
    Remove { path: Path },
    Replace { path: Path, value: Value },
    Copy { path: Path, from: Path },
    Move { path: Path, from: Path },
    Test { path: Path, value: Value },
}

impl PatchOperation {
    pub fn add(path: Path, value: impl Into<Value>) -> Self {
        PatchOperation::Add {
            path,
            value: value.into(),
        }
    }

    pub fn remove(path: Path) -> Self {
        PatchOperation::Remove { path }
    }

    pub fn replace(path: Path, value: impl Into<Value>) -> Self {
        PatchOperation::Replace {
            path,
            value: value.into(),
        }
    }

    pub fn copy(from: Path, path: Path) -> Self {
        PatchOperation::Copy { path, from }
    }

    /// `move` is a keyword, hence the trailing underscore.
    pub fn move_(from: Path, path: Path) -> Self {
        PatchOperation::Move { path, from }
    }

    pub fn test(path: Path, value: impl Into<Value>) -> Self {
        PatchOperation::Test {
            path,
            value: value.into(),
        }
    }

    pub fn op_type(&self) -> PatchOperationType {
        match self {
            PatchOperation::Add { .. } => PatchOperationType::Add,
            PatchOperation::Remove { .. } => PatchOperationType::Remove,
            PatchOperation::Replace { .. } => PatchOperationType::Replace,
            PatchOperation::Copy { .. } => PatchOperationType::Copy,
            PatchOperation::Move { .. } => PatchOperationType::Move,
            PatchOperation::Test { .. } => PatchOperationType::Test,
        }
    }

    pub fn destination_path(&self) -> &Path {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOperation::Add { value, .. }
            | PatchOperation::Replace { value, .. }
            | PatchOperation::Test { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The payload of an Add, Replace or Test.
    ///
    /// # Panics
    ///
    /// For operations without a value payload.
    pub fn expect_value(&self) -> &Value {
        match self.value() {
            Some(value) => value,
            None => panic!("{} operation has no value", self.op_type()),
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        match self {
            PatchOperation::Copy { from, .. } | PatchOperation::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    /// The `from` path of a Copy or Move.
    ///
    /// # Panics
    ///
    /// For operations without a source path.
    pub fn expect_source_path(&self) -> &Path {
        match self.source_path() {
            Some(from) => from,
            None => panic!("{} operation has no source path", self.op_type()),
        }
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.destination_path().to_string();
        match self.source_path() {
            Some(from) => write!(f, "{} {:?} -> {path:?}", self.op_type(), from.to_string()),
            None => write!(f, "{} {path:?}", self.op_type()),
        }
    }
}
