//! Patches written as DOM values.
//!
//! A patch is an array of operation objects:
//!
//! ```text
//! [
//!   { "op": "add",  "path": "/a/-", "value": 1 },
//!   { "op": "move", "path": "/b",   "from": "/a/0" }
//! ]
//! ```
//!
//! Paths use the pointer string form. Unknown members are ignored.

use dom_path::Path;

use super::sequence::Patch;
use super::types::{PatchOperation, PatchOperationType, PatchParseError};
use crate::value::{Type, Value};

const OP: &str = "op";
const PATH: &str = "path";
const FROM: &str = "from";
const VALUE: &str = "value";

impl PatchOperation {
    pub fn get_dom_representation(&self) -> Value {
        let mut repr = Value::from_type(Type::Object);
        repr.add_member(OP, Value::from_static_str(self.op_type().as_str()));
        repr.add_member(PATH, Value::from(self.destination_path().to_string()));
        if let Some(from) = self.source_path() {
            repr.add_member(FROM, Value::from(from.to_string()));
        }
        if let Some(value) = self.value() {
            repr.add_member(VALUE, value.clone());
        }
        repr
    }

    /// Read one operation object.
    ///
    /// # Errors
    ///
    /// [`PatchParseError`] naming the first missing or malformed field.
    pub fn create_from_dom_representation(repr: &Value) -> Result<Self, PatchParseError> {
        if !repr.is_object() {
            return Err(PatchParseError::NotAnObject(repr.get_type()));
        }
        let op: PatchOperationType = string_field(repr, OP)?.parse()?;
        let path = path_field(repr, PATH)?;
        let op = match op {
            PatchOperationType::Add => PatchOperation::Add {
                path,
                value: value_field(repr)?,
            },
            PatchOperationType::Remove => PatchOperation::Remove { path },
            PatchOperationType::Replace => PatchOperation::Replace {
                path,
                value: value_field(repr)?,
            },
            PatchOperationType::Copy => PatchOperation::Copy {
                path,
                from: path_field(repr, FROM)?,
            },
            PatchOperationType::Move => PatchOperation::Move {
                path,
                from: path_field(repr, FROM)?,
            },
            PatchOperationType::Test => PatchOperation::Test {
                path,
                value: value_field(repr)?,
            },
        };
        Ok(op)
    }
}

fn string_field<'a>(repr: &'a Value, field: &'static str) -> Result<&'a str, PatchParseError> {
    let value = repr
        .find_member(field)
        .ok_or(PatchParseError::MissingField(field))?;
    value.as_str().ok_or(PatchParseError::InvalidFieldType {
        field,
        expected: Type::String,
        actual: value.get_type(),
    })
}

fn path_field(repr: &Value, field: &'static str) -> Result<Path, PatchParseError> {
    Path::parse(string_field(repr, field)?)
        .map_err(|source| PatchParseError::InvalidPath { field, source })
}

fn value_field(repr: &Value) -> Result<Value, PatchParseError> {
    repr.find_member(VALUE)
        .cloned()
        .ok_or(PatchParseError::MissingField(VALUE))
}

impl Patch {
    /// The patch as an array of operation objects.
    ///
    /// # Example
    ///
    /// ```
    /// use dom::{Patch, PatchOperation, Path};
    ///
    /// let patch: Patch = vec![PatchOperation::remove(Path::parse("/a").unwrap())].into();
    /// let repr = patch.get_dom_representation();
    /// assert_eq!(repr[0]["op"].as_str(), Some("remove"));
    /// assert_eq!(Patch::create_from_dom_representation(&repr).unwrap(), patch);
    /// ```
    pub fn get_dom_representation(&self) -> Value {
        self.iter()
            .map(PatchOperation::get_dom_representation)
            .collect()
    }

    pub fn create_from_dom_representation(repr: &Value) -> Result<Self, PatchParseError> {
        if !repr.is_array() {
            return Err(PatchParseError::NotAnArray(repr.get_type()));
        }
        repr.get_array()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                PatchOperation::create_from_dom_representation(entry).map_err(|source| {
                    PatchParseError::Operation {
                        index,
                        source: Box::new(source),
                    }
                })
            })
            .collect()
    }
}
