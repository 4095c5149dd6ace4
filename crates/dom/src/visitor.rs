//! Event-driven traversal of DOM trees.
//!
//! [`Value::accept`](crate::Value::accept) reports a tree as a stream of
//! events to a [`Visitor`]. [`ValueWriter`] goes the other way and builds a
//! [`Value`] from events, which is how foreign formats are read into a DOM.
//!
//! # Example
//!
//! ```
//! use dom::visitor::{ValueWriter, Visitor};
//! use dom::Name;
//!
//! let mut writer = ValueWriter::new();
//! writer.start_object().unwrap();
//! writer.key(&Name::from("answer")).unwrap();
//! writer.int64(42).unwrap();
//! writer.end_object(1).unwrap();
//!
//! let value = writer.finish().unwrap();
//! assert_eq!(value["answer"].as_i64(), Some(42));
//! ```

use dom_path::Name;
use thiserror::Error;

use crate::value::{Array, Node, Object, OpaqueValue, Value};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisitorError {
    #[error("unsupported visitor event: {0}")]
    UnsupportedOperation(&'static str),
    #[error("unbalanced visitor event: {0}")]
    Unbalanced(&'static str),
    #[error("{kind} closed with count {actual}, expected {expected}")]
    CountMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// How long a string reported to [`Visitor::string`] stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// The backing storage outlives the traversal.
    Persistent,
    /// The string must be copied if it is kept past the call.
    Temporary,
}

/// Receiver of tree events.
///
/// Containers are bracketed by `start_*` / `end_*`. Inside an object or a
/// node, every member is preceded by [`key`](Visitor::key). Node children
/// follow the node's keyed properties without a key.
pub trait Visitor {
    fn null(&mut self) -> Result<(), VisitorError>;
    fn bool(&mut self, value: bool) -> Result<(), VisitorError>;
    fn int64(&mut self, value: i64) -> Result<(), VisitorError>;
    fn uint64(&mut self, value: u64) -> Result<(), VisitorError>;
    fn double(&mut self, value: f64) -> Result<(), VisitorError>;
    fn string(&mut self, value: &str, lifetime: Lifetime) -> Result<(), VisitorError>;

    fn opaque_value(&mut self, _value: &OpaqueValue) -> Result<(), VisitorError> {
        Err(VisitorError::UnsupportedOperation("opaque_value"))
    }

    fn start_object(&mut self) -> Result<(), VisitorError>;
    fn key(&mut self, key: &Name) -> Result<(), VisitorError>;
    fn end_object(&mut self, member_count: usize) -> Result<(), VisitorError>;

    fn start_array(&mut self) -> Result<(), VisitorError>;
    fn end_array(&mut self, element_count: usize) -> Result<(), VisitorError>;

    fn start_node(&mut self, _name: &Name) -> Result<(), VisitorError> {
        Err(VisitorError::UnsupportedOperation("start_node"))
    }

    fn end_node(&mut self, _property_count: usize, _child_count: usize) -> Result<(), VisitorError> {
        Err(VisitorError::UnsupportedOperation("end_node"))
    }
}

// ── ValueWriter ───────────────────────────────────────────────────────────

enum Frame {
    Array(Array),
    Object {
        entries: Object,
        pending_key: Option<Name>,
    },
    Node {
        name: Name,
        properties: Object,
        children: Array,
        pending_key: Option<Name>,
    },
}

/// A [`Visitor`] that assembles the visited events into a [`Value`].
///
/// Duplicate keys are kept as reported.
#[derive(Default)]
pub struct ValueWriter {
    stack: Vec<Frame>,
    result: Option<Value>,
}

impl ValueWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The completed value.
    ///
    /// # Errors
    ///
    /// [`VisitorError::Unbalanced`] if a container is still open or no
    /// value was written.
    pub fn finish(self) -> Result<Value, VisitorError> {
        if !self.stack.is_empty() {
            return Err(VisitorError::Unbalanced("unclosed container"));
        }
        self.result.ok_or(VisitorError::Unbalanced("no value written"))
    }

    fn emit(&mut self, value: Value) -> Result<(), VisitorError> {
        match self.stack.last_mut() {
            None => {
                if self.result.is_some() {
                    return Err(VisitorError::Unbalanced("more than one root value"));
                }
                self.result = Some(value);
            }
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object {
                entries,
                pending_key,
            }) => {
                let key = pending_key
                    .take()
                    .ok_or(VisitorError::Unbalanced("object member without key"))?;
                entries.push((key, value));
            }
            Some(Frame::Node {
                properties,
                children,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => properties.push((key, value)),
                None => children.push(value),
            },
        }
        Ok(())
    }
}

fn check_count(kind: &'static str, expected: usize, actual: usize) -> Result<(), VisitorError> {
    if expected != actual {
        return Err(VisitorError::CountMismatch {
            kind,
            expected,
            actual,
        });
    }
    Ok(())
}

impl Visitor for ValueWriter {
    fn null(&mut self) -> Result<(), VisitorError> {
        self.emit(Value::Null)
    }

    fn bool(&mut self, value: bool) -> Result<(), VisitorError> {
        self.emit(Value::Bool(value))
    }

    fn int64(&mut self, value: i64) -> Result<(), VisitorError> {
        self.emit(Value::Int64(value))
    }

    fn uint64(&mut self, value: u64) -> Result<(), VisitorError> {
        self.emit(Value::Uint64(value))
    }

    fn double(&mut self, value: f64) -> Result<(), VisitorError> {
        self.emit(Value::Double(value))
    }

    fn string(&mut self, value: &str, _lifetime: Lifetime) -> Result<(), VisitorError> {
        self.emit(Value::from(value))
    }

    fn opaque_value(&mut self, value: &OpaqueValue) -> Result<(), VisitorError> {
        self.emit(Value::Opaque(value.clone()))
    }

    fn start_object(&mut self) -> Result<(), VisitorError> {
        self.stack.push(Frame::Object {
            entries: Object::new(),
            pending_key: None,
        });
        Ok(())
    }

    fn key(&mut self, key: &Name) -> Result<(), VisitorError> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_key, .. }) | Some(Frame::Node { pending_key, .. }) => {
                if pending_key.is_some() {
                    return Err(VisitorError::Unbalanced("key without value"));
                }
                *pending_key = Some(key.clone());
                Ok(())
            }
            _ => Err(VisitorError::Unbalanced("key outside of object")),
        }
    }

    fn end_object(&mut self, member_count: usize) -> Result<(), VisitorError> {
        match self.stack.pop() {
            Some(Frame::Object {
                entries,
                pending_key: None,
            }) => {
                check_count("object", member_count, entries.len())?;
                self.emit(Value::from_entries(entries))
            }
            _ => Err(VisitorError::Unbalanced("end_object")),
        }
    }

    fn start_array(&mut self) -> Result<(), VisitorError> {
        self.stack.push(Frame::Array(Array::new()));
        Ok(())
    }

    fn end_array(&mut self, element_count: usize) -> Result<(), VisitorError> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => {
                check_count("array", element_count, items.len())?;
                self.emit(Value::from(items))
            }
            _ => Err(VisitorError::Unbalanced("end_array")),
        }
    }

    fn start_node(&mut self, name: &Name) -> Result<(), VisitorError> {
        self.stack.push(Frame::Node {
            name: name.clone(),
            properties: Object::new(),
            children: Array::new(),
            pending_key: None,
        });
        Ok(())
    }

    fn end_node(&mut self, property_count: usize, child_count: usize) -> Result<(), VisitorError> {
        match self.stack.pop() {
            Some(Frame::Node {
                name,
                properties,
                children,
                pending_key: None,
            }) => {
                check_count("node properties", property_count, properties.len())?;
                check_count("node children", child_count, children.len())?;
                self.emit(Value::from_node(Node::from_parts(name, properties, children)))
            }
            _ => Err(VisitorError::Unbalanced("end_node")),
        }
    }
}
