//! The copy-on-write DOM value type.
//!
//! A [`Value`] is a closed sum over null, booleans, 64-bit integers,
//! doubles, strings, arrays, objects, named nodes and opaque native
//! payloads. Strings and container storage live behind [`Arc`]s, so cloning
//! a value is O(1). Every mutating accessor goes through [`Arc::make_mut`],
//! which forks shared storage before writing: a clone never observes writes
//! made through another clone, and only the containers on the written path
//! are copied.
//!
//! # Example
//!
//! ```
//! use dom::{Type, Value};
//!
//! let mut doc = Value::from_type(Type::Object);
//! doc["name"] = Value::from("root");
//! doc["items"] = Value::from(vec![Value::from(1), Value::from(2)]);
//!
//! let snapshot = doc.clone();
//! doc["items"].array_push_back(Value::from(3));
//!
//! assert_eq!(doc["items"].array_len(), 3);
//! assert_eq!(snapshot["items"].array_len(), 2);
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use dom_path::{Name, Path, PathEntry};

use crate::visitor::{Lifetime, Visitor, VisitorError};

pub mod node;
pub mod object;
pub mod opaque;
pub mod string;

pub use node::Node;
pub use object::{Object, ObjectEntry};
pub use opaque::OpaqueValue;
pub use string::DomString;

pub type Array = Vec<Value>;

static NULL: Value = Value::Null;

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Bool,
    Int64,
    Uint64,
    Double,
    String,
    Array,
    Object,
    Node,
    Opaque,
}

impl Type {
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Null => "null",
            Type::Bool => "bool",
            Type::Int64 => "int64",
            Type::Uint64 => "uint64",
            Type::Double => "double",
            Type::String => "string",
            Type::Array => "array",
            Type::Object => "object",
            Type::Node => "node",
            Type::Opaque => "opaque",
        }
    }

    /// True for kinds that can hold child values.
    pub fn is_container(&self) -> bool {
        matches!(self, Type::Array | Type::Object | Type::Node)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(DomString),
    Array(Arc<Array>),
    Object(Arc<Object>),
    Node(Arc<Node>),
    Opaque(OpaqueValue),
}

// ── Construction ──────────────────────────────────────────────────────────

impl Value {
    pub fn null() -> Self {
        Value::Null
    }

    /// A default value of the given kind: `false`, zero, an empty string or
    /// an empty container. Nodes get an empty name.
    ///
    /// # Panics
    ///
    /// Opaque values have no default and must be built with [`Value::opaque`].
    pub fn from_type(ty: Type) -> Self {
        match ty {
            Type::Null => Value::Null,
            Type::Bool => Value::Bool(false),
            Type::Int64 => Value::Int64(0),
            Type::Uint64 => Value::Uint64(0),
            Type::Double => Value::Double(0.0),
            Type::String => Value::String(DomString::Static("")),
            Type::Array => Value::Array(Arc::new(Array::new())),
            Type::Object => Value::Object(Arc::new(Object::new())),
            Type::Node => Value::Node(Arc::new(Node::new(""))),
            Type::Opaque => panic!("opaque values have no default; use Value::opaque"),
        }
    }

    /// An empty node named `name`.
    pub fn node(name: impl Into<Name>) -> Self {
        Value::Node(Arc::new(Node::new(name)))
    }

    /// A string that references static data instead of owning a copy.
    pub fn from_static_str(s: &'static str) -> Self {
        Value::String(DomString::Static(s))
    }

    pub fn opaque<T: std::any::Any + Send + Sync>(payload: T) -> Self {
        Value::Opaque(OpaqueValue::new(payload))
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Value::Node(Arc::new(node))
    }

    pub(crate) fn from_entries(entries: Object) -> Self {
        Value::Object(Arc::new(entries))
    }
}

// ── Introspection ─────────────────────────────────────────────────────────

impl Value {
    pub fn get_type(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::Int64(_) => Type::Int64,
            Value::Uint64(_) => Type::Uint64,
            Value::Double(_) => Type::Double,
            Value::String(_) => Type::String,
            Value::Array(_) => Type::Array,
            Value::Object(_) => Type::Object,
            Value::Node(_) => Type::Node,
            Value::Opaque(_) => Type::Opaque,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int64(_) | Value::Uint64(_) | Value::Double(_))
    }

    pub fn is_int64(&self) -> bool {
        matches!(self, Value::Int64(_))
    }

    pub fn is_uint64(&self) -> bool {
        matches!(self, Value::Uint64(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::Uint64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint64(u) => Some(*u),
            Value::Int64(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(i) => Some(*i as f64),
            Value::Uint64(u) => Some(*u as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueValue> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Positional children: array elements or node children.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            Value::Node(n) => Some(n.children()),
            _ => None,
        }
    }

    /// Keyed children: object members or node properties.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            Value::Node(n) => Some(n.properties()),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    /// True if `self` and `other` hold the same shared storage.
    ///
    /// Scalars never share storage.
    pub fn shares_storage_with(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Node(a), Value::Node(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// A copy that shares no strings or containers with `self`.
    ///
    /// Opaque payloads are not copyable and stay shared.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::String(s) => Value::String(s.detached()),
            Value::Array(a) => Value::Array(Arc::new(a.iter().map(Value::deep_copy).collect())),
            Value::Object(o) => Value::Object(Arc::new(deep_copy_entries(o))),
            Value::Node(n) => Value::from_node(Node::from_parts(
                Name::from(n.name().as_str()),
                deep_copy_entries(n.properties()),
                n.children().iter().map(Value::deep_copy).collect(),
            )),
            other => other.clone(),
        }
    }
}

fn deep_copy_entries(entries: &[ObjectEntry]) -> Object {
    entries
        .iter()
        .map(|(k, v)| (Name::from(k.as_str()), v.deep_copy()))
        .collect()
}

// ── Arrays ────────────────────────────────────────────────────────────────

impl Value {
    /// Array elements or node children.
    ///
    /// # Panics
    ///
    /// If the value is neither an array nor a node.
    pub fn get_array(&self) -> &Array {
        match self.as_array() {
            Some(a) => a,
            None => panic!("get_array called on a {} value", self.get_type()),
        }
    }

    /// Mutable array elements or node children, forking shared storage.
    ///
    /// # Panics
    ///
    /// If the value is neither an array nor a node.
    pub fn get_mutable_array(&mut self) -> &mut Array {
        match self {
            Value::Array(a) => Arc::make_mut(a),
            Value::Node(n) => Arc::make_mut(n).children_mut(),
            other => panic!("get_mutable_array called on a {} value", other.get_type()),
        }
    }

    pub fn array_len(&self) -> usize {
        self.get_array().len()
    }

    pub fn array_push_back(&mut self, value: Value) {
        self.get_mutable_array().push(value);
    }

    /// Insert at `index`, shifting later elements.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    pub fn array_insert(&mut self, index: usize, value: Value) {
        let array = self.get_mutable_array();
        assert!(index <= array.len(), "array insert index {index} out of range");
        array.insert(index, value);
    }

    /// Remove and return the element at `index`.
    ///
    /// # Panics
    ///
    /// If `index >= len`.
    pub fn array_erase(&mut self, index: usize) -> Value {
        let array = self.get_mutable_array();
        assert!(index < array.len(), "array erase index {index} out of range");
        array.remove(index)
    }

    pub fn array_clear(&mut self) {
        self.get_mutable_array().clear();
    }
}

// ── Objects ───────────────────────────────────────────────────────────────

impl Value {
    /// Object members or node properties.
    ///
    /// # Panics
    ///
    /// If the value is neither an object nor a node.
    pub fn get_object(&self) -> &Object {
        match self.as_object() {
            Some(o) => o,
            None => panic!("get_object called on a {} value", self.get_type()),
        }
    }

    /// Mutable object members or node properties, forking shared storage.
    ///
    /// # Panics
    ///
    /// If the value is neither an object nor a node.
    pub fn get_mutable_object(&mut self) -> &mut Object {
        match self {
            Value::Object(o) => Arc::make_mut(o),
            Value::Node(n) => Arc::make_mut(n).properties_mut(),
            other => panic!("get_mutable_object called on a {} value", other.get_type()),
        }
    }

    pub fn object_len(&self) -> usize {
        self.get_object().len()
    }

    /// First member named `key`, if any. Non-objects have no members.
    pub fn find_member(&self, key: &str) -> Option<&Value> {
        let entries = self.as_object()?;
        object::position(entries, key).map(|pos| &entries[pos].1)
    }

    pub fn find_mutable_member(&mut self, key: &str) -> Option<&mut Value> {
        let pos = object::position(self.as_object()?, key)?;
        Some(&mut self.get_mutable_object()[pos].1)
    }

    pub fn has_member(&self, key: &str) -> bool {
        self.find_member(key).is_some()
    }

    /// Set `key` to `value`, returning a reference to the stored value.
    ///
    /// An existing member keeps its position and any duplicate entries of
    /// the same key are dropped.
    pub fn add_member(&mut self, key: impl Into<Name>, value: Value) -> &mut Value {
        let key = key.into();
        let entries = self.get_mutable_object();
        object::insert(entries, key.clone(), value);
        let pos = entries.iter().position(|(k, _)| *k == key).unwrap_or(entries.len() - 1);
        &mut entries[pos].1
    }

    /// Like [`add_member`](Self::add_member) but returns the overwritten value.
    pub fn insert_member(&mut self, key: impl Into<Name>, value: Value) -> Option<Value> {
        object::insert(self.get_mutable_object(), key.into(), value)
    }

    /// Remove every member named `key`. Absent keys are not an error.
    ///
    /// Returns the first removed value.
    pub fn remove_member(&mut self, key: &str) -> Option<Value> {
        if !self.has_member(key) {
            return None;
        }
        object::remove(self.get_mutable_object(), key)
    }

    pub fn object_clear(&mut self) {
        self.get_mutable_object().clear();
    }
}

// ── Nodes ─────────────────────────────────────────────────────────────────

impl Value {
    /// Turn this value into an empty node named `name`.
    pub fn set_node(&mut self, name: impl Into<Name>) {
        *self = Value::node(name);
    }

    pub fn get_node_name(&self) -> Option<&Name> {
        self.as_node().map(Node::name)
    }

    /// Change the name of a node, keeping its properties and children.
    ///
    /// # Panics
    ///
    /// If the value is not a node.
    pub fn rename_node(&mut self, name: impl Into<Name>) {
        match self {
            Value::Node(n) => Arc::make_mut(n).set_name(name.into()),
            other => panic!("rename_node called on a {} value", other.get_type()),
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────

impl Value {
    /// The direct child addressed by `entry`.
    ///
    /// Keys address object members and node properties; indices address
    /// array elements and node children. Against an object, an index or the
    /// end-of-array sentinel reads as its string key.
    pub fn find_child(&self, entry: &PathEntry) -> Option<&Value> {
        match (self, entry) {
            (Value::Array(_) | Value::Node(_), PathEntry::Index(i)) => self.get_array().get(*i),
            (Value::Node(n), PathEntry::Key(key)) => {
                object::position_name(n.properties(), key).map(|pos| &n.properties()[pos].1)
            }
            (Value::Object(o), entry) => {
                let key = entry.to_key();
                object::position_name(o, &key).map(|pos| &o[pos].1)
            }
            _ => None,
        }
    }

    pub fn find_mutable_child(&mut self, entry: &PathEntry) -> Option<&mut Value> {
        match (self, entry) {
            (Value::Array(a), PathEntry::Index(i)) => {
                if *i >= a.len() {
                    return None;
                }
                Arc::make_mut(a).get_mut(*i)
            }
            (Value::Node(n), PathEntry::Index(i)) => {
                if *i >= n.children().len() {
                    return None;
                }
                Arc::make_mut(n).children_mut().get_mut(*i)
            }
            (Value::Node(n), PathEntry::Key(key)) => {
                let pos = object::position_name(n.properties(), key)?;
                Some(&mut Arc::make_mut(n).properties_mut()[pos].1)
            }
            (Value::Object(o), entry) => {
                let pos = object::position_name(o.as_slice(), &entry.to_key())?;
                Some(&mut Arc::make_mut(o)[pos].1)
            }
            _ => None,
        }
    }

    /// The descendant at `path`, or `None` if any step is missing.
    pub fn find_child_path(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for entry in path {
            current = current.find_child(entry)?;
        }
        Some(current)
    }

    /// Mutable descendant at `path`; forks shared storage along the way.
    pub fn find_mutable_child_path(&mut self, path: &Path) -> Option<&mut Value> {
        if self.find_child_path(path).is_none() {
            return None;
        }
        let mut current = self;
        for entry in path {
            current = current.find_mutable_child(entry)?;
        }
        Some(current)
    }
}

// ── Visiting ──────────────────────────────────────────────────────────────

impl Value {
    /// Walk this tree, reporting every value to `visitor`.
    ///
    /// With `copy_strings == false`, strings are reported as
    /// [`Lifetime::Persistent`] so the visitor may keep borrowed views for
    /// the duration of the walk. Static strings are always persistent.
    pub fn accept<V: Visitor + ?Sized>(
        &self,
        visitor: &mut V,
        copy_strings: bool,
    ) -> Result<(), VisitorError> {
        match self {
            Value::Null => visitor.null(),
            Value::Bool(b) => visitor.bool(*b),
            Value::Int64(i) => visitor.int64(*i),
            Value::Uint64(u) => visitor.uint64(*u),
            Value::Double(d) => visitor.double(*d),
            Value::String(s) => {
                let lifetime = if copy_strings && !s.is_static() {
                    Lifetime::Temporary
                } else {
                    Lifetime::Persistent
                };
                visitor.string(s.as_str(), lifetime)
            }
            Value::Array(a) => {
                visitor.start_array()?;
                for item in a.iter() {
                    item.accept(visitor, copy_strings)?;
                }
                visitor.end_array(a.len())
            }
            Value::Object(o) => {
                visitor.start_object()?;
                accept_entries(o, visitor, copy_strings)?;
                visitor.end_object(o.len())
            }
            Value::Node(n) => {
                visitor.start_node(n.name())?;
                accept_entries(n.properties(), visitor, copy_strings)?;
                for child in n.children() {
                    child.accept(visitor, copy_strings)?;
                }
                visitor.end_node(n.properties().len(), n.children().len())
            }
            Value::Opaque(o) => visitor.opaque_value(o),
        }
    }
}

fn accept_entries<V: Visitor + ?Sized>(
    entries: &[ObjectEntry],
    visitor: &mut V,
    copy_strings: bool,
) -> Result<(), VisitorError> {
    for (key, value) in entries {
        visitor.key(key)?;
        value.accept(visitor, copy_strings)?;
    }
    Ok(())
}

// ── Equality ──────────────────────────────────────────────────────────────

/// Structural deep comparison.
///
/// Shared storage short-circuits to equal. Object members compare by key
/// regardless of order, and numbers compare by value across the integer and
/// double kinds.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b) || a[..] == b[..],
            (Value::Object(a), Value::Object(b)) => {
                Arc::ptr_eq(a, b) || object::entries_equal(a, b)
            }
            (Value::Node(a), Value::Node(b)) => Arc::ptr_eq(a, b) || **a == **b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => numbers_equal(a, b),
            _ => false,
        }
    }
}

fn numbers_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int64(x), Value::Int64(y)) => x == y,
        (Value::Uint64(x), Value::Uint64(y)) => x == y,
        (Value::Int64(i), Value::Uint64(u)) | (Value::Uint64(u), Value::Int64(i)) => {
            u64::try_from(*i).is_ok_and(|i| i == *u)
        }
        // NaN matches NaN
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
            _ => false,
        },
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────

/// Member lookup; missing members and non-objects read as null.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.find_member(key).unwrap_or(&NULL)
    }
}

/// Member lookup that creates a null member on write. A null value first
/// becomes an empty object.
///
/// # Panics
///
/// If the value is not null, an object or a node.
impl IndexMut<&str> for Value {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        if self.is_null() {
            *self = Value::from_type(Type::Object);
        }
        let entries = self.get_mutable_object();
        let pos = match object::position(entries, key) {
            Some(pos) => pos,
            None => {
                entries.push((Name::from(key), Value::Null));
                entries.len() - 1
            }
        };
        &mut entries[pos].1
    }
}

/// Array element or node child.
///
/// # Panics
///
/// If the value is not an array or node, or the index is out of range.
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        let array = self.get_array();
        assert!(index < array.len(), "index {index} out of range for length {}", array.len());
        &array[index]
    }
}

impl IndexMut<usize> for Value {
    fn index_mut(&mut self, index: usize) -> &mut Value {
        let array = self.get_mutable_array();
        assert!(index < array.len(), "index {index} out of range for length {}", array.len());
        &mut array[index]
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int64(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint64(u64::from(u))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint64(u)
    }
}

impl From<f32> for Value {
    fn from(d: f32) -> Self {
        Value::Double(f64::from(d))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(DomString::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(DomString::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::String(DomString::from(s))
    }
}

/// A name becomes a string value sharing the name's storage.
impl From<Name> for Value {
    fn from(name: Name) -> Self {
        Value::String(DomString::Shared(name.into_arc()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(Arc::new(iter.into_iter().collect()))
    }
}

impl FromIterator<(Name, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Name, Value)>>(iter: I) -> Self {
        let mut value = Value::from_type(Type::Object);
        for (key, item) in iter {
            value.add_member(key, item);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        let mut v = Value::from_type(Type::Object);
        v["a"] = Value::from(1);
        v["list"] = Value::from(vec![Value::from("x"), Value::from("y")]);
        v["nested"]["deep"] = Value::from(true);
        v
    }

    #[test]
    fn from_type_defaults() {
        assert!(Value::from_type(Type::Null).is_null());
        assert_eq!(Value::from_type(Type::Bool), Value::Bool(false));
        assert_eq!(Value::from_type(Type::Array).array_len(), 0);
        assert_eq!(Value::from_type(Type::Object).object_len(), 0);
        assert_eq!(Value::from_type(Type::String).as_str(), Some(""));
        assert_eq!(Value::from_type(Type::Node).get_node_name().map(|n| n.as_str()), Some(""));
    }

    #[test]
    #[should_panic(expected = "opaque values have no default")]
    fn from_type_opaque_panics() {
        let _ = Value::from_type(Type::Opaque);
    }

    #[test]
    fn index_reads_and_creates_on_write() {
        let v = sample();
        assert_eq!(v["a"], Value::from(1));
        assert_eq!(v["missing"], Value::Null);
        assert_eq!(v["nested"]["deep"], Value::from(true));
        assert_eq!(v["list"][1].as_str(), Some("y"));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn array_index_out_of_range_panics() {
        let v = Value::from(vec![Value::from(1)]);
        let _ = &v[3];
    }

    #[test]
    fn array_operations() {
        let mut v = Value::from_type(Type::Array);
        v.array_push_back(Value::from(1));
        v.array_push_back(Value::from(3));
        v.array_insert(1, Value::from(2));
        assert_eq!(v, Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]));
        assert_eq!(v.array_erase(0), Value::from(1));
        assert_eq!(v.array_len(), 2);
        v.get_mutable_array().reverse();
        assert_eq!(v[0], Value::from(3));
        v.array_clear();
        assert_eq!(v.array_len(), 0);
    }

    #[test]
    fn members_dedupe_on_write() {
        let mut v = Value::from_entries(vec![
            (Name::from("k"), Value::from(1)),
            (Name::from("other"), Value::from(2)),
            (Name::from("k"), Value::from(3)),
        ]);
        assert_eq!(v.find_member("k"), Some(&Value::from(1)));
        assert_eq!(v.object_len(), 3);

        v.add_member("k", Value::from(7));
        assert_eq!(v.object_len(), 2);
        assert_eq!(v.get_object()[0].0.as_str(), "k");
        assert_eq!(v["k"], Value::from(7));
    }

    #[test]
    fn insert_member_returns_previous() {
        let mut v = sample();
        assert_eq!(v.insert_member("a", Value::from(5)), Some(Value::from(1)));
        assert_eq!(v.insert_member("fresh", Value::from(5)), None);
    }

    #[test]
    fn remove_member_is_noop_when_absent() {
        let mut v = sample();
        let before = v.clone();
        assert_eq!(v.remove_member("nope"), None);
        assert!(v.shares_storage_with(&before));
        assert_eq!(v.remove_member("a"), Some(Value::from(1)));
        assert!(!v.has_member("a"));
    }

    #[test]
    fn clone_is_copy_on_write() {
        let original = sample();
        let mut copy = original.clone();
        assert!(copy.shares_storage_with(&original));

        copy["nested"]["deep"] = Value::from(false);
        copy["list"].array_push_back(Value::from("z"));

        assert_eq!(original["nested"]["deep"], Value::from(true));
        assert_eq!(original["list"].array_len(), 2);
        assert!(!copy.shares_storage_with(&original));
        // Untouched subtrees stay shared
        assert!(copy["a"] == original["a"]);
    }

    #[test]
    fn untouched_siblings_keep_sharing() {
        let mut doc = Value::from_type(Type::Object);
        doc["left"] = Value::from(vec![Value::from(1)]);
        doc["right"] = Value::from(vec![Value::from(2)]);

        let mut copy = doc.clone();
        copy["left"].array_push_back(Value::from(9));

        assert!(copy["right"].shares_storage_with(&doc["right"]));
        assert!(!copy["left"].shares_storage_with(&doc["left"]));
    }

    #[test]
    fn deep_copy_shares_nothing() {
        let original = sample();
        let copy = original.deep_copy();
        assert_eq!(copy, original);
        assert!(!copy.shares_storage_with(&original));
        assert!(!copy["list"].shares_storage_with(&original["list"]));
        assert!(!copy["list"][0].shares_storage_with(&original["list"][0]));
    }

    #[test]
    fn nodes() {
        let mut v = Value::node("Button");
        v["label"] = Value::from("OK");
        v.array_push_back(Value::node("Icon"));
        assert!(v.is_node());
        assert_eq!(v.get_node_name().map(|n| n.as_str()), Some("Button"));
        assert_eq!(v.object_len(), 1);
        assert_eq!(v.array_len(), 1);
        assert_eq!(v[0].get_node_name().map(|n| n.as_str()), Some("Icon"));

        let before = v.clone();
        v.rename_node("Toggle");
        assert_eq!(v.get_node_name().map(|n| n.as_str()), Some("Toggle"));
        assert_eq!(before.get_node_name().map(|n| n.as_str()), Some("Button"));
        assert_ne!(v, before);
        assert_eq!(v["label"], before["label"]);

        v.set_node("Empty");
        assert_eq!(v.object_len(), 0);
        assert_eq!(v.array_len(), 0);
    }

    #[test]
    #[should_panic(expected = "rename_node called on a int64 value")]
    fn rename_non_node_panics() {
        Value::from(1).rename_node("x");
    }

    #[test]
    fn equality_semantics() {
        let a: Value = vec![(Name::from("x"), Value::from(1)), (Name::from("y"), Value::from(2))]
            .into_iter()
            .collect();
        let b: Value = vec![(Name::from("y"), Value::from(2)), (Name::from("x"), Value::from(1))]
            .into_iter()
            .collect();
        assert_eq!(a, b);

        assert_eq!(Value::from(1), Value::from(1u64));
        assert_eq!(Value::from(2), Value::from(2.0));
        assert_ne!(Value::from(-1), Value::from(u64::MAX));
        assert_ne!(Value::from(1), Value::from("1"));
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(f64::NAN), Value::Double(1.0));
        assert_ne!(Value::Double(f64::NAN), Value::from(0));
        assert_eq!(Value::from_static_str("s"), Value::from("s"));
        assert_ne!(Value::from_type(Type::Object), Value::from_type(Type::Array));
    }

    #[test]
    fn opaque_identity() {
        let a = Value::opaque(vec![1u8, 2, 3]);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::opaque(vec![1u8, 2, 3]));
        assert_eq!(
            a.as_opaque().and_then(|o| o.downcast_ref::<Vec<u8>>()),
            Some(&vec![1u8, 2, 3])
        );
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(Value::from(5u64).as_i64(), Some(5));
        assert_eq!(Value::from(-5).as_u64(), None);
        assert_eq!(Value::from(u64::MAX).as_i64(), None);
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from("3").as_f64(), None);
    }

    #[test]
    fn path_lookup() {
        let v = sample();
        let path = Path::new() / "list" / 1usize;
        assert_eq!(v.find_child_path(&path).and_then(Value::as_str), Some("y"));
        assert!(v.find_child_path(&(Path::new() / "list" / 5usize)).is_none());
        assert!(v.find_child_path(&(Path::new() / "a" / "b")).is_none());
        assert_eq!(v.find_child_path(&Path::new()), Some(&v));
    }

    #[test]
    fn path_lookup_index_on_object_reads_key() {
        let mut v = Value::from_type(Type::Object);
        v["0"] = Value::from("zero");
        v["-"] = Value::from("dash");
        assert_eq!(v.find_child(&PathEntry::Index(0)), Some(&Value::from("zero")));
        assert_eq!(v.find_child(&PathEntry::EndOfArray), Some(&Value::from("dash")));
    }

    #[test]
    fn mutable_path_lookup_forks_only_when_found() {
        let original = sample();
        let mut copy = original.clone();
        assert!(copy.find_mutable_child_path(&(Path::new() / "nope")).is_none());
        assert!(copy.shares_storage_with(&original));

        if let Some(deep) = copy.find_mutable_child_path(&(Path::new() / "nested" / "deep")) {
            *deep = Value::from(0);
        }
        assert_eq!(copy["nested"]["deep"], Value::from(0));
        assert_eq!(original["nested"]["deep"], Value::from(true));
    }

    #[test]
    fn node_path_lookup() {
        let mut v = Value::node("Panel");
        v["title"] = Value::from("t");
        v.array_push_back(Value::from("child"));
        assert_eq!(v.find_child(&PathEntry::key("title")), Some(&Value::from("t")));
        assert_eq!(v.find_child(&PathEntry::Index(0)), Some(&Value::from("child")));
        assert_eq!(v.find_child(&PathEntry::EndOfArray), None);
    }
}
