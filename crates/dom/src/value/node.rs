//! Named nodes: an object and an array under one type name.

use dom_path::Name;

use super::object::{self, Object};
use super::Array;

/// Structured content with a type name, keyed properties and positional
/// children.
///
/// The name is fixed at construction and only changes through
/// [`Value::rename_node`](super::Value::rename_node).
#[derive(Debug, Clone)]
pub struct Node {
    name: Name,
    properties: Object,
    children: Array,
}

impl Node {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            properties: Object::new(),
            children: Array::new(),
        }
    }

    pub(crate) fn from_parts(name: Name, properties: Object, children: Array) -> Self {
        Self {
            name,
            properties,
            children,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn properties(&self) -> &Object {
        &self.properties
    }

    pub fn children(&self) -> &Array {
        &self.children
    }

    pub(crate) fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Object {
        &mut self.properties
    }

    pub(crate) fn children_mut(&mut self) -> &mut Array {
        &mut self.children
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && object::entries_equal(&self.properties, &other.properties)
            && self.children == other.children
    }
}
