//! Bridge between DOM values and `serde_json`.
//!
//! Nodes have no JSON equivalent; [`to_json`] writes them as objects with a
//! `"$type"` member holding the node name, the node properties, and a
//! `"$children"` array. [`from_json`] never reconstructs nodes from that
//! shape. Opaque values and non-finite doubles cannot be written.
//!
//! # Example
//!
//! ```
//! use dom::json::{from_json, to_json};
//! use serde_json::json;
//!
//! let doc = from_json(&json!({"a": [1, -2, 3.5], "b": null})).unwrap();
//! assert!(doc["a"][1].is_int64());
//! assert!(doc["a"][2].is_double());
//! assert_eq!(to_json(&doc).unwrap(), json!({"a": [1, -2, 3.5], "b": null}));
//! ```

use dom_path::Name;
use serde_json::{Map, Number};

use crate::value::Value;
use crate::visitor::{Lifetime, ValueWriter, Visitor, VisitorError};

pub const NODE_TYPE_KEY: &str = "$type";
pub const NODE_CHILDREN_KEY: &str = "$children";

/// Convert a DOM tree to a JSON value.
pub fn to_json(value: &Value) -> Result<serde_json::Value, VisitorError> {
    let mut writer = JsonWriter::default();
    value.accept(&mut writer, false)?;
    writer.finish()
}

/// Build a DOM tree from a JSON value.
///
/// Integers become `Int64` when they fit and `Uint64` otherwise; every
/// other number becomes a `Double`.
pub fn from_json(json: &serde_json::Value) -> Result<Value, VisitorError> {
    let mut writer = ValueWriter::new();
    visit_json(json, &mut writer)?;
    writer.finish()
}

/// Report a JSON tree to any visitor.
pub fn visit_json<V: Visitor + ?Sized>(
    json: &serde_json::Value,
    visitor: &mut V,
) -> Result<(), VisitorError> {
    match json {
        serde_json::Value::Null => visitor.null(),
        serde_json::Value::Bool(b) => visitor.bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                visitor.int64(i)
            } else if let Some(u) = n.as_u64() {
                visitor.uint64(u)
            } else if let Some(f) = n.as_f64() {
                visitor.double(f)
            } else {
                Err(VisitorError::InvalidData(format!("unrepresentable number {n}")))
            }
        }
        serde_json::Value::String(s) => visitor.string(s, Lifetime::Persistent),
        serde_json::Value::Array(items) => {
            visitor.start_array()?;
            for item in items {
                visit_json(item, visitor)?;
            }
            visitor.end_array(items.len())
        }
        serde_json::Value::Object(map) => {
            visitor.start_object()?;
            for (key, item) in map {
                visitor.key(&Name::from(key.as_str()))?;
                visit_json(item, visitor)?;
            }
            visitor.end_object(map.len())
        }
    }
}

// ── JsonWriter ────────────────────────────────────────────────────────────

enum Frame {
    Array(Vec<serde_json::Value>),
    Object {
        map: Map<String, serde_json::Value>,
        pending_key: Option<String>,
    },
    Node {
        map: Map<String, serde_json::Value>,
        children: Vec<serde_json::Value>,
        pending_key: Option<String>,
    },
}

#[derive(Default)]
struct JsonWriter {
    stack: Vec<Frame>,
    result: Option<serde_json::Value>,
}

impl JsonWriter {
    fn finish(self) -> Result<serde_json::Value, VisitorError> {
        if !self.stack.is_empty() {
            return Err(VisitorError::Unbalanced("unclosed container"));
        }
        self.result.ok_or(VisitorError::Unbalanced("no value written"))
    }

    fn emit(&mut self, value: serde_json::Value) -> Result<(), VisitorError> {
        match self.stack.last_mut() {
            None => {
                if self.result.is_some() {
                    return Err(VisitorError::Unbalanced("more than one root value"));
                }
                self.result = Some(value);
            }
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { map, pending_key }) => {
                let key = pending_key
                    .take()
                    .ok_or(VisitorError::Unbalanced("object member without key"))?;
                map.entry(key).or_insert(value);
            }
            Some(Frame::Node {
                map,
                children,
                pending_key,
            }) => match pending_key.take() {
                Some(key) => {
                    map.entry(key).or_insert(value);
                }
                None => children.push(value),
            },
        }
        Ok(())
    }
}

impl Visitor for JsonWriter {
    fn null(&mut self) -> Result<(), VisitorError> {
        self.emit(serde_json::Value::Null)
    }

    fn bool(&mut self, value: bool) -> Result<(), VisitorError> {
        self.emit(serde_json::Value::Bool(value))
    }

    fn int64(&mut self, value: i64) -> Result<(), VisitorError> {
        self.emit(serde_json::Value::from(value))
    }

    fn uint64(&mut self, value: u64) -> Result<(), VisitorError> {
        self.emit(serde_json::Value::from(value))
    }

    fn double(&mut self, value: f64) -> Result<(), VisitorError> {
        let number = Number::from_f64(value)
            .ok_or_else(|| VisitorError::InvalidData(format!("non-finite double {value}")))?;
        self.emit(serde_json::Value::Number(number))
    }

    fn string(&mut self, value: &str, _lifetime: Lifetime) -> Result<(), VisitorError> {
        self.emit(serde_json::Value::String(value.to_string()))
    }

    fn start_object(&mut self) -> Result<(), VisitorError> {
        self.stack.push(Frame::Object {
            map: Map::new(),
            pending_key: None,
        });
        Ok(())
    }

    fn key(&mut self, key: &Name) -> Result<(), VisitorError> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_key, .. }) | Some(Frame::Node { pending_key, .. }) => {
                *pending_key = Some(key.to_string());
                Ok(())
            }
            _ => Err(VisitorError::Unbalanced("key outside of object")),
        }
    }

    fn end_object(&mut self, _member_count: usize) -> Result<(), VisitorError> {
        match self.stack.pop() {
            Some(Frame::Object { map, .. }) => self.emit(serde_json::Value::Object(map)),
            _ => Err(VisitorError::Unbalanced("end_object")),
        }
    }

    fn start_array(&mut self) -> Result<(), VisitorError> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self, _element_count: usize) -> Result<(), VisitorError> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.emit(serde_json::Value::Array(items)),
            _ => Err(VisitorError::Unbalanced("end_array")),
        }
    }

    fn start_node(&mut self, name: &Name) -> Result<(), VisitorError> {
        let mut map = Map::new();
        map.insert(NODE_TYPE_KEY.to_string(), serde_json::Value::String(name.to_string()));
        self.stack.push(Frame::Node {
            map,
            children: Vec::new(),
            pending_key: None,
        });
        Ok(())
    }

    fn end_node(&mut self, _property_count: usize, _child_count: usize) -> Result<(), VisitorError> {
        match self.stack.pop() {
            Some(Frame::Node {
                mut map, children, ..
            }) => {
                map.insert(NODE_CHILDREN_KEY.to_string(), serde_json::Value::Array(children));
                self.emit(serde_json::Value::Object(map))
            }
            _ => Err(VisitorError::Unbalanced("end_node")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_mapping() {
        let v = from_json(&json!([1, -1, u64::MAX, 0.5])).unwrap();
        assert!(v[0].is_int64());
        assert!(v[1].is_int64());
        assert!(v[2].is_uint64());
        assert!(v[3].is_double());
    }

    #[test]
    fn roundtrip_preserves_member_order() {
        let json = json!({"z": 1, "a": {"m": [true, "s"], "b": null}});
        let v = from_json(&json).unwrap();
        assert_eq!(v.get_object()[0].0.as_str(), "z");
        let back = to_json(&v).unwrap();
        assert_eq!(serde_json::to_string(&back).unwrap(), serde_json::to_string(&json).unwrap());
    }

    #[test]
    fn nodes_serialize_with_type_and_children() {
        let mut node = Value::node("Button");
        node["label"] = Value::from("OK");
        node.array_push_back(Value::node("Icon"));
        assert_eq!(
            to_json(&node).unwrap(),
            json!({
                "$type": "Button",
                "label": "OK",
                "$children": [{"$type": "Icon", "$children": []}]
            })
        );
    }

    #[test]
    fn rejects_opaque_and_non_finite() {
        assert_eq!(
            to_json(&Value::opaque(3u8)),
            Err(VisitorError::UnsupportedOperation("opaque_value"))
        );
        assert!(matches!(
            to_json(&Value::from(f64::INFINITY)),
            Err(VisitorError::InvalidData(_))
        ));
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let mut writer = ValueWriter::new();
        writer.start_object().unwrap();
        writer.key(&Name::from("k")).unwrap();
        writer.int64(1).unwrap();
        writer.key(&Name::from("k")).unwrap();
        writer.int64(2).unwrap();
        writer.end_object(2).unwrap();
        let v = writer.finish().unwrap();
        assert_eq!(to_json(&v).unwrap(), json!({"k": 1}));
    }
}
