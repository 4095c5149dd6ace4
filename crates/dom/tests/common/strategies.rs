//! proptest generators for DOM trees and operations against them.

use dom::visitor::{ValueWriter, Visitor};
use dom::{Name, Path, PathEntry, PatchOperation, Value};
use proptest::prelude::*;
use proptest::sample::Index;

use super::all_paths;

/// Member names, including ones that read like an index or `-`.
pub fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z]{1,6}",
        1 => "[0-9]{1,2}",
        1 => Just("-".to_string()),
    ]
}

pub fn arb_leaf() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
    .boxed()
}

pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::btree_map(arb_key(), inner.clone(), 0..6).prop_map(|members| {
                members
                    .into_iter()
                    .map(|(key, value)| (Name::from(key), value))
                    .collect::<Value>()
            }),
            (
                "[A-Z][a-z]{0,5}",
                prop::collection::btree_map(arb_key(), inner.clone(), 0..4),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(name, properties, children)| {
                    let mut node = Value::node(name);
                    for (key, value) in properties {
                        node.add_member(key, value);
                    }
                    for child in children {
                        node.array_push_back(child);
                    }
                    node
                }),
        ]
    })
}

/// Trees whose objects and node properties may repeat a key, the way a
/// reader reports them through [`ValueWriter`].
pub fn arb_value_with_repeated_keys() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        let members = prop::collection::vec(("[a-c]", inner.clone()), 0..6);
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            members.clone().prop_map(|members| write_members(None, &members, &[])),
            ("[A-B]", members, prop::collection::vec(inner, 0..3)).prop_map(
                |(name, members, children)| write_members(Some(name.as_str()), &members, &children)
            ),
        ]
    })
}

/// Stream members (and children, for a node) through a [`ValueWriter`].
fn write_members(node: Option<&str>, members: &[(String, Value)], children: &[Value]) -> Value {
    let mut writer = ValueWriter::new();
    match node {
        Some(name) => writer.start_node(&Name::from(name)),
        None => writer.start_object(),
    }
    .expect("container opens");
    for (key, value) in members {
        writer.key(&Name::from(key.as_str())).expect("key accepted");
        value.accept(&mut writer, false).expect("member written");
    }
    for child in children {
        child.accept(&mut writer, false).expect("child written");
    }
    match node {
        Some(_) => writer.end_node(members.len(), children.len()),
        None => writer.end_object(members.len()),
    }
    .expect("container closes");
    writer.finish().expect("single root value")
}

/// Raw material for [`pick_operation`].
#[derive(Debug, Clone)]
pub struct OperationSeed {
    pub kind: u8,
    pub target: Index,
    pub source: Index,
    pub leaf: Value,
}

pub fn arb_operation_seed() -> impl Strategy<Value = OperationSeed> {
    (0u8..6, any::<Index>(), any::<Index>(), arb_leaf()).prop_map(|(kind, target, source, leaf)| {
        OperationSeed {
            kind,
            target,
            source,
            leaf,
        }
    })
}

/// Where an insertion aimed at `target` lands: the end of an array or node,
/// a fresh member of an object, or the target itself for scalars.
fn insertion_point(value: &Value, target: &Path) -> Path {
    match value.find_child_path(target) {
        Some(v) if v.is_array() || v.is_node() => target / PathEntry::EndOfArray,
        Some(v) if v.is_object() => target / "added",
        _ => target.clone(),
    }
}

/// Turn a seed into an operation aimed at existing locations of `value`.
///
/// The operation may still be invalid (removing the root, moving a value
/// into itself); callers skip those.
pub fn pick_operation(value: &Value, seed: &OperationSeed) -> PatchOperation {
    let paths = all_paths(value);
    let target = seed.target.get(&paths).clone();
    let source = seed.source.get(&paths).clone();
    match seed.kind {
        0 => PatchOperation::add(insertion_point(value, &target), seed.leaf.clone()),
        1 => PatchOperation::remove(target),
        2 => PatchOperation::replace(target, seed.leaf.clone()),
        3 => PatchOperation::copy(source, insertion_point(value, &target)),
        4 => PatchOperation::move_(source, insertion_point(value, &target)),
        _ => {
            let current = value.find_child_path(&target).cloned().unwrap_or_default();
            PatchOperation::test(target, current)
        }
    }
}
