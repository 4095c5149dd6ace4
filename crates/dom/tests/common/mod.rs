#![allow(dead_code)]

pub mod strategies;

use dom::json::from_json;
use dom::{Path, Value};
use tracing_subscriber::EnvFilter;

/// Build a DOM value from a `json!` literal.
pub fn doc(json: serde_json::Value) -> Value {
    from_json(&json).expect("fixture JSON converts to a DOM value")
}

pub fn path(pointer: &str) -> Path {
    Path::parse(pointer).expect("fixture path parses")
}

/// Route library logs to the test harness. Set `RUST_LOG=dom=trace` to see
/// per-operation output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Every path addressing an existing value, root first.
pub fn all_paths(value: &Value) -> Vec<Path> {
    let mut out = vec![Path::new()];
    collect_paths(value, &Path::new(), &mut out);
    out
}

fn collect_paths(value: &Value, at: &Path, out: &mut Vec<Path>) {
    if let Some(entries) = value.as_object() {
        for (key, child) in entries {
            let child_path = at / key;
            out.push(child_path.clone());
            collect_paths(child, &child_path, out);
        }
    }
    if let Some(items) = value.as_array() {
        for (index, child) in items.iter().enumerate() {
            let child_path = at / index;
            out.push(child_path.clone());
            collect_paths(child, &child_path, out);
        }
    }
}
