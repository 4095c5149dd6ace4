//! Keyed entry storage shared by objects and node properties.

use dom_path::Name;

use super::Value;

pub type ObjectEntry = (Name, Value);

/// Ordered member list. Keys may repeat when read from a backend; writes
/// through [`insert`] keep them unique.
pub type Object = Vec<ObjectEntry>;

pub(crate) fn position(entries: &[ObjectEntry], key: &str) -> Option<usize> {
    entries.iter().position(|(k, _)| k.as_str() == key)
}

/// Like [`position`] but lets shared names match by identity first.
pub(crate) fn position_name(entries: &[ObjectEntry], key: &Name) -> Option<usize> {
    entries.iter().position(|(k, _)| k == key)
}

/// Insert or overwrite `key`, returning the previous value.
///
/// The first matching entry keeps its position; later duplicates are dropped.
pub(crate) fn insert(entries: &mut Object, key: Name, value: Value) -> Option<Value> {
    let Some(pos) = position_name(entries, &key) else {
        entries.push((key, value));
        return None;
    };
    let old = std::mem::replace(&mut entries[pos].1, value);
    let mut index = 0;
    entries.retain(|(k, _)| {
        let keep = index <= pos || *k != key;
        index += 1;
        keep
    });
    Some(old)
}

/// Remove every entry named `key`, returning the first removed value.
pub(crate) fn remove(entries: &mut Object, key: &str) -> Option<Value> {
    let pos = position(entries, key)?;
    let (_, removed) = entries.remove(pos);
    entries.retain(|(k, _)| k.as_str() != key);
    Some(removed)
}

/// Order-insensitive member comparison.
///
/// Repeated keys are matched one to one: the n-th `key` entry of `a` must
/// equal the n-th `key` entry of `b`.
pub(crate) fn entries_equal(a: &[ObjectEntry], b: &[ObjectEntry]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().enumerate().all(|(pos, (key, val_a))| {
        let nth = a[..pos].iter().filter(|(k, _)| k == key).count();
        b.iter()
            .filter(|(k, _)| k == key)
            .nth(nth)
            .is_some_and(|(_, val_b)| val_a == val_b)
    })
}

/// True if some key appears more than once.
pub(crate) fn has_duplicate_keys(entries: &[ObjectEntry]) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(pos, (key, _))| entries[..pos].iter().any(|(k, _)| k == key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(entries: &[(&str, i64)]) -> Object {
        entries
            .iter()
            .map(|(k, v)| (Name::from(*k), Value::from(*v)))
            .collect()
    }

    #[test]
    fn insert_overwrites_in_place_and_dedupes() {
        let mut entries = obj(&[("a", 1), ("b", 2), ("a", 3), ("c", 4)]);
        let old = insert(&mut entries, Name::from("a"), Value::from(9));
        assert_eq!(old, Some(Value::from(1)));
        assert_eq!(entries, obj(&[("a", 9), ("b", 2), ("c", 4)]));
    }

    #[test]
    fn insert_appends_new_key() {
        let mut entries = obj(&[("a", 1)]);
        assert_eq!(insert(&mut entries, Name::from("z"), Value::from(2)), None);
        assert_eq!(entries.last().map(|(k, _)| k.as_str()), Some("z"));
    }

    #[test]
    fn remove_drops_all_duplicates() {
        let mut entries = obj(&[("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(remove(&mut entries, "a"), Some(Value::from(1)));
        assert_eq!(entries, obj(&[("b", 2)]));
        assert_eq!(remove(&mut entries, "missing"), None);
    }

    #[test]
    fn equality_ignores_order() {
        assert!(entries_equal(
            &obj(&[("a", 1), ("b", 2)]),
            &obj(&[("b", 2), ("a", 1)])
        ));
        assert!(!entries_equal(&obj(&[("a", 1)]), &obj(&[("a", 2)])));
        assert!(!entries_equal(&obj(&[("a", 1)]), &obj(&[("a", 1), ("b", 2)])));
    }

    #[test]
    fn equality_matches_repeated_keys_one_to_one() {
        let repeated = obj(&[("k", 1), ("k", 1)]);
        let distinct = obj(&[("k", 1), ("j", 2)]);
        assert!(!entries_equal(&repeated, &distinct));
        assert!(!entries_equal(&distinct, &repeated));

        assert!(entries_equal(
            &obj(&[("k", 1), ("j", 0), ("k", 2)]),
            &obj(&[("j", 0), ("k", 1), ("k", 2)])
        ));
        assert!(!entries_equal(
            &obj(&[("k", 1), ("k", 2)]),
            &obj(&[("k", 2), ("k", 1)])
        ));
    }

    #[test]
    fn detects_duplicate_keys() {
        assert!(has_duplicate_keys(&obj(&[("a", 1), ("b", 2), ("a", 3)])));
        assert!(!has_duplicate_keys(&obj(&[("a", 1), ("b", 2)])));
        assert!(!has_duplicate_keys(&[]));
    }
}
