//! Dot-delimited path resolution over the working-state JSON tree.

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Follow a dot path of nested-map lookups. `None` when any segment is
/// absent or sits under a value that is not a mapping.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Descend to the mapping that owns the final path segment, creating empty
/// mappings for missing intermediates. An existing intermediate that is not
/// a mapping is a type error, never silently replaced.
pub fn resolve_parent<'a>(
    root: &'a mut Value,
    path: &str,
) -> Result<(&'a mut Map<String, Value>, String), CoreError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = segments.pop().unwrap_or_default().to_string();

    let mut current = root;
    for segment in &segments {
        let map = current.as_object_mut().ok_or_else(|| {
            CoreError::TypeMismatch(format!(
                "path {path}: value before segment {segment} is not a mapping"
            ))
        })?;
        current = map
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let map = current.as_object_mut().ok_or_else(|| {
        CoreError::TypeMismatch(format!("path {path}: parent of {leaf} is not a mapping"))
    })?;
    Ok((map, leaf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let root = json!({"a": {"b": {"c": 42}}});
        assert_eq!(lookup(&root, "a.b.c"), Some(&json!(42)));
        assert_eq!(lookup(&root, "a.b"), Some(&json!({"c": 42})));
        assert_eq!(lookup(&root, "a.missing"), None);
        assert_eq!(lookup(&root, "a.b.c.d"), None); // 42 is not a mapping
    }

    #[test]
    fn test_resolve_parent_creates_intermediates() {
        let mut root = json!({});
        {
            let (parent, leaf) = resolve_parent(&mut root, "x.y.z").unwrap();
            parent.insert(leaf, json!(1));
        }
        assert_eq!(root, json!({"x": {"y": {"z": 1}}}));
    }

    #[test]
    fn test_resolve_parent_rejects_non_mapping_intermediate() {
        let mut root = json!({"x": "scalar"});
        let err = resolve_parent(&mut root, "x.y").unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch(_)));
        // Untouched on failure.
        assert_eq!(root, json!({"x": "scalar"}));
    }
}
