//! Deep merge mechanics shared by every ingestion path.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When both sides are objects they merge recursively: keys are added or
///   overwritten, and nested objects are overlaid.
/// - Anything else replaces `target` wholesale, so arrays and scalars are
///   never combined.
///
/// # Examples
///
/// ```rust
/// use strata_config::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// // Arrays replace existing values.
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}));
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(existing), Value::Object(incoming)) => merge_map(existing, incoming),
        (slot, incoming) => *slot = incoming,
    }
}

/// Merge every entry of `layer` into `target`.
///
/// Keys missing from `target` are inserted as-is; keys present on both sides
/// go through [`merge_value`].
pub fn merge_map(target: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}
