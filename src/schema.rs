//! Schema fragments and the shared value utilities used to compose them.
//!
//! A [`Schema`] is an ordered JSON object holding a subset of JSON-Schema keywords
//! (`type`, `format`, `properties`, `items`, `required`, `$ref`, ...). Two utilities
//! operate on fragments and on whole documents:
//!
//! - [`clean_empty_values`] drops keys whose value is empty (`null`, `""`, `[]`, `{}`).
//! - [`deep_merge`] merges one value into another; objects merge key by key, scalars
//!   are overwritten, and arrays follow an explicit [`ArrayMerge`] rule.

use serde_json::{Map, Value};

/// An ordered JSON-Schema fragment
pub type Schema = Map<String, Value>;

/// Prefix for references into the document's `definitions`
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// How arrays found at the same key are combined by [`deep_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayMerge {
    /// Overlay items are appended to the base array
    Append,
    /// The overlay array replaces the base array
    Replace,
}

/// Build a `{"$ref": "#/definitions/<name>"}` fragment
pub fn definition_ref(name: &str) -> Schema {
    let mut schema = Schema::new();
    schema.insert(
        "$ref".to_string(),
        Value::String(format!("{}{}", DEFINITIONS_REF_PREFIX, name)),
    );
    schema
}

/// Whether a value counts as empty for pruning purposes
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Remove top-level keys holding empty values
pub fn clean_empty_values(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, value)| !is_empty_value(value))
        .collect()
}

/// Deep-merge `overlay` into `base`.
///
/// Objects are merged recursively, arrays are combined according to `arrays`, and
/// any other combination lets the overlay win.
pub fn deep_merge(base: &mut Value, overlay: Value, arrays: ArrayMerge) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_maps(base_map, overlay_map, arrays);
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => match arrays {
            ArrayMerge::Append => base_items.extend(overlay_items),
            ArrayMerge::Replace => *base_items = overlay_items,
        },
        (base, overlay) => *base = overlay,
    }
}

/// Deep-merge the entries of `overlay` into `base`, see [`deep_merge`]
pub fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>, arrays: ArrayMerge) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => deep_merge(existing, value, arrays),
            None => {
                base.insert(key, value);
            }
        }
    }
}
