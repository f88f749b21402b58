//! Example-driven schema inference.
//!
//! [`ModelGenerator`] turns an example payload into a JSON-Schema fragment. Each
//! value shape is owned by one [`TypeMatcher`]; matchers are tried in a fixed
//! priority order and the first one whose [`TypeMatcher::matches`] returns `true`
//! generates the fragment. Composite shapes (objects and arrays) recurse back into
//! the generator.
//!
//! # Example
//!
//! ```
//! use apidoc_swagger::model_generator::ModelGenerator;
//! use serde_json::json;
//!
//! let generator = ModelGenerator::new();
//! let schema = generator.generate(r#"{"name": "widget"}"#).unwrap().unwrap();
//! assert_eq!(schema["properties"]["name"], json!({"type": "string"}));
//! ```

use crate::error::{Error, Result};
use crate::schema::Schema;
use log::debug;
use serde_json::Value;

/// Fallback item type for arrays whose example is empty
const DEFAULT_ITEM_TYPE: &str = "string";

/// Matchers in the order they are consulted
pub const MATCHER_PRIORITY: [TypeMatcher; 7] = [
    TypeMatcher::String,
    TypeMatcher::Ref,
    TypeMatcher::Object,
    TypeMatcher::Array,
    TypeMatcher::Number,
    TypeMatcher::Boolean,
    TypeMatcher::Null,
];

/// The closed set of example-value shapes the generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMatcher {
    /// Plain text
    String,
    /// An object carrying a `$ref` marker, already a schema fragment
    Ref,
    /// Any other object
    Object,
    /// A list; the first element describes the items
    Array,
    /// Integer or floating point number
    Number,
    /// `true` or `false`
    Boolean,
    /// `null`, which carries no shape information
    Null,
}

impl TypeMatcher {
    /// Whether this matcher owns the given value
    pub fn matches(&self, target: &Value) -> bool {
        match self {
            TypeMatcher::String => target.is_string(),
            TypeMatcher::Ref => target
                .as_object()
                .is_some_and(|object| object.contains_key("$ref")),
            TypeMatcher::Object => target.is_object(),
            TypeMatcher::Array => target.is_array(),
            TypeMatcher::Number => target.is_number(),
            TypeMatcher::Boolean => target.is_boolean(),
            TypeMatcher::Null => target.is_null(),
        }
    }

    /// Generate the fragment for a value this matcher owns
    fn generate(&self, target: &Value, generator: &ModelGenerator) -> Result<Schema> {
        let mut schema = Schema::new();
        match (self, target) {
            (TypeMatcher::String, _) => {
                schema.insert("type".to_string(), Value::from("string"));
            }
            (TypeMatcher::Ref, Value::Object(object)) => {
                schema = object.clone();
            }
            (TypeMatcher::Object, Value::Object(object)) => {
                schema.insert("type".to_string(), Value::from("object"));
                let mut properties = Schema::new();
                for (name, value) in object {
                    let property = generator.generate_value(value)?;
                    // null examples say nothing about the property
                    if !property.is_empty() {
                        properties.insert(name.clone(), Value::Object(property));
                    }
                }
                if !properties.is_empty() {
                    schema.insert("properties".to_string(), Value::Object(properties));
                }
            }
            (TypeMatcher::Array, Value::Array(items)) => {
                let mut item_schema = match items.first() {
                    Some(first) => generator.generate_value(first)?,
                    None => Schema::new(),
                };
                if item_schema.is_empty() {
                    item_schema.insert("type".to_string(), Value::from(DEFAULT_ITEM_TYPE));
                }
                schema.insert("type".to_string(), Value::from("array"));
                schema.insert("items".to_string(), Value::Object(item_schema));
            }
            (TypeMatcher::Number, Value::Number(number)) => {
                let type_name = if number.is_i64() || number.is_u64() {
                    "integer"
                } else {
                    "number"
                };
                schema.insert("type".to_string(), Value::from(type_name));
            }
            (TypeMatcher::Boolean, _) => {
                schema.insert("type".to_string(), Value::from("boolean"));
            }
            (TypeMatcher::Null, _) => {}
            _ => {
                return Err(Error::UnmatchedType {
                    shape: describe_shape(target).to_string(),
                })
            }
        }
        Ok(schema)
    }
}

/// Example-driven schema generator
#[derive(Debug, Clone)]
pub struct ModelGenerator {
    matchers: Vec<TypeMatcher>,
}

impl ModelGenerator {
    /// Create a generator using [`MATCHER_PRIORITY`]
    pub fn new() -> Self {
        Self::with_matchers(MATCHER_PRIORITY.to_vec())
    }

    /// Create a generator consulting only the given matchers, in order
    pub fn with_matchers(matchers: Vec<TypeMatcher>) -> Self {
        Self { matchers }
    }

    /// Generate a schema from an example payload given as JSON text.
    ///
    /// Returns `Ok(None)` when the example is blank or describes nothing (a bare
    /// `null`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnmatchedType`] when the text is not JSON or a value inside
    /// it is not claimed by any configured matcher.
    pub fn generate(&self, example: &str) -> Result<Option<Schema>> {
        if example.trim().is_empty() {
            return Ok(None);
        }

        let target: Value = serde_json::from_str(example).map_err(|e| {
            debug!("Example payload is not JSON: {}", e);
            Error::UnmatchedType {
                shape: "text that is not JSON".to_string(),
            }
        })?;

        let schema = self.generate_value(&target)?;
        Ok(if schema.is_empty() { None } else { Some(schema) })
    }

    /// Generate a schema for an already decoded value
    pub fn generate_value(&self, target: &Value) -> Result<Schema> {
        let matcher = self
            .matchers
            .iter()
            .find(|matcher| matcher.matches(target))
            .ok_or_else(|| Error::UnmatchedType {
                shape: describe_shape(target).to_string(),
            })?;
        matcher.generate(target, self)
    }
}

impl Default for ModelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
