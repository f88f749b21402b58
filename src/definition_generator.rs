//! Named schema definitions derived from a service.
//!
//! A service contributes up to four kinds of definitions:
//!
//! - `<Service>Entity` built from the `entity` field group
//! - `<Service>Input` built from the `input_filter` field group, overridden by the
//!   schema inferred from the first POST example, for services that accept writes
//! - `<Service>HalCollection` HAL+JSON collection wrappers requested by the path
//!   generator
//! - the shared `HalJsonLinks` definition, whenever a wrapper exists

use crate::description::{Field, HttpMethod, Service, ENTITY_FIELDS, INPUT_FILTER_FIELDS};
use crate::model_generator::ModelGenerator;
use crate::schema::{clean_empty_values, definition_ref, merge_maps, ArrayMerge, Schema};
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

/// Named definitions in insertion order
pub type Definitions = IndexMap<String, Schema>;

/// Name of the shared HAL link relations definition
pub const HAL_JSON_LINKS: &str = "HalJsonLinks";

const DEFAULT_TYPE: &str = "string";
const ARRAY_TYPE: &str = "array";
const DATE_TYPE: &str = "date-time";
const NUMBER_TYPE: &str = "number";
const NUMBER_TYPES: [&str; 2] = ["integer", "float"];

const HAL_COLLECTION_DESCRIPTION: &str = "HAL+JSON formatted collection of records. The Hypertext Application Language (HAL) is documented at http://stateless.co/hal_specification.html";

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("Invalid regex"));

/// Definition generator for a single service
pub struct DefinitionGenerator<'a> {
    service: &'a Service,
    model_generator: &'a ModelGenerator,
}

impl<'a> DefinitionGenerator<'a> {
    /// Create a generator for the given service
    pub fn new(service: &'a Service, model_generator: &'a ModelGenerator) -> Self {
        Self {
            service,
            model_generator,
        }
    }

    /// `<Service>Entity`
    pub fn entity_definition_name(&self) -> String {
        format!("{}Entity", self.service.name)
    }

    /// `<Service>Input`, referenced by body parameters
    pub fn input_definition_name(&self) -> String {
        format!("{}Input", self.service.name)
    }

    /// `<Service>HalCollection`
    pub fn hal_collection_definition_name(&self) -> String {
        format!("{}HalCollection", self.service.name)
    }

    /// The entity definition, or `None` when the service documents no entity fields
    pub fn entity_definition(&self) -> Option<Schema> {
        let fields = self.service.fields(ENTITY_FIELDS);
        if fields.is_empty() {
            return None;
        }
        Some(model_from_fields(fields))
    }

    /// The input definition, or `None` when the service has no POST/PUT/PATCH operation
    pub fn input_definition(&self) -> Option<Schema> {
        if !self.service.has_mutating_operation() {
            return None;
        }

        let mut model = model_from_fields(self.service.fields(INPUT_FILTER_FIELDS));
        if let Some(from_example) = self.model_from_first_post_example() {
            merge_maps(&mut model, from_example, ArrayMerge::Replace);
        }
        Some(model)
    }

    fn model_from_first_post_example(&self) -> Option<Schema> {
        let example = self
            .service
            .all_operations()
            .find(|operation| operation.http_method == HttpMethod::Post)?
            .request_description
            .as_deref()?;

        match self.model_generator.generate(example) {
            Ok(schema) => schema,
            Err(e) => {
                debug!(
                    "Ignoring POST example of service {}: {}",
                    self.service.name, e
                );
                None
            }
        }
    }

    /// Key under `_embedded` holding the collection items.
    ///
    /// Taken from the `collection_name` documentation override, otherwise the
    /// service name in snake case (`WidgetPart` becomes `widget_part`).
    pub fn collection_name(&self) -> String {
        match self.service.collection_name_override() {
            Some(name) => name.to_string(),
            None => CAMEL_BOUNDARY
                .replace_all(&self.service.name, "${1}_${2}")
                .to_lowercase(),
        }
    }

    /// HAL+JSON collection wrapper around the entity definition
    pub fn hal_collection_definition(&self) -> Schema {
        let collection_name = self.collection_name();
        let mut properties = Schema::new();
        properties.insert(
            "_links".to_string(),
            Value::Object(definition_ref(HAL_JSON_LINKS)),
        );
        properties.insert(
            "_embedded".to_string(),
            json!({
                "type": "object",
                "description": "HAL+JSON formatted collection of models",
                "properties": {
                    (collection_name): {
                        "type": ARRAY_TYPE,
                        "items": definition_ref(&self.entity_definition_name()),
                    }
                }
            }),
        );
        properties.extend(hal_json_counts());

        let mut schema = Schema::new();
        schema.insert("type".to_string(), Value::from("object"));
        schema.insert(
            "description".to_string(),
            Value::from(HAL_COLLECTION_DESCRIPTION),
        );
        schema.insert("properties".to_string(), Value::Object(properties));
        schema
    }

    /// All definitions of the service.
    ///
    /// `hal_collections` are the wrappers requested while generating paths; the
    /// shared [`HAL_JSON_LINKS`] definition is added once when any exist.
    pub fn definitions(&self, hal_collections: Definitions) -> Definitions {
        let mut definitions = Definitions::new();

        if let Some(entity) = self.entity_definition() {
            definitions.insert(self.entity_definition_name(), entity);
        }
        if let Some(input) = self.input_definition() {
            definitions.insert(self.input_definition_name(), input);
        }
        if !hal_collections.is_empty() {
            definitions.extend(hal_collections);
            definitions.insert(HAL_JSON_LINKS.to_string(), hal_json_links());
        }

        definitions
    }
}

/// Reduce a list of fields to an object schema with a `required` list
pub fn model_from_fields(fields: &[Field]) -> Schema {
    let mut properties = Schema::new();
    let mut required = Vec::new();

    for field in fields {
        properties.insert(field.name.clone(), Value::Object(field_properties(field)));
        if field.required {
            required.push(Value::from(field.name.clone()));
        }
    }

    let mut model = Schema::new();
    model.insert("type".to_string(), Value::from("object"));
    model.insert("properties".to_string(), Value::Object(properties));
    model.insert("required".to_string(), Value::Array(required));
    clean_empty_values(model)
}

/// Property schema for one field
pub fn field_properties(field: &Field) -> Schema {
    let field_type = field
        .field_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TYPE);

    let mut properties = Schema::new();
    if field_type == ARRAY_TYPE {
        let item_type = field
            .type_name
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TYPE);
        properties.insert("type".to_string(), Value::from(ARRAY_TYPE));
        properties.insert("items".to_string(), json!({ "type": item_type }));
    } else if field_type == DATE_TYPE {
        properties.insert("type".to_string(), Value::from(DEFAULT_TYPE));
        properties.insert("format".to_string(), Value::from(DATE_TYPE));
    } else if NUMBER_TYPES.contains(&field_type) {
        properties.insert("type".to_string(), Value::from(NUMBER_TYPE));
        properties.insert("format".to_string(), Value::from(field_type));
    } else {
        properties.insert("type".to_string(), Value::from(field_type));
    }
    properties.insert(
        "description".to_string(),
        field.description.clone().map(Value::from).unwrap_or(Value::Null),
    );
    clean_empty_values(properties)
}

/// Pagination counters merged into every HAL collection wrapper
fn hal_json_counts() -> Schema {
    let counts = [
        ("total_items", "Number of records found"),
        ("page_count", "Number of pages in result set"),
        ("page_size", "Number of records listed per page"),
        ("page", "Current page"),
    ];

    let mut schema = Schema::new();
    for (name, description) in counts {
        let mut count = json!({
            "type": NUMBER_TYPE,
            "format": "integer",
            "description": description,
        });
        if name == "page" {
            count["default"] = json!(1);
        }
        schema.insert(name.to_string(), count);
    }
    schema
}

/// The shared `HalJsonLinks` definition
pub fn hal_json_links() -> Schema {
    let relations = [
        ("self", "Link relation to the current page of the collection"),
        ("first", "Link relation to the first page of the collection"),
        ("last", "Link relation to the last page of the collection"),
        ("next", "Link relation to the next page of the collection"),
        ("prev", "Link relation to the previous page of the collection"),
    ];

    let mut properties = Schema::new();
    for (relation, description) in relations {
        properties.insert(
            relation.to_string(),
            json!({
                "type": "object",
                "description": description,
                "properties": {
                    "href": {"type": "string"}
                }
            }),
        );
    }

    let mut schema = Schema::new();
    schema.insert("type".to_string(), Value::from("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Operation;
    use pretty_assertions::assert_eq;

    fn field(name: &str, field_type: Option<&str>, required: bool) -> Field {
        Field {
            name: name.to_string(),
            description: None,
            required,
            type_name: None,
            field_type: field_type.map(str::to_string),
        }
    }

    #[test]
    fn test_field_type_mapping() {
        let mut tags = field("tags", Some("array"), false);
        tags.type_name = Some("integer".to_string());

        assert_eq!(
            Value::Object(field_properties(&field("color", None, true))),
            json!({"type": "string"})
        );
        assert_eq!(
            Value::Object(field_properties(&tags)),
            json!({"type": "array", "items": {"type": "integer"}})
        );
        assert_eq!(
            Value::Object(field_properties(&field("created", Some("date-time"), false))),
            json!({"type": "string", "format": "date-time"})
        );
        assert_eq!(
            Value::Object(field_properties(&field("count", Some("integer"), false))),
            json!({"type": "number", "format": "integer"})
        );
        assert_eq!(
            Value::Object(field_properties(&field("ratio", Some("float"), false))),
            json!({"type": "number", "format": "float"})
        );
        assert_eq!(
            Value::Object(field_properties(&field("flag", Some("boolean"), false))),
            json!({"type": "boolean"})
        );
    }

    #[test]
    fn test_field_description_kept_when_present() {
        let mut color = field("color", None, false);
        color.description = Some("Paint color".to_string());
        assert_eq!(
            Value::Object(field_properties(&color)),
            json!({"type": "string", "description": "Paint color"})
        );

        color.description = Some(String::new());
        assert_eq!(
            Value::Object(field_properties(&color)),
            json!({"type": "string"})
        );
    }

    #[test]
    fn test_model_from_fields() {
        let model = model_from_fields(&[
            field("color", None, true),
            field("size", Some("integer"), false),
        ]);
        assert_eq!(
            Value::Object(model),
            json!({
                "type": "object",
                "properties": {
                    "color": {"type": "string"},
                    "size": {"type": "number", "format": "integer"}
                },
                "required": ["color"]
            })
        );
    }

    #[test]
    fn test_model_from_no_fields() {
        assert_eq!(Value::Object(model_from_fields(&[])), json!({"type": "object"}));
    }

    #[test]
    fn test_entity_definition_absent_without_fields() {
        let service = Service::new("Widget", "/widget");
        let generator = ModelGenerator::new();
        let definitions = DefinitionGenerator::new(&service, &generator);
        assert!(definitions.entity_definition().is_none());
        assert!(definitions.definitions(Definitions::new()).is_empty());
    }

    #[test]
    fn test_input_definition_requires_mutating_operation() {
        let mut service = Service::new("Widget", "/widget");
        service
            .fields
            .insert("input_filter".to_string(), vec![field("color", None, true)]);
        service.operations.push(Operation::new(HttpMethod::Get));

        let generator = ModelGenerator::new();
        assert!(DefinitionGenerator::new(&service, &generator)
            .input_definition()
            .is_none());

        service.entity_operations.push(Operation::new(HttpMethod::Put));
        let input = DefinitionGenerator::new(&service, &generator)
            .input_definition()
            .unwrap();
        assert_eq!(input["required"], json!(["color"]));
    }

    #[test]
    fn test_input_definition_merges_first_post_example() {
        let mut service = Service::new("Widget", "/widget");
        service.fields.insert(
            "input_filter".to_string(),
            vec![field("color", None, true), field("size", Some("integer"), false)],
        );
        let mut post = Operation::new(HttpMethod::Post);
        post.request_description = Some(r#"{"size": 3, "label": "x"}"#.to_string());
        let mut second_post = Operation::new(HttpMethod::Post);
        second_post.request_description = Some(r#"{"ignored": true}"#.to_string());
        service.operations.push(post);
        service.operations.push(second_post);

        let generator = ModelGenerator::new();
        let input = DefinitionGenerator::new(&service, &generator)
            .input_definition()
            .unwrap();

        assert_eq!(
            Value::Object(input),
            json!({
                "type": "object",
                "properties": {
                    "color": {"type": "string"},
                    "size": {"type": "integer", "format": "integer"},
                    "label": {"type": "string"}
                },
                "required": ["color"]
            })
        );
    }

    #[test]
    fn test_input_definition_ignores_invalid_example() {
        let mut service = Service::new("Widget", "/widget");
        let mut post = Operation::new(HttpMethod::Post);
        post.request_description = Some("<xml/>".to_string());
        service.operations.push(post);

        let generator = ModelGenerator::new();
        let input = DefinitionGenerator::new(&service, &generator)
            .input_definition()
            .unwrap();
        assert_eq!(Value::Object(input), json!({"type": "object"}));
    }

    #[test]
    fn test_collection_name() {
        let generator = ModelGenerator::new();
        let mut service = Service::new("WidgetPartList", "/parts");
        assert_eq!(
            DefinitionGenerator::new(&service, &generator).collection_name(),
            "widget_part_list"
        );

        service
            .docs
            .insert("zf-rest".to_string(), json!({"collection_name": "part_items"}));
        assert_eq!(
            DefinitionGenerator::new(&service, &generator).collection_name(),
            "part_items"
        );

        service
            .docs
            .insert("collection_name".to_string(), json!("parts"));
        assert_eq!(
            DefinitionGenerator::new(&service, &generator).collection_name(),
            "parts"
        );
    }

    #[test]
    fn test_hal_collection_definition() {
        let service = Service::new("Widget", "/widget[/:id]");
        let generator = ModelGenerator::new();
        let wrapper = DefinitionGenerator::new(&service, &generator).hal_collection_definition();

        let properties = wrapper["properties"].as_object().unwrap();
        assert_eq!(
            properties["_links"],
            json!({"$ref": "#/definitions/HalJsonLinks"})
        );
        assert_eq!(
            properties["_embedded"]["properties"]["widget"],
            json!({"type": "array", "items": {"$ref": "#/definitions/WidgetEntity"}})
        );
        for count in ["total_items", "page_count", "page_size", "page"] {
            assert_eq!(properties[count]["type"], json!("number"));
        }
        assert_eq!(properties["page"]["default"], json!(1));
    }

    #[test]
    fn test_definitions_add_links_once() {
        let service = Service::new("Widget", "/widget");
        let generator = ModelGenerator::new();
        let generator = DefinitionGenerator::new(&service, &generator);

        let mut wrappers = Definitions::new();
        wrappers.insert("WidgetHalCollection".to_string(), generator.hal_collection_definition());
        wrappers.insert("OtherHalCollection".to_string(), generator.hal_collection_definition());

        let definitions = generator.definitions(wrappers);
        let names: Vec<_> = definitions.keys().cloned().collect();
        assert_eq!(
            names,
            vec!["WidgetHalCollection", "OtherHalCollection", "HalJsonLinks"]
        );
    }

    #[test]
    fn test_hal_json_links_relations() {
        let links = hal_json_links();
        let relations: Vec<_> = links["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(relations, vec!["self", "first", "last", "next", "prev"]);
        assert_eq!(
            links["properties"]["self"]["properties"]["href"],
            json!({"type": "string"})
        );
    }
}
