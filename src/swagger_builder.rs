use crate::definition_generator::Definitions;
use crate::description::{Api, HttpMethod, Service};
use crate::error::Result;
use crate::model_generator::ModelGenerator;
use crate::schema::{merge_maps, ArrayMerge, Schema};
use crate::service_transformer::ServiceTransformer;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Swagger specification version emitted in every document
pub const SWAGGER_VERSION: &str = "2.0";

/// Swagger document builder.
///
/// Starts from the top-level `swagger`/`info` metadata, deep-merges one fragment per
/// service and finally applies manual overrides, which always win over generated
/// content.
pub struct SwaggerBuilder {
    /// Accumulated document
    document: Map<String, Value>,
    /// Manual overrides applied last
    overrides: Map<String, Value>,
}

/// Swagger Tag object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Tag description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Swagger PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

/// Swagger Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Tags grouping this operation (the service name)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters (path, query, body)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Content types the operation can produce
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Responses keyed by status code
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<u16, Response>,
    /// Security requirements (scheme name -> scopes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

/// Swagger Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter location (path, query, body)
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Parameter name
    pub name: String,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primitive type, for non-body parameters
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Whether the parameter is required
    pub required: bool,
    /// Schema, for body parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// The location of a parameter in an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Path parameter embedded in the URL (e.g., `/users/{id}`)
    Path,
    /// Query string parameter (e.g., `?page=1`)
    Query,
    /// Request body
    Body,
}

/// Swagger Response object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Response schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// The `{tags, paths, definitions}` contribution of one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceFragment {
    /// Service tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Paths (URL path -> PathItem)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,
    /// Named schema definitions
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: Definitions,
}

/// Complete Swagger document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwaggerDocument {
    root: Map<String, Value>,
}

impl PathItem {
    /// Set the operation for a method, replacing any existing one
    pub fn insert(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot_mut(method) = Some(operation);
    }

    /// Operation registered for a method
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
        }
    }

    /// Take every operation of `other`; `other` wins for methods present in both
    pub fn merge(&mut self, other: PathItem) {
        let PathItem {
            get,
            post,
            put,
            delete,
            patch,
            options,
            head,
        } = other;
        let incoming = [
            (HttpMethod::Get, get),
            (HttpMethod::Post, post),
            (HttpMethod::Put, put),
            (HttpMethod::Delete, delete),
            (HttpMethod::Patch, patch),
            (HttpMethod::Options, options),
            (HttpMethod::Head, head),
        ];
        for (method, operation) in incoming {
            if let Some(operation) = operation {
                self.insert(method, operation);
            }
        }
    }

    /// Whether no operation is registered
    pub fn is_empty(&self) -> bool {
        self.get.is_none()
            && self.post.is_none()
            && self.put.is_none()
            && self.delete.is_none()
            && self.patch.is_none()
            && self.options.is_none()
            && self.head.is_none()
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
        }
    }
}

impl Response {
    /// Whether the response has neither a description nor a schema
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.schema.is_none()
    }
}

impl SwaggerDocument {
    /// Top-level value for a key, e.g. `paths` or `definitions`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// The `paths` object, if any path was generated
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// The `definitions` object, if any definition was generated
    pub fn definitions(&self) -> Option<&Map<String, Value>> {
        self.root.get("definitions").and_then(Value::as_object)
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl SwaggerBuilder {
    /// Create a builder holding only the top-level metadata
    pub fn new(title: &str, version: &str) -> Self {
        debug!("Initializing SwaggerBuilder for {} v{}", title, version);
        let mut document = Map::new();
        document.insert("swagger".to_string(), Value::from(SWAGGER_VERSION));
        document.insert(
            "info".to_string(),
            serde_json::json!({"title": title, "version": version}),
        );

        Self {
            document,
            overrides: Map::new(),
        }
    }

    /// Build the builder for a whole API, adding every service.
    ///
    /// A service whose fragment cannot be merged is logged and skipped so the rest
    /// of the document is still produced.
    pub fn from_api(api: &Api, model_generator: &ModelGenerator) -> Self {
        let mut builder = Self::new(&api.name, &api.version).with_overrides(api.overrides.clone());

        for service in &api.services {
            if let Err(e) = builder.add_service(service, model_generator) {
                warn!("Skipping service {}: {}", service.name, e);
            }
        }

        builder
    }

    /// Set manual overrides merged on top of the generated document
    pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Generate and merge the fragment of one service
    pub fn add_service(&mut self, service: &Service, model_generator: &ModelGenerator) -> Result<()> {
        debug!("Adding service: {}", service.name);
        let fragment = ServiceTransformer::new(service, model_generator).to_fragment();
        self.add_fragment(&fragment)
    }

    /// Deep-merge a service fragment into the document.
    ///
    /// Arrays concatenate, objects merge key by key and scalars take the later
    /// value, so services sharing a path contribute their methods side by side.
    pub fn add_fragment(&mut self, fragment: &ServiceFragment) -> Result<()> {
        match serde_json::to_value(fragment)? {
            Value::Object(map) => {
                merge_maps(&mut self.document, map, ArrayMerge::Append);
            }
            other => debug!("Ignoring non-object fragment: {}", other),
        }
        Ok(())
    }

    /// Build the final Swagger document
    pub fn build(self) -> SwaggerDocument {
        debug!("Building final Swagger document");
        let mut root = self.document;
        merge_maps(&mut root, self.overrides, ArrayMerge::Append);
        SwaggerDocument { root }
    }
}

/// Generate the Swagger document of an API with the default matchers
pub fn build_document(api: &Api) -> SwaggerDocument {
    SwaggerBuilder::from_api(api, &ModelGenerator::new()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{Field, Operation as ServiceOperation};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn widget_service() -> Service {
        let mut service = Service::new("Widget", "/widget[/:id]");
        service.route_identifier_name = Some("id".to_string());
        service.request_accept_types = vec!["application/hal+json".to_string()];
        service.operations.push(ServiceOperation::new(HttpMethod::Get).with_status(200, "OK"));
        service
            .entity_operations
            .push(ServiceOperation::new(HttpMethod::Get).with_status(200, "OK"));
        let mut color = Field::new("color");
        color.required = true;
        color.type_name = Some("string".to_string());
        service.fields.insert("entity".to_string(), vec![color]);
        service
    }

    #[test]
    fn test_new_builder() {
        let document = SwaggerBuilder::new("Shop", "1").build().into_value();
        assert_eq!(
            document,
            json!({"swagger": "2.0", "info": {"title": "Shop", "version": "1"}})
        );
    }

    #[test]
    fn test_path_item_insert_and_merge() {
        let mut collection = PathItem::default();
        assert!(collection.is_empty());
        collection.insert(
            HttpMethod::Get,
            Operation {
                description: Some("list".to_string()),
                ..Default::default()
            },
        );

        let mut entity = PathItem::default();
        entity.insert(
            HttpMethod::Get,
            Operation {
                description: Some("fetch".to_string()),
                ..Default::default()
            },
        );
        entity.insert(HttpMethod::Delete, Operation::default());

        collection.merge(entity);
        assert_eq!(
            collection.operation(HttpMethod::Get).unwrap().description,
            Some("fetch".to_string())
        );
        assert!(collection.operation(HttpMethod::Delete).is_some());
        assert!(collection.operation(HttpMethod::Post).is_none());
    }

    #[test]
    fn test_parameter_serialization() {
        let parameter = Parameter {
            location: ParameterLocation::Path,
            name: "id".to_string(),
            description: Some("URL parameter id".to_string()),
            param_type: Some("string".to_string()),
            required: true,
            schema: None,
        };
        assert_eq!(
            serde_json::to_value(&parameter).unwrap(),
            json!({
                "in": "path",
                "name": "id",
                "description": "URL parameter id",
                "type": "string",
                "required": true
            })
        );
    }

    #[test]
    fn test_response_is_empty() {
        assert!(Response::default().is_empty());
        assert!(!Response {
            description: "Gone".to_string(),
            schema: None,
        }
        .is_empty());
        assert!(!Response {
            description: String::new(),
            schema: Some(Schema::new()),
        }
        .is_empty());
    }

    #[test]
    fn test_operation_prunes_empty_values() {
        let mut operation = Operation::default();
        operation.responses.insert(
            404,
            Response {
                description: "Not Found".to_string(),
                schema: None,
            },
        );
        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({"responses": {"404": {"description": "Not Found"}}})
        );
    }

    #[test]
    fn test_widget_document() {
        let mut api = Api::new("Shop", "1");
        api.services.push(widget_service());
        let document = build_document(&api);

        let paths = document.paths().unwrap();
        assert!(paths.contains_key("/widget"));
        assert!(paths.contains_key("/widget/{id}"));

        let definitions = document.definitions().unwrap();
        assert_eq!(definitions["WidgetEntity"]["required"], json!(["color"]));
        assert!(definitions.contains_key("WidgetHalCollection"));
        assert!(definitions.contains_key("HalJsonLinks"));
        assert_eq!(
            paths["/widget"]["get"]["responses"]["200"]["schema"],
            json!({"$ref": "#/definitions/WidgetHalCollection"})
        );
        assert_eq!(document.get("tags").unwrap(), &json!([{"name": "Widget"}]));
    }

    #[test]
    fn test_disjoint_services_are_both_kept() {
        let mut gadget = widget_service();
        gadget.name = "Gadget".to_string();
        gadget.route = "/gadget[/:id]".to_string();

        let mut api = Api::new("Shop", "1");
        api.services.push(widget_service());
        api.services.push(gadget);
        let document = build_document(&api);

        let paths = document.paths().unwrap();
        assert_eq!(paths.len(), 4);
        let definitions = document.definitions().unwrap();
        for name in ["WidgetEntity", "GadgetEntity", "WidgetHalCollection", "GadgetHalCollection", "HalJsonLinks"] {
            assert!(definitions.contains_key(name), "missing {}", name);
        }
        assert_eq!(document.get("tags").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_services_sharing_a_path_union_methods() {
        let mut reader = Service::new("Status", "/status");
        reader.operations.push(ServiceOperation::new(HttpMethod::Get));
        let mut writer = Service::new("StatusUpdate", "/status");
        writer.operations.push(ServiceOperation::new(HttpMethod::Post));

        let mut api = Api::new("Ops", "1");
        api.services.push(reader);
        api.services.push(writer);
        let document = build_document(&api);

        let status = document.paths().unwrap()["/status"].as_object().unwrap();
        assert!(status.contains_key("get"));
        assert!(status.contains_key("post"));
    }

    #[test]
    fn test_overrides_win() {
        let mut api = Api::new("Shop", "1");
        api.services.push(widget_service());
        api.overrides.insert(
            "info".to_string(),
            json!({"title": "Shop API", "description": "Manual"}),
        );
        api.overrides.insert("host".to_string(), json!("shop.example.com"));

        let document = build_document(&api).into_value();
        assert_eq!(
            document["info"],
            json!({"title": "Shop API", "version": "1", "description": "Manual"})
        );
        assert_eq!(document["host"], json!("shop.example.com"));
    }

    #[test]
    fn test_add_fragment_merges_definitions() {
        let mut builder = SwaggerBuilder::new("Shop", "1");
        let mut fragment = ServiceFragment::default();
        fragment
            .definitions
            .insert("A".to_string(), Schema::new());
        fragment.tags.push(Tag {
            name: "A".to_string(),
            description: None,
        });
        builder.add_fragment(&fragment).unwrap();

        let document = builder.build().into_value();
        assert_eq!(document["tags"], json!([{"name": "A"}]));
        assert_eq!(document["definitions"], json!({"A": {}}));
    }
}
