//! Input model describing an API and its services.
//!
//! These types mirror the metadata an API documentation tool keeps for each service:
//! the route, identifier segment, field groups, operations and free-form
//! documentation overrides. They are read-only inputs to the Swagger generators and
//! can be loaded from JSON or YAML description files (see [`crate::parser`]).
//!
//! # Example
//!
//! ```
//! use apidoc_swagger::description::{HttpMethod, Operation, Service};
//!
//! let mut service = Service::new("Widget", "/widget[/:id]");
//! service.route_identifier_name = Some("id".to_string());
//! service.operations.push(Operation::new(HttpMethod::Get));
//! assert!(service.is_rest());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field group holding the fields of a single resource
pub const ENTITY_FIELDS: &str = "entity";
/// Field group holding the fields accepted on create/update
pub const INPUT_FILTER_FIELDS: &str = "input_filter";
/// Field group holding collection query-string fields
pub const QUERY_FIELDS: &str = "query";

/// Media type that enables HAL+JSON collection wrappers
pub const HAL_JSON_MEDIA_TYPE: &str = "application/hal+json";

/// Documentation override key naming the security scheme(s)
pub const SECURITY_DOC_KEY: &str = "security";
/// Documentation override key naming the OAuth scope(s)
pub const SCOPE_DOC_KEY: &str = "scope";
/// Documentation override key naming the HAL embedded collection
pub const COLLECTION_NAME_DOC_KEY: &str = "collection_name";
/// Documentation section holding REST controller settings, e.g. `collection_name`
pub const REST_DOC_SECTION: &str = "zf-rest";

/// A documented API: a name, a version and its services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    /// API name, used as the Swagger `info.title`
    pub name: String,
    /// API version, used as the Swagger `info.version`
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    /// Services belonging to this API, in declaration order
    #[serde(default)]
    pub services: Vec<Service>,
    /// Manual overrides deep-merged on top of the generated document
    #[serde(default)]
    pub overrides: Map<String, Value>,
}

/// A single documented service (REST resource or RPC endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Service name, used for tags and definition names
    pub name: String,
    /// Human description of the service
    #[serde(default)]
    pub description: Option<String>,
    /// Route template, e.g. `/widget[/:id]`
    pub route: String,
    /// Name of the identifier route segment; absent for non-REST services
    #[serde(default)]
    pub route_identifier_name: Option<String>,
    /// Field groups keyed by group name (`entity`, `input_filter`, `query`)
    #[serde(default)]
    pub fields: IndexMap<String, Vec<Field>>,
    /// Collection-level operations (or all operations of a non-REST service)
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Entity-level operations
    #[serde(default)]
    pub entity_operations: Vec<Operation>,
    /// Accepted content types, emitted as `produces`
    #[serde(default)]
    pub request_accept_types: Vec<String>,
    /// Free-form documentation overrides (security, scope, collection_name)
    #[serde(default)]
    pub docs: Map<String, Value>,
}

/// A single HTTP operation of a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// HTTP method
    pub http_method: HttpMethod,
    /// Human description
    #[serde(default)]
    pub description: Option<String>,
    /// Declared response status codes with their messages
    #[serde(default)]
    pub response_status_codes: Vec<StatusCode>,
    /// Example request payload, as JSON text
    #[serde(default)]
    pub request_description: Option<String>,
    /// Example response payload, as JSON text
    #[serde(default)]
    pub response_description: Option<String>,
    /// Whether this operation requires authorization
    #[serde(default)]
    pub requires_authorization: bool,
}

/// A declared response status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    /// Numeric HTTP status code
    #[serde(deserialize_with = "status_code")]
    pub code: u16,
    /// Message describing the response
    #[serde(default)]
    pub message: String,
}

/// A documented field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Human description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the field is required
    #[serde(default)]
    pub required: bool,
    /// Declared scalar type (also the item type of array fields)
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// More specific field type, e.g. `date-time`, `integer`, `array`
    #[serde(default)]
    pub field_type: Option<String>,
}

/// HTTP methods an operation may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Lowercase method name as used for Swagger path-item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }

    /// POST, PUT and PATCH carry a request body
    pub fn is_mutating(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            _ => Err(format!("unsupported HTTP method: {}", value)),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.to_string()
    }
}

impl Api {
    /// Create an API with no services
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            services: Vec::new(),
            overrides: Map::new(),
        }
    }
}

impl Service {
    /// Create a service with minimal required fields
    pub fn new(name: &str, route: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            route: route.to_string(),
            route_identifier_name: None,
            fields: IndexMap::new(),
            operations: Vec::new(),
            entity_operations: Vec::new(),
            request_accept_types: Vec::new(),
            docs: Map::new(),
        }
    }

    /// A service with an identifier segment is a REST resource
    pub fn is_rest(&self) -> bool {
        self.identifier_name().is_some()
    }

    /// Identifier segment name, ignoring blank values
    pub fn identifier_name(&self) -> Option<&str> {
        self.route_identifier_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Fields of the named group, empty when the group is absent
    pub fn fields(&self, group: &str) -> &[Field] {
        self.fields.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Collection operations followed by entity operations
    pub fn all_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().chain(self.entity_operations.iter())
    }

    /// Whether any operation is a POST, PUT or PATCH
    pub fn has_mutating_operation(&self) -> bool {
        self.all_operations()
            .any(|operation| operation.http_method.is_mutating())
    }

    /// Whether the service accepts the given media type
    pub fn accepts(&self, media_type: &str) -> bool {
        self.request_accept_types.iter().any(|t| t == media_type)
    }

    /// Security scheme names declared in the documentation overrides
    pub fn security_schemes(&self) -> Vec<String> {
        self.docs.get(SECURITY_DOC_KEY).map(string_list).unwrap_or_default()
    }

    /// Scopes declared in the documentation overrides
    pub fn security_scopes(&self) -> Vec<String> {
        self.docs.get(SCOPE_DOC_KEY).map(string_list).unwrap_or_default()
    }

    /// Embedded collection name declared in the documentation overrides.
    ///
    /// The top-level `collection_name` key wins over `zf-rest.collection_name`.
    pub fn collection_name_override(&self) -> Option<&str> {
        let top_level = self.docs.get(COLLECTION_NAME_DOC_KEY);
        let rest_section = self
            .docs
            .get(REST_DOC_SECTION)
            .and_then(|section| section.get(COLLECTION_NAME_DOC_KEY));

        [top_level, rest_section]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|name| !name.is_empty())
    }
}

impl Operation {
    /// Create an operation with only a method
    pub fn new(http_method: HttpMethod) -> Self {
        Self {
            http_method,
            description: None,
            response_status_codes: Vec::new(),
            request_description: None,
            response_description: None,
            requires_authorization: false,
        }
    }

    /// Append a declared response status code
    pub fn with_status(mut self, code: u16, message: &str) -> Self {
        self.response_status_codes.push(StatusCode {
            code,
            message: message.to_string(),
        });
        self
    }
}

impl Field {
    /// Create an optional field with no declared type
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Accept a scalar or a list of scalars as a list of strings
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn status_code<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = string_or_number(deserializer)?;
    raw.trim()
        .parse::<u16>()
        .map_err(|_| serde::de::Error::custom(format!("invalid status code: {}", raw)))
}
