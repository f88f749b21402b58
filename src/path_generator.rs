//! Swagger paths for a single service.
//!
//! The route template is rewritten into Swagger syntax (`/widget[/:id]` becomes
//! `/widget/{id}`). REST services (those with an identifier segment) are split into a
//! collection path and an entity path; other services get a single path. Every
//! operation receives its parameters, responses and security requirements.

use crate::definition_generator::{DefinitionGenerator, Definitions};
use crate::description::{Operation as ServiceOperation, Service, HAL_JSON_MEDIA_TYPE, QUERY_FIELDS};
use crate::model_generator::ModelGenerator;
use crate::schema::{definition_ref, Schema};
use crate::swagger_builder::{Operation, Parameter, ParameterLocation, PathItem, Response};
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static ROUTE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[?/:(\w+)\]?").expect("Invalid regex"));

static PATH_PARAMETER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([\w-]+)\}").expect("Invalid regex"));

/// Paths of a service plus the HAL+JSON wrappers their responses refer to
#[derive(Debug, Clone, Default)]
pub struct GeneratedPaths {
    /// URL path -> PathItem
    pub paths: IndexMap<String, PathItem>,
    /// HAL collection definitions referenced from responses
    pub hal_collections: Definitions,
}

/// Path generator for a single service
pub struct PathGenerator<'a> {
    service: &'a Service,
    model_generator: &'a ModelGenerator,
    definitions: &'a DefinitionGenerator<'a>,
    /// Whether the service has an entity definition to refer to
    has_entity: bool,
    /// HAL wrappers requested while generating responses
    hal_collections: Definitions,
}

impl<'a> PathGenerator<'a> {
    /// Create a path generator for the given service
    pub fn new(
        service: &'a Service,
        model_generator: &'a ModelGenerator,
        definitions: &'a DefinitionGenerator<'a>,
    ) -> Self {
        Self {
            service,
            model_generator,
            definitions,
            has_entity: definitions.entity_definition().is_some(),
            hal_collections: Definitions::new(),
        }
    }

    /// Generate all paths of the service
    pub fn generate(mut self) -> GeneratedPaths {
        let service = self.service;
        let route = route_with_replacements(&service.route);
        debug!("Generating paths for {} ({})", service.name, route);

        let paths = match service.identifier_name() {
            Some(identifier) => self.rest_paths(&route, identifier),
            None => self.other_paths(&route),
        };

        GeneratedPaths {
            paths,
            hal_collections: self.hal_collections,
        }
    }

    fn rest_paths(&mut self, route: &str, identifier: &str) -> IndexMap<String, PathItem> {
        let service = self.service;
        let collection_path = route.replace(&format!("/{{{}}}", identifier), "");

        let mut collection_parameters = url_parameters(route);
        for (name, parameter) in self.collection_query_parameters() {
            collection_parameters.entry(name).or_insert(parameter);
        }
        collection_parameters.shift_remove(identifier);
        let collection_parameters: Vec<Parameter> = collection_parameters.into_values().collect();
        let collection = self.operations_data(&service.operations, &collection_parameters, true);

        let entity_parameters: Vec<Parameter> = url_parameters(route).into_values().collect();
        let entity = self.operations_data(&service.entity_operations, &entity_parameters, false);

        let mut paths = IndexMap::new();
        if collection_path == route {
            let mut combined = collection;
            combined.merge(entity);
            paths.insert(collection_path, combined);
        } else {
            paths.insert(collection_path, collection);
            paths.insert(route.to_string(), entity);
        }
        paths
    }

    fn other_paths(&mut self, route: &str) -> IndexMap<String, PathItem> {
        let service = self.service;
        let parameters: Vec<Parameter> = url_parameters(route).into_values().collect();
        let operations = self.operations_data(&service.operations, &parameters, false);

        let mut paths = IndexMap::new();
        paths.insert(route.to_string(), operations);
        paths
    }

    fn operations_data(
        &mut self,
        operations: &[ServiceOperation],
        parameters: &[Parameter],
        is_collection: bool,
    ) -> PathItem {
        let mut path_item = PathItem::default();
        for operation in operations {
            let mut operation_parameters = parameters.to_vec();
            if operation.http_method.is_mutating() {
                operation_parameters.push(self.body_parameter());
            }
            let path_operation = self.path_operation(operation, operation_parameters, is_collection);
            path_item.insert(operation.http_method, path_operation);
        }
        path_item
    }

    fn collection_query_parameters(&self) -> IndexMap<String, Parameter> {
        self.service
            .fields(QUERY_FIELDS)
            .iter()
            .map(|field| {
                let param_type = [field.field_type.as_deref(), field.type_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .find(|t| !t.is_empty())
                    .unwrap_or("string");
                let description = field
                    .description
                    .clone()
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| format!("Query parameter {}", field.name));

                let parameter = Parameter {
                    location: ParameterLocation::Query,
                    name: field.name.clone(),
                    description: Some(description),
                    param_type: Some(param_type.to_string()),
                    required: field.required,
                    schema: None,
                };
                (field.name.clone(), parameter)
            })
            .collect()
    }

    fn body_parameter(&self) -> Parameter {
        Parameter {
            location: ParameterLocation::Body,
            name: "body".to_string(),
            description: None,
            param_type: None,
            required: true,
            schema: Some(definition_ref(&self.definitions.input_definition_name())),
        }
    }

    fn path_operation(
        &mut self,
        operation: &ServiceOperation,
        parameters: Vec<Parameter>,
        is_collection: bool,
    ) -> Operation {
        let security = if operation.requires_authorization {
            self.security_data()
        } else {
            Vec::new()
        };

        Operation {
            tags: vec![self.service.name.clone()],
            description: operation.description.clone().filter(|d| !d.is_empty()),
            parameters,
            produces: self.service.request_accept_types.clone(),
            responses: self.responses(operation, is_collection),
            security,
        }
    }

    fn responses(&mut self, operation: &ServiceOperation, is_collection: bool) -> IndexMap<u16, Response> {
        let mut responses = IndexMap::new();
        for status in &operation.response_status_codes {
            let response = Response {
                description: status.message.clone(),
                schema: self.response_schema(operation, status.code, is_collection),
            };
            // a code with neither message nor schema would serialize as `{}`
            if response.is_empty() {
                debug!(
                    "Dropping empty {} response of {} {}",
                    status.code, operation.http_method, self.service.name
                );
                continue;
            }
            responses.insert(status.code, response);
        }
        responses
    }

    /// Schema for a response.
    ///
    /// Only 200 and 201 carry a schema. The operation's example response wins; the
    /// entity definition is the fallback. A collection 200 response is wrapped in a
    /// HAL+JSON collection when the service accepts HAL+JSON, and has no schema
    /// otherwise.
    fn response_schema(&mut self, operation: &ServiceOperation, code: u16, is_collection: bool) -> Option<Schema> {
        if code != 200 && code != 201 {
            return None;
        }

        if let Some(schema) = self.example_schema(operation) {
            return Some(schema);
        }

        if !self.has_entity {
            return None;
        }
        let entity_name = self.definitions.entity_definition_name();

        if is_collection && code == 200 {
            if !self.service.accepts(HAL_JSON_MEDIA_TYPE) {
                return None;
            }
            let definitions = self.definitions;
            let wrapper_name = definitions.hal_collection_definition_name();
            self.hal_collections
                .entry(wrapper_name.clone())
                .or_insert_with(|| definitions.hal_collection_definition());
            return Some(definition_ref(&wrapper_name));
        }

        Some(definition_ref(&entity_name))
    }

    fn example_schema(&self, operation: &ServiceOperation) -> Option<Schema> {
        let example = operation.response_description.as_deref()?;
        match self.model_generator.generate(example) {
            Ok(schema) => schema,
            Err(e) => {
                debug!(
                    "No example schema for {} {}: {}",
                    operation.http_method, self.service.name, e
                );
                None
            }
        }
    }

    fn security_data(&self) -> Vec<IndexMap<String, Vec<String>>> {
        let scopes = self.service.security_scopes();
        self.service
            .security_schemes()
            .into_iter()
            .map(|scheme| {
                let mut requirement = IndexMap::new();
                requirement.insert(scheme, scopes.clone());
                requirement
            })
            .collect()
    }
}

/// Rewrite route segments (`/:id` or `[/:id]`) into Swagger syntax (`/{id}`).
///
/// Anything that is not a segment placeholder is passed through unchanged.
pub fn route_with_replacements(route: &str) -> String {
    ROUTE_SEGMENT.replace_all(route, "/{${1}}").into_owned()
}

/// Names of the `{param}` placeholders of a Swagger path, in order
pub fn url_parameter_names(route: &str) -> Vec<String> {
    PATH_PARAMETER
        .captures_iter(route)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Required path parameters for every placeholder of a Swagger path
fn url_parameters(route: &str) -> IndexMap<String, Parameter> {
    url_parameter_names(route)
        .into_iter()
        .map(|name| {
            let parameter = Parameter {
                location: ParameterLocation::Path,
                name: name.clone(),
                description: Some(format!("URL parameter {}", name)),
                param_type: Some("string".to_string()),
                required: true,
                schema: None,
            };
            (name, parameter)
        })
        .collect()
}
