//! API Swagger Generator - Swagger 2.0 documents from REST API descriptions.
//!
//! This library turns a declarative description of a REST/RPC API (services, routes,
//! fields, operations, example payloads) into a Swagger 2.0 document. Example JSON
//! payloads are inferred into schemas, REST services get a collection path and an
//! entity path, and services that accept HAL+JSON get a collection wrapper definition.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`scanner`] - Recursively scans directories for description files
//! 2. [`parser`] - Loads JSON or YAML description files into [`description::Api`]
//! 3. [`model_generator`] - Infers schemas from example JSON payloads
//! 4. [`definition_generator`] - Builds the entity, input and HAL+JSON definitions of a service
//! 5. [`path_generator`] - Builds the paths, parameters and responses of a service
//! 6. [`service_transformer`] - Combines both into one service fragment
//! 7. [`swagger_builder`] - Merges fragments and overrides into the final document
//! 8. [`serializer`] - Serializes the document to JSON or YAML
//!
//! # Example Usage
//!
//! ```
//! use apidoc_swagger::{
//!     description::{Api, HttpMethod, Operation, Service},
//!     model_generator::ModelGenerator,
//!     serializer::serialize_json,
//!     swagger_builder::SwaggerBuilder,
//! };
//!
//! let mut ping = Service::new("Ping", "/ping");
//! ping.operations.push(Operation::new(HttpMethod::Get).with_status(200, "Pong"));
//!
//! let mut api = Api::new("Status", "1");
//! api.services.push(ping);
//!
//! let document = SwaggerBuilder::from_api(&api, &ModelGenerator::new()).build();
//! let json = serialize_json(&document).unwrap();
//! assert!(json.contains("\"/ping\""));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod scanner;
pub mod parser;
pub mod description;
pub mod schema;
pub mod model_generator;
pub mod definition_generator;
pub mod path_generator;
pub mod service_transformer;
pub mod swagger_builder;
pub mod serializer;
pub mod error;
