//! Serialization module for converting Swagger documents to JSON or YAML format.
//!
//! This module provides functions to serialize Swagger documents into standard formats
//! and write them to files or return them as strings. Key order follows generation
//! order in both formats.

use crate::swagger_builder::SwaggerDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a Swagger document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use apidoc_swagger::serializer::serialize_yaml;
/// use apidoc_swagger::swagger_builder::SwaggerBuilder;
///
/// let doc = SwaggerBuilder::new("Shop", "1").build();
/// let yaml = serialize_yaml(&doc).unwrap();
/// assert!(yaml.contains("swagger:"));
/// ```
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize Swagger document to YAML")
}

/// Serializes a Swagger document to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use apidoc_swagger::serializer::serialize_json;
/// use apidoc_swagger::swagger_builder::SwaggerBuilder;
///
/// let doc = SwaggerBuilder::new("Shop", "1").build();
/// let json = serialize_json(&doc).unwrap();
/// assert!(json.contains("\"swagger\": \"2.0\""));
/// ```
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize Swagger document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites an existing
/// file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
