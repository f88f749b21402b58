use crate::description::Api;
use crate::error::{Error, Result as LibResult};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for API description files.
///
/// A description file holds one API (name, version, services and overrides) as JSON
/// or YAML; the format is chosen from the file extension, with JSON as the default.
///
/// # Example
///
/// ```no_run
/// use apidoc_swagger::parser::DescriptionParser;
/// use std::path::Path;
///
/// let parsed = DescriptionParser::parse_file(Path::new("api-docs/shop.json")).unwrap();
/// println!("{} has {} services", parsed.api.name, parsed.api.services.len());
/// ```
pub struct DescriptionParser;

/// A successfully parsed description file.
#[derive(Debug)]
pub struct ParsedApi {
    /// Path to the description file
    pub path: PathBuf,
    /// The API it describes
    pub api: Api,
}

/// Serialization format of a description file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    Json,
    Yaml,
}

impl DescriptionFormat {
    /// Pick the format from a file extension (`.yaml`/`.yml` are YAML)
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => DescriptionFormat::Yaml,
            _ => DescriptionFormat::Json,
        }
    }
}

impl DescriptionParser {
    /// Parses a single description file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe an API.
    pub fn parse_file(path: &Path) -> Result<ParsedApi> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let api = Self::parse_str(&content, DescriptionFormat::from_path(path), path)?;

        debug!(
            "Parsed API {} v{} with {} services from {}",
            api.name,
            api.version,
            api.services.len(),
            path.display()
        );

        Ok(ParsedApi {
            path: path.to_path_buf(),
            api,
        })
    }

    /// Parses description content; `origin` is only used in error messages.
    pub fn parse_str(content: &str, format: DescriptionFormat, origin: &Path) -> LibResult<Api> {
        let parsed = match format {
            DescriptionFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DescriptionFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| Error::ParseError {
            file: origin.to_path_buf(),
            message,
        })
    }

    /// Parses multiple description files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings; the returned vector holds one
    /// result per input path.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedApi>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedApi>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).map_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}
