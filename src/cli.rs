use crate::description::Api;
use crate::error::{Error, Result as LibResult};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// API Swagger Generator - Generate Swagger 2.0 documents from API description files
#[derive(Parser, Debug)]
#[command(name = "apidoc-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to an API description file or a directory of description files
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Name of the API to document (required when several APIs are loaded)
    #[arg(short = 'a', long = "api", value_name = "NAME")]
    pub api: Option<String>,

    /// Version of the API to document
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// List the discovered APIs instead of generating a document
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.input_path.exists() {
        anyhow::bail!("Input path does not exist: {}", args.input_path.display());
    }

    info!("Input path: {}", args.input_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref api) = args.api {
        info!("API: {}", api);
    }
    if let Some(ref version) = args.api_version {
        info!("API version: {}", version);
    }

    Ok(args)
}

/// Pick the API to document.
///
/// Candidates are filtered by name and version when given; exactly one must remain.
pub fn select_api<'a>(apis: &'a [Api], name: Option<&str>, version: Option<&str>) -> LibResult<&'a Api> {
    let candidates: Vec<&Api> = apis
        .iter()
        .filter(|api| name.map_or(true, |name| api.name == name))
        .filter(|api| version.map_or(true, |version| api.version == version))
        .collect();

    match candidates.as_slice() {
        [api] => Ok(*api),
        [] => Err(Error::InvalidArgument(format!(
            "no API matches name {:?} and version {:?}",
            name, version
        ))),
        many => Err(Error::InvalidArgument(format!(
            "{} APIs match, use --api/--api-version to choose one of: {}",
            many.len(),
            describe_apis(many)
        ))),
    }
}

fn describe_apis(apis: &[&Api]) -> String {
    apis.iter()
        .map(|api| format!("{} v{}", api.name, api.version))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::model_generator::ModelGenerator;
    use crate::parser::{DescriptionParser, ParsedApi};
    use crate::scanner::FileScanner;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use crate::swagger_builder::SwaggerBuilder;

    info!("Starting Swagger document generation...");

    // Step 1: Locate description files
    let description_files = if args.input_path.is_dir() {
        info!("Scanning input directory...");
        let scan_result = FileScanner::new(args.input_path.clone()).scan()?;
        for warning in &scan_result.warnings {
            log::warn!("{}", warning);
        }
        scan_result.description_files
    } else {
        vec![args.input_path.clone()]
    };

    info!("Found {} description files", description_files.len());
    if description_files.is_empty() {
        anyhow::bail!("No API description files found in {}", args.input_path.display());
    }

    // Step 2: Parse description files
    let apis: Vec<Api> = DescriptionParser::parse_files(&description_files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(ParsedApi { path, api }) => {
                debug!("Loaded API {} from {}", api.name, path.display());
                Some(api)
            }
            Err(e) => {
                debug!("Skipping file due to parse error: {:#}", e);
                None
            }
        })
        .collect();

    if apis.is_empty() {
        anyhow::bail!("No description files could be parsed successfully");
    }

    // Step 3: List mode
    if args.list {
        for api in &apis {
            println!("{} v{} ({} services)", api.name, api.version, api.services.len());
        }
        return Ok(());
    }

    // Step 4: Build the Swagger document
    let api = select_api(&apis, args.api.as_deref(), args.api_version.as_deref())?;
    info!("Building Swagger document for {} v{}...", api.name, api.version);
    let document = SwaggerBuilder::from_api(api, &ModelGenerator::new()).build();

    // Step 5: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    // Step 6: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Description files: {}", description_files.len());
    info!("  - APIs loaded: {}", apis.len());
    info!("  - Services documented: {}", api.services.len());
    info!(
        "  - Paths: {}",
        document.paths().map(|paths| paths.len()).unwrap_or(0)
    );

    Ok(())
}
