use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// OpenAPI DTO Generator - generate OpenAPI documentation from Rust DTOs and
/// a declarative routing table
#[derive(Parser, Debug)]
#[command(name = "openapi-dtogen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the project directory to harvest
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Path to the generator configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Path to the routing table file (defaults to <PROJECT_PATH>/routes.yaml)
    #[arg(short = 'r', long = "routes", value_name = "FILE")]
    pub routes_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (overrides the configured output path)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Override the API title
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Override the API version
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn validate_args(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::config::{load_routing_table, OpenApiConfig};
    use crate::harvest::MetadataHarvester;
    use crate::openapi_builder::DocumentAssembler;
    use crate::parser::AstParser;
    use crate::route_scanner::RouteScanner;
    use crate::scanner::FileScanner;
    use crate::schema_generator::SchemaGenerator;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use indexmap::IndexMap;

    info!("Starting OpenAPI document generation...");

    // Step 1: Scan the project directory for source files
    info!("Scanning project directory...");
    let scanner = FileScanner::new(args.project_path.clone());
    let scan_result = scanner.scan()?;

    info!("Found {} source files", scan_result.source_files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    if scan_result.source_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    // Step 2: Parse files, tolerating individual failures
    info!("Parsing source files...");
    let parsed_files = AstParser::parse_files(&scan_result.source_files);
    info!("Successfully parsed {} files", parsed_files.len());

    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    // Step 3: Harvest type and handler metadata into the registry
    info!("Harvesting type metadata...");
    let registry = MetadataHarvester::harvest(&args.project_path, &parsed_files);
    info!(
        "Registered {} types and {} handlers",
        registry.type_count(),
        registry.handler_count()
    );

    // Step 4: Load configuration and the routing table
    let mut config = match &args.config_path {
        Some(path) => OpenApiConfig::from_yaml_file(path)?,
        None => OpenApiConfig::default(),
    };

    if let Some(title) = &args.title {
        config.info.title = title.clone();
    }
    if let Some(version) = &args.api_version {
        config.info.version = version.clone();
    }

    let routes_path = args
        .routes_path
        .clone()
        .unwrap_or_else(|| args.project_path.join("routes.yaml"));
    let routing_table = load_routing_table(&routes_path)?;
    info!("Loaded {} routes", routing_table.routes.len());

    // Step 5: Scan routes into path operations
    info!("Scanning routes...");
    let route_scanner = RouteScanner::new(&registry);
    let paths = route_scanner.scan_routes(&routing_table);
    info!("Generated {} unique paths", paths.len());

    // Step 6: Generate component schemas for every registered type
    info!("Generating schemas...");
    let mut schema_generator = SchemaGenerator::new(&registry);
    let identities: Vec<String> = registry.type_identities().map(str::to_string).collect();

    for identity in &identities {
        let schema = schema_generator.generate(identity);
        if schema.is_empty() {
            warn!("Skipping empty schema for {}", identity);
        }
    }

    let schemas: IndexMap<_, _> = schema_generator
        .all_schemas()
        .into_iter()
        .filter(|(_, schema)| !schema.is_empty())
        .collect();
    info!("Generated {} schemas", schemas.len());

    // Step 7: Assemble the final document
    info!("Assembling OpenAPI document...");
    let assembler = DocumentAssembler::new(config.clone());
    let document = assembler.assemble(paths, schemas);

    // Step 8: Serialize and write the output
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    let output_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_path));

    write_to_file(&content, &output_path)?;
    info!("Wrote OpenAPI document to {}", output_path.display());

    // A JSON sibling accompanies YAML output when configured
    if args.output_format == OutputFormat::Yaml && config.generate_json {
        let json_path = output_path.with_extension("json");
        write_to_file(&serialize_json(&document)?, &json_path)?;
        info!("Wrote JSON sibling to {}", json_path.display());
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", scan_result.source_files.len());
    info!("  - Files parsed: {}", parsed_files.len());
    info!("  - Types registered: {}", registry.type_count());
    info!("  - Routes loaded: {}", routing_table.routes.len());

    Ok(())
}
