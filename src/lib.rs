//! OpenAPI DTO Generator - OpenAPI documentation from declared type metadata.
//!
//! This library generates OpenAPI 3.0 documents from a Rust project's
//! data-transfer types and a declarative routing table. Type and handler
//! metadata is harvested from source files into an explicit registry ahead
//! of time; generation itself is a pure in-memory transformation over that
//! registry and never touches the filesystem.
//!
//! # Architecture
//!
//! The library is organized into modules that work together:
//!
//! 1. [`scanner`] - Recursively scans a project directory for Rust files
//! 2. [`parser`] - Parses source files into syntax trees
//! 3. [`harvest`] - Builds the type registry from parsed files
//! 4. [`registry`] - The ahead-of-time-populated type metadata provider
//! 5. [`type_resolver`] - Pure primitive/enum/array/union schema mapping
//! 6. [`constraints`] - Translates constraint tags into schema keywords
//! 7. [`handler_analyzer`] - Identifies request/response types per handler
//! 8. [`schema_generator`] - Recursive, cycle-safe object schema generation
//! 9. [`route_scanner`] - Turns the routing table into path operations
//! 10. [`openapi_builder`] - Assembles the complete document
//! 11. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_dtogen::{
//!     config::{load_routing_table, OpenApiConfig},
//!     harvest::MetadataHarvester,
//!     openapi_builder::DocumentAssembler,
//!     parser::AstParser,
//!     route_scanner::RouteScanner,
//!     scanner::FileScanner,
//!     schema_generator::SchemaGenerator,
//!     serializer::serialize_yaml,
//! };
//! use std::path::{Path, PathBuf};
//!
//! // Scan and parse the project
//! let root = PathBuf::from("./my-project");
//! let scan_result = FileScanner::new(root.clone()).scan().unwrap();
//! let parsed_files = AstParser::parse_files(&scan_result.source_files);
//!
//! // Harvest the type registry
//! let registry = MetadataHarvester::harvest(&root, &parsed_files);
//!
//! // Scan routes and generate schemas
//! let table = load_routing_table(Path::new("routes.yaml")).unwrap();
//! let paths = RouteScanner::new(&registry).scan_routes(&table);
//! let mut generator = SchemaGenerator::new(&registry);
//! let identities: Vec<String> = registry.type_identities().map(str::to_string).collect();
//! for identity in &identities {
//!     generator.generate(identity);
//! }
//!
//! // Assemble and serialize
//! let assembler = DocumentAssembler::new(OpenApiConfig::default());
//! let document = assembler.assemble(paths, generator.all_schemas());
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete
//! CLI application.

pub mod cli;
pub mod config;
pub mod constraints;
pub mod error;
pub mod handler_analyzer;
pub mod harvest;
pub mod openapi_builder;
pub mod parser;
pub mod registry;
pub mod route_scanner;
pub mod scanner;
pub mod schema;
pub mod schema_generator;
pub mod security;
pub mod serializer;
pub mod type_resolver;
