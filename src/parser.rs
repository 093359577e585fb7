//! Source file parsing.
//!
//! Parses Rust source files into syntax trees with `syn`. Batch parsing
//! tolerates individual failures so that one file with a syntax error does
//! not block metadata harvesting for the rest of the project.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser producing syntax trees for the harvester.
pub struct AstParser;

/// A successfully parsed source file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parse a single source file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or contains invalid syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parse many files, keeping successes and logging failures.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<ParsedFile> {
        let mut parsed = Vec::new();

        for path in paths {
            match Self::parse_file(path) {
                Ok(file) => parsed.push(file),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        debug!("Parsed {} of {} files", parsed.len(), paths.len());
        parsed
    }
}
