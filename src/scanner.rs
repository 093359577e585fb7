//! Project directory scanning.
//!
//! Walks a project tree and collects the Rust source files the metadata
//! harvester should look at. Build output (`target`) and hidden directories
//! are skipped. Inaccessible entries produce warnings, not failures, so a
//! partially readable tree still yields partial documentation.

use anyhow::Result;
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Recursive scanner for a project source tree.
pub struct FileScanner {
    root_path: PathBuf,
}

/// Outcome of a scan: discovered source files plus non-fatal warnings.
pub struct ScanResult {
    /// Paths of all discovered `.rs` files
    pub source_files: Vec<PathBuf>,
    /// Messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Collect all `.rs` files under the root.
    ///
    /// # Errors
    ///
    /// Only fails when the root itself cannot be accessed; everything below
    /// it degrades to warnings.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path).into_iter().filter_entry(|entry| {
            if entry.path() == self.root_path {
                return true;
            }

            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && name != "target"
        });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &std::path::Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_collects_rust_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("main.rs"));
        touch(&root.join("notes.md"));
        fs::create_dir(root.join("dto")).unwrap();
        touch(&root.join("dto").join("example.rs"));

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_target_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        touch(&root.join("target").join("generated.rs"));
        touch(&root.join("lib.rs"));

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 1);
        assert!(result.source_files[0].ends_with("lib.rs"));
    }

    #[test]
    fn test_scan_skips_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join(".git")).unwrap();
        touch(&root.join(".git").join("hook.rs"));
        touch(&root.join("lib.rs"));

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 1);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.source_files.is_empty());
    }
}
