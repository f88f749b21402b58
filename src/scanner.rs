use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions recognised as API description files
const DESCRIPTION_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// File scanner for locating API description files.
///
/// The `FileScanner` recursively walks a directory and collects every JSON or YAML
/// file. It skips the `target` directory and hidden directories (those starting
/// with `.`). Files are returned sorted by path so generation is deterministic.
///
/// # Example
///
/// ```no_run
/// use apidoc_swagger::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./api-docs"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} description files", result.description_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Paths of all discovered description files
    pub description_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all description files.
    ///
    /// Inaccessible entries are logged and reported in [`ScanResult::warnings`];
    /// scanning continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut description_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_description_file(path) {
                        description_files.push(path.to_path_buf());
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
            description_files,
            warnings,
        })
    }
}

/// Whether a path has a JSON or YAML extension
pub fn is_description_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| DESCRIPTION_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .description_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("shop.json"), "{}").unwrap();
        fs::write(root.join("billing.yaml"), "name: Billing").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(file_names(&result), vec!["billing.yaml", "shop.json"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.description_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("apis/v1")).unwrap();
        fs::write(root.join("apis/v1/shop.yml"), "name: Shop").unwrap();
        fs::write(root.join("apis/billing.JSON"), "{}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.description_files.len(), 2);
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.json"), "{}").unwrap();
        fs::create_dir(root.join(".cache")).unwrap();
        fs::write(root.join(".cache/old.json"), "{}").unwrap();
        fs::write(root.join("shop.json"), "{}").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["shop.json"]);
    }

    #[test]
    fn test_is_description_file() {
        assert!(is_description_file(Path::new("a.json")));
        assert!(is_description_file(Path::new("a.yaml")));
        assert!(is_description_file(Path::new("a.YML")));
        assert!(!is_description_file(Path::new("a.rs")));
        assert!(!is_description_file(Path::new("json")));
    }
}
