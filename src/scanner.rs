use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directory names never descended into
const SKIPPED_DIRS: [&str; 2] = ["target", "node_modules"];

/// Extensions scanned when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["js", "ts"];

/// File scanner for traversing source directories.
///
/// The `FileScanner` recursively walks a directory to find annotated source files with one of
/// the configured extensions. It skips hidden entries (starting with `.`) as well as
/// `target` and `node_modules`. Files are returned sorted by path so the generation order
/// is stable between runs.
///
/// # Example
///
/// ```no_run
/// use swagger_from_comments::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./routes"), vec!["js".to_string()]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    extensions: Vec<String>,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Matching files, sorted by path
    pub source_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf, extensions: Vec<String>) -> Self {
        Self {
            root_path,
            extensions,
        }
    }

    fn has_extension(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Scans the directory tree and collects matching files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning continues.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && !SKIPPED_DIRS.iter().any(|d| *d == file_name)
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && self.has_extension(path) {
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

        source_files.sort();
        debug!(
            "Scanned {}: {} matching files",
            self.root_path.display(),
            source_files.len()
        );

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}

/// Expands a list of files and directories into the ordered list of files to process.
///
/// Files are kept as given, in the given order. Each directory is replaced in place by its
/// scanned files.
pub fn collect_sources(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let scanner = FileScanner::new(path.clone(), extensions.to_vec());
            files.extend(scanner.scan()?.source_files);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("Source path does not exist: {}", path.display());
        }
    }

    Ok(files)
}
