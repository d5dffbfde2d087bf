//! File discovery and content loading
//!
//! A root that is a single file is returned as-is, whatever its extension.
//! A directory is walked for script and module sources, one level deep unless
//! recursion is requested. Unreadable files come back with no content; the
//! analyzers leave them out of scoring.

use crate::config::{ExcludeConfig, ProjectConfig};
use crate::error::{GateError, GateResult};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A scanned file and its decoded text, if it could be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub content: Option<String>,
}

impl FileRecord {
    /// Read and decode a file. Never fails; I/O errors leave `content` empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content = match std::fs::read(&path) {
            Ok(bytes) => Some(decode_content(&bytes)),
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                None
            }
        };
        Self { path, content }
    }

    pub fn is_readable(&self) -> bool {
        self.content.is_some()
    }
}

/// Scanner settings
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Lowercase extensions without the dot
    pub extensions: Vec<String>,
    pub exclude: ExcludeConfig,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}

impl ScanOptions {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            recursive: config.scan.recursive,
            extensions: config.extensions(),
            exclude: config.exclude.clone(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Enumerate and load the files under `root`.
///
/// Results are sorted by path so repeated scans of an unchanged tree are
/// identical.
pub fn scan(root: &Path, options: &ScanOptions) -> GateResult<Vec<FileRecord>> {
    if !root.exists() {
        return Err(GateError::PathNotFound(root.to_path_buf()));
    }

    if root.is_file() {
        debug!("Scanning single file {}", root.display());
        return Ok(vec![FileRecord::load(root)]);
    }

    let paths = collect_paths(root, options);
    debug!(
        "Found {} candidate files under {} (recursive: {})",
        paths.len(),
        root.display(),
        options.recursive
    );
    Ok(paths.into_iter().map(FileRecord::load).collect())
}

/// Collect matching file paths under a directory
fn collect_paths(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    // Hidden and git-ignored files are scanned too
    builder.standard_filters(false).follow_links(false);
    if !options.recursive {
        builder.max_depth(Some(1));
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if !options.matches_extension(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if options.exclude.should_exclude(relative) {
            debug!("Excluded {}", relative.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    files
}

/// Decode file bytes as text.
///
/// Handles the UTF-8 BOM and the UTF-16 BOMs Windows PowerShell writes by
/// default; anything else is read as UTF-8 with invalid sequences replaced.
fn decode_content(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
