use crate::error::{AnalyzeError, Result};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub no_ignore: bool,
    pub extension: String,
}

impl ScanOptions {
    pub fn new(no_ignore: bool, extension: impl Into<String>) -> Self {
        Self {
            no_ignore,
            extension: extension.into(),
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new(false, "java")
    }
}

/// Lists every file under `root` with the configured extension, sorted by
/// relative path. Unreadable entries are logged and skipped.
pub fn scan_dir(root: &Path, options: &ScanOptions) -> Result<Vec<ScannedFile>> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let walker = builder
        .hidden(false)
        .filter_entry(|entry| !is_ignored_entry(entry))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if !has_extension(path, &options.extension) {
            continue;
        }
        let Some(rel_path) = crate::util::normalize_rel_path(root, path) else {
            continue;
        };
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                warn!("metadata error {rel_path}: {err}");
                continue;
            }
        };
        files.push(ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
            size,
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

/// Fails when `root` is not a readable directory.
pub fn check_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(AnalyzeError::InputRoot {
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|_| AnalyzeError::InputRoot {
        path: root.to_path_buf(),
    })?;
    Ok(())
}

fn is_ignored_entry(entry: &ignore::DirEntry) -> bool {
    entry.file_name() == OsStr::new(".git")
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension)
}
