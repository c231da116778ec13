mod error;


pub use error::SourceError;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Extension (without the dot) of proposal documents
pub const DEFAULT_EXTENSION: &str = "md";

/// File names that live next to proposals but are not proposals themselves
pub const DEFAULT_IGNORED: &[&str] = &[
    "0023-documentation-for-images.md",
    "0004-cloud-provider-template.md",
    "0001a-meta-kep-implementation.md",
    "0001-kubernetes-enhancement-proposal-process.md",
    "YYYYMMDD-kep-template.md",
    "README.md",
    "kep-faq.md",
];

/// Where to look for documents and which files to skip
#[derive(Debug, Clone)]
pub struct SourceConfig {
    root: PathBuf,
    extension: String,
    ignored: BTreeSet<String>,
}

impl SourceConfig {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether a base name is ignored outright
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }
}

/// Builder for a `SourceConfig`
pub struct SourceBuilder {
    root: PathBuf,
    extension: String,
    ignored: BTreeSet<String>,
}

impl SourceBuilder {
    /// Start from the default extension and ignore list
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the document extension, with or without a leading dot
    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Skip one more base name
    pub fn ignore_name(mut self, name: impl Into<String>) -> Self {
        self.ignored.insert(name.into());
        self
    }

    /// Replace the whole ignore list
    pub fn ignore_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> SourceConfig {
        SourceConfig {
            root: self.root,
            extension: self.extension,
            ignored: self.ignored,
        }
    }
}

/// Whether a file's base name is a candidate document
pub fn is_document(name: &str, config: &SourceConfig) -> bool {
    let suffix = format!(".{}", config.extension);
    name.ends_with(&suffix) && !config.is_ignored(name)
}

/// Collect document paths under the configured root
///
/// Pre-order walk with entries sorted by name inside each directory, so the
/// result order is stable and determines output order.
pub fn discover(config: &SourceConfig) -> Result<Vec<PathBuf>, SourceError> {
    let root = config.root();
    if !root.exists() {
        return Err(SourceError::Missing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(SourceError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| SourceError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !is_document(&name, config) {
            debug!(path = %entry.path().display(), "skipping");
            continue;
        }

        files.push(entry.into_path());
    }

    debug!(count = files.len(), root = %root.display(), "discovered documents");
    Ok(files)
}
