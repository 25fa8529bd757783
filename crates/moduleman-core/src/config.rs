use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Parameters for a [`FileLoader`](crate::loader::FileLoader): one unit
/// manifest located at `base_path/filename`, with identifiers derived
/// relative to `base_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLoaderConfig {
    base_path: PathBuf,
    filename: PathBuf,
}

impl FileLoaderConfig {
    /// Validate and store the parameters. Fails fast on empty parameters and
    /// on `filename` values that are absolute or traverse upwards.
    pub fn new(
        base_path: impl AsRef<Path>,
        filename: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_path: normalized_base_path(base_path.as_ref(), "base_path")?,
            filename: checked_relative(filename.as_ref(), "filename")?,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Full path of the unit manifest to load
    pub fn target(&self) -> PathBuf {
        self.base_path.join(&self.filename)
    }
}

/// Parameters for a [`TreeLoader`](crate::loader::TreeLoader): every unit
/// manifest under `base_path/base_dir`, with identifiers derived relative to
/// that walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLoaderConfig {
    base_path: PathBuf,
    base_dir: PathBuf,
}

impl TreeLoaderConfig {
    /// Validate and store the parameters. Fails fast on empty parameters and
    /// on `base_dir` values that are absolute or traverse upwards.
    pub fn new(
        base_path: impl AsRef<Path>,
        base_dir: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_path: normalized_base_path(base_path.as_ref(), "base_path")?,
            base_dir: checked_relative(base_dir.as_ref(), "base_dir")?,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory under which the tree walk searches for unit manifests.
    /// Identifiers are derived relative to this root.
    pub fn walk_root(&self) -> PathBuf {
        self.base_path.join(&self.base_dir)
    }
}

/// Rejects an empty base path and strips trailing path separators.
fn normalized_base_path(path: &Path, parameter: &'static str) -> Result<PathBuf, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingParameter(parameter));
    }
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    if trimmed.is_empty() {
        // The path was the filesystem root; keep it as-is.
        return Ok(PathBuf::from(std::path::MAIN_SEPARATOR_STR));
    }
    Ok(PathBuf::from(trimmed))
}

/// Rejects empty, absolute and upward-traversing relative path parameters;
/// loaders must never reach outside their base path.
fn checked_relative(path: &Path, parameter: &'static str) -> Result<PathBuf, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingParameter(parameter));
    }
    let traverses = path
        .components()
        .any(|component| matches!(component, Component::ParentDir));
    if path.is_absolute() || traverses {
        return Err(ConfigError::InvalidRelativePath {
            parameter,
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}
