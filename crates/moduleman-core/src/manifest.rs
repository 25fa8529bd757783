use std::collections::HashSet;
use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::UnitLoadError;

/// Capability tag that makes a declaration discoverable as a plugin.
///
/// Declarations whose `mark` field carries any other value (or none) are
/// ignored by the loaders even if they are otherwise well formed.
pub const PLUGIN_MARK: &str = "moduleman-plugin";

/// File name suffix that identifies a unit manifest on disk.
pub const UNIT_SUFFIX: &str = ".plugin.json";

/// One top-level declaration inside a unit manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDecl {
    /// Declaration name, unique within its unit
    pub name: String,

    /// Capability tag; must equal [`PLUGIN_MARK`] for the declaration to be
    /// discoverable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<String>,

    /// Declared version (optional, semver)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entry point the declaration refers to (informational only; the loader
    /// never executes it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,

    /// Tags for categorization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PluginDecl {
    /// Create a new declaration with the given name and no metadata
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mark: None,
            version: None,
            description: None,
            entry_point: None,
            tags: Vec::new(),
        }
    }

    /// Tag the declaration with [`PLUGIN_MARK`]
    pub fn marked(mut self) -> Self {
        self.mark = Some(PLUGIN_MARK.to_string());
        self
    }

    /// Set the declared version
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the entry point
    pub fn with_entry_point(mut self, entry_point: &str) -> Self {
        self.entry_point = Some(entry_point.to_string());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Whether this declaration carries the plugin capability tag
    pub fn is_marked(&self) -> bool {
        self.mark.as_deref() == Some(PLUGIN_MARK)
    }
}

/// Deserialized form of one code unit: the set of top-level declarations a
/// unit manifest file states explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitManifest {
    /// Top-level declarations, in file order
    #[serde(default)]
    pub exports: Vec<PluginDecl>,
}

impl UnitManifest {
    /// Create an empty unit manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration (builder style, used mostly by tests and tooling)
    pub fn export(mut self, decl: PluginDecl) -> Self {
        self.exports.push(decl);
        self
    }

    /// Whether `path` names a unit manifest file.
    ///
    /// The suffix match requires a non-empty unit name in front of it, so a
    /// bare `.plugin.json` does not qualify.
    pub fn is_unit_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(UNIT_SUFFIX) && name.len() > UNIT_SUFFIX.len())
    }

    /// Unit name for `path`: the file name with [`UNIT_SUFFIX`] stripped.
    /// Returns `None` when `path` is not a unit manifest file.
    pub fn unit_name(path: &Path) -> Option<String> {
        if !Self::is_unit_file(path) {
            return None;
        }
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(UNIT_SUFFIX))
            .map(|name| name.to_string())
    }

    /// Load and validate a unit manifest from disk asynchronously.
    pub async fn load(path: &Path) -> Result<Self, UnitLoadError> {
        let metadata = match fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UnitLoadError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(UnitLoadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        if !metadata.is_file() {
            return Err(UnitLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| UnitLoadError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let manifest: UnitManifest =
            serde_json::from_str(&content).map_err(|e| UnitLoadError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        manifest.validate(path)?;
        Ok(manifest)
    }

    /// Semantic checks applied after parsing: declaration names must be
    /// non-empty and unique within the unit, declared versions must parse as
    /// semver.
    pub(crate) fn validate(&self, path: &Path) -> Result<(), UnitLoadError> {
        let mut seen = HashSet::new();
        for decl in &self.exports {
            if decl.name.is_empty() {
                return Err(UnitLoadError::Invalid {
                    path: path.to_path_buf(),
                    message: "declaration with empty name".to_string(),
                });
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(UnitLoadError::Invalid {
                    path: path.to_path_buf(),
                    message: format!("duplicate declaration name '{}'", decl.name),
                });
            }
            if let Some(version) = &decl.version {
                if let Err(e) = Version::parse(version) {
                    return Err(UnitLoadError::Invalid {
                        path: path.to_path_buf(),
                        message: format!(
                            "declaration '{}' has invalid version '{}': {}",
                            decl.name, version, e
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Iterate over the declarations carrying the plugin capability tag
    pub fn marked_decls(&self) -> impl Iterator<Item = &PluginDecl> {
        self.exports.iter().filter(|decl| decl.is_marked())
    }
}
