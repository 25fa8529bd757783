use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use tokio::fs;

use crate::config::{FileLoaderConfig, TreeLoaderConfig};
use crate::manifest::UnitManifest;
use crate::registry::Registrant;

/// One level of a recorded directory walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkedNode {
    /// A unit manifest file encountered during the walk. Recorded whether or
    /// not its load succeeded.
    File(PathBuf),
    /// A sub-directory whose subtree contained at least one recorded node.
    Dir {
        name: String,
        children: Vec<WalkedNode>,
    },
}

/// Record of the directory structure a `load` call walked, returned as a
/// value so the loader keeps no hidden state between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkRecord {
    /// `(walk root, children)` pairs. Empty for single-file loads and for
    /// walks whose root did not exist.
    pub roots: Vec<(PathBuf, Vec<WalkedNode>)>,
}

impl WalkRecord {
    /// Total number of unit manifest files recorded in the walk
    pub fn unit_count(&self) -> usize {
        fn count(nodes: &[WalkedNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    WalkedNode::File(_) => 1,
                    WalkedNode::Dir { children, .. } => count(children),
                })
                .sum()
        }
        self.roots.iter().map(|(_, children)| count(children)).sum()
    }
}

/// A loading strategy for plugin units.
///
/// `load` is the only entry point that triggers loading. Expected failures
/// (missing files, unreadable entries, bad manifests) are contained at the
/// unit or directory level and surface through the log only; they never
/// propagate to the caller.
#[async_trait]
pub trait UnitLoader: Send + Sync {
    /// Load unit(s) and report every qualifying declaration to `registrant`.
    async fn load(&self, registrant: &mut dyn Registrant) -> WalkRecord;
}

/// Builds the identifier a declaration is registered under: the unit file's
/// directory relative to `id_root`, joined with the declaration name using
/// `/`. Leading current-directory components are dropped, so a unit sitting
/// directly in the root yields the bare declaration name.
pub(crate) fn build_id(id_root: &Path, unit_path: &Path, decl_name: &str) -> String {
    let dir = unit_path.parent().unwrap_or_else(|| Path::new(""));
    let relative = dir.strip_prefix(id_root).unwrap_or(dir);
    let mut parts: Vec<&str> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    parts.push(decl_name);
    parts.join("/")
}

/// Loads one unit manifest and registers its marked declarations, deriving
/// identifiers relative to `id_root`. Both loader variants funnel through
/// this step; they differ only in the identifier root they pass.
async fn load_unit(path: &Path, id_root: &Path, registrant: &mut dyn Registrant) {
    log::debug!("load_unit: start, file={}", path.display());

    let manifest = match UnitManifest::load(path).await {
        Ok(manifest) => manifest,
        Err(e) => {
            log::error!("load_unit: file={} failed: {}", path.display(), e);
            return;
        }
    };

    for decl in manifest.marked_decls() {
        let id = build_id(id_root, path, &decl.name);
        log::debug!("load_unit: registering '{}'", id);
        registrant.register(id, decl.clone());
    }

    log::debug!("load_unit: end, file={}", path.display());
}

/// Loads exactly one unit manifest located at `base_path/filename`, with
/// identifiers derived relative to `base_path`.
#[derive(Debug, Clone)]
pub struct FileLoader {
    config: FileLoaderConfig,
}

impl FileLoader {
    pub fn new(config: FileLoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileLoaderConfig {
        &self.config
    }
}

#[async_trait]
impl UnitLoader for FileLoader {
    async fn load(&self, registrant: &mut dyn Registrant) -> WalkRecord {
        let target = self.config.target();
        load_unit(&target, self.config.base_path(), registrant).await;
        // A single-file load tracks no tree.
        WalkRecord::default()
    }
}

/// Recursively loads every unit manifest under `base_path/base_dir`, with
/// identifiers derived relative to that walk root. After a completed walk
/// whose root existed, the registrant is notified exactly once via
/// `end_loading`.
#[derive(Debug, Clone)]
pub struct TreeLoader {
    config: TreeLoaderConfig,
}

impl TreeLoader {
    pub fn new(config: TreeLoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeLoaderConfig {
        &self.config
    }

    /// Helper that returns a boxed future so the async walk can recurse
    fn walk_dir_boxed<'a>(
        &'a self,
        dir: PathBuf,
        id_root: &'a Path,
        registrant: &'a mut dyn Registrant,
    ) -> Pin<Box<dyn Future<Output = Vec<WalkedNode>> + Send + 'a>> {
        Box::pin(self.walk_dir(dir, id_root, registrant))
    }

    /// Walks one directory level: unit files are loaded and recorded, sub
    /// directories recurse. Unreadable entries are logged and skipped so a
    /// bad entry never aborts the walk of its siblings.
    async fn walk_dir(
        &self,
        dir: PathBuf,
        id_root: &Path,
        registrant: &mut dyn Registrant,
    ) -> Vec<WalkedNode> {
        let mut nodes = Vec::new();
        log::debug!("walk_dir: start, dir={}", dir.display());

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) => {
                log::error!("walk_dir: cannot read directory {}: {}", dir.display(), e);
                return nodes;
            }
        };

        let mut entries: Vec<(String, PathBuf)> = Vec::new();
        loop {
            match read_dir.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    entries.push((name, entry.path()));
                }
                Ok(None) => break,
                Err(e) => {
                    log::error!("walk_dir: error listing {}: {}", dir.display(), e);
                    break;
                }
            }
        }
        // Sorted traversal keeps identifier sequences reproducible across
        // runs regardless of the order the storage layer yields entries.
        entries.sort();

        for (name, path) in entries {
            // Hidden and system entries are skipped silently.
            if name.starts_with('.') {
                continue;
            }
            let metadata = match fs::metadata(&path).await {
                Ok(meta) => meta,
                Err(e) => {
                    log::error!("walk_dir: cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };
            if metadata.is_file() && UnitManifest::is_unit_file(&path) {
                log::debug!("walk_dir: found unit file {}", path.display());
                load_unit(&path, id_root, registrant).await;
                nodes.push(WalkedNode::File(path));
            } else if metadata.is_dir() {
                log::debug!("walk_dir: found directory {}", path.display());
                let children = self.walk_dir_boxed(path, id_root, registrant).await;
                if !children.is_empty() {
                    nodes.push(WalkedNode::Dir { name, children });
                }
            }
        }

        nodes
    }
}

#[async_trait]
impl UnitLoader for TreeLoader {
    async fn load(&self, registrant: &mut dyn Registrant) -> WalkRecord {
        let root = self.config.walk_root();
        log::debug!("tree load: root={}", root.display());

        let root_is_dir = match fs::metadata(&root).await {
            Ok(meta) => meta.is_dir(),
            Err(_) => false,
        };
        if !root_is_dir {
            // Nothing to load and no completion notification.
            log::debug!("tree load: root {} is not a directory", root.display());
            return WalkRecord::default();
        }

        let children = self.walk_dir_boxed(root.clone(), &root, registrant).await;
        // The whole tree has been walked; signal the registrant once.
        registrant.end_loading();

        WalkRecord {
            roots: vec![(root, children)],
        }
    }
}
