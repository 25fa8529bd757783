use std::collections::HashMap;

use crate::manifest::PluginDecl;

/// Receives discovered plugins as a loader finds them.
///
/// `register` is called once per qualifying declaration and must not fail for
/// well-formed input; implementations may store, index or discard the
/// declaration. `end_loading` is called exactly once after a completed tree
/// walk whose root existed and signals that no more `register` calls follow
/// for that walk. Implementations must tolerate any number of `register`
/// calls and must not assume a total count in advance.
pub trait Registrant: Send {
    fn register(&mut self, id: String, decl: PluginDecl);
    fn end_loading(&mut self);
}

/// In-memory registrant that indexes declarations by identifier while
/// preserving registration order.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Registered declarations keyed by identifier
    plugins: HashMap<String, PluginDecl>,
    /// Identifiers in first-registration order
    order: Vec<String>,
    /// Number of completed tree walks observed
    walks_completed: usize,
}

impl PluginRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a plugin is registered under `id`
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// Get a registered declaration by identifier
    pub fn get_plugin(&self, id: &str) -> Option<&PluginDecl> {
        self.plugins.get(id)
    }

    /// Number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Registered identifiers in first-registration order
    pub fn plugin_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterate over `(identifier, declaration)` pairs in first-registration
    /// order
    pub fn iter_plugins(&self) -> impl Iterator<Item = (&str, &PluginDecl)> {
        self.order
            .iter()
            .filter_map(|id| self.plugins.get(id).map(|decl| (id.as_str(), decl)))
    }

    /// Registered declarations carrying the given tag
    pub fn plugins_with_tag(&self, tag: &str) -> Vec<&PluginDecl> {
        self.iter_plugins()
            .map(|(_, decl)| decl)
            .filter(|decl| decl.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// How many tree walks have signalled completion
    pub fn walks_completed(&self) -> usize {
        self.walks_completed
    }
}

impl Registrant for PluginRegistry {
    fn register(&mut self, id: String, decl: PluginDecl) {
        // Registration must not fail; a colliding identifier is tolerated and
        // the latest declaration wins.
        if self.plugins.insert(id.clone(), decl).is_some() {
            log::warn!("duplicate plugin identifier '{}', keeping the latest registration", id);
        } else {
            self.order.push(id);
        }
    }

    fn end_loading(&mut self) {
        log::debug!("end_loading: {} plugins registered", self.plugins.len());
        self.walks_completed += 1;
    }
}
