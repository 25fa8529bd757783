#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::{PluginDecl, UnitManifest};
use crate::registry::Registrant;

/// Registrant calls observed by [`RecordingRegistrant`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Registered(String),
    EndLoading,
}

/// Test double that records every registrant call.
#[derive(Debug, Default)]
pub struct RecordingRegistrant {
    pub events: Vec<Event>,
    pub decls: Vec<(String, PluginDecl)>,
}

impl RecordingRegistrant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered identifiers in call order
    pub fn ids(&self) -> Vec<String> {
        self.decls.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn end_loading_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| **event == Event::EndLoading)
            .count()
    }
}

impl Registrant for RecordingRegistrant {
    fn register(&mut self, id: String, decl: PluginDecl) {
        self.events.push(Event::Registered(id.clone()));
        self.decls.push((id, decl));
    }

    fn end_loading(&mut self) {
        self.events.push(Event::EndLoading);
    }
}

/// Writes `manifest` as a unit file named `<unit>.plugin.json` under `dir`,
/// creating intermediate directories as needed.
pub fn write_unit(dir: &Path, unit: &str, manifest: &UnitManifest) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create unit directory");
    let path = dir.join(format!("{unit}.plugin.json"));
    let json = serde_json::to_string_pretty(manifest).expect("Failed to serialize unit manifest");
    fs::write(&path, json).expect("Failed to write unit file");
    path
}

/// A declaration carrying the plugin capability tag
pub fn marked_decl(name: &str) -> PluginDecl {
    PluginDecl::new(name).marked()
}
