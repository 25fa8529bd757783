//! # Moduleman Core
//!
//! Discovery and registration of plugin declarations found in unit manifest
//! files (`*.plugin.json`) on the local filesystem. Each discovered plugin is
//! handed to a [`Registrant`] under a stable hierarchical identifier derived
//! from its location.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`config`]**: Validated parameter sets for the two loader variants.
//!   Configuration errors are reported at construction, so a loader can
//!   never exist unconfigured.
//! - **[`error`]**: Error types for configuration ([`ConfigError`]) and unit
//!   loading ([`UnitLoadError`]).
//! - **[`loader`]**: The two loading strategies — [`FileLoader`] for a single
//!   unit manifest, [`TreeLoader`] for a recursive directory walk — plus the
//!   walk record returned from tree loads.
//! - **[`manifest`]**: The unit manifest format ([`UnitManifest`]) and its
//!   plugin declarations ([`PluginDecl`]), including the capability tag that
//!   makes a declaration discoverable.
//! - **[`registry`]**: The [`Registrant`] contract loaders report into, and
//!   [`PluginRegistry`], an in-memory implementation of it.

pub mod config;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod registry;

// Re-export key public types for easier use by orchestrators and plugins
pub use config::{FileLoaderConfig, TreeLoaderConfig};
pub use error::{ConfigError, UnitLoadError};
pub use loader::{FileLoader, TreeLoader, UnitLoader, WalkRecord, WalkedNode};
pub use manifest::{PLUGIN_MARK, PluginDecl, UNIT_SUFFIX, UnitManifest};
pub use registry::{PluginRegistry, Registrant};

// Test module declaration
#[cfg(test)]
mod tests;
