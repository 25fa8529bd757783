#![cfg(test)]

use std::path::Path;

use crate::config::{FileLoaderConfig, TreeLoaderConfig};
use crate::error::ConfigError;

#[test]
fn test_trailing_separator_normalized() {
    let config = FileLoaderConfig::new("/plugins/", "basic.plugin.json").unwrap();
    assert_eq!(config.base_path(), Path::new("/plugins"));
    assert_eq!(config.target(), Path::new("/plugins/basic.plugin.json"));

    let config = TreeLoaderConfig::new("/plugins/", "http").unwrap();
    assert_eq!(config.base_path(), Path::new("/plugins"));
    assert_eq!(config.walk_root(), Path::new("/plugins/http"));
}

#[test]
fn test_root_base_path_kept() {
    let config = TreeLoaderConfig::new("/", "plugins").unwrap();
    assert_eq!(config.base_path(), Path::new("/"));
    assert_eq!(config.walk_root(), Path::new("/plugins"));
}

#[test]
fn test_empty_base_path_rejected() {
    let result = FileLoaderConfig::new("", "basic.plugin.json");
    assert!(matches!(
        result,
        Err(ConfigError::MissingParameter("base_path"))
    ));
}

#[test]
fn test_empty_filename_rejected() {
    let result = FileLoaderConfig::new("/plugins", "");
    assert!(matches!(
        result,
        Err(ConfigError::MissingParameter("filename"))
    ));
}

#[test]
fn test_empty_base_dir_rejected() {
    let result = TreeLoaderConfig::new("/plugins", "");
    assert!(matches!(
        result,
        Err(ConfigError::MissingParameter("base_dir"))
    ));
}

#[test]
fn test_absolute_filename_rejected() {
    let result = FileLoaderConfig::new("/plugins", "/etc/passwd");
    assert!(matches!(
        result,
        Err(ConfigError::InvalidRelativePath { parameter: "filename", .. })
    ));
}

#[test]
fn test_upward_traversal_rejected() {
    let result = TreeLoaderConfig::new("/plugins", "../outside");
    assert!(matches!(
        result,
        Err(ConfigError::InvalidRelativePath { parameter: "base_dir", .. })
    ));

    let result = FileLoaderConfig::new("/plugins", "http/../../escape.plugin.json");
    assert!(matches!(
        result,
        Err(ConfigError::InvalidRelativePath { parameter: "filename", .. })
    ));
}

#[test]
fn test_nested_relative_filename_accepted() {
    let config = FileLoaderConfig::new("/plugins", "http/auth/basic.plugin.json").unwrap();
    assert_eq!(config.filename(), Path::new("http/auth/basic.plugin.json"));
    assert_eq!(
        config.target(),
        Path::new("/plugins/http/auth/basic.plugin.json")
    );
}
