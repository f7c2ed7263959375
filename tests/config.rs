//! Configuration system tests
//!
//! Tests for config paths and YAML loading/saving of the editor config.

use scribble::config::{EditorConfig, UntitledNumbering};
use scribble::config_paths;
use scribble::model::TextRange;
use scribble::{ScribbleError, TabSessionRegistry};
use tempfile::tempdir;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("scribble"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Editor Config Tests
// ========================================================================

#[test]
fn test_config_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = EditorConfig {
        font_sizes: vec![8, 24],
        default_point_size: 24,
        untitled_numbering: UntitledNumbering::OpenCount,
    };

    config.save_to(&path).unwrap();
    assert_eq!(EditorConfig::load_from(&path), config);
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let loaded = EditorConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(loaded, EditorConfig::default());
}

#[test]
fn test_unparseable_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "font_sizes: [twelve\n").unwrap();
    assert_eq!(EditorConfig::load_from(&path), EditorConfig::default());
}

#[test]
fn test_loaded_sizes_are_cleaned() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "font_sizes: [20, 0, 12, 20]\n").unwrap();

    let loaded = EditorConfig::load_from(&path);
    assert_eq!(loaded.font_sizes, vec![12, 20]);
    assert_eq!(loaded.default_point_size, 14);
}

#[test]
fn test_registry_honours_configured_sizes() {
    let config = EditorConfig {
        font_sizes: vec![9, 30],
        default_point_size: 9,
        untitled_numbering: UntitledNumbering::Monotonic,
    };
    let mut registry = TabSessionRegistry::with_config(config);
    let id = registry.new_document();
    registry.get_mut(id).unwrap().insert_text(0, "tiny");

    assert_eq!(
        registry
            .current_formatting_state(id, &TextRange::caret(2))
            .unwrap()
            .point_size,
        9
    );
    assert!(registry
        .set_font_size(id, 30, &TextRange::new(0, 4))
        .is_ok());
    assert!(matches!(
        registry.set_font_size(id, 12, &TextRange::new(0, 4)),
        Err(ScribbleError::InvalidSize { size: 12 })
    ));
}
