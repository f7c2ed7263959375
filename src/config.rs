//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/scribble/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_POINT_SIZE;

/// How `Untitled-N` numbers are chosen for new documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UntitledNumbering {
    /// Increasing counter; numbers are never reused within a session
    #[default]
    Monotonic,
    /// Number of open documents plus one; may repeat after tabs close
    OpenCount,
}

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Point sizes offered by the toolbar; anything else is rejected
    #[serde(default = "default_font_sizes")]
    pub font_sizes: Vec<u32>,

    /// Point size of text in new documents
    #[serde(default = "default_point_size")]
    pub default_point_size: u32,

    #[serde(default)]
    pub untitled_numbering: UntitledNumbering,
}

fn default_font_sizes() -> Vec<u32> {
    vec![10, 12, 14, 16, 18, 20]
}

fn default_point_size() -> u32 {
    DEFAULT_POINT_SIZE
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_sizes: default_font_sizes(),
            default_point_size: default_point_size(),
            untitled_numbering: UntitledNumbering::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.normalized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Sorted, deduplicated sizes with zeros removed; defaults when nothing usable remains
    fn normalized(mut self) -> Self {
        self.font_sizes.retain(|&size| size > 0);
        self.font_sizes.sort_unstable();
        self.font_sizes.dedup();
        if self.font_sizes.is_empty() {
            tracing::warn!("Config lists no usable font sizes, using defaults");
            self.font_sizes = default_font_sizes();
        }
        if self.default_point_size == 0 {
            tracing::warn!("Config default_point_size is 0, using {}", DEFAULT_POINT_SIZE);
            self.default_point_size = DEFAULT_POINT_SIZE;
        }
        self
    }

    /// Whether the toolbar offers `size`
    pub fn supports_size(&self, size: u32) -> bool {
        self.font_sizes.contains(&size)
    }
}
