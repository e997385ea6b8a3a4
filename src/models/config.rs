use serde::Deserialize;
use std::path::Path;

use super::settings::{EffectSettings, ExportSettings};

/// Default config path, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "retroloop.yaml";

/// Application configuration loaded from retroloop.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scene: SceneConfig,
    pub effects: EffectSettings,
    pub export: ExportSettings,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Parameters of the generated loop scene
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Render surface size in pixels
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    /// Number of orbiting shapes
    pub shapes: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            seed: 1984,
            shapes: 12,
        }
    }
}

impl AppConfig {
    /// Load configuration from `CONFIG_FILE` or `retroloop.yaml`.
    pub fn load() -> Self {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(Path::new(&path), true),
            Err(_) => Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE), false),
        }
    }

    /// Load configuration from a file, falling back to defaults.
    ///
    /// A missing file is only worth a warning when it was asked for explicitly.
    pub fn load_from_path(path: &Path, explicit: bool) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        palette = %config.effects.palette,
                        algorithm = %config.effects.algorithm,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
