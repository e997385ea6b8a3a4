pub mod config;
pub mod settings;

pub use config::{AppConfig, SceneConfig, ServerConfig, DEFAULT_CONFIG_FILE};
pub use settings::{
    AsciiColorMode, AsciiStyle, EffectMode, EffectOverrides, EffectSettings, ExportFormat,
    ExportSettings, Quality,
};
