//! Configuration file parsing for the configuration generator
//!
//! Supports:
//! - `.gemprf/config.toml` - Global settings
//! - Preset files - field values and list rows applied at startup

pub mod preset;
pub mod settings;
pub mod types;

pub use preset::{load_preset, parse_assignment, FormPreset, PresetLists};
pub use settings::{config_path, init_config_dir, load_settings, CONFIG_FILENAME, GEMPRF_DIR};
pub use types::*;
