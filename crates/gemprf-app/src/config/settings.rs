//! Settings parser for .gemprf/config.toml

use super::types::Settings;
use gemprf_core::prelude::*;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.toml";
pub const GEMPRF_DIR: &str = ".gemprf";

const DEFAULT_CONFIG: &str = r#"# GEMpRF Configuration Generator Settings

[export]
output_dir = "."        # Where downloaded documents are written

[clipboard]
backend = "osc52"       # osc52 | none

[preview]
enabled = true          # Re-render the document after every edit

[form]
preset = ""             # Preset file applied when --preset is not given
"#;

/// Location of the settings file for a project directory
pub fn config_path(project_path: &Path) -> PathBuf {
    project_path.join(GEMPRF_DIR).join(CONFIG_FILENAME)
}

/// Load settings from .gemprf/config.toml
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = config_path(project_path);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a commented default config.toml in .gemprf/
///
/// Returns `false` when the file already existed and was left untouched.
pub fn init_config_dir(project_path: &Path) -> Result<bool> {
    let gemprf_dir = project_path.join(GEMPRF_DIR);

    if !gemprf_dir.exists() {
        std::fs::create_dir_all(&gemprf_dir)
            .map_err(|e| Error::config(format!("Failed to create .gemprf dir: {}", e)))?;
        info!("Created .gemprf directory");
    }

    let config_path = gemprf_dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Ok(false);
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    info!("Created default config.toml");
    Ok(true)
}
