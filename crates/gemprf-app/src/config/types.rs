//! Configuration types
//!
//! Defines `Settings` (`.gemprf/config.toml`) and its sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings (.gemprf/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub export: ExportSettings,

    #[serde(default)]
    pub clipboard: ClipboardSettings,

    #[serde(default)]
    pub preview: PreviewSettings,

    #[serde(default)]
    pub form: FormSettings,
}

/// Where downloaded documents are written
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Output directory, relative paths resolve against the project directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Clipboard backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardBackend {
    /// Terminal OSC 52 escape sequence (write only)
    #[default]
    Osc52,
    /// Clipboard disabled; copies are dropped, pastes fall back to manual entry
    None,
}

impl std::fmt::Display for ClipboardBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardBackend::Osc52 => write!(f, "osc52"),
            ClipboardBackend::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClipboardSettings {
    #[serde(default)]
    pub backend: ClipboardBackend,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreviewSettings {
    /// Keep a live rendered preview after every edit
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FormSettings {
    /// Preset applied when no `--preset` is given (empty = none)
    #[serde(default)]
    pub preset: String,
}

impl FormSettings {
    pub fn preset_path(&self) -> Option<PathBuf> {
        let trimmed = self.preset.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}
