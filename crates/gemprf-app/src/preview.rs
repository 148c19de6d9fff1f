//! Preview driver: holds the latest rendered document
//!
//! Every mutation re-renders the whole document synchronously; there is no
//! incremental patching and no debouncing. Exports never read from here.

use crate::document::assemble;
use crate::form::FormModel;

#[derive(Debug, Clone, Default)]
pub struct PreviewDriver {
    enabled: bool,
    revision: u64,
    text: String,
}

impl PreviewDriver {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            revision: 0,
            text: String::new(),
        }
    }

    /// Re-render after a model mutation. Returns `true` if the text changed.
    pub fn on_model_changed(&mut self, model: &FormModel) -> bool {
        if !self.enabled {
            return false;
        }
        self.text = assemble(model);
        self.revision += 1;
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops the cached text; enabling takes effect on the next render
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.text.clear();
        }
    }

    /// Number of renders so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
