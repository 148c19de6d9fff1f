//! Handler module - TEA update function and message handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function, scalar fields and clipboard messages
//! - `lists`: Dynamic list mutations

pub(crate) mod lists;
pub(crate) mod update;


use crate::actions::ExportArtifact;
use crate::message::{Message, PasteTarget};

// Re-export main entry point
pub use update::update;

/// Actions the engine performs at the I/O boundary after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Write text to the clipboard
    CopyToClipboard { text: String },

    /// Read the clipboard (falling back to manual entry) for a paste
    ReadClipboard { target: PasteTarget },

    /// Write the document under its derived filename
    Download(ExportArtifact),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the engine to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
