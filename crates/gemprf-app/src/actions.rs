//! Action handlers: UpdateAction dispatch at the I/O boundary
//!
//! Every failure here is recovered: clipboard reads fall back to manual
//! entry, clipboard writes and downloads are logged and reported as an
//! unsuccessful [`EngineEvent`], and the form state is never touched.

use std::path::{Component, Path, PathBuf};

use gemprf_core::prelude::*;
use serde::Serialize;

use crate::clipboard::{Clipboard, ManualEntry};
use crate::document::{assemble, DOCUMENT_MIME_TYPE};
use crate::engine_event::EngineEvent;
use crate::form::{FormModel, ListId};
use crate::handler::UpdateAction;
use crate::message::{Message, PasteTarget};
use crate::state::AppState;

/// A document ready to be saved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Assemble the document and derive its filename, both fresh from the model
pub fn export_artifact(model: &FormModel) -> ExportArtifact {
    ExportArtifact {
        filename: model.config_filename(),
        mime_type: DOCUMENT_MIME_TYPE,
        contents: assemble(model),
    }
}

/// Write an artifact into `output_dir`, creating the directory if needed.
///
/// The artifact name must be a single file name; anything that would land
/// outside `output_dir` is refused.
pub fn write_download(artifact: &ExportArtifact, output_dir: &Path) -> Result<PathBuf> {
    let mut components = Path::new(&artifact.filename).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(Error::export(format!(
            "Refusing to write {:?}: not a plain file name",
            artifact.filename
        )));
    }

    std::fs::create_dir_all(output_dir).map_err(|e| {
        Error::export(format!("Failed to create {}: {}", output_dir.display(), e))
    })?;

    let path = output_dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.contents)
        .map_err(|e| Error::export(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}

/// What executing an action produced
#[derive(Debug, Default)]
pub struct ActionOutcome {
    /// Follow-up message for the update loop
    pub message: Option<Message>,
    /// Event for external consumers
    pub event: Option<EngineEvent>,
}

/// Current text at a paste target, shown by the manual-entry prompt
fn paste_target_value(state: &AppState, target: &PasteTarget) -> String {
    match target {
        PasteTarget::Field { id } => state.form.text(id),
        PasteTarget::ListRow { list, index } => {
            let row = match list {
                ListId::DataPaths => state.form.data_paths.get(*index),
                ListId::Gpus => state.form.gpus.get(*index),
                ListId::ConcatItems => None,
            };
            row.cloned().unwrap_or_default()
        }
    }
}

/// Execute an action
pub fn handle_action(
    action: UpdateAction,
    state: &AppState,
    clipboard: &mut dyn Clipboard,
    prompt: &mut dyn ManualEntry,
    output_dir: &Path,
) -> ActionOutcome {
    match action {
        UpdateAction::CopyToClipboard { text } => match clipboard.write_text(&text) {
            Ok(()) => {
                info!("Copied {} bytes to clipboard", text.len());
                ActionOutcome {
                    message: None,
                    event: Some(EngineEvent::Copied {
                        ok: true,
                        bytes: text.len(),
                        error: None,
                    }),
                }
            }
            Err(e) => {
                warn!("Copy failed: {}", e);
                ActionOutcome {
                    message: None,
                    event: Some(EngineEvent::Copied {
                        ok: false,
                        bytes: 0,
                        error: Some(e.to_string()),
                    }),
                }
            }
        },

        UpdateAction::ReadClipboard { target } => {
            let text = match clipboard.read_text() {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        debug!("Clipboard empty, {} unchanged", target.label());
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                }
                Err(e) => {
                    debug!("Clipboard read failed ({}), asking for manual entry", e);
                    let current = paste_target_value(state, &target);
                    prompt.prompt(&target.label(), &current)
                }
            };

            ActionOutcome {
                message: text.map(|text| Message::PasteResolved { target, text }),
                event: None,
            }
        }

        UpdateAction::Download(artifact) => {
            let event = match write_download(&artifact, output_dir) {
                Ok(path) => {
                    info!("Saved {}", path.display());
                    EngineEvent::Exported {
                        ok: true,
                        filename: artifact.filename,
                        path: Some(path),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("Download failed: {}", e);
                    EngineEvent::Exported {
                        ok: false,
                        filename: artifact.filename,
                        path: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            ActionOutcome {
                message: None,
                event: Some(event),
            }
        }
    }
}
