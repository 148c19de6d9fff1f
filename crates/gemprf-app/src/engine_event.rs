//! Domain events emitted by the Engine for external consumers
//!
//! Events are produced after each message processing cycle by comparing
//! state before and after, plus one event per executed boundary action.

use std::path::PathBuf;

use gemprf_core::ValidationFinding;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────
    /// The preview was re-rendered
    PreviewUpdated { revision: u64, document: String },

    /// A field's validation finding changed
    FindingChanged {
        id: String,
        finding: ValidationFinding,
    },

    /// The derived download filename changed
    FilenameChanged { filename: String },

    /// An edit was rejected; the form is unchanged
    Rejected { message: String },

    // ─────────────────────────────────────────────────────────
    // Boundary
    // ─────────────────────────────────────────────────────────
    Copied {
        ok: bool,
        bytes: usize,
        error: Option<String>,
    },

    Exported {
        ok: bool,
        filename: String,
        path: Option<PathBuf>,
        error: Option<String>,
    },
}

impl EngineEvent {
    /// Get a short name for the event type (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::PreviewUpdated { .. } => "preview_updated",
            EngineEvent::FindingChanged { .. } => "finding_changed",
            EngineEvent::FilenameChanged { .. } => "filename_changed",
            EngineEvent::Rejected { .. } => "rejected",
            EngineEvent::Copied { .. } => "copied",
            EngineEvent::Exported { .. } => "exported",
        }
    }
}
