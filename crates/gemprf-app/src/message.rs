//! Message types for the application (TEA pattern)

use serde::{Deserialize, Serialize};

use crate::form::{BidsRunMode, ConcatPart, DataSourceMode, FieldValue, ListId};

/// Destination of a paste: a scalar field or one row of a string list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasteTarget {
    Field { id: String },
    ListRow { list: ListId, index: usize },
}

impl PasteTarget {
    pub fn field(id: impl Into<String>) -> Self {
        PasteTarget::Field { id: id.into() }
    }

    /// Label shown by the manual-entry prompt
    pub fn label(&self) -> String {
        match self {
            PasteTarget::Field { id } => id.clone(),
            PasteTarget::ListRow { list, index } => format!("{}[{}]", list, index),
        }
    }
}

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Scalar Fields
    // ─────────────────────────────────────────────────────────
    /// Assign a field from user input
    SetField { id: String, value: FieldValue },
    /// Flip a checkbox
    ToggleFlag { id: String },
    /// Reset a field to empty (unchecked for flags, default for choices)
    ClearField { id: String },

    // ─────────────────────────────────────────────────────────
    // Mode Selectors
    // ─────────────────────────────────────────────────────────
    SetDataSource(DataSourceMode),
    SetBidsRunType(BidsRunMode),

    // ─────────────────────────────────────────────────────────
    // Dynamic Lists
    // ─────────────────────────────────────────────────────────
    AddListRow(ListId),
    RemoveListRow { list: ListId, index: usize },
    ClearListRow { list: ListId, index: usize },
    /// Set a row of a string list (`data_paths`, `gpus`)
    SetListRow {
        list: ListId,
        index: usize,
        value: String,
    },
    /// Set one column of a concatenation row
    SetConcatField {
        index: usize,
        part: ConcatPart,
        value: String,
    },
    /// Replace every concatenation row from a JSON description
    ReplaceConcatItems { description: String },

    // ─────────────────────────────────────────────────────────
    // Clipboard / Export
    // ─────────────────────────────────────────────────────────
    /// Request a paste; the engine reads the clipboard (or prompts)
    PasteInto(PasteTarget),
    /// Text obtained for a paste request
    PasteResolved { target: PasteTarget, text: String },
    CopyField { id: String },
    CopyDocument,
    DownloadDocument,
}
