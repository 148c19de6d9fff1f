//! Headless mode - NDJSON command/event session
//!
//! Drives the form without a terminal UI. Commands arrive on stdin and events
//! leave on stdout, one JSON object per line in both directions. This lets
//! editors and scripts fill in a configuration interactively and watch the
//! document, findings and filename change.
//!
//! # Command Format
//!
//! Each command has a "cmd" field naming it:
//!
//! ```json
//! {"cmd":"set","id":"stim_dir","value":"/data/stimuli"}
//! {"cmd":"data_source","mode":"fixed_paths"}
//! {"cmd":"set_row","list":"data_paths","index":0,"value":"sub-01_bold.nii.gz"}
//! {"cmd":"download"}
//! ```
//!
//! # Event Format
//!
//! Each event has an "event" field indicating its type:
//!
//! ```json
//! {"event":"validation","id":"stim_dir","status":"ok","timestamp":1704700001000}
//! {"event":"validation","id":"data_paths[0]","status":"warning","message":"Uncertain - verify","timestamp":1704700001000}
//! {"event":"filename","filename":"config-gemprf_data-HCP.xml","timestamp":1704700002000}
//! {"event":"exported","ok":true,"filename":"config-gemprf.xml","path":"./config-gemprf.xml","timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::error;

use gemprf_app::form::{BidsRunMode, ConcatPart, DataSourceMode, FieldValue, ListId};
use gemprf_app::{EngineEvent, Message, PasteTarget};
use gemprf_core::{ValidationFinding, ValidationStatus};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The document preview was re-rendered
    PreviewUpdated {
        revision: u64,
        document: String,
        timestamp: i64,
    },

    /// Reply to a `document` query, assembled fresh from the form
    Document { document: String, timestamp: i64 },

    /// Validation finding for one field
    Validation {
        id: String,
        status: ValidationStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        timestamp: i64,
    },

    /// Derived download filename
    Filename { filename: String, timestamp: i64 },

    /// Download finished
    Exported {
        ok: bool,
        filename: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        timestamp: i64,
    },

    /// Clipboard write finished
    Copied {
        ok: bool,
        bytes: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        timestamp: i64,
    },

    /// A command was rejected or could not be parsed
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as NDJSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // Convenience constructors

    pub fn preview_updated(revision: u64, document: impl Into<String>) -> Self {
        Self::PreviewUpdated {
            revision,
            document: document.into(),
            timestamp: Self::now(),
        }
    }

    pub fn document(document: impl Into<String>) -> Self {
        Self::Document {
            document: document.into(),
            timestamp: Self::now(),
        }
    }

    pub fn validation(id: impl Into<String>, finding: ValidationFinding) -> Self {
        Self::Validation {
            id: id.into(),
            status: finding.status,
            message: finding.message,
            timestamp: Self::now(),
        }
    }

    pub fn filename(filename: impl Into<String>) -> Self {
        Self::Filename {
            filename: filename.into(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }
}

impl From<EngineEvent> for HeadlessEvent {
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::PreviewUpdated { revision, document } => {
                Self::preview_updated(revision, document)
            }
            EngineEvent::FindingChanged { id, finding } => Self::validation(id, finding),
            EngineEvent::FilenameChanged { filename } => Self::filename(filename),
            EngineEvent::Rejected { message } => Self::error(message, false),
            EngineEvent::Copied { ok, bytes, error } => Self::Copied {
                ok,
                bytes,
                error,
                timestamp: Self::now(),
            },
            EngineEvent::Exported {
                ok,
                filename,
                path,
                error,
            } => Self::Exported {
                ok,
                filename,
                path: path.map(|p| p.display().to_string()),
                error,
                timestamp: Self::now(),
            },
        }
    }
}

/// Commands accepted on stdin in headless mode
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HeadlessCommand {
    Set { id: String, value: FieldValue },
    Toggle { id: String },
    Clear { id: String },
    DataSource { mode: DataSourceMode },
    BidsRunType { mode: BidsRunMode },
    AddRow { list: ListId },
    RemoveRow { list: ListId, index: usize },
    ClearRow { list: ListId, index: usize },
    SetRow {
        list: ListId,
        index: usize,
        value: String,
    },
    SetConcat {
        index: usize,
        part: ConcatPart,
        value: String,
    },
    ReplaceConcat { description: String },
    /// Paste `text` if given, otherwise read the session clipboard
    Paste {
        target: PasteTarget,
        #[serde(default)]
        text: Option<String>,
    },
    CopyField { id: String },
    Copy,
    Download,

    /// Report every finding
    Validate,
    /// Report the current filename
    Filename,
    /// Report the current document
    Document,
    Quit,
}

impl HeadlessCommand {
    /// Parse one stdin line
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// The form message this command stands for; queries and quit have none
    pub fn into_message(self) -> Option<Message> {
        let msg = match self {
            HeadlessCommand::Set { id, value } => Message::SetField { id, value },
            HeadlessCommand::Toggle { id } => Message::ToggleFlag { id },
            HeadlessCommand::Clear { id } => Message::ClearField { id },
            HeadlessCommand::DataSource { mode } => Message::SetDataSource(mode),
            HeadlessCommand::BidsRunType { mode } => Message::SetBidsRunType(mode),
            HeadlessCommand::AddRow { list } => Message::AddListRow(list),
            HeadlessCommand::RemoveRow { list, index } => Message::RemoveListRow { list, index },
            HeadlessCommand::ClearRow { list, index } => Message::ClearListRow { list, index },
            HeadlessCommand::SetRow { list, index, value } => {
                Message::SetListRow { list, index, value }
            }
            HeadlessCommand::SetConcat { index, part, value } => {
                Message::SetConcatField { index, part, value }
            }
            HeadlessCommand::ReplaceConcat { description } => {
                Message::ReplaceConcatItems { description }
            }
            HeadlessCommand::Paste {
                target,
                text: Some(text),
            } => Message::PasteResolved { target, text },
            HeadlessCommand::Paste { target, text: None } => Message::PasteInto(target),
            HeadlessCommand::CopyField { id } => Message::CopyField { id },
            HeadlessCommand::Copy => Message::CopyDocument,
            HeadlessCommand::Download => Message::DownloadDocument,
            HeadlessCommand::Validate
            | HeadlessCommand::Filename
            | HeadlessCommand::Document
            | HeadlessCommand::Quit => return None,
        };
        Some(msg)
    }
}
