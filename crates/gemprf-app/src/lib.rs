//! gemprf-app - Form state, document assembly and orchestration
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! configuration form: [`Message`]s go through [`handler::update`], which
//! mutates [`AppState`] and may return an [`UpdateAction`] for the I/O
//! boundary. The [`Engine`] runs that loop, executes actions and keeps the
//! rendered preview current. [`document::assemble`] is the pure compiler from
//! form to GEMpRF XML.

pub mod actions;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod engine;
pub mod engine_event;
pub mod form;
pub mod handler;
pub mod message;
pub mod preview;
pub mod state;

// Re-export primary types
pub use actions::{export_artifact, write_download, ExportArtifact};
pub use document::{assemble, DOCUMENT_MIME_TYPE};
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use form::{BidsRunMode, DataSourceMode, FieldValue, FormModel, ListId};
pub use handler::{UpdateAction, UpdateResult};
pub use message::{Message, PasteTarget};
pub use preview::PreviewDriver;
pub use state::AppState;
