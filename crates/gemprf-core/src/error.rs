//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    // ─────────────────────────────────────────────────────────────
    // Form Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown form field: {id}")]
    UnknownField { id: String },

    #[error("Invalid value '{value}' for {id} (expected one of: {expected})")]
    InvalidChoice {
        id: String,
        value: String,
        expected: String,
    },

    #[error("Row {index} is out of range for list {list} ({len} rows)")]
    ListIndex {
        list: String,
        index: usize,
        len: usize,
    },

    #[error("Malformed field assignment '{input}' (expected ID=VALUE)")]
    Assignment { input: String },

    // ─────────────────────────────────────────────────────────────
    // Boundary Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn unknown_field(id: impl Into<String>) -> Self {
        Self::UnknownField { id: id.into() }
    }

    pub fn invalid_choice(
        id: impl Into<String>,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        Self::InvalidChoice {
            id: id.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    pub fn list_index(list: impl Into<String>, index: usize, len: usize) -> Self {
        Self::ListIndex {
            list: list.into(),
            index,
            len,
        }
    }

    pub fn assignment(input: impl Into<String>) -> Self {
        Self::Assignment {
            input: input.into(),
        }
    }

    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Form and boundary errors never end an editing session: the edit is
    /// rejected (or the I/O skipped) and the form keeps its previous state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownField { .. }
                | Error::InvalidChoice { .. }
                | Error::ListIndex { .. }
                | Error::Assignment { .. }
                | Error::Clipboard { .. }
                | Error::Export { .. }
                | Error::Json(_)
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ChannelClosed | Error::ConfigNotFound { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::unknown_field("stim_dirr");
        assert_eq!(err.to_string(), "Unknown form field: stim_dirr");

        let err = Error::invalid_choice("data_type", "csv", &["bids", "fixed_paths"]);
        assert_eq!(
            err.to_string(),
            "Invalid value 'csv' for data_type (expected one of: bids, fixed_paths)"
        );
    }

    #[test]
    fn test_list_index_error_mentions_bounds() {
        let err = Error::list_index("gpus", 3, 1);
        let msg = err.to_string();
        assert!(msg.contains("Row 3"));
        assert!(msg.contains("gpus"));
        assert!(msg.contains("1 rows"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::unknown_field("x").is_recoverable());
        assert!(Error::list_index("gpus", 0, 0).is_recoverable());
        assert!(Error::clipboard("no terminal").is_recoverable());
        assert!(!Error::ChannelClosed.is_recoverable());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::ChannelClosed.is_fatal());
        assert!(Error::config_not_found("/missing/preset.toml").is_fatal());
        assert!(!Error::export("disk full").is_fatal());
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::assignment("novalue");
        let _ = Error::clipboard("test");
        let _ = Error::export("test");
        let _ = Error::config("test");
    }
}
