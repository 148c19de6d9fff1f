//! # gemprf-core - Core Domain Types
//!
//! Foundation crate for the GEMpRF configuration generator. Provides error
//! handling, logging, heuristic path validation, filename derivation and
//! markup escaping.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, tracing, toml).
//!
//! ## Public API
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ### Validation (`validation`)
//! - [`validate_path()`] - Classify a path as empty/ok/warning/error
//! - [`ValidationFinding`], [`ValidationStatus`], [`PathKind`]
//!
//! ### Filenames (`filename`)
//! - [`build_filename()`] - Derive the download filename
//! - [`limit_words()`] - Word cap for the filename components
//!
//! ### Markup (`markup`)
//! - [`escape_xml()`], [`escape_path()`] - Escaping for generated documents
//! - [`normalize_separators()`] - Backslash to forward-slash path normalization
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use gemprf_core::prelude::*;
//! ```

pub mod error;
pub mod filename;
pub mod logging;
pub mod markup;
pub mod prelude;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use filename::{
    build_filename, limit_words, DESCRIPTION_MAX_WORDS, FILENAME_BASE, FILENAME_EXTENSION,
    STIMULUS_MAX_WORDS,
};
pub use markup::{escape_path, escape_xml, lower_bool, normalize_separators, py_bool};
pub use validation::{
    has_known_extension, validate_path, PathKind, ValidationFinding, ValidationStatus,
};
