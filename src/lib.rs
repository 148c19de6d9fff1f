//! GEMpRF Configuration Generator - binary support library
//!
//! The form, validation and document assembly live in the workspace crates.
//! This crate wires them to the command line: one-shot commands in
//! [`commands`] and the NDJSON interactive session in [`headless`].

pub mod commands;
pub mod headless;

pub use headless::runner::run_headless;
