//! Heuristic path validation for form fields
//!
//! Classifies a free-text path as plausibly a file or a directory without ever
//! touching the filesystem. Findings are advisory: they decorate the field in
//! the form but never block document assembly or export.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Known data/document file extensions (case-insensitive, anchored at the end)
static FILE_EXTENSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(nii\.gz|nii|h5|hdf5|xml|txt|json|csv|xlsx|xls|pdf|zip|tar|gz)$")
        .expect("Invalid file extension regex")
});

/// Markers left in default values that mean "the user has not filled this in"
const PLACEHOLDER_TOKENS: &[&str] = &["Path/to", "path/to", "DIR_PATH"];

/// What a path field is expected to point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::File => "file",
            PathKind::Directory => "directory",
        }
    }
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a field's current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Empty,
    Ok,
    Warning,
    Error,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Empty => "empty",
            ValidationStatus::Ok => "ok",
            ValidationStatus::Warning => "warning",
            ValidationStatus::Error => "error",
        }
    }
}

/// A status plus the human-readable reason for warnings and errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    pub status: ValidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationFinding {
    pub fn empty() -> Self {
        Self {
            status: ValidationStatus::Empty,
            message: None,
        }
    }

    pub fn ok() -> Self {
        Self {
            status: ValidationStatus::Ok,
            message: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Warning,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_problem(&self) -> bool {
        matches!(
            self.status,
            ValidationStatus::Warning | ValidationStatus::Error
        )
    }

    /// Short marker rendered next to the field, empty when there is nothing to say
    pub fn indicator(&self) -> String {
        match (self.status, &self.message) {
            (ValidationStatus::Error, Some(msg)) => format!("(⛔ {})", msg),
            (ValidationStatus::Warning, Some(msg)) => format!("(⚠ {})", msg),
            _ => String::new(),
        }
    }
}

/// Check whether a value ends in one of the known file extensions
pub fn has_known_extension(value: &str) -> bool {
    FILE_EXTENSION_REGEX.is_match(value.trim())
}

fn contains_placeholder(value: &str) -> bool {
    PLACEHOLDER_TOKENS.iter().any(|token| value.contains(token))
}

/// Classify `value` as a file or directory path.
///
/// With `required_extension` set, a file path must end in exactly that
/// extension (case-insensitive) to be `Ok`.
pub fn validate_path(
    value: &str,
    kind: PathKind,
    required_extension: Option<&str>,
) -> ValidationFinding {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationFinding::empty();
    }

    let has_extension = has_known_extension(trimmed);
    if !has_extension && contains_placeholder(trimmed) {
        return ValidationFinding::empty();
    }

    match kind {
        PathKind::File => match required_extension {
            Some(ext) => {
                if trimmed.to_lowercase().ends_with(&ext.to_lowercase()) {
                    ValidationFinding::ok()
                } else {
                    ValidationFinding::error(format!("Must be {} file", ext))
                }
            }
            None if has_extension => ValidationFinding::ok(),
            None => ValidationFinding::warning("Uncertain - verify"),
        },
        PathKind::Directory => {
            if has_extension {
                ValidationFinding::error(format!("Looks incorrect {}", kind))
            } else if trimmed.contains('/') || trimmed.contains('\\') {
                ValidationFinding::ok()
            } else {
                ValidationFinding::warning("Uncertain - verify")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_empty() {
        for value in ["", "   ", "\t\n"] {
            assert_eq!(
                validate_path(value, PathKind::Directory, None).status,
                ValidationStatus::Empty
            );
            assert_eq!(
                validate_path(value, PathKind::File, Some(".h5")).status,
                ValidationStatus::Empty
            );
        }
    }

    #[test]
    fn test_placeholder_without_extension_is_empty() {
        let finding = validate_path("path/to/stimuli/DIR_PATH", PathKind::Directory, None);
        assert_eq!(finding.status, ValidationStatus::Empty);

        let finding = validate_path("Path/to/data/BIDS", PathKind::Directory, None);
        assert_eq!(finding.status, ValidationStatus::Empty);
    }

    #[test]
    fn test_placeholder_with_extension_is_classified() {
        // The default stimulus path still says path/to but already looks like a file
        let finding = validate_path("path/to/stimulus/file.nii.gz", PathKind::File, Some(".nii.gz"));
        assert_eq!(finding.status, ValidationStatus::Ok);
    }

    #[test]
    fn test_required_extension_is_case_insensitive() {
        let finding = validate_path("/data/params/GRID.H5", PathKind::File, Some(".h5"));
        assert_eq!(finding.status, ValidationStatus::Ok);
    }

    #[test]
    fn test_required_extension_mismatch_is_error() {
        let finding = validate_path("/data/stim/apertures.nii", PathKind::File, Some(".nii.gz"));
        assert_eq!(finding.status, ValidationStatus::Error);
        assert_eq!(finding.message.as_deref(), Some("Must be .nii.gz file"));
        assert_eq!(finding.indicator(), "(⛔ Must be .nii.gz file)");
    }

    #[test]
    fn test_file_with_known_extension_is_ok() {
        for value in [
            "sub-01_task-bar_bold.nii.gz",
            "/data/run.nii",
            "C:\\results\\table.CSV",
            "notes.txt",
            "archive.tar",
        ] {
            assert_eq!(
                validate_path(value, PathKind::File, None).status,
                ValidationStatus::Ok,
                "{value}"
            );
        }
    }

    #[test]
    fn test_file_without_known_extension_is_warning() {
        let finding = validate_path("/data/sub-01/func/bold", PathKind::File, None);
        assert_eq!(finding.status, ValidationStatus::Warning);
        assert_eq!(finding.indicator(), "(⚠ Uncertain - verify)");
    }

    #[test]
    fn test_directory_with_separator_is_ok() {
        for value in [
            "/mnt/data/stimuli",
            "D:\\GEMpRF-DemoKit\\stimuli",
            "relative/dir/",
            "./x",
        ] {
            assert_eq!(
                validate_path(value, PathKind::Directory, None).status,
                ValidationStatus::Ok,
                "{value}"
            );
        }
    }

    #[test]
    fn test_directory_with_file_extension_is_error() {
        for value in ["/data/stimuli/bar.nii.gz", "results.json", "/tmp/a.XLSX", "x.gz"] {
            let finding = validate_path(value, PathKind::Directory, None);
            assert_eq!(finding.status, ValidationStatus::Error, "{value}");
            assert_eq!(finding.message.as_deref(), Some("Looks incorrect directory"));
        }
    }

    #[test]
    fn test_bare_directory_name_is_warning() {
        let finding = validate_path("stimuli", PathKind::Directory, None);
        assert_eq!(finding.status, ValidationStatus::Warning);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let finding = validate_path("  /data/run.nii.gz  ", PathKind::File, Some(".nii.gz"));
        assert_eq!(finding.status, ValidationStatus::Ok);
    }

    #[test]
    fn test_ok_and_empty_have_no_indicator() {
        assert_eq!(ValidationFinding::ok().indicator(), "");
        assert_eq!(ValidationFinding::empty().indicator(), "");
        assert!(!ValidationFinding::ok().is_problem());
        assert!(ValidationFinding::warning("w").is_problem());
    }
}
