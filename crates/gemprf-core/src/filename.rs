//! Derived configuration filename
//!
//! The downloaded document is named after three short free-text components:
//! `config-gemprf_data-<src>_stimulus-<stim>_desc-<desc>.xml`. Components that
//! are blank are left out entirely.

use regex::Regex;
use std::sync::LazyLock;

/// Fixed stem every generated filename starts with
pub const FILENAME_BASE: &str = "config-gemprf";

/// Extension of the generated document
pub const FILENAME_EXTENSION: &str = ".xml";

/// Maximum words accepted for the stimulus component
pub const STIMULUS_MAX_WORDS: usize = 5;

/// Maximum words accepted for the description component
pub const DESCRIPTION_MAX_WORDS: usize = 10;

/// Whitespace and characters that cannot appear in a file name on common
/// platforms, directory separators included
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s/\\:*?"<>|]+"#).expect("Invalid filename separator regex")
});

/// Collapse whitespace and path separators into single hyphens, so each
/// component stays inside one file name
fn slug(component: &str) -> String {
    SEPARATOR_RUN.replace_all(component.trim(), "-").into_owned()
}

/// Build the suggested filename for a download
pub fn build_filename(datasrc: &str, stimulus: &str, description: &str) -> String {
    let mut filename = String::from(FILENAME_BASE);

    for (prefix, component) in [
        ("_data-", datasrc),
        ("_stimulus-", stimulus),
        ("_desc-", description),
    ] {
        if !component.trim().is_empty() {
            filename.push_str(prefix);
            filename.push_str(&slug(component));
        }
    }

    filename.push_str(FILENAME_EXTENSION);
    filename
}

/// Truncate free text to its first `max_words` words.
///
/// Text within the limit is returned unchanged so in-progress typing
/// (trailing spaces included) is not disturbed.
pub fn limit_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        words[..max_words].join(" ")
    } else {
        text.to_string()
    }
}
