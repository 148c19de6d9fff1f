//! Escaping of user text for the generated XML

use quick_xml::escape::escape;

/// Escape the five reserved markup characters.
///
/// Control characters that XML 1.0 cannot represent at all are dropped, so
/// the output is well-formed whatever the user typed.
pub fn escape_xml(value: &str) -> String {
    let representable: String = value.chars().filter(|c| is_xml_char(*c)).collect();
    escape(representable.as_str()).into_owned()
}

/// Normalize Windows directory separators to the forward form
pub fn normalize_separators(value: &str) -> String {
    value.replace('\\', "/")
}

/// Normalize separators, then escape
pub fn escape_path(value: &str) -> String {
    escape_xml(&normalize_separators(value))
}

/// Python-style boolean literal used by most flags in the target schema
pub fn py_bool(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Lowercase boolean literal used by a few attributes in the target schema
pub fn lower_bool(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
