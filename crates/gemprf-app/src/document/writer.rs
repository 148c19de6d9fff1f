//! Indented XML text builder used by the assembler
//!
//! Every attribute value and element content passed in is escaped here, so
//! the sections never deal with escaping themselves. Comment text is written
//! verbatim and must be a fixed string, never user input.

use gemprf_core::escape_xml;

const INDENT: &str = "  ";

pub(crate) type Attrs<'a> = &'a [(&'a str, &'a str)];

#[derive(Debug, Default)]
pub(crate) struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn push_attrs(&mut self, attrs: Attrs<'_>) {
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_xml(value));
            self.out.push('"');
        }
    }

    fn end_line(&mut self, note: Option<&str>) {
        if let Some(note) = note {
            self.out.push_str(" <!-- ");
            self.out.push_str(note);
            self.out.push_str(" -->");
        }
        self.out.push('\n');
    }

    /// Unindented fixed text, e.g. the attribution block
    pub(crate) fn verbatim(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn comment(&mut self, text: &str) {
        self.indent();
        self.out.push_str("<!-- ");
        self.out.push_str(text);
        self.out.push_str(" -->\n");
    }

    pub(crate) fn open(&mut self, tag: &str, attrs: Attrs<'_>) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attrs(attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    pub(crate) fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    /// `<tag attrs>content</tag>` with an optional trailing comment
    pub(crate) fn leaf_with(
        &mut self,
        tag: &str,
        attrs: Attrs<'_>,
        content: &str,
        note: Option<&str>,
    ) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attrs(attrs);
        self.out.push('>');
        self.out.push_str(&escape_xml(content));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        self.end_line(note);
    }

    pub(crate) fn leaf(&mut self, tag: &str, content: &str) {
        self.leaf_with(tag, &[], content, None);
    }

    /// Self-closing `<tag attrs/>` with an optional trailing comment
    pub(crate) fn empty(&mut self, tag: &str, attrs: Attrs<'_>, note: Option<&str>) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attrs(attrs);
        self.out.push_str("/>");
        self.end_line(note);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
