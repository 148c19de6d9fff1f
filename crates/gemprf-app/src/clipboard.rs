//! Clipboard and manual-entry boundary
//!
//! The form never touches the system clipboard itself. The engine owns one
//! [`Clipboard`] and one [`ManualEntry`]; a failed read falls back to the
//! prompt and a failed write is logged and dropped.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use base64::Engine as _;
use gemprf_core::prelude::*;

use crate::config::ClipboardBackend;

/// System clipboard access
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
    fn read_text(&mut self) -> Result<String>;
}

/// Synchronous prompt used when the clipboard cannot be read
pub trait ManualEntry {
    /// Ask for a value. `None` means the user cancelled.
    fn prompt(&mut self, label: &str, current: &str) -> Option<String>;
}

/// Build the clipboard selected in settings
pub fn from_backend(backend: ClipboardBackend) -> Box<dyn Clipboard> {
    match backend {
        ClipboardBackend::Osc52 => Box::new(Osc52Clipboard::new(std::io::stderr())),
        ClipboardBackend::None => Box::new(NoClipboard),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OSC 52
// ─────────────────────────────────────────────────────────────────────────────

/// Terminal clipboard via the OSC 52 escape sequence.
///
/// Works in most modern terminal emulators. Terminals do not answer OSC 52
/// queries reliably, so reading always fails.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Escape sequence that places `text` on the clipboard
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn read_text(&mut self) -> Result<String> {
        Err(Error::clipboard("reading is not supported over OSC 52"))
    }
}

/// Clipboard disabled in settings
#[derive(Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<()> {
        Err(Error::clipboard("clipboard disabled"))
    }

    fn read_text(&mut self) -> Result<String> {
        Err(Error::clipboard("clipboard disabled"))
    }
}

/// In-process clipboard for headless sessions and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String> {
        self.contents
            .clone()
            .ok_or_else(|| Error::clipboard("clipboard is empty"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Manual entry
// ─────────────────────────────────────────────────────────────────────────────

/// Prompt on stderr, answer from a line reader (stdin by default)
pub struct StdinPrompt<R: BufRead> {
    input: R,
}

impl StdinPrompt<std::io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: std::io::stdin().lock(),
        }
    }
}

impl<R: BufRead> StdinPrompt<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> ManualEntry for StdinPrompt<R> {
    fn prompt(&mut self, label: &str, current: &str) -> Option<String> {
        eprint!("Paste value for {} [{}]: ", label, current);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            // EOF cancels
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Manual entry failed: {}", e);
                None
            }
        }
    }
}

/// Declines every prompt, for sessions without an interactive terminal
#[derive(Debug, Default)]
pub struct DeclinePrompt;

impl ManualEntry for DeclinePrompt {
    fn prompt(&mut self, label: &str, _current: &str) -> Option<String> {
        debug!("No manual entry available for {}", label);
        None
    }
}

/// Answers prompts from a fixed queue; cancels once empty
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Labels of every prompt shown so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl ManualEntry for ScriptedPrompt {
    fn prompt(&mut self, label: &str, _current: &str) -> Option<String> {
        self.asked.push(label.to_string());
        self.answers.pop_front().flatten()
    }
}
