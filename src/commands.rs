//! One-shot commands: build the form once, report, write the result
//!
//! Stdout carries only the command's product (document, filename, path or
//! table). Findings, skipped preset values and hints go to stderr.

use std::path::{Path, PathBuf};

use gemprf_app::clipboard::{self, StdinPrompt};
use gemprf_app::config::{self, load_preset, parse_assignment, FormPreset, Settings};
use gemprf_app::form::{FieldKind, FieldValue, FIELDS, LIST_HELP};
use gemprf_app::{Engine, EngineEvent, Message};
use gemprf_core::prelude::*;

/// Where the form values come from
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    /// Preset file given on the command line
    pub preset: Option<PathBuf>,
    /// `ID=VALUE` overrides applied after the preset
    pub assignments: Vec<String>,
}

/// Preset to apply: `--preset`, else the one named in settings, plus overrides.
///
/// An explicit preset must load. A preset named in settings that cannot be
/// loaded is skipped with a warning, like the rest of the settings file.
pub fn resolve_preset(
    project: &Path,
    settings: &Settings,
    input: &FormInput,
) -> Result<FormPreset> {
    let mut preset = match &input.preset {
        Some(path) => load_preset(path).context("Failed to load preset")?,
        None => match settings.form.preset_path() {
            Some(path) => {
                let path = if path.is_absolute() {
                    path
                } else {
                    project.join(path)
                };
                load_preset(&path).unwrap_or_else(|e| {
                    warn!("Ignoring preset from settings: {}", e);
                    eprintln!("warning: ignoring preset {}: {}", path.display(), e);
                    FormPreset::default()
                })
            }
            None => FormPreset::default(),
        },
    };

    for assignment in &input.assignments {
        let (id, value) = parse_assignment(assignment)?;
        preset.assign(&id, &value);
    }
    Ok(preset)
}

/// Engine for a one-shot command with the form already filled in
pub fn prepare_engine(project: &Path, input: &FormInput) -> Result<Engine> {
    let settings = config::load_settings(project);
    let preset = resolve_preset(project, &settings, input)?;

    let clipboard = clipboard::from_backend(settings.clipboard.backend);
    let mut engine = Engine::with_boundary(
        project.to_path_buf(),
        settings,
        clipboard,
        Box::new(StdinPrompt::stdin()),
    );

    for event in engine.apply_preset(&preset) {
        if let EngineEvent::Rejected { message } = event {
            eprintln!("warning: skipped {}", message);
        }
    }
    Ok(engine)
}

/// `id: indicator` for every field with something to say
pub fn problem_lines(engine: &Engine) -> Vec<String> {
    engine
        .state
        .findings()
        .into_iter()
        .filter(|(_, finding)| finding.is_problem())
        .map(|(id, finding)| format!("{}: {}", id, finding.indicator()))
        .collect()
}

/// One line per validated field: id, status and message
pub fn validation_lines(engine: &Engine) -> Vec<String> {
    engine
        .state
        .findings()
        .into_iter()
        .map(|(id, finding)| match finding.message {
            Some(message) => format!("{:<24} {:<8} {}", id, finding.status.as_str(), message),
            None => format!("{:<24} {}", id, finding.status.as_str())
                .trim_end()
                .to_string(),
        })
        .collect()
}

/// Tab separated field table: id, kind, default, help
pub fn fields_table() -> String {
    let mut out = String::new();
    for spec in FIELDS {
        let kind = match spec.kind {
            FieldKind::Choice(options) => format!("choice({})", options.join("|")),
            other => other.label().to_string(),
        };
        let default = FieldValue::from(spec.default).as_text();
        out.push_str(&format!("{}\t{}\t{}\t{}\n", spec.id, kind, default, spec.help));
    }
    for (id, help) in LIST_HELP {
        out.push_str(&format!("{}\tlist\t\t{}\n", id, help));
    }
    out
}

/// Where `generate` puts the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateTarget {
    /// Download into this directory (or the configured one)
    Download(Option<PathBuf>),
    Stdout,
}

pub fn run_generate(
    project: &Path,
    input: &FormInput,
    target: GenerateTarget,
    copy: bool,
) -> Result<()> {
    let mut engine = prepare_engine(project, input)?;
    for line in problem_lines(&engine) {
        eprintln!("{}", line);
    }

    match target {
        GenerateTarget::Stdout => print!("{}", engine.document()),
        GenerateTarget::Download(dir) => {
            if let Some(dir) = dir {
                engine.output_dir = dir;
            }
            for event in engine.process_message(Message::DownloadDocument) {
                if let EngineEvent::Exported { ok, path, error, .. } = event {
                    match (ok, path) {
                        (true, Some(path)) => println!("{}", path.display()),
                        _ => {
                            return Err(Error::export(
                                error.unwrap_or_else(|| "download failed".to_string()),
                            ))
                        }
                    }
                }
            }
        }
    }

    if copy {
        for event in engine.process_message(Message::CopyDocument) {
            if let EngineEvent::Copied { ok, bytes, error } = event {
                if ok {
                    eprintln!("Copied {} bytes to the clipboard", bytes);
                } else {
                    eprintln!(
                        "warning: copy failed: {}",
                        error.unwrap_or_else(|| "unknown error".to_string())
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn run_validate(project: &Path, input: &FormInput) -> Result<()> {
    let engine = prepare_engine(project, input)?;
    for line in validation_lines(&engine) {
        println!("{}", line);
    }
    Ok(())
}

pub fn run_filename(project: &Path, input: &FormInput) -> Result<()> {
    let engine = prepare_engine(project, input)?;
    println!("{}", engine.state.form.config_filename());
    Ok(())
}

pub fn run_fields() {
    print!("{}", fields_table());
}

pub fn run_init(project: &Path) -> Result<()> {
    let path = config::config_path(project);
    if config::init_config_dir(project)? {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists", path.display());
    }
    Ok(())
}
