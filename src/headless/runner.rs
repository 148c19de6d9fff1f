//! Headless mode runner - command loop without a terminal UI
//!
//! A dedicated thread reads stdin and forwards parsed commands over a
//! channel. The loop applies them one at a time through the Engine and emits
//! the resulting events as NDJSON on stdout.

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use gemprf_app::clipboard::{DeclinePrompt, MemoryClipboard};
use gemprf_app::config;
use gemprf_app::Engine;
use gemprf_core::prelude::*;

use super::{HeadlessCommand, HeadlessEvent};
use crate::commands::{resolve_preset, FormInput};

/// A stdin line: a command, or the reason it could not be parsed
type StdinLine = std::result::Result<HeadlessCommand, String>;

/// Run in headless mode - read JSON commands, write JSON events
pub async fn run_headless(project_path: &Path, input: &FormInput) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("GEMpRF config generator starting in HEADLESS mode");
    info!("Project: {}", project_path.display());
    info!("═══════════════════════════════════════════════════════");

    let mut engine = match headless_engine(project_path, input) {
        Ok(engine) => engine,
        Err(e) => {
            HeadlessEvent::error(e.to_string(), e.is_fatal()).emit();
            return Err(e);
        }
    };
    for event in startup_events(&mut engine) {
        event.emit();
    }

    let (tx, rx) = mpsc::channel::<StdinLine>(64);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(tx);
    });

    let result = headless_event_loop(&mut engine, rx).await;
    info!("GEMpRF config generator headless mode exiting");
    result
}

/// Engine with the session clipboard and no interactive prompt (stdin is taken)
fn headless_engine(project_path: &Path, input: &FormInput) -> Result<Engine> {
    let settings = config::load_settings(project_path);
    let preset = resolve_preset(project_path, &settings, input)?;

    let mut engine = Engine::with_boundary(
        project_path.to_path_buf(),
        settings,
        Box::new(MemoryClipboard::new()),
        Box::new(DeclinePrompt),
    );

    for event in engine.apply_preset(&preset) {
        if let gemprf_app::EngineEvent::Rejected { message } = event {
            HeadlessEvent::error(message, false).emit();
        }
    }
    Ok(engine)
}

/// Full picture of the form: document, every finding, filename
fn snapshot_events(engine: &Engine) -> Vec<HeadlessEvent> {
    let mut events = Vec::new();
    if engine.state.preview.is_enabled() {
        events.push(HeadlessEvent::preview_updated(
            engine.state.preview.revision(),
            engine.state.preview.text(),
        ));
    }
    events.extend(
        engine
            .state
            .findings()
            .into_iter()
            .map(|(id, finding)| HeadlessEvent::validation(id, finding)),
    );
    events.push(HeadlessEvent::filename(engine.state.form.config_filename()));
    events
}

fn startup_events(engine: &mut Engine) -> Vec<HeadlessEvent> {
    engine.refresh();
    snapshot_events(engine)
}

/// Apply one command. Returns the events to emit and whether to stop.
fn respond(engine: &mut Engine, cmd: HeadlessCommand) -> (Vec<HeadlessEvent>, bool) {
    match cmd {
        HeadlessCommand::Quit => (Vec::new(), true),
        HeadlessCommand::Validate => {
            let events = engine
                .state
                .findings()
                .into_iter()
                .map(|(id, finding)| HeadlessEvent::validation(id, finding))
                .collect();
            (events, false)
        }
        HeadlessCommand::Filename => (
            vec![HeadlessEvent::filename(engine.state.form.config_filename())],
            false,
        ),
        HeadlessCommand::Document => (vec![HeadlessEvent::document(engine.document())], false),
        other => {
            let events = match other.into_message() {
                Some(msg) => engine
                    .process_message(msg)
                    .into_iter()
                    .map(HeadlessEvent::from)
                    .collect(),
                None => Vec::new(),
            };
            (events, false)
        }
    }
}

/// Main headless event loop
async fn headless_event_loop(
    engine: &mut Engine,
    mut rx: mpsc::Receiver<StdinLine>,
) -> Result<()> {
    loop {
        match rx.recv().await {
            Some(Ok(cmd)) => {
                let (events, quit) = respond(engine, cmd);
                for event in events {
                    event.emit();
                }
                if quit {
                    info!("Quit requested");
                    break;
                }
            }
            Some(Err(message)) => HeadlessEvent::error(message, false).emit(),
            None => {
                info!("Command channel closed");
                break;
            }
        }
    }
    Ok(())
}

/// Read NDJSON commands from stdin (runs on its own thread)
fn spawn_stdin_reader_blocking(tx: mpsc::Sender<StdinLine>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let parsed = HeadlessCommand::parse(trimmed).map_err(|e| {
                    warn!("Unparsable command: {}", trimmed);
                    format!("Invalid command: {}", e)
                });
                let quit = matches!(parsed, Ok(HeadlessCommand::Quit));
                if tx.blocking_send(parsed).is_err() {
                    warn!("{}", Error::ChannelClosed);
                    break;
                }
                if quit {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemprf_app::config::Settings;
    use gemprf_app::form::{FieldValue, ListId};
    use gemprf_app::Message;
    use gemprf_core::ValidationStatus;
    use tempfile::tempdir;

    /// Engine with the startup render already done, as after `run_headless`
    fn engine_in(dir: &Path) -> Engine {
        let mut engine = Engine::with_boundary(
            dir.to_path_buf(),
            Settings::default(),
            Box::new(MemoryClipboard::new()),
            Box::new(DeclinePrompt),
        );
        engine.refresh();
        engine
    }

    fn cmd(line: &str) -> HeadlessCommand {
        HeadlessCommand::parse(line).unwrap()
    }

    #[test]
    fn test_startup_snapshot() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());

        let events = startup_events(&mut engine);
        assert!(matches!(
            events.first(),
            Some(HeadlessEvent::PreviewUpdated { revision: 1, .. })
        ));
        let validations = events
            .iter()
            .filter(|e| matches!(e, HeadlessEvent::Validation { .. }))
            .count();
        assert_eq!(validations, engine.state.findings().len());
        assert!(matches!(
            events.last(),
            Some(HeadlessEvent::Filename { filename, .. }) if filename == "config-gemprf.xml"
        ));
    }

    #[test]
    fn test_edit_emits_preview_and_finding() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());
        startup_events(&mut engine);

        let (events, quit) = respond(
            &mut engine,
            cmd(r#"{"cmd":"set","id":"stim_dir","value":"/data/stim.nii"}"#),
        );
        assert!(!quit);
        assert!(events
            .iter()
            .any(|e| matches!(e, HeadlessEvent::PreviewUpdated { revision: 2, .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            HeadlessEvent::Validation { id, status: ValidationStatus::Error, .. } if id == "stim_dir"
        )));
    }

    #[test]
    fn test_rejected_command_emits_error() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());

        let (events, _) = respond(
            &mut engine,
            cmd(r#"{"cmd":"remove_row","list":"gpus","index":9}"#),
        );
        assert!(matches!(
            events.as_slice(),
            [HeadlessEvent::Error { fatal: false, .. }, ..]
        ));
    }

    #[test]
    fn test_copy_then_paste_uses_session_clipboard() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());
        engine.process_message(Message::SetField {
            id: "bids_basepath".to_string(),
            value: FieldValue::text("/data/bids"),
        });

        let (events, _) = respond(&mut engine, cmd(r#"{"cmd":"copy_field","id":"bids_basepath"}"#));
        assert!(events
            .iter()
            .any(|e| matches!(e, HeadlessEvent::Copied { ok: true, bytes: 10, .. })));

        respond(&mut engine, cmd(r#"{"cmd":"add_row","list":"data_paths"}"#));
        respond(
            &mut engine,
            cmd(r#"{"cmd":"paste","target":{"list_row":{"list":"data_paths","index":1}}}"#),
        );
        assert_eq!(engine.state.form.data_paths.get(1).map(String::as_str), Some("/data/bids"));
        assert_eq!(engine.state.form.list_len(ListId::DataPaths), 2);
    }

    #[test]
    fn test_download_emits_exported() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());

        let (events, _) = respond(&mut engine, cmd(r#"{"cmd":"download"}"#));
        assert!(matches!(
            events.as_slice(),
            [HeadlessEvent::Exported { ok: true, .. }]
        ));
        assert!(temp.path().join("config-gemprf.xml").exists());
    }

    #[test]
    fn test_first_command_on_unrendered_engine_also_renders() {
        let temp = tempdir().unwrap();
        let mut engine = Engine::with_boundary(
            temp.path().to_path_buf(),
            Settings::default(),
            Box::new(MemoryClipboard::new()),
            Box::new(DeclinePrompt),
        );

        let (events, _) = respond(&mut engine, cmd(r#"{"cmd":"download"}"#));
        assert!(events
            .iter()
            .any(|e| matches!(e, HeadlessEvent::Exported { ok: true, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, HeadlessEvent::PreviewUpdated { revision: 1, .. })));
    }

    #[test]
    fn test_set_row_reports_data_path_finding() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());

        let (events, _) = respond(
            &mut engine,
            cmd(r#"{"cmd":"set_row","list":"data_paths","index":0,"value":"/data/sub-01/bold"}"#),
        );
        assert!(events.iter().any(|e| matches!(
            e,
            HeadlessEvent::Validation { id, status: ValidationStatus::Warning, .. }
                if id == "data_paths[0]"
        )));
    }

    #[test]
    fn test_queries_and_quit() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path());

        engine.process_message(Message::SetField {
            id: "results_id".to_string(),
            value: FieldValue::text("Queried"),
        });
        let revision = engine.state.preview.revision();

        let (events, _) = respond(&mut engine, cmd(r#"{"cmd":"document"}"#));
        assert!(matches!(
            events.as_slice(),
            [HeadlessEvent::Document { document, .. }]
                if *document == engine.document() && document.contains(">Queried<")
        ));
        // A query does not render
        assert_eq!(engine.state.preview.revision(), revision);

        let (events, _) = respond(&mut engine, cmd(r#"{"cmd":"filename"}"#));
        assert_eq!(events.len(), 1);

        let (events, quit) = respond(&mut engine, cmd(r#"{"cmd":"quit"}"#));
        assert!(events.is_empty());
        assert!(quit);
    }
}
