//! Engine - the single execution context for an editing session
//!
//! The Engine owns the TEA state plus the boundary collaborators (clipboard,
//! manual entry, output directory). Every message runs to completion here:
//! update, follow-up messages, boundary actions, then at most one re-render.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use gemprf_core::prelude::*;
use gemprf_core::ValidationFinding;

use crate::actions::handle_action;
use crate::clipboard::{Clipboard, ManualEntry};
use crate::config::{FormPreset, Settings};
use crate::document::assemble;
use crate::engine_event::EngineEvent;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    findings: Vec<(String, ValidationFinding)>,
    filename: String,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            findings: state.findings(),
            filename: state.form.config_filename(),
        }
    }
}

/// Orchestration engine for the configuration generator
pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Directory downloads are written to
    pub output_dir: PathBuf,

    /// Project directory settings were loaded from
    pub project_path: PathBuf,

    clipboard: Box<dyn Clipboard>,

    prompt: Box<dyn ManualEntry>,
}

impl Engine {
    /// Create an Engine with explicit boundary collaborators
    pub fn with_boundary(
        project_path: PathBuf,
        settings: Settings,
        clipboard: Box<dyn Clipboard>,
        prompt: Box<dyn ManualEntry>,
    ) -> Self {
        let output_dir = resolve_output_dir(&project_path, &settings.export.output_dir);
        debug!(
            "Engine ready (clipboard: {}, preview: {}, output: {:?})",
            settings.clipboard.backend, settings.preview.enabled, output_dir
        );

        Self {
            state: AppState::with_settings(settings),
            output_dir,
            project_path,
            clipboard,
            prompt,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Follow-up messages and actions are handled in order, then the preview
    /// is re-rendered once if anything changed. Returns the events produced.
    pub fn process_message(&mut self, msg: Message) -> Vec<EngineEvent> {
        let pre = StateSnapshot::capture(&self.state);
        let mut events = Vec::new();

        let mut queue = VecDeque::from([msg]);
        while let Some(m) = queue.pop_front() {
            let result = handler::update(&mut self.state, m);
            queue.extend(result.message);

            if let Some(action) = result.action {
                let outcome = handle_action(
                    action,
                    &self.state,
                    self.clipboard.as_mut(),
                    self.prompt.as_mut(),
                    &self.output_dir,
                );
                queue.extend(outcome.message);
                events.extend(outcome.event);
            }
        }

        events.extend(self.flush(&pre));
        events
    }

    /// Apply a preset through the normal message path
    pub fn apply_preset(&mut self, preset: &FormPreset) -> Vec<EngineEvent> {
        let (messages, errors) = preset.to_messages(&self.state.form);

        let mut events: Vec<EngineEvent> = errors
            .into_iter()
            .map(|e| {
                warn!("Skipping preset value: {}", e);
                EngineEvent::Rejected {
                    message: e.to_string(),
                }
            })
            .collect();

        for msg in messages {
            events.extend(self.process_message(msg));
        }
        events
    }

    /// Render the preview if it is stale (e.g. right after startup)
    pub fn refresh(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.state.render_if_dirty() {
            events.push(self.preview_event());
        }
        events
    }

    /// The document as it would be exported now
    pub fn document(&self) -> String {
        assemble(&self.state.form)
    }

    fn preview_event(&self) -> EngineEvent {
        EngineEvent::PreviewUpdated {
            revision: self.state.preview.revision(),
            document: self.state.preview.text().to_string(),
        }
    }

    /// Emit events for everything that changed since `pre`
    fn flush(&mut self, pre: &StateSnapshot) -> Vec<EngineEvent> {
        let mut events: Vec<EngineEvent> = self
            .state
            .take_rejections()
            .into_iter()
            .map(|message| EngineEvent::Rejected { message })
            .collect();

        if self.state.render_if_dirty() {
            events.push(self.preview_event());
        }

        let post = StateSnapshot::capture(&self.state);
        for (id, finding) in &post.findings {
            let before = pre.findings.iter().find(|(pre_id, _)| pre_id == id);
            if before.map(|(_, f)| f) != Some(finding) {
                events.push(EngineEvent::FindingChanged {
                    id: id.clone(),
                    finding: finding.clone(),
                });
            }
        }
        // A removed data path row stops reporting
        for (id, _) in &pre.findings {
            if !post.findings.iter().any(|(post_id, _)| post_id == id) {
                events.push(EngineEvent::FindingChanged {
                    id: id.clone(),
                    finding: ValidationFinding::empty(),
                });
            }
        }

        if post.filename != pre.filename {
            events.push(EngineEvent::FilenameChanged {
                filename: post.filename,
            });
        }

        events
    }
}

fn resolve_output_dir(project_path: &Path, output_dir: &Path) -> PathBuf {
    if output_dir.is_absolute() {
        output_dir.to_path_buf()
    } else {
        project_path.join(output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{MemoryClipboard, NoClipboard, ScriptedPrompt};
    use crate::form::{FieldValue, ListId};
    use crate::message::PasteTarget;
    use gemprf_core::ValidationStatus;
    use tempfile::tempdir;

    fn engine_in(dir: &Path, clipboard: Box<dyn Clipboard>) -> Engine {
        Engine::with_boundary(
            dir.to_path_buf(),
            Settings::default(),
            clipboard,
            Box::new(ScriptedPrompt::default()),
        )
    }

    fn set(id: &str, value: &str) -> Message {
        Message::SetField {
            id: id.to_string(),
            value: FieldValue::text(value),
        }
    }

    #[test]
    fn test_first_message_renders_preview() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(MemoryClipboard::new()));

        let events = engine.process_message(set("results_id", "First"));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::PreviewUpdated { revision: 1, .. })));
        assert!(engine.state.preview.text().contains(">First<"));
    }

    #[test]
    fn test_one_render_per_message() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(MemoryClipboard::new()));
        engine.refresh();

        engine.process_message(set("results_id", "A"));
        engine.process_message(Message::AddListRow(ListId::Gpus));
        assert_eq!(engine.state.preview.revision(), 3);
    }

    #[test]
    fn test_rejected_edit_does_not_render() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(MemoryClipboard::new()));
        engine.refresh();

        let events = engine.process_message(set("no_such_field", "x"));
        assert!(matches!(events.as_slice(), [EngineEvent::Rejected { .. }]));
        assert_eq!(engine.state.preview.revision(), 1);
    }

    #[test]
    fn test_finding_change_is_reported() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(MemoryClipboard::new()));

        let events = engine.process_message(set("bids_basepath", "/data/bids/sub-01.nii"));
        let finding = events.iter().find_map(|e| match e {
            EngineEvent::FindingChanged { id, finding } if id == "bids_basepath" => {
                Some(finding.clone())
            }
            _ => None,
        });
        assert_eq!(
            finding.map(|f| f.status),
            Some(ValidationStatus::Error)
        );
    }

    #[test]
    fn test_data_path_row_findings_are_reported() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(MemoryClipboard::new()));
        engine.refresh();

        let events = engine.process_message(Message::SetListRow {
            list: ListId::DataPaths,
            index: 0,
            value: "/data/sub-01/bold".to_string(),
        });
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::FindingChanged { id, finding }
                if id == "data_paths[0]" && finding.status == ValidationStatus::Warning
        )));

        engine.process_message(Message::AddListRow(ListId::DataPaths));
        let events = engine.process_message(Message::RemoveListRow {
            list: ListId::DataPaths,
            index: 1,
        });
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::FindingChanged { id, finding }
                if id == "data_paths[1]" && finding.status == ValidationStatus::Empty
        )));
    }

    #[test]
    fn test_filename_change_is_reported() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(MemoryClipboard::new()));

        let events = engine.process_message(set("filename_stimulus", "fixed bar"));
        assert!(events.contains(&EngineEvent::FilenameChanged {
            filename: "config-gemprf_stimulus-fixed-bar.xml".to_string()
        }));
    }

    #[test]
    fn test_paste_chain_sets_field() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(
            temp.path(),
            Box::new(MemoryClipboard::with_text(" D:\\data\\stimuli ")),
        );

        engine.process_message(Message::PasteInto(PasteTarget::field("stim_dir")));
        assert_eq!(engine.state.form.text("stim_dir"), "D:\\data\\stimuli");
        assert_eq!(engine.state.finding("stim_dir").status, ValidationStatus::Ok);
    }

    #[test]
    fn test_copy_document_uses_fresh_assembly() {
        let temp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.preview.enabled = false;
        let mut engine = Engine::with_boundary(
            temp.path().to_path_buf(),
            settings,
            Box::new(MemoryClipboard::new()),
            Box::new(ScriptedPrompt::default()),
        );

        let events = engine.process_message(Message::CopyDocument);
        let expected = engine.document().len();
        assert!(events.contains(&EngineEvent::Copied {
            ok: true,
            bytes: expected,
            error: None,
        }));
        assert!(engine.state.preview.text().is_empty());
    }

    #[test]
    fn test_download_writes_into_output_dir() {
        let temp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.export.output_dir = PathBuf::from("out");
        let mut engine = Engine::with_boundary(
            temp.path().to_path_buf(),
            settings,
            Box::new(NoClipboard),
            Box::new(ScriptedPrompt::default()),
        );

        engine.process_message(set("filename_datasrc", "NYU"));
        let events = engine.process_message(Message::DownloadDocument);

        let expected = temp.path().join("out").join("config-gemprf_data-NYU.xml");
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::Exported { ok: true, path: Some(p), .. } if *p == expected
        )));
        let written = std::fs::read_to_string(expected).unwrap();
        assert_eq!(written, engine.document());
    }

    #[test]
    fn test_apply_preset_reports_unknown_fields() {
        let temp = tempdir().unwrap();
        let mut engine = engine_in(temp.path(), Box::new(NoClipboard));
        let preset: FormPreset = toml::from_str(
            r#"
[fields]
stim_dirr = "/typo"
results_id = "Preset"

[lists]
gpus = [1, 2]
"#,
        )
        .unwrap();

        let events = engine.apply_preset(&preset);
        let rejected = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Rejected { .. }))
            .count();
        assert_eq!(rejected, 1);
        assert_eq!(engine.state.form.text("results_id"), "Preset");
        assert_eq!(engine.state.form.gpus.values(), &["1", "2"]);
    }

    #[test]
    fn test_relative_output_dir_resolves_against_project() {
        assert_eq!(
            resolve_output_dir(Path::new("/proj"), Path::new("configs")),
            PathBuf::from("/proj/configs")
        );
        assert_eq!(
            resolve_output_dir(Path::new("/proj"), Path::new("/abs")),
            PathBuf::from("/abs")
        );
    }
}
