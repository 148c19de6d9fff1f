//! Integration tests: presets applied through the engine, documents checked
//! with an XML reader

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tempfile::TempDir;

use gemprf_app::clipboard::{DeclinePrompt, MemoryClipboard};
use gemprf_app::config::{load_preset, Settings};
use gemprf_app::{Engine, EngineEvent, Message};
use gemprf_configgen::commands::{prepare_engine, FormInput};
use gemprf_core::ValidationStatus;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/presets")
        .join(name)
}

fn engine_with(name: &str, dir: &Path) -> (Engine, Vec<EngineEvent>) {
    let mut engine = Engine::with_boundary(
        dir.to_path_buf(),
        Settings::default(),
        Box::new(MemoryClipboard::new()),
        Box::new(DeclinePrompt),
    );
    let preset = load_preset(&fixture(name)).unwrap();
    let events = engine.apply_preset(&preset);
    (engine, events)
}

/// (element path, text) for every element, panicking on malformed XML
fn elements(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<String> = Vec::new();
    let mut out: Vec<(String, String)> = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                current.push(out.len());
                out.push((open.join("/"), String::new()));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                out.push((format!("{}/{}", open.join("/"), name), String::new()));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                assert_eq!(open.pop(), Some(name), "mismatched end tag");
                current.pop();
            }
            Ok(Event::Text(t)) => {
                if let Some(index) = current.last() {
                    out[*index].1.push_str(&t.unescape().unwrap());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML parse error: {}", e),
            _ => {}
        }
    }
    assert!(open.is_empty());
    out
}

fn texts(xml: &str, path: &str) -> Vec<String> {
    elements(xml)
        .into_iter()
        .filter(|(p, _)| p == path)
        .map(|(_, text)| text.trim().to_string())
        .collect()
}

#[test]
fn test_fixed_paths_preset() {
    let temp = TempDir::new().unwrap();
    let (engine, events) = engine_with("fixed_paths.toml", temp.path());
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::Rejected { .. })));

    let xml = engine.document();
    assert_eq!(
        texts(&xml, "root/input_datasrc/fixed_paths/measured_data_filepath/filepath"),
        vec![
            "D:/GEMpRF/data/sub-01_task-bar_run-01_bold.nii.gz",
            "D:/GEMpRF/data/sub-01_task-bar_run-02_bold.nii.gz",
        ]
    );
    assert_eq!(texts(&xml, "root/stimulus/directory"), vec!["D:/GEMpRF/stimuli"]);
    assert_eq!(
        texts(&xml, "root/gpu/additional_available_gpus/gpu"),
        vec!["1"]
    );
    assert_eq!(
        engine.state.form.config_filename(),
        "config-gemprf_data-NYU_stimulus-fixed-bar.xml"
    );
    assert_eq!(engine.state.finding("stim_dir").status, ValidationStatus::Ok);
}

#[test]
fn test_bids_concat_preset() {
    let temp = TempDir::new().unwrap();
    let (engine, _) = engine_with("bids_concat.toml", temp.path());

    let xml = engine.document();
    let base = "root/input_datasrc/BIDS/concatenated/concatenate_item";
    assert_eq!(texts(&xml, &format!("{}/ses", base)), vec!["01", "02"]);
    assert_eq!(texts(&xml, &format!("{}/task", base)), vec!["bar", "ring"]);
    assert_eq!(texts(&xml, &format!("{}/run", base)), vec!["1", "1"]);
    assert!(texts(&xml, "root/input_datasrc/BIDS/individual/task").is_empty());
    assert_eq!(
        engine.state.form.config_filename(),
        "config-gemprf_desc-two-sessions.xml"
    );
}

#[test]
fn test_broken_concat_preset_is_fail_soft() {
    let temp = TempDir::new().unwrap();
    let (engine, events) = engine_with("broken_concat.toml", temp.path());

    // The typo is skipped; the bad description is only a warning
    let rejected: Vec<&EngineEvent> = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::Rejected { .. }))
        .collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(
        engine.state.finding("concat_items").status,
        ValidationStatus::Warning
    );

    let xml = engine.document();
    assert_eq!(
        texts(&xml, "root/input_datasrc/BIDS/concatenated/concatenate_item/ses").len(),
        1
    );
}

#[test]
fn test_mode_round_trip_keeps_values() {
    let temp = TempDir::new().unwrap();
    let (mut engine, _) = engine_with("bids_concat.toml", temp.path());
    let before = engine.document();

    engine.process_message(Message::SetDataSource(
        gemprf_app::DataSourceMode::FixedPaths,
    ));
    assert_ne!(engine.document(), before);
    engine.process_message(Message::SetDataSource(gemprf_app::DataSourceMode::Bids));
    assert_eq!(engine.document(), before);
}

#[test]
fn test_prepare_engine_with_assignments() {
    let temp = TempDir::new().unwrap();
    let input = FormInput {
        preset: Some(fixture("fixed_paths.toml")),
        assignments: vec![
            "gpus=1,2".to_string(),
            "filename_stimulus=".to_string(),
        ],
    };
    let engine = prepare_engine(temp.path(), &input).unwrap();

    assert_eq!(engine.state.form.gpus.values(), &["1", "2"]);
    assert_eq!(engine.state.form.config_filename(), "config-gemprf_data-NYU.xml");
}

#[test]
fn test_download_then_reassemble_matches() {
    let temp = TempDir::new().unwrap();
    let (mut engine, _) = engine_with("bids_concat.toml", temp.path());

    let events = engine.process_message(Message::DownloadDocument);
    let path = events
        .iter()
        .find_map(|e| match e {
            EngineEvent::Exported {
                ok: true,
                path: Some(path),
                ..
            } => Some(path.clone()),
            _ => None,
        })
        .expect("download should succeed");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("config-gemprf_desc-two-sessions.xml")
    );
    assert_eq!(std::fs::read_to_string(path).unwrap(), engine.document());
}
