//! End-to-end tests driving the gemprf-config binary

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bin(project: &Path, data_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gemprf-config"));
    cmd.arg("--project")
        .arg(project)
        // Keep the rolling log out of the real home directory
        .env("XDG_DATA_HOME", data_home)
        .env("HOME", data_home);
    cmd
}

fn run(project: &TempDir, args: &[&str]) -> Output {
    let data_home = project.path().join(".data");
    bin(project.path(), &data_home)
        .args(args)
        .output()
        .expect("failed to run gemprf-config")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_filename_command() {
    let project = TempDir::new().unwrap();
    let output = run(
        &project,
        &[
            "filename",
            "--set",
            "filename_datasrc=HCP",
            "--set",
            "filename_description=high res",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "config-gemprf_data-HCP_desc-high-res.xml");
}

#[test]
fn test_generate_to_stdout() {
    let project = TempDir::new().unwrap();
    let output = run(
        &project,
        &["generate", "--stdout", "--set", "results_id=a<b"],
    );
    assert!(output.status.success());

    let xml = stdout(&output);
    assert!(xml.starts_with("<!--"));
    assert!(xml.contains("<root version=\"1.0\">"));
    assert!(xml.contains("a&lt;b"));
    assert!(xml.trim_end().ends_with("</root>"));
}

#[test]
fn test_generate_downloads_into_output_dir() {
    let project = TempDir::new().unwrap();
    let out = project.path().join("configs");
    let output = run(
        &project,
        &[
            "generate",
            "--output",
            out.to_str().unwrap(),
            "--set",
            "filename_datasrc=NYU",
        ],
    );
    assert!(output.status.success());

    let expected = out.join("config-gemprf_data-NYU.xml");
    assert_eq!(stdout(&output).trim(), expected.display().to_string());
    let written = std::fs::read_to_string(&expected).unwrap();
    assert!(written.contains("<input_datasrc>"));
}

#[test]
fn test_generate_reports_findings_on_stderr() {
    let project = TempDir::new().unwrap();
    let output = run(
        &project,
        &["generate", "--stdout", "--set", "stim_dir=/data/stimulus.nii.gz"],
    );
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stim_dir: (⛔ "));
    assert!(!stdout(&output).contains("⛔"));
}

#[test]
fn test_validate_is_advisory() {
    let project = TempDir::new().unwrap();
    let output = run(
        &project,
        &["validate", "--set", "bids_basepath=/data/bids/sub-01_bold.nii.gz"],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text
        .lines()
        .any(|l| l.starts_with("bids_basepath") && l.contains("error")));
}

#[test]
fn test_malformed_set_fails() {
    let project = TempDir::new().unwrap();
    let output = run(&project, &["filename", "--set", "no-equals-sign"]);
    assert!(!output.status.success());
}

#[test]
fn test_fields_lists_registry() {
    let project = TempDir::new().unwrap();
    let output = run(&project, &["fields"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.lines().any(|l| l.starts_with("stim_dir\ttext\t")));
    assert!(text.lines().any(|l| l.starts_with("data_paths\tlist\t")));
}

#[test]
fn test_init_then_settings_are_used() {
    let project = TempDir::new().unwrap();
    let output = run(&project, &["init"]);
    assert!(output.status.success());
    assert!(project.path().join(".gemprf/config.toml").exists());

    // Second run leaves the file alone
    let output = run(&project, &["init"]);
    assert!(stdout(&output).contains("already exists"));

    std::fs::write(
        project.path().join(".gemprf/config.toml"),
        "[export]\noutput_dir = \"out\"\n[clipboard]\nbackend = \"none\"\n",
    )
    .unwrap();
    let output = run(&project, &["generate"]);
    assert!(output.status.success());
    assert!(project.path().join("out/config-gemprf.xml").exists());
}

#[test]
fn test_headless_session() {
    let project = TempDir::new().unwrap();
    let data_home = project.path().join(".data");
    let mut child = bin(project.path(), &data_home)
        .arg("headless")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start headless session");

    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(stdin, r#"{{"cmd":"set","id":"filename_datasrc","value":"HCP"}}"#).unwrap();
        writeln!(stdin, "not json").unwrap();
        writeln!(stdin, r#"{{"cmd":"download"}}"#).unwrap();
        writeln!(stdin, r#"{{"cmd":"quit"}}"#).unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let events: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|l| serde_json::from_str(l).expect("every stdout line is JSON"))
        .collect();

    assert_eq!(events[0]["event"], "preview_updated");
    assert!(events
        .iter()
        .any(|e| e["event"] == "filename" && e["filename"] == "config-gemprf_data-HCP.xml"));
    assert!(events
        .iter()
        .any(|e| e["event"] == "error" && e["fatal"] == false));
    assert!(events
        .iter()
        .any(|e| e["event"] == "exported" && e["ok"] == true));
    assert!(project.path().join("config-gemprf_data-HCP.xml").exists());
}
