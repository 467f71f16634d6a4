//! CLI tests for the `workbench` binary.
//!
//! Spawns the binary in a temp directory and checks stdout and exit codes.

use std::fs;
use std::process::{Command, Output};

use workbench::exit_codes;
use workbench::io::config::{WorkbenchConfig, write_config};
use workbench::io::seed::write_project;
use workbench::test_support::sample_tree;

fn workbench(dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_workbench"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn workbench")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn exec_prints_transcript_in_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = workbench(temp.path(), &["exec", "pwd", "frobnicate"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "$ pwd");
    assert_eq!(lines[3], "/home/user/my-project");
    assert_eq!(lines[4], "$ frobnicate");
    assert_eq!(lines[5], "unrecognized command: frobnicate");
}

#[test]
fn exec_json_tags_entry_kinds() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = workbench(temp.path(), &["exec", "--json", "clear", "pwd"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    let entries: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["kind"], "input");
    assert_eq!(entries[0]["text"], "$ pwd");
    assert_eq!(entries[1]["kind"], "output");
}

#[test]
fn tree_uses_seed_project_from_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let project = temp.path().join("project.json");
    write_project(&project, &sample_tree()).expect("write project");
    let config = WorkbenchConfig {
        seed_path: Some(project),
        ..WorkbenchConfig::default()
    };
    write_config(&temp.path().join("workbench.toml"), &config).expect("write config");

    let output = workbench(temp.path(), &["tree"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.starts_with("root/\n"));
    assert!(text.contains("deep"));
}

#[test]
fn validate_rejects_duplicate_ids() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("bad.json");
    fs::write(
        &path,
        r#"{"id":"root","name":"root","type":"folder","children":[
            {"id":"x","name":"a","type":"file","content":""},
            {"id":"x","name":"b","type":"file","content":""}
        ]}"#,
    )
    .expect("write project");

    let output = workbench(temp.path(), &["validate", "bad.json"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate id 'x'"));
}

#[test]
fn init_config_refuses_to_overwrite_without_force() {
    let temp = tempfile::tempdir().expect("tempdir");

    let first = workbench(temp.path(), &["init-config"]);
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    assert!(temp.path().join("workbench.toml").exists());

    let second = workbench(temp.path(), &["init-config"]);
    assert_eq!(second.status.code(), Some(exit_codes::INVALID));

    let forced = workbench(temp.path(), &["init-config", "--force"]);
    assert_eq!(forced.status.code(), Some(exit_codes::OK));
}

#[test]
fn invalid_config_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("workbench.toml"), "cat_limit_chars = 0\n").expect("write config");

    let output = workbench(temp.path(), &["exec", "ls"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn exec_survives_multibyte_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = workbench(temp.path(), &["exec", "İİİİİİ", "pwd"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.contains("unrecognized command: İİİİİİ"));
    assert!(text.trim_end().ends_with("/home/user/my-project"));
}
