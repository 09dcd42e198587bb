use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const CONFIG: &str = "\
[RF_ACE_Parameters]
execpath = /opt/rf-ace/bin/rf_ace
mtry = 1000
numtrees = 100
permutations = 20
pvalue_t = 0.05
nodesize = 5

[PYTHON]
pythonbin = true

[GOLEM]
golempwd = s3cret
";

fn temp_root(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "golem_cli_{}_{}_{}",
        tag,
        std::process::id(),
        Utc::now().timestamp_micros()
    ));
    fs::create_dir_all(&root).expect("temp dir");
    root
}

fn list_gen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rf-ace-list-gen"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn rf-ace-list-gen")
}

#[test]
fn wrong_argument_count_prints_usage_and_exits_1() {
    let root = temp_root("argcount");
    fs::write(root.join("rf_ace.config"), CONFIG).expect("config");
    let out = list_gen(&root, &["0", "10"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Requires:start[0..n-1]"), "stdout: {}", stdout);
    let entries: Vec<_> = fs::read_dir(&root)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("rf_ace.config")]);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_config_exits_255_before_any_work() {
    let root = temp_root("noconfig");
    let out = list_gen(&root, &["0", "2", "m.tsv", "assoc", "c.txt"]);
    assert_eq!(out.status.code(), Some(255));
    assert!(String::from_utf8_lossy(&out.stdout).contains("rf_ace.config file is missing"));
    assert!(!root.join("c.txt").exists());
    assert!(!root.join("assoc").exists());
    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_matrix_exits_255_without_commands_file() {
    let root = temp_root("nomatrix");
    fs::write(root.join("rf_ace.config"), CONFIG).expect("config");
    let out = list_gen(&root, &["0", "2", "m.tsv", "assoc", "c.txt"]);
    assert_eq!(out.status.code(), Some(255));
    assert!(String::from_utf8_lossy(&out.stdout).contains("m.tsv is not a valid file"));
    assert!(!root.join("c.txt").exists());
    let _ = fs::remove_dir_all(root);
}

#[test]
fn local_run_writes_commands_and_exits_0() {
    let root = temp_root("local");
    fs::write(root.join("rf_ace.config"), CONFIG).expect("config");
    let out = list_gen(&root, &["-l", "0", "3", "m.tsv", "assoc", "c.txt"]);
    assert_eq!(out.status.code(), Some(0));
    let text = fs::read_to_string(root.join("c.txt")).expect("commands");
    assert_eq!(text.lines().count(), 3);
    assert!(!root.join("assoc").exists());
    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn json_submit_prints_a_single_json_document() {
    let root = temp_root("jsonsubmit");
    fs::write(root.join("rf_ace.config"), CONFIG).expect("config");
    let out = list_gen(&root, &["--json", "-l", "-s", "0", "2", "m", "d", "c.txt"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 1, "stdout: {}", stdout);
    let v: Value = serde_json::from_str(stdout.trim()).expect("single JSON object");
    assert_eq!(v["ok"], true);
    assert_eq!(v["run"]["submitted"], true);
    assert_eq!(
        v["run"]["submission_line"],
        "true golem.py glados.systemsbiology.net:8083 -p **** runlist c.txt"
    );
    assert!(!stdout.contains("s3cret"));
    let _ = fs::remove_dir_all(root);
}

#[cfg(unix)]
#[test]
fn plain_submit_announces_masked_line() {
    let root = temp_root("plainsubmit");
    fs::write(root.join("rf_ace.config"), CONFIG).expect("config");
    let out = list_gen(&root, &["-l", "-s", "0", "1", "m", "d", "c.txt"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(
        "submitting to golem: true golem.py glados.systemsbiology.net:8083 -p **** runlist c.txt"
    ));
    let _ = fs::remove_dir_all(root);
}
