//! Integration tests for the `gst` command line.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

static FIXTURE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get or create the test fixture directory (singleton)
fn fixture_dir() -> PathBuf {
    FIXTURE_DIR.get_or_init(create_fixture_dir).clone()
}

fn create_fixture_dir() -> PathBuf {
    let dir = std::env::temp_dir()
        .join("gst_test_fixtures")
        .join(format!("test_{}", std::process::id()));

    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create fixture dir");

    fs::write(dir.join("banana.txt"), "banana").unwrap();
    fs::write(dir.join("bandana.txt"), "bandana").unwrap();
    fs::write(dir.join("glyphs.txt"), "icon \u{E000}\u{E001} end").unwrap();
    // Explicit config so a user config in the data dir cannot leak in
    fs::write(dir.join("config.json"), "{}").unwrap();
    fs::write(
        dir.join("no_links.json"),
        r#"{ "suffix_links": false }"#,
    )
    .unwrap();
    fs::write(dir.join("short.json"), r#"{ "max_text_len": 6 }"#).unwrap();

    dir
}

/// Run gst with the fixture config and return (stdout, stderr, success)
fn run_gst(args: &[&str]) -> (String, String, bool) {
    run_gst_with_config(args, "config.json")
}

fn run_gst_with_config(args: &[&str], config: &str) -> (String, String, bool) {
    let config = fixture_dir().join(config);
    let mut full: Vec<&str> = args.to_vec();
    full.extend(["--config", config.to_str().unwrap()]);
    run_gst_raw(&full)
}

/// Run gst with exactly `args`
fn run_gst_raw(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_gst"))
        .args(args)
        .current_dir(fixture_dir())
        .output()
        .expect("Failed to run gst");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_dump_literal() {
    let (stdout, stderr, success) = run_gst(&["dump", "--literal", "--no-color", "aa"]);
    assert!(success, "gst dump failed: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "ROOT");
    assert!(lines.contains(&"  a"));
    assert!(lines.contains(&"    a$0 [0:0]"));
    assert!(lines.contains(&"    $0 [0:1]"));
    assert!(lines.contains(&"  $0 [0:2]"));
}

#[test]
fn test_suffixes_from_files() {
    let (stdout, stderr, success) =
        run_gst(&["suffixes", "--no-color", "banana.txt", "bandana.txt"]);
    assert!(success, "gst suffixes failed: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 15);
    assert!(lines.contains(&"0:0\tbanana$0"));
    assert!(lines.contains(&"1:3\tdana$1"));
    assert!(lines.contains(&"1:7\t$1"));
}

#[test]
fn test_stats_json() {
    let (stdout, stderr, success) = run_gst(&["stats", "--json", "--literal", "mississippi"]);
    assert!(success, "gst stats failed: {}", stderr);

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let report = &reports[0];
    assert_eq!(report["name"], "combined");
    assert_eq!(report["documents"], 1);
    assert_eq!(report["text_len"], 12);
    assert_eq!(report["leaves"], 12);
    assert_eq!(report["stats"]["phases"], 12);
}

#[test]
fn test_documents_with_private_use_chars() {
    let (stdout, stderr, success) =
        run_gst(&["stats", "--json", "banana.txt", "glyphs.txt"]);
    assert!(success, "gst stats failed: {}", stderr);

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(reports[0]["documents"], 2);
    assert_eq!(reports[0]["leaves"], 7 + 12);
}

#[test]
fn test_stats_separate_builds_one_tree_per_input() {
    let (stdout, stderr, success) = run_gst(&[
        "stats",
        "--json",
        "--separate",
        "--literal",
        "abc",
        "abcabx",
    ]);
    assert!(success, "gst stats failed: {}", stderr);

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["name"], "abc");
    assert_eq!(reports[0]["leaves"], 4);
    assert_eq!(reports[1]["name"], "abcabx");
    assert_eq!(reports[1]["leaves"], 7);
}

#[test]
fn test_config_disables_suffix_links() {
    let (stdout, stderr, success) = run_gst_with_config(
        &["stats", "--json", "--literal", "abcabxabcd"],
        "no_links.json",
    );
    assert!(success, "gst stats failed: {}", stderr);

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(reports[0]["stats"]["suffix_link_follows"], 0);
    assert_eq!(reports[0]["leaves"], 11);
}

#[test]
fn test_verbose_reports_skipped_documents() {
    let (stdout, stderr, success) = run_gst_with_config(
        &["stats", "--json", "--verbose", "--literal", "banana", "bandana"],
        "short.json",
    );
    assert!(success, "gst stats failed: {}", stderr);
    assert!(stderr.contains("gst: skipping document of 7 characters"));

    let reports: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(reports[0]["documents"], 1);
    assert_eq!(reports[0]["excluded"], 1);
}

#[test]
fn test_missing_file_fails() {
    let (_, stderr, success) = run_gst(&["stats", "does_not_exist.txt"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read does_not_exist.txt"));
}

#[test]
fn test_init_config_writes_defaults() {
    let path = fixture_dir().join("written.json");
    let path_arg = path.to_str().unwrap();
    let _ = fs::remove_file(&path);

    let (stdout, stderr, success) = run_gst_raw(&["init-config", path_arg]);
    assert!(success, "gst init-config failed: {}", stderr);
    assert!(stdout.contains("written.json"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["suffix_links"], true);
    assert_eq!(written["case_insensitive"], false);

    let (_, stderr, success) = run_gst_raw(&["init-config", path_arg]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    let (_, stderr, success) = run_gst_raw(&["init-config", "--force", path_arg]);
    assert!(success, "gst init-config --force failed: {}", stderr);
}
