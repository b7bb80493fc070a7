//! Integration tests for the textcut CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn textcut() -> Command {
    Command::cargo_bin("textcut").unwrap()
}

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_sentence_split_fans_out_records() {
    let output = textcut()
        .args(["process", "-i", &fixture_path("records.json")])
        .args(["-m", "sentence", "-f", "jsonl"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let records = json_lines(&output.stdout);
    let chunks: Vec<_> = records.iter().map(|r| r["chunk"].as_str().unwrap()).collect();
    assert_eq!(
        chunks,
        [
            "Hello world.",
            " How are you?",
            "First paragraph.",
            "\n\nSecond paragraph."
        ]
    );
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[3]["id"], 2);
    assert_eq!(records[0]["text"], "Hello world. How are you?");
}

#[test]
fn test_records_without_text_are_skipped() {
    textcut()
        .args(["process", "-i", &fixture_path("records.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("record without text").not());
}

#[test]
fn test_json_output_is_one_array() {
    let output = textcut()
        .args(["process", "-i", &fixture_path("records.json"), "-m", "paragraph"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2]["chunk"], "Second paragraph.");
}

#[test]
fn test_extract_operation() {
    let output = textcut()
        .args(["process", "-i", &fixture_path("records.jsonl")])
        .args(["--operation", "extract", "-r", "[0-9]+", "-f", "jsonl"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let matches: Vec<_> = json_lines(&output.stdout)
        .iter()
        .map(|r| r["match"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(matches, ["66", "2024", "05", "01"]);
}

#[test]
fn test_match_mode_first() {
    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl")])
        .args(["--operation", "extract", "-r", "[0-9]+", "--match-mode", "first"])
        .args(["-f", "text"])
        .assert()
        .success()
        .stdout("66\n");
}

#[test]
fn test_match_mode_flag_overrides_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("textcut.toml");
    fs::write(
        &config,
        "[params]\noperation = \"extract\"\nregex = \"[0-9]+\"\nmatchMode = \"first\"\n",
    )
    .unwrap();

    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl"), "-f", "text", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout("66\n");

    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl"), "-f", "text"])
        .args(["--match-mode", "all", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout("66\n2024\n05\n01\n");
}

#[test]
fn test_per_record_params() {
    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl")])
        .args(["--params-field", "options", "-f", "text"])
        .assert()
        .success()
        .stdout("alpha\nbeta\ngamma\n66\n2024\n05\n01\none.\n two.\n");
}

#[test]
fn test_per_record_params_replace_invalid_run_length() {
    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl")])
        .args(["--params-field", "options", "-l", "0", "-f", "text"])
        .assert()
        .success()
        .stdout("alpha\nbeta\ngamma\n66\n2024\n05\n01\none.\n two.\n");
}

#[test]
fn test_text_output_uses_each_record_operation() {
    textcut()
        .args(["process", "-i", "-", "--params-field", "opts", "-f", "text"])
        .write_stdin(
            "{\"text\": \"a1\", \"chunk\": \"from input\", \"opts\": {\"operation\": \"extract\", \"regex\": \"[0-9]\"}}\n\
             {\"text\": \"b c\", \"opts\": {\"splitMethod\": \"word\"}}\n",
        )
        .assert()
        .success()
        .stdout("1\nb\nc\n");
}

#[test]
fn test_plain_text_file() {
    textcut()
        .args(["process", "-i", &fixture_path("sample.txt")])
        .args(["-m", "paragraph", "-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "The first paragraph talks about splitting.\n",
        ))
        .stdout(predicate::str::contains(
            "The second one is about extraction.",
        ));
}

#[test]
fn test_length_split_on_text_file() {
    let output = textcut()
        .args(["process", "-i", &fixture_path("sample.txt")])
        .args(["-l", "20", "-f", "jsonl"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let records = json_lines(&output.stdout);
    assert_eq!(records[0]["chunk"], "The first paragraph ");
    assert!(records[0]["source"]
        .as_str()
        .unwrap()
        .ends_with("sample.txt"));
}

#[test]
fn test_custom_text_field() {
    textcut()
        .args(["process", "-i", "-", "--text-field", "body"])
        .args(["-m", "word", "-f", "text"])
        .write_stdin(r#"{"body": "split these words", "text": "not this"}"#)
        .assert()
        .success()
        .stdout("split\nthese\nwords\n");
}

#[test]
fn test_stdin_jsonl() {
    textcut()
        .args(["process", "-i", "-", "-m", "word", "-f", "text"])
        .write_stdin("{\"text\": \"a b\"}\n{\"text\": \"c\"}\n")
        .assert()
        .success()
        .stdout("a\nb\nc\n");
}

#[test]
fn test_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_file = temp_dir.path().join("output.jsonl");

    textcut()
        .args(["process", "-i", &fixture_path("records.json")])
        .args(["-m", "word", "-f", "jsonl", "-o"])
        .arg(&output_file)
        .assert()
        .success()
        .stdout("");

    let content = fs::read_to_string(&output_file).unwrap();
    assert!(content.contains(r#""chunk":"Hello""#));
    assert_eq!(content.lines().count(), 9);
}

#[test]
fn test_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("textcut.toml");
    fs::write(
        &config,
        "[params]\nsplitMethod = \"word\"\n\n[output]\nformat = \"text\"\n",
    )
    .unwrap();

    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl"), "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("alpha\nbeta\ngamma\nOrder\n"));
}

#[test]
fn test_flags_override_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("textcut.toml");
    fs::write(&config, "[params]\nsplitMethod = \"word\"\n").unwrap();

    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl")])
        .args(["-m", "length", "-l", "100", "-f", "text", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("alpha beta gamma\n"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("textcut.toml");
    fs::write(&config, "[params]\nsplit_method = \"word\"\n").unwrap();

    textcut()
        .args(["process", "-i", &fixture_path("records.json"), "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_invalid_pattern_aborts() {
    textcut()
        .args(["process", "-i", &fixture_path("records.json")])
        .args(["--operation", "extract", "-r", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern '('"));
}

#[test]
fn test_invalid_length() {
    textcut()
        .args(["process", "-i", &fixture_path("records.json"), "-l", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunk length must be at least 1"));
}

#[test]
fn test_length_ignored_for_other_methods() {
    textcut()
        .args(["process", "-i", &fixture_path("records.jsonl")])
        .args(["-m", "word", "-l", "0", "-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("alpha\nbeta\n"));
}

#[test]
fn test_continue_on_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.jsonl");
    fs::write(
        &input,
        "{\"text\": \"a1\", \"opts\": {\"operation\": \"extract\", \"regex\": \"(\"}}\n\
         {\"text\": \"b2\", \"opts\": {\"operation\": \"extract\", \"regex\": \"[0-9]\"}}\n",
    )
    .unwrap();

    textcut()
        .args(["process", "-i"])
        .arg(&input)
        .args(["--params-field", "opts", "--on-error", "continue", "-f", "text"])
        .assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains("1 of 2 records failed"));
}

#[test]
fn test_glob_pattern() {
    let output = textcut()
        .args(["process", "-q", "-i", &fixture_path("*.json*"), "-f", "jsonl"])
        .args(["-m", "word"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""chunk":"Hello""#));
    assert!(stdout.contains(r#""chunk":"alpha""#));
}

#[test]
fn test_invalid_file() {
    textcut()
        .args(["process", "-i", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found: nonexistent.json"));
}

#[test]
fn test_help_command() {
    textcut()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Split text records into chunks or extract pattern matches",
        ));
}

#[test]
fn test_list_methods() {
    textcut()
        .args(["list", "methods"])
        .assert()
        .success()
        .stdout(predicate::str::contains("paragraph"))
        .stdout(predicate::str::contains("sentence"))
        .stdout(predicate::str::contains("regex"));
}

#[test]
fn test_list_formats() {
    textcut()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jsonl"));
}

#[test]
fn test_generated_config_is_usable() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("textcut.toml");

    textcut()
        .args(["generate-config", "-o"])
        .arg(&config)
        .assert()
        .success();

    textcut()
        .args(["process", "-i", &fixture_path("records.json"), "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""chunk":"Hello world. How are you?""#));
}
