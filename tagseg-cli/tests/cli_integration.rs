//! Integration tests for the tagseg CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn tagseg() -> Command {
    let mut cmd = Command::cargo_bin("tagseg").unwrap();
    cmd.env_remove("TAGSEG_MODEL");
    cmd
}

#[test]
fn test_process_stdin_to_stdout() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .write_stdin("ab cd")
        .assert()
        .success()
        .stdout("ab/AB/UNK\tcd/CD/UNK\n");
}

#[test]
fn test_process_file_with_notag() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["-i", &fixture_path("sample.txt"), "--notag", "0"])
        .assert()
        .success()
        .stdout("the/UNK\tcat/NOUN\truns/VERB\nab/UNK\tcd/UNK\n");
}

#[test]
fn test_process_model_from_env() {
    tagseg()
        .env("TAGSEG_MODEL", fixture_path("upper-model.toml"))
        .args(["process", "--output-format", "tok"])
        .write_stdin("a b\n")
        .assert()
        .success()
        .stdout("a\tb\n");
}

#[test]
fn test_process_presegmented_input() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["-i", &fixture_path("sample.tok")])
        .args(["--input-format", "tok", "--no-ws", "--notag", "0"])
        .assert()
        .success()
        .stdout("the/UNK\tcat/NOUN\nruns/VERB\n");
}

#[test]
fn test_json_output() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["--output-format", "json", "--notag", "1"])
        .write_stdin("cat\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"text":"cat","words":[{"surface":"cat","tags":["CAT"]}]}"#,
        ));
}

#[test]
fn test_multiple_inputs_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("a.txt");
    let second = temp_dir.path().join("b.txt");
    fs::write(&first, "x\n").unwrap();
    fs::write(&second, "y\n").unwrap();
    let output = temp_dir.path().join("out.txt");
    let model = fixture_path("upper-model.toml");

    tagseg()
        .args(["process", "--model", &model, "-q"])
        .args(["-i", temp_dir.path().join("*.txt").to_str().unwrap()])
        .args(["-o", output.to_str().unwrap(), "--output-format", "raw"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output).unwrap(), "x\ny\n");
}

#[test]
fn test_single_input_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");

    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["-i", &fixture_path("sample.txt")])
        .args(["-o", output.to_str().unwrap(), "--unk-tag", "?"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "the/THE/?\tcat/CAT/NOUN\truns/RUNS/VERB\nab/AB/?\tcd/CD/?\n"
    );
}

#[test]
fn test_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings = temp_dir.path().join("settings.toml");
    fs::write(
        &settings,
        "do_tags = [true, false]\nword_bound = \" \"\nunknown_tag = \"-\"\n",
    )
    .unwrap();

    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["--config", settings.to_str().unwrap()])
        .write_stdin("ab cd\n")
        .assert()
        .success()
        .stdout("ab/AB cd/CD\n");
}

#[test]
fn test_missing_model() {
    tagseg()
        .args(["process", "--model", "tests/fixtures/missing.toml"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load model"));
}

#[test]
fn test_missing_input() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["-i", "tests/fixtures/nothing-here*.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_bad_slot() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .args(["--notag", "9"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_invalid_utf8_input() {
    tagseg()
        .args(["process", "--model", &fixture_path("upper-model.toml")])
        .write_stdin(vec![0xffu8, 0xfe, b'\n'])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read phase failed"));
}

#[test]
fn test_validate_command() {
    tagseg()
        .args(["validate", "--model", &fixture_path("upper-model.toml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model is valid"))
        .stdout(predicate::str::contains("Tag slots: 2"));
}

#[test]
fn test_generate_config_command() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("settings.toml");
    let model = fixture_path("upper-model.toml");

    tagseg()
        .args(["generate-config", "--model", &model])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Settings template generated successfully",
        ));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("do_tags = [true, true]"));
    assert!(content.contains("unknown_tag = \"UNK\""));

    tagseg()
        .args(["validate", "--model", &fixture_path("upper-model.toml")])
        .args(["--config", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings are valid"));
}

#[test]
fn test_list_formats() {
    tagseg()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("raw"))
        .stdout(predicate::str::contains("json"));
}
