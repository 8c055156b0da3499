//! Integration tests for the dualsub CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn dualsub() -> Command {
    let mut cmd = Command::cargo_bin("dualsub").unwrap();
    cmd.env_remove("DUALSUB_CONFIG");
    cmd
}

#[test]
fn test_reconstruct_plain_fragments() {
    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("fragments.txt"))
        .assert()
        .success()
        .stdout("Hello world.\nHow are you?\n");
}

#[test]
fn test_reconstruct_timed_track() {
    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("lecture.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "So today we will read Dr. Smith on caching.\n",
        ))
        .stdout(predicate::str::contains("It reports 3.14 as the ratio.\n"))
        .stdout(predicate::str::contains("Finally, we test everything.\n"));
}

#[test]
fn test_reconstruct_with_timestamps() {
    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("lecture.json"))
        .arg("--timestamps")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[0:00.00 - 0:03.90] So today we will read Dr. Smith on caching.",
        ));
}

#[test]
fn test_reconstruct_json_output() {
    let output = dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("lecture.json"))
        .arg("-f")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let sentences: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sentences = sentences.as_array().unwrap();
    assert_eq!(sentences.len(), 4);
    assert_eq!(sentences[1]["text"], "It reports 3.14 as the ratio.");
    assert_eq!(
        sentences[1]["source_fragment_indices"],
        serde_json::json!([3, 4, 5])
    );
    assert_eq!(sentences[3]["end"], 12.9);
}

#[test]
fn test_reconstruct_markdown_output() {
    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("fragments.txt"))
        .arg("-f")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Hello world."))
        .stdout(predicate::str::contains("2. How are you?"))
        .stdout(predicate::str::contains("---"))
        .stdout(predicate::str::contains("*Total sentences: 2*"));
}

#[test]
fn test_reconstruct_glob_keeps_file_order() {
    let output = dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("*.json"))
        .arg("--quiet")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    // lecture.json sorts before sparse.json
    let lecture = stdout.find("So today").unwrap();
    let sparse = stdout.find("First line.").unwrap();
    assert!(lecture < sparse);
}

#[test]
fn test_reconstruct_stats() {
    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("fragments.txt"))
        .arg("--stats")
        .assert()
        .success()
        .stderr(predicate::str::contains("5 fragments -> 2 sentences"));
}

#[test]
fn test_reconstruct_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_file = temp_dir.path().join("sentences.txt");

    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg(fixture_path("fragments.txt"))
        .arg("-o")
        .arg(&output_file)
        .assert()
        .success();

    let content = fs::read_to_string(&output_file).unwrap();
    assert_eq!(content, "Hello world.\nHow are you?\n");
}

#[test]
fn test_reconstruct_missing_file() {
    dualsub()
        .arg("reconstruct")
        .arg("-i")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_lookup_with_default_calibration() {
    // Captions run late by 1.5s, so at 2.0s the third entry is on screen
    dualsub()
        .arg("lookup")
        .arg("-i")
        .arg(fixture_path("lecture.json"))
        .arg("-t")
        .arg("2.0")
        .assert()
        .success()
        .stdout("0:02.00\tSmith on caching.\n");
}

#[test]
fn test_lookup_raw_and_blob_timing() {
    dualsub()
        .args(["lookup", "-i", &fixture_path("lecture.json"), "-t", "2.0", "--raw"])
        .assert()
        .success()
        .stdout("0:02.00\twe will read Dr.\n");

    // Shared boundary at 2.6s: the earlier caption wins
    dualsub()
        .args(["lookup", "-i", &fixture_path("lecture.json"), "-t", "2.6"])
        .arg("--timing-file")
        .arg(fixture_path("timing.blob"))
        .assert()
        .success()
        .stdout("0:02.60\twe will read Dr.\n");
}

#[test]
fn test_lookup_uses_config_file() {
    // relative_offset 1.5 cancels the built-in correction; post-roll 500ms
    dualsub()
        .args(["lookup", "-i", &fixture_path("lecture.json"), "-t", "3.0"])
        .arg("--config")
        .arg(fixture_path("dualsub.toml"))
        .assert()
        .success()
        .stdout("0:03.00\twe will read Dr.\n");
}

#[test]
fn test_lookup_json_no_match() {
    let output = dualsub()
        .args(["lookup", "-i", &fixture_path("lecture.json")])
        .args(["-t", "500", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hits[0]["text"], "");
    assert!(hits[0]["index"].is_null());
}

#[test]
fn test_lookup_requires_timed_captions() {
    dualsub()
        .args(["lookup", "-i", &fixture_path("fragments.txt"), "-t", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no timing"));
}

#[test]
fn test_lookup_rejects_negative_roll() {
    dualsub()
        .args(["lookup", "-i", &fixture_path("lecture.json"), "-t", "1"])
        .args(["--pre-roll", "-200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pre-roll"));
}

#[test]
fn test_detect_large_gaps_and_write_blob() {
    let temp_dir = TempDir::new().unwrap();
    let blob = temp_dir.path().join("timing.json");

    dualsub()
        .args(["detect", "-i", &fixture_path("sparse.json")])
        .arg("--write-blob")
        .arg(&blob)
        .assert()
        .success()
        .stdout(predicate::str::contains("Drift detected (confidence 70%)"))
        .stdout(predicate::str::contains("Large gaps detected (4.00s avg)"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&blob).unwrap()).unwrap();
    assert_eq!(stored["offset"], -1.5);
    assert_eq!(stored["preRoll"], 200.0);
    assert_eq!(stored["postRoll"], 0.0);
}

#[test]
fn test_detect_short_durations_json() {
    let output = dualsub()
        .args(["detect", "-i", &fixture_path("lecture.json"), "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let analysis: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(analysis["detected"], true);
    assert_eq!(analysis["confidence"], 65);
    assert_eq!(analysis["recommendation"]["postRoll"], 500.0);
    assert!(analysis["analysis"]
        .as_str()
        .unwrap()
        .contains("1.26s avg"));
}

#[test]
fn test_paragraphs_with_translations() {
    dualsub()
        .args(["paragraphs", "-i", &fixture_path("lecture.json")])
        .arg("--translations")
        .arg(fixture_path("translations.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "so today we will read Dr. Smith on caching. It reports 3.14 as the ratio.\n    所以今天",
        ))
        .stdout(predicate::str::contains(
            "However, the cache can be stale. Finally, we test everything.\n    然而",
        ));
}

#[test]
fn test_paragraphs_json_with_config_limits() {
    let output = dualsub()
        .args(["paragraphs", "-i", &fixture_path("lecture.json"), "-f", "json"])
        .arg("--config")
        .arg(fixture_path("dualsub.toml"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let paragraphs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let paragraphs = paragraphs.as_array().unwrap();
    assert_eq!(paragraphs.len(), 4);
    assert_eq!(paragraphs[1]["subtitle_indices"], serde_json::json!([2, 3, 4, 5]));
}

#[test]
fn test_paragraph_batches() {
    dualsub()
        .args(["paragraphs", "-i", &fixture_path("lecture.json"), "--batches"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Batch 1: 2 paragraph(s), ~"));
}

#[test]
fn test_classify_arguments() {
    dualsub()
        .args(["classify", "Dr. Smith", "I saw Dr. Smith.", "I met Dr."])
        .assert()
        .success()
        .stdout(predicate::str::contains("no-terminator\tDr. Smith\n"))
        .stdout(predicate::str::contains("terminated\tI saw Dr. Smith.\n"))
        .stdout(predicate::str::contains("abbreviation (Dr)\tI met Dr.\n"));
}

#[test]
fn test_classify_stdin_with_config_abbreviations() {
    dualsub()
        .arg("classify")
        .arg("--config")
        .arg(fixture_path("dualsub.toml"))
        .write_stdin("It is approx.\nThe value is 3.14\n")
        .assert()
        .success()
        .stdout("abbreviation (approx)\tIt is approx.\nno-terminator\tThe value is 3.14\n");
}

#[test]
fn test_list_commands() {
    dualsub()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown"));

    dualsub()
        .args(["list", "abbreviations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prof."));

    dualsub()
        .args(["list", "terminators"])
        .assert()
        .success()
        .stdout(predicate::str::contains("。\talways"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "[timing]\npost_roll = -5\n").unwrap();

    dualsub()
        .args(["reconstruct", "-i", &fixture_path("fragments.txt")])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timing.post_roll"));
}

#[test]
fn test_help() {
    dualsub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reconstruct"))
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("detect"));
}
