//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");
const GUIDES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../guides");

/// A command running in `dir` so progress and output land in a temp dir.
fn hrplatform(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("hrplatform").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("HRPLATFORM_DATA_DIR")
        .env_remove("HRPLATFORM_DATA_URL")
        .env("HOME", dir.path());
    cmd
}

#[test]
fn validate_sample_data() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["validate", "--data", DATA_DIR])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 treaties"))
        .stdout(predicate::str::contains("5 eras"))
        .stdout(predicate::str::contains("All data valid."));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    for name in ["treaties", "institutions", "timeline-events"] {
        std::fs::copy(
            format!("{DATA_DIR}/{name}.json"),
            data.join(format!("{name}.json")),
        )
        .unwrap();
    }
    std::fs::write(
        data.join("connections.json"),
        r#"{"connections":[{"source":"un","target":"nowhere","type":"x","strength":0.5}]}"#,
    )
    .unwrap();
    std::fs::write(
        data.join("quiz-questions.json"),
        r#"{"questions":[{"id":"bad","type":"multiple","category":"c","difficulty":"basic",
            "question":"?","options":["a","b"],"correct":5}]}"#,
    )
    .unwrap();

    hrplatform(&dir)
        .args(["validate", "--data", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown node 'nowhere'"))
        .stdout(predicate::str::contains("correct index 5 out of range"))
        .stdout(predicate::str::contains("2 warning(s) found."));
}

#[test]
fn validate_missing_data_fails() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["validate", "--data", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("failed to load data"));
}

#[test]
fn build_writes_site() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args([
            "build",
            "--data",
            DATA_DIR,
            "--guides",
            GUIDES_DIR,
            "--output",
            "out",
            "--view",
            "zoom",
            "--section",
            "spider-web?filter=european",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 7 treaties"))
        .stdout(predicate::str::contains("cases, quiz, guides, about"))
        .stdout(predicate::str::contains("Copied 1 guide(s)"));

    let html = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
    assert!(html.contains("Foundation Era"));
    assert!(html.contains("section active\" id=\"spider-web\""));
    assert!(html.contains("filter-btn active\" data-filter=\"european\""));
    assert!(html.contains("view-btn active\" data-view=\"zoom\""));
    assert!(html.contains("Soering v. United Kingdom"));
    assert!(html.contains("href=\"guides/un-treaty-bodies.html\""));
    assert!(dir.path().join("out/data/cases.json").exists());
    assert!(dir.path().join("out/guides/un-treaty-bodies.html").exists());
}

#[test]
fn build_with_type_filter_keeps_other_events_for_the_page() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["build", "--data", DATA_DIR, "--output", "out", "--filter", "treaty"])
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
    assert!(html.contains("<div class=\"era-blocks\" data-type-filter=\"treaty\">"));
    assert!(html.contains("<div class=\"era-blocks\" data-type-filter=\"all\" hidden>"));
    assert!(html.contains("class=\"era-event\" data-event=\"udhr\""));
    assert_eq!(html.matches("class=\"era-nav-btn\"").count(), 5);
}

#[test]
fn build_section_accepts_shortcut_and_rejects_unknown() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["build", "--data", DATA_DIR, "--output", "out", "--section", "#3"])
        .assert()
        .success();
    let html = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
    assert!(html.contains("section active\" id=\"spider-web\""));

    hrplatform(&dir)
        .args(["build", "--data", DATA_DIR, "--section", "nowhere?filter=un"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section: nowhere"));
}

#[test]
fn build_leaves_progress_file_alone() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["build", "--data", DATA_DIR, "--output", "out"])
        .assert()
        .success();
    assert!(!dir.path().join(".hrplatform/progress.json").exists());

    let progress = dir.path().join(".hrplatform/progress.json");
    std::fs::create_dir_all(progress.parent().unwrap()).unwrap();
    let saved = r#"{"theme":"dark","hrplatform_progress":"{\"lastVisit\":null}"}"#;
    std::fs::write(&progress, saved).unwrap();
    hrplatform(&dir)
        .args(["build", "--data", DATA_DIR, "--output", "out"])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&progress).unwrap(), saved);
    let html = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
    assert!(html.contains("data-theme=\"dark\""));
}

#[test]
fn build_rejects_unknown_view() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["build", "--data", DATA_DIR, "--view", "spiral"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown timeline view: spiral"));
}

#[test]
fn build_without_data_still_writes_site() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["build", "--data", "missing", "--output", "out"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error loading data. Please refresh the page."));

    let html = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
    assert!(!html.contains("id=\"timeline\""));
    assert!(html.contains("No treaties available."));
}

#[test]
fn search_finds_treaties_and_events() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["search", "covenant", "--data", DATA_DIR])
        .assert()
        .success()
        .stdout(predicate::str::contains("ICCPR"))
        .stdout(predicate::str::contains("1966 - treaty"));
}

#[test]
fn search_rejects_short_query() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["search", "a", "--data", DATA_DIR])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn quiz_skipping_everything_records_zero() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args([
            "quiz",
            "--data",
            DATA_DIR,
            "--category",
            "foundations",
            "--count",
            "3",
            "--seed",
            "7",
        ])
        .write_stdin("s\ns\ns\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 3"))
        .stdout(predicate::str::contains("foundations • "))
        .stdout(predicate::str::contains("Quiz complete: 0 / 3 (0%)"))
        .stdout(predicate::str::contains("Keep studying!"))
        .stdout(predicate::str::contains("Skipped"));

    hrplatform(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quizzes taken:        1"))
        .stdout(predicate::str::contains("foundations"));
}

#[test]
fn quiz_shows_exam_tip_after_an_answer() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args([
            "quiz",
            "--data",
            DATA_DIR,
            "--category",
            "foundations",
            "--count",
            "1",
            "--seed",
            "3",
        ])
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam tip: "))
        .stdout(predicate::str::contains("Quiz complete: "));
}

#[test]
fn quiz_with_no_matches_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["quiz", "--data", DATA_DIR, "--category", "maritime-law"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No questions match your criteria."));
}

#[test]
fn quiz_end_of_input_abandons() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["quiz", "--data", DATA_DIR, "--count", "2"])
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a number between"))
        .stdout(predicate::str::contains("Quiz abandoned."));
}

#[test]
fn stats_reset() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quizzes taken yet."));
    hrplatform(&dir)
        .args(["stats", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress cleared"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    hrplatform(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created hrplatform.toml"))
        .stdout(predicate::str::contains("quiz-questions.json"));

    assert!(dir.path().join("hrplatform.toml").exists());
    assert!(dir.path().join("data/treaties.json").exists());

    // Second run skips existing files, and the result validates
    hrplatform(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping."));
    hrplatform(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All data valid."));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    hrplatform(&dir)
        .args(["--config", "nope.toml", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
