use assert_cmd::Command;

fn pitchr() -> Command {
    let mut cmd = Command::cargo_bin("pitchr").unwrap();
    // keep the user's real config out of the run
    let home = tempfile::tempdir().unwrap().into_path();
    cmd.env("HOME", &home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn headless_run_prints_trainer_report() {
    let output = pitchr()
        .args(["--headless", "-r", "10", "-a", "10", "-m", "trainer"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Transcript"));
    assert!(stdout.contains("Clarity"));
    assert!(stdout.contains("85%  Excellent (Good Job)"));
    assert!(stdout.contains("Rewrites"));
    assert!(!stdout.contains("Feedback"));
}

#[test]
fn headless_run_prints_dashboard_feedback() {
    let output = pitchr()
        .args(["--headless", "-r", "10", "-a", "10", "-m", "dashboard"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Non Verbal [On Track]"));
    assert!(stdout.contains("Improvements"));
}

#[test]
fn unknown_schema_is_a_usage_error() {
    pitchr()
        .args(["--headless", "-m", "sidebar"])
        .assert()
        .failure();
}
