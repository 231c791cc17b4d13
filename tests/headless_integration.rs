use std::sync::Arc;
use std::time::Duration;

use pitchr::analysis::{DemoAnalyzer, DEMO_FALLBACK_SCORE};
use pitchr::coach::{Coach, Command};
use pitchr::config::{Config, ConfigStore, FileConfigStore};
use pitchr::runtime::{ChannelEventSource, FixedTicker, PitchEvent, Runner};
use pitchr::schema::MetricSchema;
use pitchr::signal::{CompletionSignal, TimerScheduler};
use pitchr::{PitchSession, PitchState};

type TestRunner = Runner<ChannelEventSource, FixedTicker>;

// Headless integration using the runtime + timer scheduler without a TTY
fn rig(schema: MetricSchema, recording_ms: u64, analysis_ms: u64) -> (TestRunner, Coach<TimerScheduler>) {
    let runner = Runner::new(
        ChannelEventSource::new(),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let scheduler = TimerScheduler::new(
        runner.sender(),
        Duration::from_millis(recording_ms),
        Duration::from_millis(analysis_ms),
        Arc::new(DemoAnalyzer),
    );
    (runner, Coach::new(PitchSession::new(schema), scheduler))
}

/// Pump events until `done` holds or the step budget runs out.
fn pump<F>(runner: &TestRunner, coach: &mut Coach<TimerScheduler>, mut done: F)
where
    F: FnMut(&Coach<TimerScheduler>) -> bool,
{
    for _ in 0..2_000u32 {
        if done(coach) {
            return;
        }
        if let PitchEvent::Signal(signal) = runner.step() {
            let _ = coach.deliver(signal);
        }
    }
}

#[test]
fn timed_flow_reaches_results() {
    let (runner, mut coach) = rig(MetricSchema::trainer(), 10, 10);

    coach.command(Command::Start).unwrap();
    assert_eq!(coach.session().state(), PitchState::Recording);

    pump(&runner, &mut coach, |c| c.session().state() == PitchState::Results);

    let session = coach.session();
    assert_eq!(session.state(), PitchState::Results);
    let scores = session.scores().unwrap();
    assert_eq!(scores["clarity"].value(), 85);
    assert_eq!(scores["structure"].value(), 78);
    assert_eq!(scores["confidence"].value(), 82);
    assert!(session.transcript().starts_with("Hi, I'm Sarah"));
}

#[test]
fn manual_stop_beats_the_recording_timer() {
    // long recording timer so the manual stop always wins
    let (runner, mut coach) = rig(MetricSchema::dashboard(), 10_000, 10);

    coach.command(Command::Start).unwrap();
    coach.command(Command::Stop).unwrap();
    assert_eq!(coach.session().state(), PitchState::Processing);

    pump(&runner, &mut coach, |c| c.session().state() == PitchState::Results);

    let results = coach.session().results().unwrap();
    assert_eq!(results.feedback.len(), 4);
    assert!(results.recorded_for < Duration::from_secs(10));
}

#[test]
fn reset_while_processing_ignores_late_analysis() {
    let (runner, mut coach) = rig(MetricSchema::trainer(), 10_000, 30);

    coach.command(Command::Start).unwrap();
    coach.command(Command::Stop).unwrap();
    coach.command(Command::Reset).unwrap();

    let mut late_signals = 0;
    for _ in 0..100u32 {
        if let PitchEvent::Signal(signal @ CompletionSignal::AnalysisReady(..)) = runner.step() {
            late_signals += 1;
            assert!(coach.deliver(signal).is_ok());
            break;
        }
    }

    assert_eq!(late_signals, 1, "analysis worker should still fire");
    assert_eq!(coach.session().state(), PitchState::Idle);
    assert_eq!(coach.session().transcript(), "");
    assert!(coach.session().scores().is_none());
}

#[test]
fn second_attempt_after_reset_completes_normally() {
    let (runner, mut coach) = rig(MetricSchema::trainer(), 10, 10);

    coach.command(Command::Start).unwrap();
    coach.command(Command::Reset).unwrap();
    coach.command(Command::Start).unwrap();

    pump(&runner, &mut coach, |c| c.session().state() == PitchState::Results);
    assert_eq!(coach.session().state(), PitchState::Results);
}

#[test]
fn custom_schema_from_config_reaches_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        br#"{"custom_schema":{"headline":[{"key":"pace","label":"Pace"},{"key":"clarity","label":"Clarity"}]}}"#,
    )
    .unwrap();
    let cfg = FileConfigStore::with_path(&path).load();

    let (runner, mut coach) = rig(cfg.metric_schema(), 10, 10);
    coach.command(Command::Start).unwrap();
    pump(&runner, &mut coach, |c| c.session().state() == PitchState::Results);

    assert_eq!(coach.session().state(), PitchState::Results);
    assert!(coach.last_error().is_none());
    let scores = coach.session().scores().unwrap();
    assert_eq!(scores["pace"].value(), DEMO_FALLBACK_SCORE as u8);
    assert_eq!(scores["clarity"].value(), 85);
}
