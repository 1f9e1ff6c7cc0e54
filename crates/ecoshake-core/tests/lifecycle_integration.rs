//! End-to-end tests for the controller against real storage.
//!
//! Covers the full shake -> challenge -> resolution flow, persistence across
//! restarts, and the feedback produced along the way.

use ecoshake_core::feedback::{EffectExecutor, ExecutionStatus, SilentSink};
use ecoshake_core::storage::{HistoryStore, HISTORY_KEY};
use ecoshake_core::{
    ArmState, Catalog, Config, Database, Effect, Event, Input, KeyValueStore, MemoryStore,
    MotionSample, SensorAccess, ShakeApp,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn open_db(dir: &tempfile::TempDir) -> Database {
    Database::open_at(&dir.path().join("ecoshake.db")).unwrap()
}

fn arm<S: KeyValueStore>(app: &mut ShakeApp<S>, access: SensorAccess) {
    app.handle(Input::EnableShake, 0);
    app.handle(Input::PermissionResolved(access), 0);
}

fn hard_shake() -> Input {
    Input::Motion(MotionSample::xyz(20.0, 15.0, 10.0))
}

// ============================================================================
// Flow
// ============================================================================

#[test]
fn test_shake_complete_flow_persists_history() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = ShakeApp::seeded(open_db(&dir), Catalog::builtin(), &Config::default(), 7);
        arm(&mut app, SensorAccess::NotRequired);
        assert_eq!(app.arm_state(), ArmState::Armed);

        let out = app.handle(hard_shake(), 10_000);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, Event::ChallengeTriggered { .. })));

        for i in 1..=5 {
            app.handle(Input::Tick, 10_000 + i * 1000);
        }
        assert_eq!(app.session().unwrap().remaining_secs(), 55);

        let out = app.handle(Input::Complete, 16_000);
        assert!(out.effects.contains(&Effect::Water { duration_ms: 2000 }));
    }

    let reopened = ShakeApp::seeded(open_db(&dir), Catalog::builtin(), &Config::default(), 8);
    assert_eq!(reopened.history().len(), 1);
    let entry = &reopened.history().entries()[0];
    assert!(entry.completed);
    assert_eq!(entry.timestamp, 16_000);
}

#[test]
fn test_cooldown_and_suppression_through_controller() {
    let mut app = ShakeApp::seeded(MemoryStore::new(), Catalog::builtin(), &Config::default(), 1);
    arm(&mut app, SensorAccess::Granted);

    app.handle(hard_shake(), 0);
    app.handle(Input::Cancel, 100);

    // Within cooldown of the accepted shake.
    assert!(app.handle(hard_shake(), 900).is_empty());
    assert!(app.session().is_none());

    let out = app.handle(hard_shake(), 1_200);
    assert!(matches!(out.events[0], Event::ShakeDetected { .. }));
}

#[test]
fn test_gentle_motion_never_triggers() {
    let mut app = ShakeApp::seeded(MemoryStore::new(), Catalog::builtin(), &Config::default(), 1);
    arm(&mut app, SensorAccess::Granted);
    for t in 0..50 {
        let out = app.handle(Input::Motion(MotionSample::xyz(0.3, 9.8, 0.2)), t * 100);
        assert!(out.is_empty());
    }
    assert!(app
        .handle(Input::Motion(MotionSample::empty()), 9_000)
        .is_empty());
}

#[test]
fn test_threshold_follows_config() {
    let mut config = Config::default();
    config.apply("motion.threshold", "12").unwrap();
    let mut app = ShakeApp::seeded(MemoryStore::new(), Catalog::builtin(), &config, 1);
    arm(&mut app, SensorAccess::Granted);
    let out = app.handle(Input::Motion(MotionSample::xyz(0.0, 13.0, 0.0)), 0);
    assert!(!out.is_empty());
}

#[test]
fn test_failed_permission_reports_and_falls_back_to_manual() {
    let mut app = ShakeApp::seeded(MemoryStore::new(), Catalog::builtin(), &Config::default(), 1);
    app.handle(Input::EnableShake, 0);
    let out = app.handle(
        Input::PermissionResolved(SensorAccess::Failed {
            reason: "sensor API threw".into(),
        }),
        0,
    );
    assert_eq!(app.arm_state(), ArmState::Refused);
    let titles: Vec<&str> = out
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Notify { title, .. } => Some(title.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["Permission request failed"]);

    assert!(app.handle(hard_shake(), 5_000).is_empty());
    assert!(!app.handle(Input::RandomChallenge, 5_000).is_empty());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_corrupted_history_loads_empty_and_is_overwritten() {
    let store = MemoryStore::with_value(HISTORY_KEY, "{{{");
    let mut app = ShakeApp::seeded(&store, Catalog::builtin(), &Config::default(), 2);
    assert!(app.history().is_empty());

    app.handle(Input::RandomChallenge, 0);
    app.handle(Input::Skip, 1);

    let stored = HistoryStore::new(&store).load();
    assert_eq!(stored.len(), 1);
    assert!(!stored.entries()[0].completed);
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, ecoshake_core::StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), ecoshake_core::StorageError> {
        Err(ecoshake_core::StorageError::Locked)
    }
}

#[test]
fn test_write_failure_keeps_memory_history() {
    let mut app = ShakeApp::seeded(ReadOnlyStore, Catalog::builtin(), &Config::default(), 2);
    app.handle(Input::RandomChallenge, 0);
    let out = app.handle(Input::Complete, 1);

    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, Event::HistoryNotSaved { .. })));
    assert_eq!(app.history().completed_count(), 1);
    assert!(app.session().is_none());
}

#[test]
fn test_legacy_history_array_is_read() {
    let legacy = r#"[
        {"id":"1","title":"Pick Up Litter","completed":true,"timestamp":1718000000000},
        {"id":"4","title":"Sort Your Recyclables","completed":false,"timestamp":1718000100000}
    ]"#;
    let app = ShakeApp::seeded(
        MemoryStore::with_value(HISTORY_KEY, legacy),
        Catalog::builtin(),
        &Config::default(),
        2,
    );
    let summary = app.history().summary();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.total, 2);
    let newest: Vec<&str> = app.history().newest_first().map(|e| e.id.as_str()).collect();
    assert_eq!(newest, vec!["4", "1"]);
}

// ============================================================================
// Feedback
// ============================================================================

#[test]
fn test_disabled_channels_still_water_the_tree() {
    let mut config = Config::default();
    config.apply("feedback.vibration", "false").unwrap();
    config.apply("feedback.sound", "false").unwrap();
    config.apply("feedback.notifications", "false").unwrap();
    let mut app = ShakeApp::seeded(MemoryStore::new(), Catalog::builtin(), &config, 3);

    app.handle(Input::RandomChallenge, 0);
    let out = app.handle(Input::Complete, 1);
    let feedback: Vec<&Effect> = out.effects.iter().filter(|e| e.is_feedback()).collect();
    assert_eq!(feedback, vec![&Effect::Water { duration_ms: 2000 }]);
}

#[test]
fn test_executor_runs_completion_feedback() {
    let mut app = ShakeApp::seeded(MemoryStore::new(), Catalog::builtin(), &Config::default(), 3);
    app.handle(Input::RandomChallenge, 0);
    let out = app.handle(Input::Complete, 1);

    let log = EffectExecutor::new().execute_batch(&mut SilentSink, &out.effects);
    assert_eq!(log.failure_count(), 0);
    assert!(log.success_count() >= 4);
    assert!(log
        .results
        .iter()
        .any(|r| matches!(r.status, ExecutionStatus::Skipped { .. })));
}
