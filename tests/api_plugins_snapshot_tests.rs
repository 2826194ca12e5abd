mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{Harness, RecordingPlugin, date, horizontal_axis, month_tree};
use timeline_viewport::ViewportError;
use timeline_viewport::api::{
    ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1, NavigationOutcome, ScrollHandle,
    ViewportEngine, ViewportEngineConfig,
};
use timeline_viewport::core::Granularity;
use timeline_viewport::extensions::ViewportEvent;
use timeline_viewport::interaction::ManualClock;
use timeline_viewport::telemetry::init_default_tracing;

#[test]
fn plugin_registry_rejects_empty_and_duplicate_ids() {
    let mut harness = Harness::standard();
    let events = Rc::new(RefCell::new(Vec::new()));
    assert_eq!(harness.engine.plugin_count(), 1);

    let err = harness
        .engine
        .register_plugin(Box::new(RecordingPlugin::new("", events.clone())))
        .expect_err("empty id");
    assert!(matches!(err, ViewportError::InvalidData(_)));

    let err = harness
        .engine
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect_err("duplicate id");
    assert!(matches!(err, ViewportError::InvalidData(_)));

    harness
        .engine
        .register_plugin(Box::new(RecordingPlugin::new("second", events)))
        .expect("register second");
    assert!(harness.engine.has_plugin("second"));
    assert!(harness.engine.unregister_plugin("second"));
    assert!(!harness.engine.unregister_plugin("second"));
    assert_eq!(harness.engine.plugin_count(), 1);
}

#[test]
fn plugin_sees_deterministic_event_sequence() {
    let mut harness = Harness::standard();
    harness.engine.scroll_to_column(date(2021, 9, 1), "2021-09");
    harness.settle();

    let kinds: Vec<&'static str> = harness
        .recorded()
        .iter()
        .map(|entry| match entry.event {
            ViewportEvent::GuardArmed { .. } => "guard_armed",
            ViewportEvent::PeriodChanged { .. } => "period",
            ViewportEvent::ScrollIssued { .. } => "scroll",
            ViewportEvent::AnimationCompleted { .. } => "completed",
            ViewportEvent::GuardCleared { .. } => "guard_cleared",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["guard_armed", "period", "scroll", "guard_cleared", "completed"]
    );
}

#[test]
fn invalid_config_is_rejected() {
    let tree = month_tree(600.0, 400.0, 200.0);
    let config = ViewportEngineConfig::default().with_animation_epsilon_px(0.0);
    let err = ViewportEngine::with_clock(tree, ManualClock::new(0), config)
        .err()
        .expect("invalid epsilon");
    assert!(matches!(err, ViewportError::InvalidConfig(_)));

    let mut harness = Harness::standard();
    let err = harness
        .engine
        .set_config(ViewportEngineConfig::default().with_edge_margin_px(f64::NAN))
        .expect_err("nan margin");
    assert!(matches!(err, ViewportError::InvalidConfig(_)));

    harness
        .engine
        .set_config(ViewportEngineConfig::default().with_guard_window_ms(400))
        .expect("valid config");
    assert_eq!(harness.engine.config().guard_window_ms, 400);
    harness.engine.scroll_to_column(date(2021, 2, 1), "2021-02");
    assert_eq!(harness.engine.guard_state().expires_at, 400);
}

#[test]
fn snapshot_serializes_pending_work() {
    let mut harness = Harness::standard();
    harness.engine.scroll_to_date(date(2021, 6, 15), false);

    let snapshot = harness.engine.snapshot();
    assert_eq!(snapshot.granularity, Granularity::Month);
    assert_eq!(snapshot.pending_debounce.len(), 2);
    assert_eq!(snapshot.pending_debounce[0].axis, horizontal_axis());
    assert!(snapshot.guard.active);
    assert!(snapshot.animating_axes.is_empty());

    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    let parsed: EngineSnapshotJsonContractV1 = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed.schema_version, ENGINE_SNAPSHOT_JSON_SCHEMA_V1);
    assert_eq!(parsed.snapshot, snapshot);
}

#[test]
fn scroll_handle_drives_shared_engine() {
    let harness = Harness::standard();
    let shared = harness.engine.into_shared();
    let handle = ScrollHandle::new(&shared);

    let outcome = handle
        .scroll_to_keep_visible("m09-d18")
        .expect("engine attached");
    assert_eq!(outcome, NavigationOutcome::Issued { commands: 2 });
    harness.clock.advance(400);
    shared.borrow_mut().tick();
    assert!(shared.borrow().tree().horizontal_offset() > 0.0);

    drop(shared);
    assert!(handle.step_period(1).is_none());
}

#[test]
fn default_tracing_installs_at_most_once() {
    let _ = init_default_tracing();
    assert!(!init_default_tracing());
}
