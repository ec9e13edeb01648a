//! A full navigation journey driven frame by frame through the engine.

use app::overlay::OverlayMode;
use app::{Engine, FrameOutcome};
use hub::{FrameReport, Pose, SessionStatus, TrackedEntity};
use mock::{image_config, make_rig_with_runtime};
use pretty_assertions::assert_eq;
use tracking_sim::{ScriptedSource, SimRuntime};

fn reconciled(outcome: FrameOutcome) -> FrameReport {
    match outcome {
        FrameOutcome::Reconciled(report) => report,
        other => panic!("expected a reconciled frame, got {other:?}"),
    }
}

#[test]
fn journey_switches_overlay_and_recovers_after_reset() {
    let _ = env_logger::builder().is_test(true).try_init();
    let rig = make_rig_with_runtime(
        [0, 1, 2],
        SimRuntime::with_initial_status(SessionStatus::Initializing),
    );
    let mut engine = Engine::start(rig.hub.clone(), image_config(4)).expect("start");
    let source = ScriptedSource::new();

    // Camera still warming up.
    source.push_frame([TrackedEntity::tracking(0, Pose::IDENTITY)]);
    assert_eq!(
        engine.run_frame(&source),
        FrameOutcome::Skipped(SessionStatus::Initializing)
    );
    assert_eq!(engine.overlay(), OverlayMode::FindImage);
    assert_eq!(source.remaining(), 1, "skipped frames leave the snapshot unread");

    let session = engine.session().expect("session");
    rig.runtime.set_status(session, SessionStatus::Tracking);

    // Entrance map recognised.
    let report = reconciled(engine.run_frame(&source));
    assert_eq!(report.created().collect::<Vec<_>>(), vec![0]);
    assert_eq!(engine.overlay(), OverlayMode::ShowingContent);

    // Nothing updated this frame: entrance map still counts as tracking.
    let report = reconciled(engine.run_frame(&source));
    assert!(report.tracking);
    assert!(report.events.is_empty());

    // User walks on: entrance paused, stairwell sign picked up, an unknown poster seen.
    source.push_frame([
        TrackedEntity::paused(0),
        TrackedEntity::tracking(1, Pose::at([1.0, 1.0, -1.0])),
        TrackedEntity::tracking(3, Pose::IDENTITY),
    ]);
    let report = reconciled(engine.run_frame(&source));
    assert_eq!(report.created().collect::<Vec<_>>(), vec![1]);
    assert_eq!(report.lookup_failures().map(|err| err.id).collect::<Vec<_>>(), vec![3]);
    assert!(report.tracking);
    assert_eq!(engine.state().len(), 2);

    // Stairwell sign paused too: content stays but the guide comes back.
    source.push_frame([TrackedEntity::paused(1), TrackedEntity::paused(3)]);
    let report = reconciled(engine.run_frame(&source));
    assert!(!report.tracking);
    assert_eq!(engine.overlay(), OverlayMode::FindImage);
    assert_eq!(rig.prefabs.live_count(), 2);

    // Reset at the end of the journey.
    let new_session = engine.reset().expect("reset");
    assert_eq!(rig.prefabs.destroyed().len(), 2);
    assert_eq!(rig.anchors.live_count(), 0);
    rig.runtime.set_status(new_session, SessionStatus::Tracking);

    // Same entrance map, new journey.
    source.push_frame([TrackedEntity::tracking(0, Pose::at([0.0, 1.0, -2.0]))]);
    let report = reconciled(engine.run_frame(&source));
    assert_eq!(report.created().collect::<Vec<_>>(), vec![0]);
    assert_eq!(engine.state().stats.created, 3);
    assert_eq!(engine.state().stats.resets, 1);
}
