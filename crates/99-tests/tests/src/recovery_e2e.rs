//! Reset ordering and repeated failure recovery across the whole stack.

use app::{Engine, FrameOutcome};
use hub::{
    AnchorHandle, AnchorService, EntityId, FactoryLookupError, Pose, SessionConfig, SessionError,
    SessionHandle, SessionResult, SessionStatus, TrackedEntity, TrackingHub, TrackingRuntime,
    VisualizerFactory, VisualizerHandle,
};
use mock::{image_config, make_rig};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracking_sim::ScriptedSource;

/// One collaborator playing every role and journaling each call in order.
#[derive(Default)]
struct Journal {
    next: AtomicU64,
    calls: Mutex<Vec<String>>,
}

impl Journal {
    fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn log(&self, entry: String) {
        self.calls.lock().push(entry);
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl AnchorService for Journal {
    fn create_anchor(&self, _pose: &Pose) -> AnchorHandle {
        let handle = AnchorHandle(self.next());
        self.log(format!("create {handle}"));
        handle
    }

    fn release_anchor(&self, handle: AnchorHandle) {
        self.log(format!("release {handle}"));
    }
}

impl VisualizerFactory for Journal {
    fn instantiate(
        &self,
        id: EntityId,
        _anchor: AnchorHandle,
    ) -> Result<VisualizerHandle, FactoryLookupError> {
        let handle = VisualizerHandle(self.next());
        self.log(format!("instantiate {id} as {handle}"));
        Ok(handle)
    }

    fn destroy(&self, handle: VisualizerHandle) {
        self.log(format!("destroy {handle}"));
    }
}

impl TrackingRuntime for Journal {
    fn create_session(&self, _config: &SessionConfig) -> SessionResult<SessionHandle> {
        let handle = SessionHandle(self.next());
        self.log(format!("open {handle}"));
        Ok(handle)
    }

    fn destroy_session(&self, handle: SessionHandle) -> SessionResult<()> {
        self.log(format!("close {handle}"));
        Ok(())
    }

    fn status(&self, _handle: SessionHandle) -> SessionStatus {
        SessionStatus::Tracking
    }
}

#[test]
fn reset_releases_content_before_touching_the_session() {
    let journal = Arc::new(Journal::default());
    let hub = TrackingHub::builder()
        .anchors(journal.clone())
        .visualizers(journal.clone())
        .runtime(journal.clone())
        .build()
        .expect("hub");
    let mut engine = Engine::start(hub, image_config(2)).expect("start");
    assert!(engine.reconcile(&[TrackedEntity::tracking(0, Pose::IDENTITY)]));
    assert_eq!(
        journal.take(),
        vec!["open session#1", "create anchor#2", "instantiate 0 as visualizer#3"]
    );

    engine.reset().expect("reset");
    assert_eq!(
        journal.take(),
        vec![
            "destroy visualizer#3",
            "release anchor#2",
            "close session#1",
            "open session#4",
        ]
    );
}

#[test]
fn repeated_failed_resets_then_recovery() {
    let _ = env_logger::builder().is_test(true).try_init();
    let rig = make_rig([0, 1]);
    let mut engine = Engine::start(rig.hub.clone(), image_config(2)).expect("start");
    let source = ScriptedSource::new();
    source.push_frame([
        TrackedEntity::tracking(0, Pose::IDENTITY),
        TrackedEntity::tracking(1, Pose::at([0.5, 0.0, -1.0])),
    ]);
    assert!(matches!(engine.run_frame(&source), FrameOutcome::Reconciled(_)));
    let first = engine.session().expect("session");

    rig.runtime
        .fail_next_destroy(SessionError::unavailable("runtime not responding"));
    let err = engine.reset().expect_err("teardown fails");
    assert_eq!(err, SessionError::unavailable("runtime not responding"));
    assert_eq!(rig.prefabs.live_count(), 0);
    assert_eq!(rig.anchors.live_count(), 0);
    assert_eq!(engine.run_frame(&source), FrameOutcome::NoSession);
    assert_eq!(engine.pending_teardown(), Some(first));

    rig.runtime.fail_next_create(SessionError::ResourceBusy(first));
    engine.reset().expect_err("creation fails");
    assert_eq!(engine.pending_teardown(), None);
    assert_eq!(rig.runtime.destroyed(), vec![first]);
    assert!(rig.runtime.live_sessions().is_empty());
    assert!(engine.health().flags.fatal);
    assert_eq!(engine.health().failed_resets, 2);
    assert_eq!(engine.session(), None);

    let session = engine.reset().expect("third reset succeeds");
    assert!(!engine.health().flags.fatal);
    assert_eq!(engine.health().failed_resets, 0);
    assert_eq!(engine.state().stats.resets, 1);
    assert_eq!(rig.runtime.live_sessions(), vec![session]);

    source.push_frame([TrackedEntity::tracking(1, Pose::IDENTITY)]);
    match engine.run_frame(&source) {
        FrameOutcome::Reconciled(report) => {
            assert_eq!(report.created().collect::<Vec<_>>(), vec![1]);
        }
        other => panic!("expected a reconciled frame, got {other:?}"),
    }
    assert_eq!(rig.prefabs.live_for(1).len(), 1);
    assert_eq!(rig.anchors.live_count(), 1);
}
