//! Frame-driven engine keeping visualizers in step with tracked images.
//!
//! [`Engine::reconcile`] runs once per rendering frame and [`Engine::reset`]
//! runs out-of-band on a user request. Both take `&mut self`, so a reset can
//! never interleave with a reconciliation pass.

pub mod health;
pub mod overlay;
mod recovery;

use crate::health::Health;
use crate::overlay::OverlayMode;
use hub::{
    FrameReport, ReconcileEvent, ReconciliationState, SessionConfig, SessionHandle,
    SessionResult, SessionStatus, SnapshotReducer, SnapshotSource, TrackedEntity, TrackingHub,
    Transition, VisualizerRecord,
};
use log::{info, warn};
use std::sync::Arc;

/// What the frame driver did with one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The snapshot was reconciled.
    Reconciled(FrameReport),
    /// Motion tracking was not running; state was left untouched.
    Skipped(SessionStatus),
    /// No session is active (a reset failed); call [`Engine::reset`] again.
    NoSession,
}

/// Owns the reconciliation state, the active session, and the collaborator hub.
pub struct Engine {
    state: ReconciliationState,
    hub: TrackingHub,
    config: Arc<SessionConfig>,
    session: Option<SessionHandle>,
    /// Session whose teardown failed; closed again before the next reset opens one.
    pending_teardown: Option<SessionHandle>,
    overlay: OverlayMode,
    health: Health,
}

impl Engine {
    /// Opens the initial tracking session with `config`, which is then reused
    /// unchanged by every reset.
    pub fn start(hub: TrackingHub, config: SessionConfig) -> SessionResult<Self> {
        let session = hub.open_session(&config)?;
        info!(
            "started {session} tracking {} reference image(s)",
            config.image_database.len()
        );
        Ok(Self {
            state: ReconciliationState::new(),
            hub,
            config: Arc::new(config),
            session: Some(session),
            pending_teardown: None,
            overlay: OverlayMode::default(),
            health: Health::default(),
        })
    }

    pub fn state(&self) -> &ReconciliationState {
        &self.state
    }

    pub fn session(&self) -> Option<SessionHandle> {
        self.session
    }

    /// Session still held by the runtime after a failed teardown.
    pub fn pending_teardown(&self) -> Option<SessionHandle> {
        self.pending_teardown
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn overlay(&self) -> OverlayMode {
        self.overlay
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Reconciles one snapshot and returns whether any recorded entity is tracking.
    pub fn reconcile(&mut self, snapshot: &[TrackedEntity]) -> bool {
        self.reconcile_frame(snapshot).tracking
    }

    /// Reconciles one snapshot and reports every create, destroy, and lookup failure.
    ///
    /// # Panics
    ///
    /// Panics if no session is active; reconciling before startup or after a
    /// failed reset is a caller bug. Debug builds also panic on a snapshot that
    /// repeats an identity.
    pub fn reconcile_frame(&mut self, snapshot: &[TrackedEntity]) -> FrameReport {
        assert!(
            self.session.is_some(),
            "reconcile called without an active tracking session"
        );

        let transitions = self.state.reduce_snapshot(snapshot);
        let mut report = FrameReport::new(snapshot.len());
        for transition in transitions {
            self.apply(transition, &mut report);
        }

        report.tracking = self.state.any_tracking();
        self.overlay = OverlayMode::from_tracking(report.tracking);
        report
    }

    /// Polls the session status and reconciles the source's snapshot while
    /// motion tracking is running.
    pub fn run_frame(&mut self, source: &dyn SnapshotSource) -> FrameOutcome {
        let Some(session) = self.session else {
            return FrameOutcome::NoSession;
        };
        let status = self.hub.session_status(session);
        self.health.observe_status(status);
        if status != SessionStatus::Tracking {
            return FrameOutcome::Skipped(status);
        }
        let snapshot = source.snapshot();
        FrameOutcome::Reconciled(self.reconcile_frame(&snapshot))
    }

    fn apply(&mut self, transition: Transition, report: &mut FrameReport) {
        match transition {
            Transition::Spawn { id, pose } => match self.hub.spawn(id, &pose) {
                Ok((anchor, visualizer)) => {
                    let record = VisualizerRecord {
                        visualizer,
                        anchor,
                        created_frame: self.state.stats.frames,
                    };
                    self.state.insert_record(id, record);
                    self.state.stats.created += 1;
                    report.push(ReconcileEvent::Created {
                        id,
                        anchor,
                        visualizer,
                    });
                }
                Err(err) => {
                    warn!("{err}; retrying while entity {id} keeps tracking");
                    self.state.stats.lookup_failures += 1;
                    report.push(ReconcileEvent::LookupFailed(err));
                }
            },
            Transition::Despawn { id } => {
                if let Some(record) = self.state.remove_record(id) {
                    self.hub.despawn(id, &record);
                    self.state.stats.destroyed += 1;
                    report.push(ReconcileEvent::Destroyed {
                        id,
                        anchor: record.anchor,
                        visualizer: record.visualizer,
                    });
                }
            }
        }
    }
}
