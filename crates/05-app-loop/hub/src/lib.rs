//! Collaborator hub: anchors, visualizers, and the tracking runtime behind one handle.

use anyhow::{anyhow, Result};
use log::debug;

pub use tracking_abi::{
    AnchorHandle, AnchorService, AnchorServiceHandle, EntityId, FactoryLookupError, Pose,
    SessionConfig, SessionError, SessionHandle, SessionResult, SessionStatus, SnapshotSource,
    TrackedEntity, TrackingRuntime, TrackingRuntimeHandle, TrackingState, VisualizerFactory,
    VisualizerFactoryHandle, VisualizerHandle,
};
pub use world::{
    FrameReport, ReconcileEvent, ReconciliationState, SnapshotReducer, Transition,
    VisualizerRecord,
};

/// Aggregates the collaborator handles the engine calls into.
#[derive(Clone)]
pub struct TrackingHub {
    anchors: AnchorServiceHandle,
    visualizers: VisualizerFactoryHandle,
    runtime: TrackingRuntimeHandle,
}

impl TrackingHub {
    /// Creates a new builder for constructing a hub.
    pub fn builder() -> TrackingHubBuilder {
        TrackingHubBuilder::new()
    }

    /// Anchors a new visualizer for `id` at `pose`.
    ///
    /// The anchor is created first; if the factory has no prefab for `id` the
    /// anchor is released again before the lookup error is returned.
    pub fn spawn(
        &self,
        id: EntityId,
        pose: &Pose,
    ) -> Result<(AnchorHandle, VisualizerHandle), FactoryLookupError> {
        let anchor = self.anchors.create_anchor(pose);
        match self.visualizers.instantiate(id, anchor) {
            Ok(visualizer) => {
                debug!("spawned {visualizer} on {anchor} for entity {id}");
                Ok((anchor, visualizer))
            }
            Err(err) => {
                self.anchors.release_anchor(anchor);
                Err(err)
            }
        }
    }

    /// Destroys a record's visual instance and releases its anchor.
    pub fn despawn(&self, id: EntityId, record: &VisualizerRecord) {
        self.visualizers.destroy(record.visualizer);
        self.anchors.release_anchor(record.anchor);
        debug!(
            "despawned {} and released {} for entity {id}",
            record.visualizer, record.anchor
        );
    }

    /// Destroys a visual instance without touching its anchor.
    pub fn destroy_visualizer(&self, handle: VisualizerHandle) {
        self.visualizers.destroy(handle);
    }

    pub fn release_anchor(&self, handle: AnchorHandle) {
        self.anchors.release_anchor(handle);
    }

    pub fn open_session(&self, config: &SessionConfig) -> SessionResult<SessionHandle> {
        self.runtime.create_session(config)
    }

    pub fn close_session(&self, handle: SessionHandle) -> SessionResult<()> {
        self.runtime.destroy_session(handle)
    }

    pub fn session_status(&self, handle: SessionHandle) -> SessionStatus {
        self.runtime.status(handle)
    }
}

/// Builder for assembling a [`TrackingHub`] from individual collaborator handles.
pub struct TrackingHubBuilder {
    anchors: Option<AnchorServiceHandle>,
    visualizers: Option<VisualizerFactoryHandle>,
    runtime: Option<TrackingRuntimeHandle>,
}

impl TrackingHubBuilder {
    /// Creates an empty builder with no collaborators attached.
    pub fn new() -> Self {
        Self {
            anchors: None,
            visualizers: None,
            runtime: None,
        }
    }

    /// Sets the anchor service handle.
    pub fn anchors(mut self, svc: AnchorServiceHandle) -> Self {
        self.anchors = Some(svc);
        self
    }

    /// Sets the visualizer factory handle.
    pub fn visualizers(mut self, svc: VisualizerFactoryHandle) -> Self {
        self.visualizers = Some(svc);
        self
    }

    /// Sets the tracking runtime handle.
    pub fn runtime(mut self, svc: TrackingRuntimeHandle) -> Self {
        self.runtime = Some(svc);
        self
    }

    /// Builds a [`TrackingHub`], returning an error if any collaborator is missing.
    pub fn build(self) -> Result<TrackingHub> {
        Ok(TrackingHub {
            anchors: self
                .anchors
                .ok_or_else(|| anyhow!("missing anchor service"))?,
            visualizers: self
                .visualizers
                .ok_or_else(|| anyhow!("missing visualizer factory"))?,
            runtime: self
                .runtime
                .ok_or_else(|| anyhow!("missing tracking runtime"))?,
        })
    }
}

impl Default for TrackingHubBuilder {
    fn default() -> Self {
        Self::new()
    }
}
