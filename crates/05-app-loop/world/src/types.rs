//! Records, planned transitions, and the per-frame report.

use smallvec::SmallVec;
use tracking_abi::{AnchorHandle, EntityId, FactoryLookupError, Pose, VisualizerHandle};

/// Live visualizer for one entity and the anchor it hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualizerRecord {
    pub visualizer: VisualizerHandle,
    pub anchor: AnchorHandle,
    /// Frame counter value when the record was inserted.
    pub created_frame: u64,
}

/// Change the engine must apply to bring visualizers in line with a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Entity started tracking and has no visualizer yet.
    Spawn { id: EntityId, pose: Pose },
    /// Entity stopped and its visualizer must go.
    Despawn { id: EntityId },
}

impl Transition {
    pub fn id(&self) -> EntityId {
        match *self {
            Transition::Spawn { id, .. } | Transition::Despawn { id } => id,
        }
    }
}

/// Transitions planned for a single frame.
pub type Transitions = SmallVec<[Transition; 8]>;

/// Observable outcome of applying one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileEvent {
    Created {
        id: EntityId,
        anchor: AnchorHandle,
        visualizer: VisualizerHandle,
    },
    Destroyed {
        id: EntityId,
        anchor: AnchorHandle,
        visualizer: VisualizerHandle,
    },
    /// Warning: no prefab for the entity; it stays unrecorded and is retried next frame.
    LookupFailed(FactoryLookupError),
}

/// Result of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether any recorded entity is currently `Tracking`.
    pub tracking: bool,
    /// Number of entities in the snapshot that was reconciled.
    pub snapshot_len: usize,
    pub events: SmallVec<[ReconcileEvent; 8]>,
}

impl FrameReport {
    pub fn new(snapshot_len: usize) -> Self {
        Self {
            snapshot_len,
            ..Self::default()
        }
    }

    pub fn push(&mut self, event: ReconcileEvent) {
        self.events.push(event);
    }

    pub fn created(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.events.iter().filter_map(|event| match event {
            ReconcileEvent::Created { id, .. } => Some(*id),
            _ => None,
        })
    }

    pub fn destroyed(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.events.iter().filter_map(|event| match event {
            ReconcileEvent::Destroyed { id, .. } => Some(*id),
            _ => None,
        })
    }

    pub fn lookup_failures(&self) -> impl Iterator<Item = &FactoryLookupError> + '_ {
        self.events.iter().filter_map(|event| match event {
            ReconcileEvent::LookupFailed(err) => Some(err),
            _ => None,
        })
    }

    /// True when the pass neither created nor destroyed anything.
    pub fn is_quiet(&self) -> bool {
        !self.events.iter().any(|event| {
            matches!(
                event,
                ReconcileEvent::Created { .. } | ReconcileEvent::Destroyed { .. }
            )
        })
    }
}
