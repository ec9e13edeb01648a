//! Reconciliation state and per-frame transition types.
//!
//! The `world` crate intentionally stays small. It owns the identity→visualizer
//! bookkeeping and the anchor registry, and a pure reducer that turns a
//! tracking snapshot into the spawn/despawn transitions the engine must apply.
//! Nothing in here talks to a collaborator.

/// Pure snapshot reducer.
pub mod reduce_snapshot;
/// Record, transition, and report types.
pub mod types;
/// Reconciliation state container.
pub mod world;

pub use crate::reduce_snapshot::SnapshotReducer;
pub use crate::types::{FrameReport, ReconcileEvent, Transition, Transitions, VisualizerRecord};
pub use crate::world::{ReconcileStats, ReconciliationState, Teardown};
pub use tracking_abi::{
    AnchorHandle, EntityId, FactoryLookupError, Pose, TrackedEntity, TrackingState,
    VisualizerHandle,
};
