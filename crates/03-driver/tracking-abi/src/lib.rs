//! Tracking ABI types shared between collaborators and the reconciliation engine.
//!
//! This crate defines the boundary between the engine (layer 05) and the
//! tracking runtime adapters (layer 04): entity snapshots, opaque handles,
//! session configuration, the collaborator traits, and their error types.

#![allow(missing_docs)]

mod error;

pub use crate::error::{FactoryLookupError, SessionError, SessionResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Stable key assigned by the tracking provider to a reference image.
pub type EntityId = i32;

/// Per-frame list of entities reported by a [`SnapshotSource`].
pub type Snapshot = SmallVec<[TrackedEntity; 8]>;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value of the handle.
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

opaque_handle!(
    /// World anchor issued by the [`AnchorService`].
    AnchorHandle,
    "anchor"
);
opaque_handle!(
    /// Live visual instance issued by the [`VisualizerFactory`].
    VisualizerHandle,
    "visualizer"
);
opaque_handle!(
    /// Live tracking session issued by the [`TrackingRuntime`].
    SessionHandle,
    "session"
);

/// Tracking state reported for an entity in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// Actively localized this frame.
    Tracking,
    /// Temporarily not localized; may resume.
    Paused,
    /// Permanently done; the identity will not come back in this session.
    Stopped,
}

/// Rigid pose in world space (position in meters, rotation as an `xyzw` quaternion).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
    };

    /// Pose at `position` with identity rotation.
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Entity reported by the tracking provider. The provider owns the underlying
/// object; the engine only sees this per-frame copy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntity {
    /// Identity of the physical image (its index in the image database).
    pub id: EntityId,
    /// Tracking state for this frame.
    pub state: TrackingState,
    /// Center of the image; only meaningful while `Tracking`.
    #[serde(default)]
    pub center_pose: Pose,
}

impl TrackedEntity {
    pub fn tracking(id: EntityId, center_pose: Pose) -> Self {
        Self {
            id,
            state: TrackingState::Tracking,
            center_pose,
        }
    }

    pub fn paused(id: EntityId) -> Self {
        Self {
            id,
            state: TrackingState::Paused,
            center_pose: Pose::IDENTITY,
        }
    }

    pub fn stopped(id: EntityId) -> Self {
        Self {
            id,
            state: TrackingState::Stopped,
            center_pose: Pose::IDENTITY,
        }
    }
}

/// Motion-tracking status of the session as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session created but not yet localized.
    Initializing,
    /// Motion tracking is running; snapshots are meaningful.
    Tracking,
    /// Motion tracking was lost and may recover on its own.
    LostTracking,
    /// The runtime hit an unrecoverable error; only a reset helps.
    FatalError,
}

/// Camera focus behaviour requested from the runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    #[default]
    Fixed,
    Auto,
}

/// Entry of the reference-image database. Its position in the database is the
/// [`EntityId`] the runtime reports for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub name: String,
    /// Physical width in meters, when known.
    #[serde(default)]
    pub width_m: Option<f32>,
}

impl ReferenceImage {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width_m: None,
        }
    }
}

/// Session configuration supplied once at startup and reused on every reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub image_database: Vec<ReferenceImage>,
    #[serde(default)]
    pub focus_mode: FocusMode,
}

impl SessionConfig {
    /// Configuration tracking the given reference images.
    pub fn new(image_database: Vec<ReferenceImage>) -> Self {
        Self {
            image_database,
            focus_mode: FocusMode::default(),
        }
    }

    pub fn with_focus(mut self, focus_mode: FocusMode) -> Self {
        self.focus_mode = focus_mode;
        self
    }

    /// Looks up the reference image reported under `id`.
    pub fn image(&self, id: EntityId) -> Option<&ReferenceImage> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.image_database.get(idx))
    }
}

/// Supplies the entities the tracking provider updated this frame.
pub trait SnapshotSource {
    fn snapshot(&self) -> Snapshot;
}

/// Creates and releases world anchors.
pub trait AnchorService {
    fn create_anchor(&self, pose: &Pose) -> AnchorHandle;
    fn release_anchor(&self, handle: AnchorHandle);
}

/// Produces visual instances for tracked entities.
pub trait VisualizerFactory {
    /// Instantiates the prefab registered for `id` under `anchor`.
    fn instantiate(
        &self,
        id: EntityId,
        anchor: AnchorHandle,
    ) -> Result<VisualizerHandle, FactoryLookupError>;

    fn destroy(&self, handle: VisualizerHandle);
}

/// Owns native tracking sessions.
pub trait TrackingRuntime {
    fn create_session(&self, config: &SessionConfig) -> SessionResult<SessionHandle>;
    fn destroy_session(&self, handle: SessionHandle) -> SessionResult<()>;
    fn status(&self, handle: SessionHandle) -> SessionStatus;
}

/// Handle to an anchor service implementation.
pub type AnchorServiceHandle = Arc<dyn AnchorService + Send + Sync>;
/// Handle to a visualizer factory implementation.
pub type VisualizerFactoryHandle = Arc<dyn VisualizerFactory + Send + Sync>;
/// Handle to a tracking runtime implementation.
pub type TrackingRuntimeHandle = Arc<dyn TrackingRuntime + Send + Sync>;
