//! Mock tracking rig: simulated collaborators wired into a hub.

use hub::{TrackingHub, TrackingHubBuilder};
use std::sync::Arc;
use tracking_abi::{EntityId, ReferenceImage, SessionConfig};
use tracking_sim::{PrefabRegistry, SimAnchors, SimRuntime};

/// Hub plus direct access to the simulated collaborators behind it.
#[derive(Clone)]
pub struct Rig {
    pub hub: TrackingHub,
    pub anchors: Arc<SimAnchors>,
    pub prefabs: Arc<PrefabRegistry>,
    pub runtime: Arc<SimRuntime>,
}

/// Creates a rig with a prefab registered for each id in `prefab_ids`.
pub fn make_rig(prefab_ids: impl IntoIterator<Item = EntityId>) -> Rig {
    make_rig_with_runtime(prefab_ids, SimRuntime::new())
}

/// Creates a rig around a caller-supplied runtime, e.g. one that starts `Initializing`.
pub fn make_rig_with_runtime(
    prefab_ids: impl IntoIterator<Item = EntityId>,
    runtime: Arc<SimRuntime>,
) -> Rig {
    let anchors = SimAnchors::new();
    let prefabs = PrefabRegistry::with_prefabs(prefab_ids);
    let hub = TrackingHubBuilder::new()
        .anchors(anchors.handle())
        .visualizers(prefabs.handle())
        .runtime(runtime.handle())
        .build()
        .expect("mock hub build");
    Rig {
        hub,
        anchors,
        prefabs,
        runtime,
    }
}

/// Session configuration with `count` generically named reference images.
pub fn image_config(count: usize) -> SessionConfig {
    SessionConfig::new(
        (0..count)
            .map(|idx| ReferenceImage::named(format!("image-{idx}")))
            .collect(),
    )
}
