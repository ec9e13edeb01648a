use log::{debug, trace};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracking_abi::{
    AnchorHandle, EntityId, FactoryLookupError, VisualizerFactory, VisualizerFactoryHandle,
    VisualizerHandle,
};

/// Visual instance currently alive in the simulated scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveVisualizer {
    pub id: EntityId,
    pub anchor: AnchorHandle,
}

/// Visualizer factory backed by a table of prefab names keyed by entity id.
#[derive(Default)]
pub struct PrefabRegistry {
    prefabs: Mutex<BTreeMap<EntityId, String>>,
    next_id: AtomicU64,
    live: Mutex<BTreeMap<VisualizerHandle, LiveVisualizer>>,
    destroyed: Mutex<Vec<VisualizerHandle>>,
    lookup_failures: AtomicU64,
}

impl PrefabRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registry with a generically named prefab for each id.
    pub fn with_prefabs(ids: impl IntoIterator<Item = EntityId>) -> Arc<Self> {
        let registry = Self::default();
        for id in ids {
            registry.register(id, format!("prefab-{id}"));
        }
        Arc::new(registry)
    }

    pub fn handle(self: &Arc<Self>) -> VisualizerFactoryHandle {
        Arc::clone(self) as VisualizerFactoryHandle
    }

    /// Registers (or replaces) the prefab used for `id`.
    pub fn register(&self, id: EntityId, name: impl Into<String>) {
        let name = name.into();
        debug!("sim: registered prefab {name:?} for entity {id}");
        self.prefabs.lock().insert(id, name);
    }

    pub fn unregister(&self, id: EntityId) -> Option<String> {
        self.prefabs.lock().remove(&id)
    }

    pub fn instantiated_count(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    pub fn destroyed(&self) -> Vec<VisualizerHandle> {
        self.destroyed.lock().clone()
    }

    pub fn lookup_failures(&self) -> u64 {
        self.lookup_failures.load(Ordering::Relaxed)
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Live instances showing `id`. More than one means the engine leaked a duplicate.
    pub fn live_for(&self, id: EntityId) -> Vec<VisualizerHandle> {
        self.live
            .lock()
            .iter()
            .filter(|(_, vis)| vis.id == id)
            .map(|(handle, _)| *handle)
            .collect()
    }

    pub fn live(&self, handle: VisualizerHandle) -> Option<LiveVisualizer> {
        self.live.lock().get(&handle).copied()
    }
}

impl VisualizerFactory for PrefabRegistry {
    fn instantiate(
        &self,
        id: EntityId,
        anchor: AnchorHandle,
    ) -> Result<VisualizerHandle, FactoryLookupError> {
        if !self.prefabs.lock().contains_key(&id) {
            self.lookup_failures.fetch_add(1, Ordering::Relaxed);
            return Err(FactoryLookupError { id });
        }
        let handle = VisualizerHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.live.lock().insert(handle, LiveVisualizer { id, anchor });
        trace!("sim: instantiated {handle} for entity {id} under {anchor}");
        Ok(handle)
    }

    fn destroy(&self, handle: VisualizerHandle) {
        let was_live = self.live.lock().remove(&handle).is_some();
        assert!(was_live, "{handle} destroyed twice or never issued");
        self.destroyed.lock().push(handle);
        trace!("sim: destroyed {handle}");
    }
}
