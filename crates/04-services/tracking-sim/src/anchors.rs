use log::trace;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracking_abi::{AnchorHandle, AnchorService, AnchorServiceHandle, Pose};

/// Anchor service that keeps every live anchor and its pose in memory.
#[derive(Default)]
pub struct SimAnchors {
    next_id: AtomicU64,
    live: Mutex<BTreeMap<AnchorHandle, Pose>>,
    released: Mutex<Vec<AnchorHandle>>,
}

impl SimAnchors {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Upcasts a shared instance into the handle type the hub stores.
    pub fn handle(self: &Arc<Self>) -> AnchorServiceHandle {
        Arc::clone(self) as AnchorServiceHandle
    }

    /// Total anchors created since construction.
    pub fn created_count(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Anchors released so far, in release order.
    pub fn released(&self) -> Vec<AnchorHandle> {
        self.released.lock().clone()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    pub fn is_live(&self, handle: AnchorHandle) -> bool {
        self.live.lock().contains_key(&handle)
    }

    /// Pose the anchor was created at, while it is live.
    pub fn pose(&self, handle: AnchorHandle) -> Option<Pose> {
        self.live.lock().get(&handle).copied()
    }
}

impl AnchorService for SimAnchors {
    fn create_anchor(&self, pose: &Pose) -> AnchorHandle {
        let handle = AnchorHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.live.lock().insert(handle, *pose);
        trace!("sim: created {handle} at {:?}", pose.position);
        handle
    }

    fn release_anchor(&self, handle: AnchorHandle) {
        let was_live = self.live.lock().remove(&handle).is_some();
        assert!(was_live, "{handle} released twice or never issued");
        self.released.lock().push(handle);
        trace!("sim: released {handle}");
    }
}
