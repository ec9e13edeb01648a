//! Reconciliation state owned by the engine.

use crate::types::VisualizerRecord;
use std::collections::{BTreeMap, HashMap};
use tracking_abi::{AnchorHandle, EntityId, TrackedEntity, TrackingState};

/// Cumulative counters; they survive resets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Reconciliation passes run.
    pub frames: u64,
    /// Entities in the most recent snapshot.
    pub last_snapshot_len: usize,
    pub created: u64,
    pub destroyed: u64,
    pub lookup_failures: u64,
    /// Successful session resets.
    pub resets: u64,
}

/// Everything removed from the state by [`ReconciliationState::take_all`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Teardown {
    /// Records in ascending identity order.
    pub records: Vec<(EntityId, VisualizerRecord)>,
    /// Anchor registry in registration order.
    pub anchors: Vec<AnchorHandle>,
}

/// Identity→visualizer map, anchor registry, and the live entity-state view.
///
/// Records are keyed by entity identity, so at most one can exist per identity.
/// Anchors are additionally kept in a flat registry for bulk teardown. The
/// state view holds the latest state reported for each entity and is what the
/// aggregate tracking signal is computed from; records refer to it by identity
/// rather than keeping their own copy.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconciliationState {
    records: BTreeMap<EntityId, VisualizerRecord>,
    anchors: Vec<AnchorHandle>,
    observed: HashMap<EntityId, TrackingState>,
    /// Cumulative counters.
    pub stats: ReconcileStats,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no record, anchor, or observed state is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.anchors.is_empty() && self.observed.is_empty()
    }

    /// Number of live visualizer records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, id: EntityId) -> Option<&VisualizerRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    /// Records in ascending identity order.
    pub fn records(&self) -> impl Iterator<Item = (EntityId, &VisualizerRecord)> + '_ {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Anchor registry in registration order.
    pub fn anchors(&self) -> &[AnchorHandle] {
        &self.anchors
    }

    /// Latest state reported for `id`, if it has been seen since the last reset.
    pub fn current_state(&self, id: EntityId) -> Option<TrackingState> {
        self.observed.get(&id).copied()
    }

    /// Refreshes the state view from a snapshot entry. Stopped entities leave
    /// the view since their identity will not be reported again.
    pub fn observe(&mut self, entity: &TrackedEntity) {
        match entity.state {
            TrackingState::Stopped => {
                self.observed.remove(&entity.id);
            }
            state => {
                self.observed.insert(entity.id, state);
            }
        }
    }

    /// Inserts a record and registers its anchor.
    ///
    /// # Panics
    ///
    /// Panics if `id` already has a record.
    pub fn insert_record(&mut self, id: EntityId, record: VisualizerRecord) {
        let previous = self.records.insert(id, record);
        assert!(
            previous.is_none(),
            "entity {id} already has a visualizer record"
        );
        self.anchors.push(record.anchor);
    }

    /// Removes the record for `id` and drops its anchor from the registry.
    pub fn remove_record(&mut self, id: EntityId) -> Option<VisualizerRecord> {
        let record = self.records.remove(&id)?;
        self.anchors.retain(|anchor| *anchor != record.anchor);
        Some(record)
    }

    /// Whether any recorded entity is `Tracking` according to the state view.
    pub fn any_tracking(&self) -> bool {
        self.records
            .keys()
            .any(|id| self.current_state(*id) == Some(TrackingState::Tracking))
    }

    /// Empties the records, the anchor registry, and the state view, returning
    /// what was held so the caller can release it. Counters are kept.
    pub fn take_all(&mut self) -> Teardown {
        self.observed.clear();
        Teardown {
            records: std::mem::take(&mut self.records).into_iter().collect(),
            anchors: std::mem::take(&mut self.anchors),
        }
    }
}
