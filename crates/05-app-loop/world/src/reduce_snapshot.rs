//! Pure snapshot reducer: plans spawn/despawn transitions for one frame.

use crate::types::{Transition, Transitions};
use crate::world::ReconciliationState;
use log::trace;
use std::collections::HashSet;
use tracking_abi::{TrackedEntity, TrackingState};

/// Trait for turning a tracking snapshot into visualizer transitions.
pub trait SnapshotReducer {
    /// Refreshes the entity-state view from `snapshot` and returns the
    /// transitions needed to bring visualizers in line with it.
    ///
    /// The snapshot must not report the same identity twice.
    fn reduce_snapshot(&mut self, snapshot: &[TrackedEntity]) -> Transitions;
}

impl SnapshotReducer for ReconciliationState {
    fn reduce_snapshot(&mut self, snapshot: &[TrackedEntity]) -> Transitions {
        debug_assert!(
            has_unique_ids(snapshot),
            "snapshot reports an identity more than once"
        );

        self.stats.frames = self.stats.frames.saturating_add(1);
        self.stats.last_snapshot_len = snapshot.len();

        let mut transitions = Transitions::new();
        for entity in snapshot {
            let recorded = self.contains(entity.id);
            match entity.state {
                TrackingState::Tracking if !recorded => {
                    trace!("entity {} started tracking", entity.id);
                    transitions.push(Transition::Spawn {
                        id: entity.id,
                        pose: entity.center_pose,
                    });
                }
                TrackingState::Stopped if recorded => {
                    trace!("entity {} stopped", entity.id);
                    transitions.push(Transition::Despawn { id: entity.id });
                }
                TrackingState::Tracking | TrackingState::Paused | TrackingState::Stopped => {}
            }
            self.observe(entity);
        }
        transitions
    }
}

fn has_unique_ids(snapshot: &[TrackedEntity]) -> bool {
    let mut seen = HashSet::with_capacity(snapshot.len());
    snapshot.iter().all(|entity| seen.insert(entity.id))
}
