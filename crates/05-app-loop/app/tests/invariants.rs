//! Property checks over random snapshot and reset sequences.

use app::Engine;
use hub::{EntityId, Pose, TrackedEntity, TrackingState};
use mock::{image_config, make_rig};
use proptest::collection;
use proptest::prelude::*;
use std::collections::BTreeMap;

const IDS: EntityId = 6;
/// Identity without a registered prefab.
const UNREGISTERED: EntityId = 5;

#[derive(Clone, Debug)]
enum Op {
    Frame(BTreeMap<EntityId, TrackingState>),
    Reset,
}

fn state() -> impl Strategy<Value = TrackingState> {
    prop_oneof![
        Just(TrackingState::Tracking),
        Just(TrackingState::Paused),
        Just(TrackingState::Stopped),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        9 => collection::btree_map(0..IDS, state(), 0..5).prop_map(Op::Frame),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    /// Records, live visualizers, live anchors, and the anchor registry stay in
    /// one-to-one correspondence, and the signal matches the last known states.
    #[test]
    fn bookkeeping_matches_collaborators(ops in collection::vec(op(), 1..60)) {
        let rig = make_rig(0..UNREGISTERED);
        let mut engine = Engine::start(rig.hub.clone(), image_config(IDS as usize)).expect("start");
        let mut last_known: BTreeMap<EntityId, TrackingState> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Frame(entries) => {
                    let snapshot: Vec<_> = entries
                        .iter()
                        .map(|(id, state)| TrackedEntity {
                            id: *id,
                            state: *state,
                            center_pose: Pose::IDENTITY,
                        })
                        .collect();
                    last_known.extend(entries);
                    let tracking = engine.reconcile(&snapshot);

                    let expected = engine
                        .state()
                        .records()
                        .any(|(id, _)| last_known.get(&id) == Some(&TrackingState::Tracking));
                    prop_assert_eq!(tracking, expected);
                    prop_assert!(engine.state().record(UNREGISTERED).is_none());
                }
                Op::Reset => {
                    engine.reset().expect("reset");
                    last_known.clear();
                    prop_assert!(engine.state().is_empty());
                }
            }

            for id in 0..IDS {
                prop_assert!(rig.prefabs.live_for(id).len() <= 1);
            }
            prop_assert_eq!(rig.prefabs.live_count(), engine.state().len());
            prop_assert_eq!(rig.anchors.live_count(), engine.state().anchors().len());
            for (id, record) in engine.state().records() {
                prop_assert!(engine.state().anchors().contains(&record.anchor));
                prop_assert_eq!(rig.prefabs.live(record.visualizer).map(|vis| vis.id), Some(id));
            }
        }
    }
}
