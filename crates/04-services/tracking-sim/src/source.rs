use parking_lot::Mutex;
use std::collections::VecDeque;
use tracking_abi::{Snapshot, SnapshotSource, TrackedEntity};

/// Snapshot source that replays a queue of scripted frames, then reports
/// empty snapshots once the script runs out.
#[derive(Default)]
pub struct ScriptedSource {
    frames: Mutex<VecDeque<Snapshot>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame to the script.
    pub fn push_frame(&self, entities: impl IntoIterator<Item = TrackedEntity>) {
        self.frames.lock().push_back(entities.into_iter().collect());
    }

    pub fn remaining(&self) -> usize {
        self.frames.lock().len()
    }
}

impl SnapshotSource for ScriptedSource {
    fn snapshot(&self) -> Snapshot {
        self.frames.lock().pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracking_abi::Pose;

    #[test]
    fn frames_replay_in_order_then_run_dry() {
        let source = ScriptedSource::new();
        source.push_frame([TrackedEntity::tracking(1, Pose::IDENTITY)]);
        source.push_frame([TrackedEntity::stopped(1)]);
        assert_eq!(source.remaining(), 2);

        assert_eq!(
            source.snapshot().as_slice(),
            &[TrackedEntity::tracking(1, Pose::IDENTITY)]
        );
        assert_eq!(source.snapshot().as_slice(), &[TrackedEntity::stopped(1)]);
        assert!(source.snapshot().is_empty());
    }
}
