//! Health tracking for session loss and recovery flows.
//!
//! The engine surfaces coarse health flags so the UI can tell "tracking is
//! temporarily lost, keep scanning" apart from "the session is gone, ask the
//! user to reset". A failed reset latches `fatal` until a later reset succeeds.

use hub::SessionStatus;

/// Latch-style health indicators exported to the UI layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HealthFlags {
    /// True while the runtime reports a session status other than `Tracking`.
    pub session_lost: bool,
    /// True when the last reset failed and no session is active.
    pub fatal: bool,
}

/// Aggregates health flags with reset-failure bookkeeping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Snapshot of coarse health flags.
    pub flags: HealthFlags,
    /// Resets that failed since the last successful one.
    pub failed_resets: u8,
}

impl Health {
    /// Updates `session_lost` from the status polled at the start of a frame.
    pub fn observe_status(&mut self, status: SessionStatus) {
        self.flags.session_lost = status != SessionStatus::Tracking;
    }

    /// Marks the engine as sessionless after a failed reset.
    pub fn record_failed_reset(&mut self) {
        self.flags.fatal = true;
        self.failed_resets = self.failed_resets.saturating_add(1);
    }

    /// Clears every flag after a successful reset.
    pub fn clear_on_reset(&mut self) {
        *self = Self::default();
    }
}
