//! Session reset: tear everything down, then rebuild the tracking session.
//!
//! The runtime cannot reconfigure a live session in place, so a reset destroys
//! every visualizer and anchor, empties the reconciliation state, closes the
//! session, and opens a new one with the startup configuration. State is empty
//! before the runtime is touched, so a runtime failure leaves nothing half
//! built behind and the reset can simply be retried. A session whose teardown
//! failed is parked outside the active slot and closed again by the retry, so
//! the runtime never holds more than one session.

use crate::overlay::OverlayMode;
use crate::Engine;
use hub::{SessionHandle, SessionResult};
use log::{error, info};

impl Engine {
    /// Resets the tracking session and all reconciliation state.
    ///
    /// On error no session is active and the state is empty; the caller may
    /// retry `reset` or give up. If closing the old session failed, the retry
    /// closes it before opening a new one.
    pub fn reset(&mut self) -> SessionResult<SessionHandle> {
        self.overlay = OverlayMode::FindImage;

        let mut destroyed = 0usize;
        for (_, record) in self.state.records() {
            self.hub.destroy_visualizer(record.visualizer);
            destroyed += 1;
        }
        for anchor in self.state.anchors() {
            self.hub.release_anchor(*anchor);
        }
        let teardown = self.state.take_all();
        debug_assert_eq!(teardown.records.len(), destroyed);

        let old = self.session.take().or_else(|| self.pending_teardown.take());
        if let Some(old) = old {
            if let Err(err) = self.hub.close_session(old) {
                error!("reset: failed to tear down {old}: {err}");
                self.pending_teardown = Some(old);
                self.health.record_failed_reset();
                return Err(err);
            }
        }

        match self.hub.open_session(&self.config) {
            Ok(session) => {
                self.session = Some(session);
                self.state.stats.resets += 1;
                self.health.clear_on_reset();
                info!(
                    "reset: destroyed {destroyed} visualizer(s), released {} anchor(s), now on {session}",
                    teardown.anchors.len()
                );
                Ok(session)
            }
            Err(err) => {
                error!("reset: failed to create a new tracking session: {err}");
                self.health.record_failed_reset();
                Err(err)
            }
        }
    }
}
