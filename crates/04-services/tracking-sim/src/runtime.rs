use log::{info, warn};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracking_abi::{
    SessionConfig, SessionError, SessionHandle, SessionResult, SessionStatus, TrackingRuntime,
    TrackingRuntimeHandle,
};

/// Tracking runtime that hands out numbered sessions and can be scripted to fail.
pub struct SimRuntime {
    next_id: AtomicU64,
    initial_status: SessionStatus,
    sessions: Mutex<BTreeMap<SessionHandle, SessionStatus>>,
    configs: Mutex<Vec<SessionConfig>>,
    create_failures: Mutex<VecDeque<SessionError>>,
    destroy_failures: Mutex<VecDeque<SessionError>>,
    destroyed: Mutex<Vec<SessionHandle>>,
}

impl SimRuntime {
    /// Runtime whose sessions report `Tracking` as soon as they are created.
    pub fn new() -> Arc<Self> {
        Self::with_initial_status(SessionStatus::Tracking)
    }

    pub fn with_initial_status(initial_status: SessionStatus) -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(0),
            initial_status,
            sessions: Mutex::new(BTreeMap::new()),
            configs: Mutex::new(Vec::new()),
            create_failures: Mutex::new(VecDeque::new()),
            destroy_failures: Mutex::new(VecDeque::new()),
            destroyed: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> TrackingRuntimeHandle {
        Arc::clone(self) as TrackingRuntimeHandle
    }

    /// Makes the next `create_session` call fail with `err`.
    pub fn fail_next_create(&self, err: SessionError) {
        self.create_failures.lock().push_back(err);
    }

    /// Makes the next `destroy_session` call fail with `err`. The session stays live.
    pub fn fail_next_destroy(&self, err: SessionError) {
        self.destroy_failures.lock().push_back(err);
    }

    pub fn set_status(&self, handle: SessionHandle, status: SessionStatus) {
        if let Some(slot) = self.sessions.lock().get_mut(&handle) {
            *slot = status;
        }
    }

    pub fn live_sessions(&self) -> Vec<SessionHandle> {
        self.sessions.lock().keys().copied().collect()
    }

    pub fn destroyed(&self) -> Vec<SessionHandle> {
        self.destroyed.lock().clone()
    }

    /// Configurations passed to every successful `create_session`, in order.
    pub fn configs(&self) -> Vec<SessionConfig> {
        self.configs.lock().clone()
    }
}

impl TrackingRuntime for SimRuntime {
    fn create_session(&self, config: &SessionConfig) -> SessionResult<SessionHandle> {
        if let Some(err) = self.create_failures.lock().pop_front() {
            warn!("sim: create_session failing on request: {err}");
            return Err(err);
        }
        let handle = SessionHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.sessions.lock().insert(handle, self.initial_status);
        self.configs.lock().push(config.clone());
        info!(
            "sim: created {handle} with {} reference image(s)",
            config.image_database.len()
        );
        Ok(handle)
    }

    fn destroy_session(&self, handle: SessionHandle) -> SessionResult<()> {
        if let Some(err) = self.destroy_failures.lock().pop_front() {
            warn!("sim: destroy_session({handle}) failing on request: {err}");
            return Err(err);
        }
        if self.sessions.lock().remove(&handle).is_none() {
            return Err(SessionError::unavailable(format!("{handle} is not live")));
        }
        self.destroyed.lock().push(handle);
        info!("sim: destroyed {handle}");
        Ok(())
    }

    fn status(&self, handle: SessionHandle) -> SessionStatus {
        self.sessions
            .lock()
            .get(&handle)
            .copied()
            .unwrap_or(SessionStatus::FatalError)
    }
}
