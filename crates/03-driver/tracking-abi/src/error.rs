use thiserror::Error;

use crate::{EntityId, SessionHandle};

pub type SessionResult<T> = Result<T, SessionError>;

/// The visualizer factory has no prefab registered for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no visualizer prefab registered for entity {id}")]
pub struct FactoryLookupError {
    pub id: EntityId,
}

/// Failure reported by the tracking runtime while tearing down or creating a session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("tracking session {0} still holds native resources")]
    ResourceBusy(SessionHandle),

    #[error("tracking runtime rejected the session configuration: {0}")]
    Rejected(String),

    #[error("tracking runtime unavailable: {0}")]
    Unavailable(String),
}

impl SessionError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        SessionError::Rejected(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        SessionError::Unavailable(msg.into())
    }
}
