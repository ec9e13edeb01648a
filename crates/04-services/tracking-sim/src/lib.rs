//! In-memory tracking collaborators.
//!
//! These stand in for the native tracking runtime so the engine can be driven
//! deterministically from tests and the replay CLI. Every service counts the
//! calls it receives and exposes the live set of handles it has issued, which
//! is what the engine's invariants are checked against.

mod anchors;
mod prefabs;
mod runtime;
mod source;

pub use crate::anchors::SimAnchors;
pub use crate::prefabs::{LiveVisualizer, PrefabRegistry};
pub use crate::runtime::SimRuntime;
pub use crate::source::ScriptedSource;
