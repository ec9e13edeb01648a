//! Scenario files and the replay loop that feeds them through the engine.

use anyhow::{bail, Context, Result};
use app::{Engine, FrameOutcome};
use hub::{FrameReport, TrackingHub};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracking_abi::{EntityId, SessionConfig, SessionError, SessionStatus, TrackedEntity};
use tracking_sim::{PrefabRegistry, ScriptedSource, SimAnchors, SimRuntime};

/// A replayable sequence of tracking frames and out-of-band events.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub config: SessionConfig,
    /// Prefab names keyed by the entity id they visualize.
    #[serde(default)]
    pub prefabs: BTreeMap<EntityId, String>,
    /// Status new sessions report when created.
    #[serde(default = "default_status")]
    pub initial_status: SessionStatus,
    pub steps: Vec<Step>,
}

fn default_status() -> SessionStatus {
    SessionStatus::Tracking
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// One rendering frame with the entities the provider updated.
    Frame(Vec<TrackedEntity>),
    /// Change the active session's motion-tracking status.
    Status(SessionStatus),
    /// The user pressed the reset button.
    Reset,
    /// Make the next session creation fail with this message.
    FailNextCreate(String),
    /// Make the next session teardown fail with this message.
    FailNextDestroy(String),
}

/// What happened at one step, in a shape fit for text or NDJSON output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepLine {
    pub step: usize,
    pub kind: &'static str,
    pub session: Option<u64>,
    pub fit_to_scan: bool,
    pub tracking: bool,
    pub images: usize,
    pub created: Vec<EntityId>,
    pub destroyed: Vec<EntityId>,
    pub lookup_failures: Vec<EntityId>,
    pub error: Option<String>,
}

impl StepLine {
    fn new(step: usize, kind: &'static str, engine: &Engine) -> Self {
        Self {
            step,
            kind,
            session: engine.session().map(|handle| handle.raw()),
            fit_to_scan: engine.overlay().fit_to_scan_visible(),
            ..Self::default()
        }
    }

    fn with_report(mut self, report: &FrameReport) -> Self {
        self.tracking = report.tracking;
        self.images = report.snapshot_len;
        self.created = report.created().collect();
        self.destroyed = report.destroyed().collect();
        self.lookup_failures = report.lookup_failures().map(|err| err.id).collect();
        self
    }
}

impl Scenario {
    /// Rejects frames the engine must never see, such as one reporting an
    /// identity twice.
    pub fn validate(&self) -> Result<()> {
        for (idx, step) in self.steps.iter().enumerate() {
            if let Step::Frame(entities) = step {
                let mut seen = BTreeSet::new();
                for entity in entities {
                    if !seen.insert(entity.id) {
                        bail!("step {idx}: frame reports entity {} more than once", entity.id);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Replays `scenario` against simulated collaborators.
pub fn run(scenario: Scenario) -> Result<Vec<StepLine>> {
    scenario.validate()?;
    let anchors = SimAnchors::new();
    let prefabs = PrefabRegistry::new();
    for (id, name) in &scenario.prefabs {
        prefabs.register(*id, name.clone());
    }
    let runtime = SimRuntime::with_initial_status(scenario.initial_status);
    let hub = TrackingHub::builder()
        .anchors(anchors.handle())
        .visualizers(prefabs.handle())
        .runtime(runtime.handle())
        .build()?;

    let mut engine =
        Engine::start(hub, scenario.config).context("failed to start tracking session")?;
    let mut lines = Vec::with_capacity(scenario.steps.len());

    for (idx, step) in scenario.steps.into_iter().enumerate() {
        debug!("step {idx}: {step:?}");
        let line = match step {
            Step::Frame(entities) => run_frame(idx, &mut engine, entities),
            Step::Status(status) => {
                if let Some(session) = engine.session() {
                    runtime.set_status(session, status);
                }
                StepLine::new(idx, "status", &engine)
            }
            Step::Reset => match engine.reset() {
                Ok(_) => StepLine::new(idx, "reset", &engine),
                Err(err) => StepLine {
                    error: Some(err.to_string()),
                    ..StepLine::new(idx, "reset_failed", &engine)
                },
            },
            Step::FailNextCreate(msg) => {
                runtime.fail_next_create(SessionError::unavailable(msg));
                StepLine::new(idx, "inject", &engine)
            }
            Step::FailNextDestroy(msg) => {
                runtime.fail_next_destroy(SessionError::unavailable(msg));
                StepLine::new(idx, "inject", &engine)
            }
        };
        lines.push(line);
    }

    Ok(lines)
}

fn run_frame(idx: usize, engine: &mut Engine, entities: Vec<TrackedEntity>) -> StepLine {
    let source = ScriptedSource::new();
    source.push_frame(entities);
    match engine.run_frame(&source) {
        FrameOutcome::Reconciled(report) => StepLine::new(idx, "frame", engine).with_report(&report),
        FrameOutcome::Skipped(status) => StepLine {
            error: Some(format!("session status {status:?}")),
            ..StepLine::new(idx, "skipped", engine)
        },
        FrameOutcome::NoSession => StepLine::new(idx, "no_session", engine),
    }
}

/// Parses a scenario from JSON text.
pub fn parse(text: &str) -> Result<Scenario> {
    serde_json::from_str(text).context("invalid scenario JSON")
}
