//! engine::plan
//!
//! What a command does, as data.
//!
//! # Architecture
//!
//! Interpreting a command never sleeps and never publishes anything. It
//! produces a [`Plan`]: the cosmetic pacing (delays and intermediate
//! progress lines), an optional interim snapshot to show while the steps
//! run, and the final [`Outcome`]. The session replays the steps through
//! its pacer and then installs the outcome.
//!
//! # Invariants
//!
//! - Only the outcome is durable; progress lines and the interim snapshot
//!   are display-only
//! - A rejected or read-only plan carries the very same `Arc` it was
//!   given, so callers can detect "no change" by pointer identity
//! - Rejections have no steps
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use git_playground::core::state::{RepoState, Template};
//! use git_playground::core::types::UtcTimestamp;
//! use git_playground::engine::plan::{Plan, PlanStep};
//! use git_playground::engine::transcript::Transcript;
//!
//! let state = Arc::new(RepoState::initial(&Template::default(), UtcTimestamp::now()));
//! let plan = Plan::steps()
//!     .wait(800)
//!     .progress("Adding all changes to staging area...")
//!     .wait(400)
//!     .finish(Arc::clone(&state), Transcript::line("Changes staged successfully"));
//!
//! assert_eq!(plan.steps.len(), 3);
//! assert_eq!(plan.total_delay().as_millis(), 1200);
//! ```

use std::sync::Arc;
use std::time::Duration;

use super::errors::CommandError;
use super::transcript::Transcript;
use crate::core::state::RepoState;

/// One pacing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// Simulated latency.
    Wait(Duration),
    /// An intermediate line shown while the command runs.
    Progress(String),
}

/// The durable result of a command.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: Arc<RepoState>,
    pub transcript: Transcript,
}

/// A fully interpreted command, ready to be paced and published.
#[derive(Debug, Clone)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    /// Snapshot to publish before the steps run (busy flags set).
    pub interim: Option<Arc<RepoState>>,
    pub outcome: Outcome,
}

impl Plan {
    /// Start building a plan.
    pub fn steps() -> PlanBuilder {
        PlanBuilder::default()
    }

    /// A plan with no pacing that keeps `state`.
    pub fn unchanged(state: &Arc<RepoState>, transcript: Transcript) -> Self {
        Self {
            steps: Vec::new(),
            interim: None,
            outcome: Outcome {
                state: Arc::clone(state),
                transcript,
            },
        }
    }

    /// A rejected command: `Error: ...`, no pacing, same state.
    pub fn rejected(state: &Arc<RepoState>, err: CommandError) -> Self {
        Self::unchanged(state, err.into())
    }

    /// Sum of all waits.
    pub fn total_delay(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| match step {
                PlanStep::Wait(d) => *d,
                PlanStep::Progress(_) => Duration::ZERO,
            })
            .sum()
    }

    /// Progress lines in order.
    pub fn progress_lines(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Progress(line) => Some(line.as_str()),
            PlanStep::Wait(_) => None,
        })
    }
}

/// Builder for [`Plan`].
#[derive(Debug, Default)]
pub struct PlanBuilder {
    steps: Vec<PlanStep>,
    interim: Option<Arc<RepoState>>,
}

impl PlanBuilder {
    /// Add a delay in milliseconds.
    pub fn wait(mut self, millis: u64) -> Self {
        self.steps.push(PlanStep::Wait(Duration::from_millis(millis)));
        self
    }

    pub fn progress(mut self, line: impl Into<String>) -> Self {
        self.steps.push(PlanStep::Progress(line.into()));
        self
    }

    pub fn interim(mut self, state: RepoState) -> Self {
        self.interim = Some(Arc::new(state));
        self
    }

    pub fn finish(self, state: Arc<RepoState>, transcript: Transcript) -> Plan {
        Plan {
            steps: self.steps,
            interim: self.interim,
            outcome: Outcome { state, transcript },
        }
    }
}
