//! Events emitted on the progress channel.

use serde::{Deserialize, Serialize};

use optimizer_core::{CharacterId, ModAssignment};

/// A discrete progress report, emitted at character-boundary granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// The character about to be processed; `None` for run-level phases.
    pub character: Option<CharacterId>,

    /// Short phase label ("preparing", "optimizing", "finalizing").
    pub step: String,

    /// Completion percentage, 0..=100.
    pub progress: u8,
}

/// Everything a subscriber can observe about a run.
///
/// A run emits any number of `Progress` events and ends with exactly one of
/// `Finished` or `Failed` — unless it is preempted, in which case a single
/// `Cancelled` marks the discarded run and no terminal event follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptimizerEvent {
    Progress(ProgressUpdate),

    /// Terminal success, carrying the full assignment list.
    Finished { assignments: Vec<ModAssignment> },

    /// Terminal failure; the host must not apply any assignment.
    Failed { message: String },

    /// The in-flight run was cancelled or replaced. Not an error and not a
    /// terminal success: previously committed state is untouched.
    Cancelled,
}

impl OptimizerEvent {
    /// Whether this event ends a run's event stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OptimizerEvent::Finished { .. } | OptimizerEvent::Failed { .. }
        )
    }
}
