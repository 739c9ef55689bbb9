//! Cloneable façade for issuing commands to the optimizer.
//!
//! [`OptimizerHandle`] hides the channel plumbing: commands go in over the
//! worker's mpsc channel, events come back over the broadcast channel.
//! Starting a run while another is in flight preempts it — the worker
//! discards the old run's partial state and no partial assignments surface.

use tokio::sync::{broadcast, mpsc};

use optimizer_core::{CharacterId, ModAssignment, ProfileSnapshot};

use crate::errors::{Result, RuntimeError};
use crate::events::OptimizerEvent;
use crate::worker::Command;

/// Client-facing handle to a spawned optimizer.
#[derive(Clone)]
pub struct OptimizerHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<OptimizerEvent>,
}

impl OptimizerHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<OptimizerEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    /// Starts a full optimization run, preempting any run in flight.
    pub async fn start_run(&self, snapshot: ProfileSnapshot) -> Result<()> {
        self.send(Command::StartRun { snapshot }).await
    }

    /// Re-optimizes one character against a committed assignment list.
    pub async fn reoptimize(
        &self,
        snapshot: ProfileSnapshot,
        previous: Vec<ModAssignment>,
        character: CharacterId,
    ) -> Result<()> {
        self.send(Command::Reoptimize {
            snapshot,
            previous,
            character,
        })
        .await
    }

    /// Cancels the in-flight run, if any. Cooperative: the current
    /// character's search finishes first.
    pub async fn cancel(&self) -> Result<()> {
        self.send(Command::CancelRun).await
    }

    /// Subscribes to the progress/terminal event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<OptimizerEvent> {
        self.event_tx.subscribe()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
