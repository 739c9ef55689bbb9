//! High-level optimizer assembly.
//!
//! [`Optimizer`] owns the background worker, wires up the command and event
//! channels, and hands out cloneable [`OptimizerHandle`]s. It replaces the
//! mutable "active worker" global of the original application: whoever owns
//! this value owns the run, and dropping it shuts the worker down.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::errors::{Result, RuntimeError};
use crate::events::OptimizerEvent;
use crate::handle::OptimizerHandle;
use crate::worker::OptimizerWorker;

/// Channel sizing for the optimizer.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 128,
            command_buffer_size: 16,
        }
    }
}

/// Owns the background worker task and its channels.
pub struct Optimizer {
    handle: OptimizerHandle,
    worker_handle: JoinHandle<()>,
}

impl Optimizer {
    /// Spawns the worker with default channel sizes.
    pub fn spawn() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    /// Spawns the worker with explicit channel sizes.
    pub fn with_config(config: OptimizerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let (event_tx, _) = broadcast::channel(config.event_buffer_size);

        let worker = OptimizerWorker::new(command_rx, event_tx.clone());
        let worker_handle = tokio::spawn(worker.run());

        Self {
            handle: OptimizerHandle::new(command_tx, event_tx),
            worker_handle,
        }
    }

    /// A cloneable handle for clients and other tasks.
    pub fn handle(&self) -> OptimizerHandle {
        self.handle.clone()
    }

    /// Subscribes to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<OptimizerEvent> {
        self.handle.subscribe()
    }

    /// Shuts the worker down gracefully: closes the command channel and
    /// waits for the task to drain.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}
