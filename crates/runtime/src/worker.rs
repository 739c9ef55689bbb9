//! Background worker that owns the optimization run.
//!
//! One task, one run at a time. Commands arrive on an mpsc channel; events
//! leave on a broadcast channel. Between characters the worker polls for a
//! newer command: any arrival preempts the in-flight run, its partial state
//! is dropped, and the new command is processed instead. Within a character
//! the search always runs to completion, which keeps cancellation
//! cooperative at exactly the granularity the engine commits state.

use tokio::sync::{broadcast, mpsc};
use tokio::sync::mpsc::error::TryRecvError;

use optimizer_core::{
    reoptimize_character, AssignmentRun, CharacterId, ModAssignment, ProfileSnapshot,
};

use crate::events::{OptimizerEvent, ProgressUpdate};

/// Commands accepted by the worker.
#[derive(Debug, Clone)]
pub enum Command {
    /// Start a full run over the snapshot's selected characters.
    StartRun { snapshot: ProfileSnapshot },

    /// Re-optimize a single character against a committed assignment list.
    Reoptimize {
        snapshot: ProfileSnapshot,
        previous: Vec<ModAssignment>,
        character: CharacterId,
    },

    /// Cancel the in-flight run, if any.
    CancelRun,
}

/// Worker that executes runs and publishes events.
pub struct OptimizerWorker {
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<OptimizerEvent>,
}

impl OptimizerWorker {
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<OptimizerEvent>,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop. Exits when every command sender is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            let mut next = Some(command);
            while let Some(command) = next.take() {
                next = self.handle_command(command).await;
            }
        }
    }

    /// Processes one command; returns a command that preempted it, if any.
    async fn handle_command(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::StartRun { snapshot } => self.execute_run(snapshot).await,
            Command::Reoptimize {
                snapshot,
                previous,
                character,
            } => {
                self.execute_reoptimize(&snapshot, &previous, &character);
                None
            }
            Command::CancelRun => None,
        }
    }

    async fn execute_run(&mut self, snapshot: ProfileSnapshot) -> Option<Command> {
        let mut run = match AssignmentRun::new(&snapshot) {
            Ok(run) => run,
            Err(error) => {
                tracing::warn!(%error, "optimization run rejected");
                self.publish(OptimizerEvent::Failed {
                    message: error.to_string(),
                });
                return None;
            }
        };

        let total = run.total_characters();
        tracing::info!(characters = total, "optimization run started");
        self.progress(None, "preparing", 0);

        while !run.is_complete() {
            // Preemption check between characters, never mid-search. A
            // disconnected channel is a graceful shutdown: the run still
            // finishes and the worker exits afterwards.
            match self.command_rx.try_recv() {
                Ok(command) => {
                    tracing::info!("optimization run preempted");
                    self.publish(OptimizerEvent::Cancelled);
                    return Some(command);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }

            let character = run.next_character().cloned();
            let percent = (run.completed_characters() * 100 / total.max(1)) as u8;
            self.progress(character, "optimizing", percent);

            let assignment = run.step().expect("queue not exhausted");
            tracing::debug!(
                character = %assignment.character_id,
                mods = assignment.assigned_mods.len(),
                missed_goals = assignment.missed_goals.len(),
                "character committed"
            );

            // Let other tasks breathe between characters.
            tokio::task::yield_now().await;
        }

        self.progress(None, "finalizing", 100);
        self.publish(OptimizerEvent::Finished {
            assignments: run.into_assignments(),
        });
        tracing::info!("optimization run finished");
        None
    }

    fn execute_reoptimize(
        &mut self,
        snapshot: &ProfileSnapshot,
        previous: &[ModAssignment],
        character: &CharacterId,
    ) {
        self.progress(Some(character.clone()), "optimizing", 0);
        match reoptimize_character(snapshot, previous, character) {
            Ok(assignments) => {
                self.progress(None, "finalizing", 100);
                self.publish(OptimizerEvent::Finished { assignments });
            }
            Err(error) => {
                tracing::warn!(%error, %character, "re-optimization rejected");
                self.publish(OptimizerEvent::Failed {
                    message: error.to_string(),
                });
            }
        }
    }

    fn progress(&self, character: Option<CharacterId>, step: &str, progress: u8) {
        self.publish(OptimizerEvent::Progress(ProgressUpdate {
            character,
            step: step.to_owned(),
            progress,
        }));
    }

    fn publish(&self, event: OptimizerEvent) {
        // No subscribers is normal, not an error.
        if self.event_tx.send(event).is_err() {
            tracing::trace!("no subscribers for optimizer event");
        }
    }
}
