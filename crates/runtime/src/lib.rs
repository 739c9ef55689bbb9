//! Async orchestration shell around the optimization engine.
//!
//! The engine itself (`optimizer-core`) is pure and synchronous; this crate
//! runs it as a single background computation that communicates only via
//! message passing: one snapshot in, a stream of progress events out, one
//! terminal success-or-error event. Only one run is ever active — starting
//! a new one preempts and discards the old.

pub mod errors;
pub mod events;
pub mod handle;
pub mod optimizer;
pub mod worker;

pub use errors::{Result, RuntimeError};
pub use events::{OptimizerEvent, ProgressUpdate};
pub use handle::OptimizerHandle;
pub use optimizer::{Optimizer, OptimizerConfig};
pub use worker::{Command, OptimizerWorker};
