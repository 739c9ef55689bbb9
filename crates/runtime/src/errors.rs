//! Unified error types surfaced by the runtime API.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("optimizer worker command channel closed")]
    CommandChannelClosed,

    #[error("optimizer worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
