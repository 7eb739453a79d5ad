use dds_core::{DealError, PbnError};
use dds_engine::{PlayError, PositionError};
use thiserror::Error;

/// Failures setting up or driving an execution context
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("cannot start {backend} backend: {reason}")]
    BackendInit { backend: String, reason: String },

    #[error("execution context has been shut down")]
    ShutDown,
}

/// Failure of one solve request. Siblings in a batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("invalid deal: {0}")]
    Deal(#[from] DealError),

    #[error("invalid PBN: {0}")]
    Pbn(#[from] PbnError),

    #[error("invalid position: {0}")]
    Position(#[from] PositionError),

    #[error("illegal play: {0}")]
    Play(#[from] PlayError),

    #[error("solver task panicked: {0}")]
    TaskPanicked(String),

    #[error("task was abandoned")]
    Abandoned,

    #[error("task was refused by the execution context")]
    Rejected,
}
