//! Host errors

use std::fmt;

/// Construction step that acquires a VM resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    /// Runtime (heap) creation
    Runtime,
    /// Context, global object and standard classes
    Context,
    /// Reserved namespace object on the global
    Namespace,
    /// Console API
    Console,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::Runtime => "runtime",
            InitStage::Context => "context",
            InitStage::Namespace => "namespace",
            InitStage::Console => "console",
        };
        f.write_str(name)
    }
}

/// Scripting host error
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not create {stage}: {reason}")]
    Initialization { stage: InitStage, reason: String },

    #[error("JavaScript error: {0}")]
    Evaluation(String),
}

impl HostError {
    pub(crate) fn init(stage: InitStage, err: impl fmt::Display) -> Self {
        HostError::Initialization {
            stage,
            reason: err.to_string(),
        }
    }

    /// Stage that failed, for initialization errors
    pub fn stage(&self) -> Option<InitStage> {
        match self {
            HostError::Initialization { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
