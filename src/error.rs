use std::path::PathBuf;

use thiserror::Error;

/// Misuse of a [`StateMachine`](crate::fsm::StateMachine).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FsmError {
    #[error("state `{0}` is already registered")]
    DuplicateState(String),
    #[error("state `{0}` was never registered")]
    UnknownState(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },
    #[error("shader program failed to link: {0}")]
    Link(String),
    #[error("shader source contains a NUL byte")]
    Nul(#[from] std::ffi::NulError),
}

/// Failure while building a scene world.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Fsm(#[from] FsmError),
    #[error("scene hierarchy: {0}")]
    Hierarchy(#[from] hecs::NoSuchEntity),
}
