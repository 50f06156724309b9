use std::path::PathBuf;
use std::time::Duration;

use nfsv3_options::NegotiationError;

/// Errors raised while running an external helper program.
#[derive(thiserror::Error, Debug)]
pub enum InvokeError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {output}")]
    Failed {
        program: String,
        status: String,
        output: String,
    },

    #[error("{program} timed out after {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Invocation(#[from] InvokeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid request options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
