//! Error types for the harness

use {
    std::{path::PathBuf, time::Duration},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum HarnessError {
    /// The solver wrote to stderr. Its exit code is not consulted.
    #[error("solver failed on {}:\n{stderr}", .path.display())]
    Invocation { path: PathBuf, stderr: String },

    #[error("unparsable solver output for {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("fail to launch solver for {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("solver timed out on {} after {after:?}", .path.display())]
    Timeout { path: PathBuf, after: Duration },

    #[error("cannot summarize group {group}: {reason}")]
    Aggregation { group: String, reason: String },

    #[error(
        "instance {instance} of group {group} is named by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DiscoveryAmbiguity {
        group: String,
        instance: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{} is not valid UTF-8, so it cannot name a group or instance", .path.display())]
    NonUtf8Name { path: PathBuf },

    #[error("file name of {} is not longer than the {suffix_len}-char suffix", .path.display())]
    InstanceName { path: PathBuf, suffix_len: usize },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("task pool is no longer accepting tasks")]
    PoolClosed,

    #[error("a worker panicked: {0}")]
    WorkerPanic(String),

    #[error("result slot {group}/{instance} was written twice")]
    SlotAlreadyWritten { group: String, instance: String },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }

    /// The instance file or directory a failure refers to.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            HarnessError::Invocation { path, .. }
            | HarnessError::Parse { path, .. }
            | HarnessError::Spawn { path, .. }
            | HarnessError::Timeout { path, .. }
            | HarnessError::InstanceName { path, .. }
            | HarnessError::NonUtf8Name { path }
            | HarnessError::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
