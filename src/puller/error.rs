// ABOUTME: Puller error types with SNAFU pattern.
// ABOUTME: Unifies configuration, spawn, stream, and pull failures for programmatic handling.

use std::io;

use snafu::Snafu;

use crate::engine::InspectError;

/// Unified error for assessment and pull operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PullerError {
    #[snafu(display("container engine not usable: {source}"))]
    Configuration { source: InspectError },

    #[snafu(display("failed to start `{command}`: {source}"))]
    SpawnPull { command: String, source: io::Error },

    #[snafu(display("failed to read pull output: {source}"))]
    Stream { source: io::Error },

    #[snafu(display("pull failed with exit status {status}"))]
    PullFailed { status: i32, output: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullerErrorKind {
    /// The engine binary is missing or unusable.
    Configuration,
    /// The pull subprocess could not be started.
    Spawn,
    /// The pull subprocess output could not be read.
    Stream,
    /// The pull subprocess exited non-zero.
    PullFailed,
}

impl PullerError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PullerErrorKind {
        match self {
            PullerError::Configuration { .. } => PullerErrorKind::Configuration,
            PullerError::SpawnPull { .. } => PullerErrorKind::Spawn,
            PullerError::Stream { .. } => PullerErrorKind::Stream,
            PullerError::PullFailed { .. } => PullerErrorKind::PullFailed,
        }
    }

    /// Exit status and captured output if this is a pull failure.
    pub fn pull_failure_details(&self) -> Option<(i32, &str)> {
        match self {
            PullerError::PullFailed { status, output } => Some((*status, output)),
            _ => None,
        }
    }
}
