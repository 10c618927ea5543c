// ABOUTME: Application-wide error types for pullman.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::DetectionError;
use crate::puller::PullerError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("no image given (pass one on the command line or set `image` in pullman.yml)")]
    MissingImage,

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Puller(#[from] PullerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
