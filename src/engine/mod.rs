// ABOUTME: Container engine identity, detection, and local image inspection.
// ABOUTME: The engine is an external binary (podman, docker) invoked as a subprocess.

mod detection;
mod inspect;

pub use detection::{DetectionError, detect_engine, find_on_path};
pub use inspect::{InspectError, LocalCatalog, list_local_images};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the external container engine binary used to build subprocess
/// commands. Any binary with a docker-compatible CLI works; it only has
/// to exist when a command is actually run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerEngine(String);

impl ContainerEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self(binary.into())
    }

    pub fn binary(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerEngine {
    fn from(binary: &str) -> Self {
        Self::new(binary)
    }
}
