// ABOUTME: Container engine detection on the local system.
// ABOUTME: Checks PATH for Podman first, then Docker.

use std::env;
use std::path::PathBuf;

use super::ContainerEngine;

/// Error during engine detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container engine found on PATH (checked podman and docker)")]
    NoEngineFound,
}

const KNOWN_ENGINES: &[&str] = &["podman", "docker"];

/// Detect a container engine on the local system.
///
/// Detection order:
/// 1. `podman`
/// 2. `docker`
pub fn detect_engine() -> Result<ContainerEngine, DetectionError> {
    for name in KNOWN_ENGINES {
        if find_on_path(name).is_some() {
            return Ok(ContainerEngine::new(*name));
        }
    }
    Err(DetectionError::NoEngineFound)
}

/// Locate a binary on PATH, returning its full path.
pub fn find_on_path(binary: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}
