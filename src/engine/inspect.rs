// ABOUTME: Local image catalog inspection via the engine's listing command.
// ABOUTME: Runs `<engine> images --format {{.Repository}}:{{.Tag}}` and parses the lines.

use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

use super::ContainerEngine;

/// Go-template format shared by podman and docker for `images`.
const LIST_FORMAT: &str = "{{.Repository}}:{{.Tag}}";

/// Error while querying the local image catalog.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("container engine not found: {0}")]
    EngineNotFound(String),

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: io::Error,
    },

    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
}

/// The engine's local image catalog as `repository:tag` entries.
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    entries: Vec<String>,
}

impl LocalCatalog {
    /// Exact `repository:tag` match against the catalog.
    pub fn contains(&self, repository: &str, tag: &str) -> bool {
        let needle = format!("{repository}:{tag}");
        self.entries.iter().any(|entry| *entry == needle)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// List locally cached images by shelling out to the engine.
///
/// A missing engine binary is a configuration problem and is reported as
/// [`InspectError::EngineNotFound`]; any other failure means the catalog
/// could not be read.
pub fn list_local_images(engine: &ContainerEngine) -> Result<LocalCatalog, InspectError> {
    let command = format!("{} images --format {LIST_FORMAT}", engine.binary());
    debug!(%command, "listing local images");

    let output = Command::new(engine.binary())
        .args(["images", "--format", LIST_FORMAT])
        .stdin(Stdio::null())
        .output()
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                InspectError::EngineNotFound(engine.binary().to_string())
            } else {
                InspectError::Spawn {
                    command: command.clone(),
                    source,
                }
            }
        })?;

    if !output.status.success() {
        return Err(InspectError::CommandFailed {
            command,
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let entries: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    debug!(count = entries.len(), "local catalog listed");
    Ok(LocalCatalog { entries })
}
