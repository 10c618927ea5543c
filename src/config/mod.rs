// ABOUTME: Configuration types and parsing for pullman.yml.
// ABOUTME: Handles YAML parsing and config file discovery.

mod init;

pub use init::init_config;

use std::path::Path;

use serde::Deserialize;

use crate::engine::ContainerEngine;
use crate::error::{Error, Result};
use crate::types::{ImageRef, PullPolicy};

pub const CONFIG_FILENAME: &str = "pullman.yml";
pub const CONFIG_FILENAME_ALT: &str = "pullman.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Engine binary; auto-detected when omitted.
    #[serde(default)]
    pub engine: Option<ContainerEngine>,

    /// Image reference to manage; may also come from the command line.
    #[serde(default)]
    pub image: Option<ImageRef>,

    #[serde(default)]
    pub pull: PullConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullConfig {
    #[serde(default = "default_policy")]
    pub policy: PullPolicy,

    /// Extra arguments for the pull command, each in shell syntax.
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            arguments: None,
        }
    }
}

fn default_policy() -> PullPolicy {
    PullPolicy::Tag
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load the config file from `dir`, trying `pullman.yml` then
    /// `pullman.yaml`.
    pub fn discover(dir: &Path) -> Result<Self> {
        for name in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
            let path = dir.join(name);
            if path.exists() {
                let contents = std::fs::read_to_string(&path)?;
                return Self::from_yaml(&contents);
            }
        }
        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like [`Config::discover`], but a missing file yields the defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Ok(config) => Ok(config),
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }
}
