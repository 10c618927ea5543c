// ABOUTME: Pull policy enum and the pull-required decision.
// ABOUTME: Policies: always, missing, never, tag.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// When a container image must be re-fetched from its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PullPolicy {
    /// Pull every time, regardless of local state.
    Always,
    /// Pull only when the image is not cached locally.
    Missing,
    /// Never pull.
    Never,
    /// Pull when missing, or when the tag is the mutable `latest`.
    Tag,
}

impl PullPolicy {
    /// Decide whether a pull is required given the local cache state.
    ///
    /// The `tag` policy re-pulls `latest` because a remote `latest` may
    /// have moved; any other concrete tag is trusted locally.
    pub fn pull_required(self, locally_present: bool, is_latest: bool) -> bool {
        match self {
            PullPolicy::Always => true,
            PullPolicy::Missing => !locally_present,
            PullPolicy::Never => false,
            PullPolicy::Tag => !locally_present || is_latest,
        }
    }

    /// Whether the decision depends on the local image catalog at all.
    pub fn consults_local_catalog(self) -> bool {
        matches!(self, PullPolicy::Missing | PullPolicy::Tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PullPolicy::Always => "always",
            PullPolicy::Missing => "missing",
            PullPolicy::Never => "never",
            PullPolicy::Tag => "tag",
        }
    }
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown pull policy: {0} (expected always, missing, never, or tag)")]
pub struct ParsePullPolicyError(String);

impl FromStr for PullPolicy {
    type Err = ParsePullPolicyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "always" => Ok(PullPolicy::Always),
            "missing" => Ok(PullPolicy::Missing),
            "never" => Ok(PullPolicy::Never),
            "tag" => Ok(PullPolicy::Tag),
            other => Err(ParsePullPolicyError(other.to_string())),
        }
    }
}
