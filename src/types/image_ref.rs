// ABOUTME: Container image reference parsing.
// ABOUTME: Handles formats like nginx, nginx:tag, registry:443/ns/repo:tag@digest.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_TAG: &str = "latest";

/// A parsed container image reference.
///
/// Parsing is total: any string yields a reference, degrading to the
/// `latest` tag when no tag can be found. Only the last `/`-delimited
/// segment is searched for a tag colon, so a registry `host:port` prefix
/// is never mistaken for a tag separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    reference: String,
    repository: String,
    tag: String,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Self {
        let reference = input.trim().to_string();

        // A digest suffix never participates in tag extraction.
        let (without_digest, digest) = match reference.split_once('@') {
            Some((before, after)) => (before, Some(after.to_string())),
            None => (reference.as_str(), None),
        };

        let last_segment = without_digest
            .rsplit('/')
            .next()
            .unwrap_or(without_digest);

        let (repository, tag) = match last_segment.rsplit_once(':') {
            Some((_, tag)) if !tag.is_empty() => {
                let cut = without_digest.len() - tag.len() - 1;
                (without_digest[..cut].to_string(), tag.to_string())
            }
            _ => (without_digest.to_string(), DEFAULT_TAG.to_string()),
        };

        Self {
            reference,
            repository,
            tag,
            digest,
        }
    }

    /// The reference exactly as given (trimmed). This is what gets passed
    /// to the container engine, never a recomposition.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Whether the resolved tag is the mutable `latest` convention.
    pub fn is_latest(&self) -> bool {
        self.tag == DEFAULT_TAG
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

impl From<&str> for ImageRef {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl FromStr for ImageRef {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(input))
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.reference)
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
