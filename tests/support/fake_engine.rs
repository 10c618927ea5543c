// ABOUTME: Fake container engine binary for integration tests.
// ABOUTME: A shell script that serves a canned image catalog and records invocations.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A stand-in for podman/docker: a shell script that answers the
/// `images --format` listing from a catalog file, records every
/// invocation, and makes `pull` append the pulled reference to the
/// catalog (or fail when told to).
pub struct FakeEngine {
    dir: TempDir,
    binary: PathBuf,
}

impl FakeEngine {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join(name);
        let script = format!(
            r#"#!/bin/sh
state="{state}"
echo "$@" >> "$state/invocations.log"
case "$1" in
  images)
    if [ -f "$state/listing_fails" ]; then
      echo "Error: cannot connect to the local storage" >&2
      exit 1
    fi
    if [ -f "$state/images.txt" ]; then
      cat "$state/images.txt"
    fi
    ;;
  pull)
    for arg in "$@"; do ref="$arg"; done
    if [ -f "$state/pull_fails" ]; then
      echo "Trying to pull $ref..."
      echo "Error: initializing source: manifest unknown" >&2
      exit 125
    fi
    echo "Trying to pull $ref..."
    echo "Writing manifest to image destination"
    base="${{ref##*/}}"
    case "$base" in
      *:*) echo "$ref" >> "$state/images.txt" ;;
      *) echo "$ref:latest" >> "$state/images.txt" ;;
    esac
    ;;
esac
"#,
            state = dir.path().display()
        );
        fs::write(&binary, script).unwrap();
        let mut perms = fs::metadata(&binary).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&binary, perms).unwrap();
        Self { dir, binary }
    }

    /// Seed the local catalog with `repository:tag` entries.
    pub fn with_images(self, entries: &[&str]) -> Self {
        let mut contents = entries.join("\n");
        contents.push('\n');
        fs::write(self.dir.path().join("images.txt"), contents).unwrap();
        self
    }

    /// Make every subsequent `pull` exit non-zero.
    pub fn fail_pulls(&self) {
        fs::write(self.dir.path().join("pull_fails"), "").unwrap();
    }

    /// Make every subsequent `images` listing exit non-zero.
    pub fn fail_listings(&self) {
        fs::write(self.dir.path().join("listing_fails"), "").unwrap();
    }

    /// Full path to the engine binary; pass this as the engine name.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Directory holding the binary, for prepending to PATH.
    pub fn bin_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Every invocation of the engine so far, one argv line each.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("invocations.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Current catalog contents.
    pub fn images(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("images.txt"))
            .map(|list| list.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
