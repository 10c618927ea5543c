// ABOUTME: Domain value types shared across the crate.
// ABOUTME: Image references and pull policies.

mod image_ref;
mod pull_policy;

pub use image_ref::{DEFAULT_TAG, ImageRef};
pub use pull_policy::{ParsePullPolicyError, PullPolicy};
