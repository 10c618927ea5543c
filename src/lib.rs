// ABOUTME: Library root for pullman - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod puller;
pub mod types;
