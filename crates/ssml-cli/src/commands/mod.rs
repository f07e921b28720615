//! CLI command implementations.

pub mod compile;
pub mod fx;
pub mod info;
pub mod inspect;
pub mod silence;

use anyhow::{Context, Result};
use tracing::info;

/// Resolve a text argument, reading `@path` arguments from disk.
pub fn read_input(input: &str) -> Result<String> {
    match input.strip_prefix('@') {
        Some(path) => {
            info!(path, "Reading input from file");
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        None => Ok(input.to_string()),
    }
}
