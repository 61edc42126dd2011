pub mod approval;
pub mod requests;
pub mod schedule;
pub mod window;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads JSON from `path`, or from stdin when the path is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("Failed to read stdin")?;
        buffer
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
    };
    debug!("Read {} bytes of input from {:?}", content.len(), path);

    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {:?}", path))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
