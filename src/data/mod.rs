//! Loaders turning input files into the types the layout and selection
//! code works with. Bad rows and dangling links are dropped, not fatal.

pub mod bubbles;
pub mod network;
pub mod scatter;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::sim::SimulationConfig;

pub use network::{CharacterGraph, NetworkScales, load_network};
pub use scatter::{ScatterData, load_scatter, parse_scatter_str};

/// Reads simulation tuning from JSON; missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read simulation config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("invalid simulation config {}", path.display()))?;
    info!("loaded simulation config from {}", path.display());
    Ok(config)
}
