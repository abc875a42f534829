//! data_runtime: serde-deserialized simulation configuration under `data/`.
//!
//! Keep this crate free of sim dependencies; the sim converts these plain
//! structs into runtime state at spawn time.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub mod archetype;
pub mod attack;
pub mod hazard;
pub mod scenario;

fn data_root() -> PathBuf {
    // Prefer top-level workspace `data/` so tests and tools can run from any crate.
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() {
        ws
    } else {
        here.join("data")
    }
}

/// Read and deserialize a TOML file under `data/`.
pub fn load_toml<T: DeserializeOwned>(rel: impl AsRef<Path>) -> Result<T> {
    let path = data_root().join(rel.as_ref());
    let txt =
        std::fs::read_to_string(&path).with_context(|| format!("read data: {}", path.display()))?;
    let cfg = toml::from_str(&txt).with_context(|| format!("parse toml: {}", path.display()))?;
    Ok(cfg)
}
