// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PipelineFile, RawPipelineFile};
use crate::errors::Result;

/// Load a pipeline definition from a given path and return the raw
/// `RawPipelineFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (gate needs, job graph, matrices). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPipelineFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawPipelineFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a pipeline definition from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - an empty gate dependency set,
///   - unknown `needs` references,
///   - job-graph cycles,
///   - empty or duplicated matrix cell lists.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineFile> {
    let raw = load_from_path(&path)?;
    let cfg = PipelineFile::try_from(raw)?;
    Ok(cfg)
}

/// Helper to resolve a default pipeline definition path.
///
/// Currently this just returns `Pipeline.toml` in the current working
/// directory; this function exists so discovery can later respect an env var
/// (e.g. `PIPEGATE_PIPELINE`) or multiple default locations.
pub fn default_pipeline_path() -> PathBuf {
    PathBuf::from("Pipeline.toml")
}
