// src/config/mod.rs

//! Pipeline definition loading and validation.
//!
//! - [`model`] maps the TOML file into raw and validated structures.
//! - [`loader`] reads a file from disk.
//! - [`validate`] checks the declaration (gate needs, job graph, matrices).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_pipeline_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, GateSection, JobConfig, PipelineFile, RawPipelineFile};
