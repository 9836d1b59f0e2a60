//! Command-line front end for `cutsweep_core`
//!
//! Builds the configurations of one centrality window, registers them with
//! the dry-run execution manager and renders the result as a YAML manifest.

pub mod logging;
pub mod manifest;

pub use logging::init_logging;
pub use manifest::{Manifest, ManifestTask};
