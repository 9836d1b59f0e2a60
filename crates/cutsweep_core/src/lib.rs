//! Analysis-task configuration and systematic-variant generation
//!
//! This crate builds the configurations of a flow-analysis job and registers
//! them with a host execution manager. It supports:
//! - A baseline configuration per centrality window, filled from an explicit
//!   per-quantity default table
//! - Named systematic variants, each a full clone of its source with a few
//!   overrides applied
//! - Presets reproducing the standard systematic and correlation-cut jobs
//! - Job descriptors read from JSON/YAML documents or the process environment
//! - Registration through the `ExecutionManager` trait, with a dry-run manager
//!
//! # Example
//!
//! ```ignore
//! use cutsweep_core::config::{JobDescriptor, Preset, TaskDescriptor};
//! use cutsweep_core::model::CentralityWindow;
//! use cutsweep_core::registration::DryRunManager;
//!
//! let task = TaskDescriptor::new("LHC10h", "AnalysisResults.root", "SC")?;
//! let job = JobDescriptor::new(task).preset(Preset::Systematics);
//!
//! let mut manager = DryRunManager::new();
//! let registered = cutsweep_core::add_tasks(&mut manager, CentralityWindow::new(0.0, 10.0)?, &job)?;
//! assert_eq!(registered.len(), 12);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod registration;
pub mod setup;
pub mod variants;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ConfigurationBuilder, DefaultTable, JobDescriptor, Preset, TaskDescriptor};
pub use error::{ConfigError, DescriptorError, EnvironmentError, SetupError};
pub use model::{AnalysisConfiguration, CentralityWindow};
pub use registration::{DryRunManager, ExecutionManager, Registration};
pub use setup::{add_tasks, check_environment, prepare};
pub use variants::{VariantBuilder, VariantPlan, generate};
