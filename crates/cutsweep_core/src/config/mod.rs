//! Job configuration
//!
//! Everything that turns a job request into the baseline
//! `AnalysisConfiguration`: the per-quantity default table, the fluent
//! builder, named presets and the job descriptor read from a document or the
//! environment.
//!
//! # Builder DSL
//!
//! ```ignore
//! use cutsweep_core::config::{ConfigurationBuilder, DefaultTable, Preset};
//! use cutsweep_core::model::{CentralityWindow, TrackQuantity};
//! use cutsweep_core::variants::{generate, VariantPlan};
//!
//! let window = CentralityWindow::new(0.0, 10.0)?;
//! let baseline = ConfigurationBuilder::new("LHC10h", window)
//!     .defaults(DefaultTable::standard())
//!     .kinematic_binning(TrackQuantity::Pt, vec![0.2, 0.34, 0.5, 0.7, 1.0, 2.0, 5.0])
//!     .build()?;
//!
//! let plan = VariantPlan::new().variants(Preset::Systematics.variants());
//! let configurations = generate(&baseline, &plan)?;
//! ```

mod builder;
mod defaults;
mod descriptors;
mod presets;

pub use builder::ConfigurationBuilder;
pub use defaults::{BinSpec, DefaultTable, QuantityDefaults};
pub use descriptors::{
    DefaultsPatch, ENV_BASE_NAME, ENV_OUTPUT_DIRECTORY, ENV_OUTPUT_FILE, JobDescriptor,
    OutputRouting, TaskDescriptor,
};
pub use presets::{
    CENTRALITY_CORRELATION_CUT, ETA_EDGES, MULTIPLICITY_CORRELATION_CUT,
    OUTLIER_CENTRALITY_CORRELATION_CUT, PT_EDGES, Preset,
};
