//! Systematic variants of a baseline configuration
//!
//! A variant is a full clone of its source with a small list of overrides
//! applied. See [`generate`] for naming and ordering rules.

mod builder;
mod generator;
mod overrides;

pub use builder::{VariantBuilder, VariantDefinition, VariantSpec};
pub use generator::{VariantPlan, generate, validate_suffix};
pub use overrides::{Override, OverrideSpec};
