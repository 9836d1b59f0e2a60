//! Job entry points
//!
//! `prepare` is the pure part of a job: default table, baseline, baseline
//! overrides and variants. `add_tasks` additionally checks the host
//! environment and registers the result with an execution manager.

use crate::config::{ConfigurationBuilder, DefaultTable, JobDescriptor};
use crate::error::{ConfigError, EnvironmentError, SetupError};
use crate::model::{AnalysisConfiguration, CentralityWindow};
use crate::registration::{ExecutionManager, Registration, register};
use crate::variants::{Override, OverrideSpec, VariantPlan, generate};

/// Build every configuration of `job` for `window`, in registration order
pub fn prepare(
    window: CentralityWindow,
    job: &JobDescriptor,
) -> Result<Vec<AnalysisConfiguration>, ConfigError> {
    let table = job.defaults.apply(DefaultTable::standard())?;
    let correlator_settings = match job.preset {
        Some(preset) => job.analysis.layered_over(&preset.correlator_settings()),
        None => job.analysis.clone(),
    };
    let built = ConfigurationBuilder::new(job.task.base_name(), window)
        .defaults(table)
        .correlator_settings(correlator_settings)
        .build()?;

    let mut baseline_overrides = job
        .preset
        .map(|p| p.baseline_overrides())
        .unwrap_or_default();
    baseline_overrides.extend(
        job.baseline
            .iter()
            .map(OverrideSpec::resolve)
            .collect::<Result<Vec<Override>, _>>()?,
    );
    let baseline = built.with_overrides(&baseline_overrides)?;

    let mut variants = job.preset.map(|p| p.variants()).unwrap_or_default();
    for spec in &job.variants {
        variants.push(spec.resolve()?);
    }

    let plan = VariantPlan::new()
        .include_source(job.register_source)
        .variants(variants);
    let configurations = generate(&baseline, &plan)?;

    if configurations.is_empty() {
        tracing::warn!(task = %baseline.name, "job registers no configurations");
    }
    tracing::debug!(
        task = %baseline.name,
        preset = ?job.preset,
        configurations = configurations.len(),
        "job prepared"
    );
    Ok(configurations)
}

/// Fail unless the manager can feed events to the tasks
pub fn check_environment<M: ExecutionManager>(manager: &M) -> Result<(), EnvironmentError> {
    if !manager.has_input_handler() {
        return Err(EnvironmentError::NoInputHandler);
    }
    Ok(())
}

/// Check the environment, build the job and register every configuration.
///
/// Nothing is registered unless the whole job builds.
pub fn add_tasks<M: ExecutionManager>(
    manager: &mut M,
    window: CentralityWindow,
    job: &JobDescriptor,
) -> Result<Vec<Registration>, SetupError<M::Error>> {
    check_environment(manager)?;

    let configurations = prepare(window, job)?;
    register(manager, &configurations, job.task.routing())
}
