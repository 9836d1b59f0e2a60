//! Registration with the host execution manager
//!
//! The manager is an external collaborator owning tasks and data containers.
//! Every configuration becomes one task with exactly one input (the common
//! input container, slot 0) and one output list container (slot 1) named
//! after the task and routed to the job's output file and directory.

mod dry_run;

pub use dry_run::{COMMON_INPUT, DryRunContainer, DryRunError, DryRunManager};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::OutputRouting;
use crate::error::SetupError;
use crate::model::{AnalysisConfiguration, ContainerId, TaskId};

/// Input slot every task reads the common input from
pub const INPUT_SLOT: u16 = 0;
/// Output slot every task writes its result list to
pub const OUTPUT_SLOT: u16 = 1;

/// Type of data held by an output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Generic list of result objects
    List,
}

/// Operations the setup needs from the host execution manager
pub trait ExecutionManager {
    type Error: std::error::Error + 'static;

    /// Whether an input event handler is attached
    fn has_input_handler(&self) -> bool;

    /// Whether a container called `name` already exists
    fn has_container(&self, name: &str) -> bool;

    fn add_task(&mut self, config: &AnalysisConfiguration) -> Result<TaskId, Self::Error>;

    /// The shared input container all tasks read from
    fn common_input(&self) -> Result<ContainerId, Self::Error>;

    fn create_output(
        &mut self,
        name: &str,
        kind: ContainerKind,
        routing: &OutputRouting,
    ) -> Result<ContainerId, Self::Error>;

    fn connect_input(
        &mut self,
        task: TaskId,
        slot: u16,
        container: ContainerId,
    ) -> Result<(), Self::Error>;

    fn connect_output(
        &mut self,
        task: TaskId,
        slot: u16,
        container: ContainerId,
    ) -> Result<(), Self::Error>;
}

/// What was registered for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub task: String,
    pub task_id: TaskId,
    pub input: ContainerId,
    pub output: ContainerId,
    /// `file:directory`
    pub routing: String,
}

/// Register `configurations` in order.
///
/// Every output container name is checked against the manager before the
/// first task is added, so a name collision registers nothing. Each task's
/// output container is created before the task itself; any later manager
/// error is propagated as-is.
pub fn register<M: ExecutionManager>(
    manager: &mut M,
    configurations: &[AnalysisConfiguration],
    routing: &OutputRouting,
) -> Result<Vec<Registration>, SetupError<M::Error>> {
    let mut names = FxHashSet::default();
    for config in configurations {
        if manager.has_container(&config.name) || !names.insert(config.name.as_str()) {
            return Err(SetupError::ContainerExists {
                name: config.name.clone(),
            });
        }
    }

    let mut registrations = Vec::with_capacity(configurations.len());

    for config in configurations {
        let registration = register_one(manager, config, routing).map_err(|source| {
            SetupError::Registration {
                task: config.name.clone(),
                source,
            }
        })?;
        tracing::info!(task = %config.name, "Added to manager");
        registrations.push(registration);
    }

    Ok(registrations)
}

fn register_one<M: ExecutionManager>(
    manager: &mut M,
    config: &AnalysisConfiguration,
    routing: &OutputRouting,
) -> Result<Registration, M::Error> {
    let input = manager.common_input()?;
    let output = manager.create_output(&config.name, ContainerKind::List, routing)?;
    let task_id = manager.add_task(config)?;
    manager.connect_input(task_id, INPUT_SLOT, input)?;
    manager.connect_output(task_id, OUTPUT_SLOT, output)?;

    Ok(Registration {
        task: config.name.clone(),
        task_id,
        input,
        output,
        routing: routing.to_string(),
    })
}
