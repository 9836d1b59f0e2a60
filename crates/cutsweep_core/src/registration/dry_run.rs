use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

use super::{ContainerKind, ExecutionManager};
use crate::config::OutputRouting;
use crate::model::{AnalysisConfiguration, ContainerId, TaskId};

/// Name of the shared input container
pub const COMMON_INPUT: &str = "cAUTO_INPUT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DryRunError {
    #[error("container `{name}` already exists")]
    ContainerExists { name: String },

    #[error("task {0:?} is not registered")]
    UnknownTask(TaskId),

    #[error("container {0:?} does not exist")]
    UnknownContainer(ContainerId),

    #[error("slot {slot} of task `{task}` is already connected")]
    SlotInUse { task: String, slot: u16 },

    #[error("too many handles")]
    Exhausted,
}

/// A container created by the dry-run manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunContainer {
    pub id: ContainerId,
    pub name: String,
    pub kind: ContainerKind,
    /// `None` for the common input
    pub routing: Option<String>,
}

#[derive(Debug, Clone)]
struct DryRunTask {
    config: AnalysisConfiguration,
    inputs: Vec<(u16, ContainerId)>,
    outputs: Vec<(u16, ContainerId)>,
}

/// In-memory execution manager that records the registration plan.
///
/// Container names must be unique, as they are for a real manager.
#[derive(Debug, Clone)]
pub struct DryRunManager {
    input_handler: bool,
    tasks: Vec<DryRunTask>,
    containers: Vec<DryRunContainer>,
    container_names: FxHashSet<String>,
}

impl Default for DryRunManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunManager {
    /// Manager with an input handler and the common input container
    pub fn new() -> Self {
        let common = DryRunContainer {
            id: ContainerId(0),
            name: COMMON_INPUT.to_string(),
            kind: ContainerKind::List,
            routing: None,
        };
        let mut container_names = FxHashSet::default();
        container_names.insert(common.name.clone());

        Self {
            input_handler: true,
            tasks: Vec::new(),
            containers: vec![common],
            container_names,
        }
    }

    #[must_use]
    pub fn with_input_handler(mut self, attached: bool) -> Self {
        self.input_handler = attached;
        self
    }

    /// Registered configurations in registration order
    pub fn tasks(&self) -> impl Iterator<Item = &AnalysisConfiguration> {
        self.tasks.iter().map(|t| &t.config)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn containers(&self) -> &[DryRunContainer] {
        &self.containers
    }

    pub fn container(&self, id: ContainerId) -> Option<&DryRunContainer> {
        self.containers.get(usize::from(id.0))
    }

    /// `(slot, container)` pairs connected as inputs of `task`
    pub fn inputs(&self, task: TaskId) -> &[(u16, ContainerId)] {
        self.tasks
            .get(usize::from(task.0))
            .map(|t| t.inputs.as_slice())
            .unwrap_or_default()
    }

    /// `(slot, container)` pairs connected as outputs of `task`
    pub fn outputs(&self, task: TaskId) -> &[(u16, ContainerId)] {
        self.tasks
            .get(usize::from(task.0))
            .map(|t| t.outputs.as_slice())
            .unwrap_or_default()
    }

    fn task_mut(&mut self, task: TaskId) -> Result<&mut DryRunTask, DryRunError> {
        self.tasks
            .get_mut(usize::from(task.0))
            .ok_or(DryRunError::UnknownTask(task))
    }

    fn check_container(&self, container: ContainerId) -> Result<(), DryRunError> {
        match self.container(container) {
            Some(_) => Ok(()),
            None => Err(DryRunError::UnknownContainer(container)),
        }
    }
}

fn connect(
    task: &mut DryRunTask,
    slots: fn(&mut DryRunTask) -> &mut Vec<(u16, ContainerId)>,
    slot: u16,
    container: ContainerId,
) -> Result<(), DryRunError> {
    let name = task.config.name.clone();
    let connected = slots(task);
    if connected.iter().any(|&(s, _)| s == slot) {
        return Err(DryRunError::SlotInUse { task: name, slot });
    }
    connected.push((slot, container));
    Ok(())
}

impl ExecutionManager for DryRunManager {
    type Error = DryRunError;

    fn has_input_handler(&self) -> bool {
        self.input_handler
    }

    fn has_container(&self, name: &str) -> bool {
        self.container_names.contains(name)
    }

    fn add_task(&mut self, config: &AnalysisConfiguration) -> Result<TaskId, Self::Error> {
        let id = TaskId(u16::try_from(self.tasks.len()).map_err(|_| DryRunError::Exhausted)?);
        self.tasks.push(DryRunTask {
            config: config.clone(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        Ok(id)
    }

    fn common_input(&self) -> Result<ContainerId, Self::Error> {
        Ok(ContainerId(0))
    }

    fn create_output(
        &mut self,
        name: &str,
        kind: ContainerKind,
        routing: &OutputRouting,
    ) -> Result<ContainerId, Self::Error> {
        if !self.container_names.insert(name.to_string()) {
            return Err(DryRunError::ContainerExists {
                name: name.to_string(),
            });
        }
        let id = ContainerId(
            u16::try_from(self.containers.len()).map_err(|_| DryRunError::Exhausted)?,
        );
        self.containers.push(DryRunContainer {
            id,
            name: name.to_string(),
            kind,
            routing: Some(routing.to_string()),
        });
        Ok(id)
    }

    fn connect_input(
        &mut self,
        task: TaskId,
        slot: u16,
        container: ContainerId,
    ) -> Result<(), Self::Error> {
        self.check_container(container)?;
        connect(self.task_mut(task)?, |t| &mut t.inputs, slot, container)
    }

    fn connect_output(
        &mut self,
        task: TaskId,
        slot: u16,
        container: ContainerId,
    ) -> Result<(), Self::Error> {
        self.check_container(container)?;
        connect(self.task_mut(task)?, |t| &mut t.outputs, slot, container)
    }
}
