//! Handles returned by the execution manager
//!
//! Each handle type is distinct so a task handle can never be passed where a
//! container is expected.

use serde::{Deserialize, Serialize};

/// A task registered with the execution manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u16);

/// An input or output data container owned by the execution manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub u16);
