//! Registration manifest printed by the binary

use std::collections::HashMap;

use cutsweep_core::model::{AnalysisConfiguration, CentralityWindow};
use cutsweep_core::registration::Registration;
use serde::Serialize;

/// Summary of one registered task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub task_id: u16,
    pub input: u16,
    pub output: u16,
    /// Fields that differ from the source configuration
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub window: CentralityWindow,
    pub tasks: Vec<ManifestTask>,
}

impl Manifest {
    /// Pair each registration with its configuration, in registration order
    pub fn new<'a>(
        window: CentralityWindow,
        registrations: &[Registration],
        configurations: impl IntoIterator<Item = &'a AnalysisConfiguration>,
    ) -> Self {
        let by_name: HashMap<&str, &AnalysisConfiguration> = configurations
            .into_iter()
            .map(|c| (c.name.as_str(), c))
            .collect();

        let tasks = registrations
            .iter()
            .map(|r| {
                let config = by_name.get(r.task.as_str()).copied();
                let lineage = config.and_then(|c| c.lineage.as_ref());
                let changes = match (config, lineage) {
                    (Some(config), Some(lineage)) => by_name
                        .get(lineage.source.as_str())
                        .map(|source| config.differences(source))
                        .unwrap_or_default(),
                    _ => Vec::new(),
                };

                ManifestTask {
                    name: r.task.clone(),
                    source: lineage.map(|l| l.source.clone()),
                    suffix: lineage.map(|l| l.suffix.clone()),
                    task_id: r.task_id.0,
                    input: r.input.0,
                    output: r.output.0,
                    changes,
                }
            })
            .collect();

        Self { window, tasks }
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutsweep_core::config::{JobDescriptor, Preset, TaskDescriptor};
    use cutsweep_core::registration::DryRunManager;
    use std::fs;
    use tempfile::tempdir;

    fn window() -> CentralityWindow {
        CentralityWindow::new(0.0, 10.0).unwrap()
    }

    #[test]
    fn test_manifest_lists_changes() {
        let task = TaskDescriptor::new("LHC10h", "AnalysisResults.root", "SC").unwrap();
        let job = JobDescriptor::new(task).preset(Preset::Systematics);
        let mut manager = DryRunManager::new();
        let registrations = cutsweep_core::add_tasks(&mut manager, window(), &job).unwrap();

        let manifest = Manifest::new(window(), &registrations, manager.tasks());
        assert_eq!(manifest.tasks.len(), 12);

        let baseline = &manifest.tasks[0];
        assert_eq!(baseline.name, "LHC10h_0.0-10.0");
        assert!(baseline.source.is_none());
        assert!(baseline.changes.is_empty());

        let vz = &manifest.tasks[2];
        assert_eq!(vz.suffix.as_deref(), Some("Vz14"));
        assert_eq!(vz.source.as_deref(), Some("LHC10h_0.0-10.0"));
        assert_eq!(vz.changes, ["event_cuts.Z"]);
        assert_eq!(vz.input, 0);
        assert_eq!(vz.output, 3);
    }

    #[test]
    fn test_yaml_from_descriptor_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.yml");
        fs::write(
            &path,
            "task:\n  BaseName: LHC15o\n  GridOutputFile: AnalysisResults.root\n  OutputTDirectory: Out\n\
             preset: stacked_correlation_cuts\n",
        )
        .unwrap();

        let job = JobDescriptor::from_path(&path).unwrap();
        let mut manager = DryRunManager::new();
        let registrations = cutsweep_core::add_tasks(&mut manager, window(), &job).unwrap();
        let yaml = Manifest::new(window(), &registrations, manager.tasks())
            .to_yaml()
            .unwrap();

        assert!(yaml.contains("LHC15o_0.0-10.0_CENCOR_MULCOR"));
        assert!(yaml.contains("correlation_cuts.MUL-MULQ"));
    }
}
