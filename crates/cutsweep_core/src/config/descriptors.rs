//! Job descriptors
//!
//! A job is described either by a JSON/YAML document or, for the three
//! required task fields only, by the process environment. Both routes end in
//! the same validated `TaskDescriptor`, which is passed explicitly to the
//! setup code; nothing below reads ambient state after construction.
//!
//! Document layout (JSON shown, YAML uses the same keys):
//!
//! ```json
//! {
//!   "task": {
//!     "BaseName": "LHC10h",
//!     "GridOutputFile": "AnalysisResults.root",
//!     "OutputTDirectory": "OutputAnalysis"
//!   },
//!   "preset": "systematics",
//!   "analysis": { "symmetric_cumulants": [[2, 3]] },
//!   "variants": [
//!     { "suffix": "TightDca", "overrides": [
//!       { "kind": "set_selection_range", "quantity": "DCAXY", "min": -2.2, "max": 2.2 }
//!     ]}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::defaults::{DefaultTable, QuantityDefaults};
use super::presets::Preset;
use crate::error::{ConfigError, DescriptorError};
use crate::model::{
    CentralityEstimator, CorrelatorSettings, EventQuantity, FilterBit, Toggle, TrackQuantity,
};
use crate::variants::{OverrideSpec, VariantSpec};

/// Environment variable holding the task base name
pub const ENV_BASE_NAME: &str = "TASK_BASENAME";
/// Environment variable holding the output file name
pub const ENV_OUTPUT_FILE: &str = "GRID_OUTPUT_ROOT_FILE";
/// Environment variable holding the directory inside the output file
pub const ENV_OUTPUT_DIRECTORY: &str = "OUTPUT_TDIRECTORY_FILE";

const FIELD_BASE_NAME: &str = "task.BaseName";
const FIELD_OUTPUT_FILE: &str = "task.GridOutputFile";
const FIELD_OUTPUT_DIRECTORY: &str = "task.OutputTDirectory";

// =============================================================================
// Task Descriptor
// =============================================================================

/// Where every task of a job writes its output list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRouting {
    pub file: String,
    pub directory: String,
}

impl fmt::Display for OutputRouting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.directory)
    }
}

/// The three required task fields, all non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDescriptor {
    base_name: String,
    routing: OutputRouting,
}

impl TaskDescriptor {
    pub fn new(
        base_name: impl Into<String>,
        output_file: impl Into<String>,
        output_directory: impl Into<String>,
    ) -> Result<Self, DescriptorError> {
        Self::validated(
            [base_name.into(), output_file.into(), output_directory.into()],
            [FIELD_BASE_NAME, FIELD_OUTPUT_FILE, FIELD_OUTPUT_DIRECTORY],
        )
    }

    /// Read `TASK_BASENAME`, `GRID_OUTPUT_ROOT_FILE` and
    /// `OUTPUT_TDIRECTORY_FILE` from the process environment
    pub fn from_env() -> Result<Self, DescriptorError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`TaskDescriptor::from_env`] with a custom variable lookup
    pub fn from_env_with(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DescriptorError> {
        let names = [ENV_BASE_NAME, ENV_OUTPUT_FILE, ENV_OUTPUT_DIRECTORY];
        let mut values: [String; 3] = Default::default();
        for (value, name) in values.iter_mut().zip(names) {
            *value = lookup(name).ok_or(DescriptorError::MissingEnv { name })?;
        }
        Self::validated(values, names)
    }

    fn validated(values: [String; 3], fields: [&'static str; 3]) -> Result<Self, DescriptorError> {
        for (value, field) in values.iter().zip(fields) {
            if value.trim().is_empty() {
                return Err(DescriptorError::EmptyField { field });
            }
        }
        let [base_name, file, directory] = values;
        Ok(Self {
            base_name,
            routing: OutputRouting { file, directory },
        })
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn routing(&self) -> &OutputRouting {
        &self.routing
    }
}

// =============================================================================
// Default Table Patches
// =============================================================================

/// Partial replacement of the standard default table, keyed by textual names
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsPatch {
    pub track: BTreeMap<String, QuantityDefaults>,
    pub event: BTreeMap<String, QuantityDefaults>,
    pub filter_bit: Option<u32>,
    pub centrality_estimator: Option<String>,
    pub toggles: BTreeMap<String, bool>,
}

impl DefaultsPatch {
    pub fn apply(&self, mut table: DefaultTable) -> Result<DefaultTable, ConfigError> {
        for (name, defaults) in &self.track {
            let q = name
                .parse::<TrackQuantity>()
                .map_err(|e| ConfigError::unknown("defaults.track", e))?;
            table.track.insert(q, *defaults);
        }
        for (name, defaults) in &self.event {
            let q = name
                .parse::<EventQuantity>()
                .map_err(|e| ConfigError::unknown("defaults.event", e))?;
            table.event.insert(q, *defaults);
        }
        if let Some(bit) = self.filter_bit {
            table.filter_bit = FilterBit(bit);
        }
        if let Some(estimator) = &self.centrality_estimator {
            table.centrality_estimator = estimator
                .parse::<CentralityEstimator>()
                .map_err(|e| ConfigError::unknown("defaults.centrality_estimator", e))?;
        }
        for (name, value) in &self.toggles {
            let toggle = name
                .parse::<Toggle>()
                .map_err(|e| ConfigError::unknown("defaults.toggles", e))?;
            table.toggles.set(toggle, *value);
        }
        Ok(table)
    }
}

// =============================================================================
// Job Descriptor
// =============================================================================

/// Everything needed to set up one job besides the centrality window
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    pub task: TaskDescriptor,
    pub defaults: DefaultsPatch,
    pub analysis: CorrelatorSettings,
    /// Applied to the built baseline without renaming it
    pub baseline: Vec<OverrideSpec>,
    /// Its baseline overrides come before `baseline`, its variants before
    /// `variants`
    pub preset: Option<Preset>,
    pub variants: Vec<VariantSpec>,
    pub register_source: bool,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(rename = "BaseName")]
    base_name: Option<String>,
    #[serde(rename = "GridOutputFile")]
    output_file: Option<String>,
    #[serde(rename = "OutputTDirectory")]
    output_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    task: Option<RawTask>,
    #[serde(default)]
    defaults: DefaultsPatch,
    #[serde(default)]
    analysis: CorrelatorSettings,
    #[serde(default)]
    baseline: Vec<OverrideSpec>,
    preset: Option<String>,
    #[serde(default)]
    variants: Vec<VariantSpec>,
    #[serde(default = "default_true")]
    register_source: bool,
}

fn default_true() -> bool {
    true
}

impl JobDescriptor {
    /// A job registering only the baseline
    pub fn new(task: TaskDescriptor) -> Self {
        Self {
            task,
            defaults: DefaultsPatch::default(),
            analysis: CorrelatorSettings::default(),
            baseline: Vec::new(),
            preset: None,
            variants: Vec::new(),
            register_source: true,
        }
    }

    /// Task fields from the environment, everything else defaulted
    pub fn from_env() -> Result<Self, DescriptorError> {
        Ok(Self::new(TaskDescriptor::from_env()?))
    }

    #[must_use]
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    #[must_use]
    pub fn analysis(mut self, analysis: CorrelatorSettings) -> Self {
        self.analysis = analysis;
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: DefaultsPatch) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn baseline_override(mut self, spec: OverrideSpec) -> Self {
        self.baseline.push(spec);
        self
    }

    #[must_use]
    pub fn variant(mut self, spec: VariantSpec) -> Self {
        self.variants.push(spec);
        self
    }

    #[must_use]
    pub fn register_source(mut self, register: bool) -> Self {
        self.register_source = register;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        let raw: RawJob = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DescriptorError> {
        let raw: RawJob = serde_saphyr::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Load a `.json`, `.yaml` or `.yml` document
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let read = || {
            fs::read_to_string(path).map_err(|source| DescriptorError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        match extension.as_str() {
            "json" => Self::from_json_str(&read()?),
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            _ => Err(DescriptorError::UnsupportedFormat { extension }),
        }
    }

    fn from_raw(raw: RawJob) -> Result<Self, DescriptorError> {
        let task = raw.task.ok_or(DescriptorError::MissingField { field: "task" })?;
        let base_name = task.base_name.ok_or(DescriptorError::MissingField {
            field: FIELD_BASE_NAME,
        })?;
        let output_file = task.output_file.ok_or(DescriptorError::MissingField {
            field: FIELD_OUTPUT_FILE,
        })?;
        let output_directory = task.output_directory.ok_or(DescriptorError::MissingField {
            field: FIELD_OUTPUT_DIRECTORY,
        })?;

        let preset = raw
            .preset
            .as_deref()
            .map(str::parse::<Preset>)
            .transpose()?;

        Ok(Self {
            task: TaskDescriptor::new(base_name, output_file, output_directory)?,
            defaults: raw.defaults,
            analysis: raw.analysis,
            baseline: raw.baseline,
            preset,
            variants: raw.variants,
            register_source: raw.register_source,
        })
    }
}
