use std::path::PathBuf;

use thiserror::Error;

/// A textual identifier that does not name a member of one of the closed
/// quantity/estimator enumerations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownIdentifier {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Errors detected while building or deriving configurations.
///
/// All of these are raised before anything is handed to the execution manager.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid centrality window [{min}, {max}]")]
    InvalidCentralityWindow { min: f64, max: f64 },

    #[error("invalid range for {field}: [{min}, {max}]")]
    InvalidRange { field: String, min: f64, max: f64 },

    #[error("invalid binning for {field}: {reason}")]
    InvalidBinning { field: String, reason: String },

    #[error("default table has no entry for {quantity}")]
    MissingDefault { quantity: String },

    #[error("{field}: {source}")]
    UnknownIdentifier {
        field: String,
        source: UnknownIdentifier,
    },

    #[error("invalid estimator pair {first}/{second}: {reason}")]
    InvalidEstimatorPair {
        first: String,
        second: String,
        reason: &'static str,
    },

    #[error("invalid correlation cut for {pair}: slope={slope}, offset={offset}")]
    InvalidCorrelationCut { pair: String, slope: f64, offset: f64 },

    #[error("invalid {field}: {reason}")]
    InvalidHarmonics { field: String, reason: String },

    #[error("invalid variant suffix `{suffix}`: {reason}")]
    InvalidSuffix { suffix: String, reason: &'static str },

    #[error("duplicate variant suffix `{suffix}`")]
    DuplicateSuffix { suffix: String },

    #[error("duplicate configuration name `{name}`")]
    DuplicateName { name: String },

    #[error("variant `{suffix}` derives from unknown source `{source_suffix}`")]
    UnknownSource {
        suffix: String,
        source_suffix: String,
    },

    #[error("{field}: {source}")]
    Field {
        field: String,
        source: Box<ConfigError>,
    },

    #[error("variant `{variant}`: {source}")]
    Variant {
        variant: String,
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach the name of the variant being derived when the error occurred
    #[must_use]
    pub fn in_variant(self, variant: impl Into<String>) -> Self {
        ConfigError::Variant {
            variant: variant.into(),
            source: Box::new(self),
        }
    }

    /// Attach the descriptor field whose value caused the error
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        ConfigError::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn unknown(field: impl Into<String>, source: UnknownIdentifier) -> Self {
        ConfigError::UnknownIdentifier {
            field: field.into(),
            source,
        }
    }
}

/// Errors reading the job descriptor (document or process environment)
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("cannot read descriptor {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML descriptor: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("unsupported descriptor format `{extension}` (expected json, yaml or yml)")]
    UnsupportedFormat { extension: String },

    #[error("descriptor field `{field}` is missing")]
    MissingField { field: &'static str },

    #[error("descriptor field `{field}` is empty")]
    EmptyField { field: &'static str },

    #[error("environment variable `{name}` is not set")]
    MissingEnv { name: &'static str },

    #[error("unknown preset `{name}`")]
    UnknownPreset { name: String },
}

/// Problems with the host runtime, detected before any configuration work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("this task requires an input event handler")]
    NoInputHandler,
}

/// Everything that can abort the job setup, tagged by stage.
///
/// `E` is the execution manager's own error type; registration failures are
/// propagated as-is.
#[derive(Debug, Error)]
pub enum SetupError<E: std::error::Error + 'static> {
    #[error("environment: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("container `{name}` already exists in the manager")]
    ContainerExists { name: String },

    #[error("registration of `{task}`: {source}")]
    Registration { task: String, source: E },
}
