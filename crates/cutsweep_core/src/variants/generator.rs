//! Variant Generator
//!
//! Expands one source configuration into the ordered list of configurations
//! that get registered: the source itself (optionally) followed by one clone
//! per variant definition, each with its own overrides applied.

use rustc_hash::{FxHashMap, FxHashSet};

use super::builder::VariantDefinition;
use crate::error::ConfigError;
use crate::model::{AnalysisConfiguration, Lineage};

/// Ordered variant definitions plus whether the source is registered too
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPlan {
    pub include_source: bool,
    pub variants: Vec<VariantDefinition>,
}

impl Default for VariantPlan {
    fn default() -> Self {
        Self {
            include_source: true,
            variants: Vec::new(),
        }
    }
}

impl VariantPlan {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn include_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    #[must_use]
    pub fn variant(mut self, definition: VariantDefinition) -> Self {
        self.variants.push(definition);
        self
    }

    #[must_use]
    pub fn variants(mut self, definitions: impl IntoIterator<Item = VariantDefinition>) -> Self {
        self.variants.extend(definitions);
        self
    }
}

/// Check a suffix can be used in container names and routing paths
pub fn validate_suffix(suffix: &str) -> Result<(), ConfigError> {
    let reason = if suffix.is_empty() {
        Some("suffix is empty")
    } else if suffix.chars().any(char::is_whitespace) {
        Some("suffix contains whitespace")
    } else if suffix.contains(['/', ':']) {
        Some("suffix contains `/` or `:`")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidSuffix {
            suffix: suffix.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Generate the configurations of `plan` from `source`.
///
/// Output order is the source (if included) then the variants in plan order.
/// A variant may derive from any earlier variant of the same plan. Fails on
/// the first invalid variant; nothing is returned in that case.
pub fn generate(
    source: &AnalysisConfiguration,
    plan: &VariantPlan,
) -> Result<Vec<AnalysisConfiguration>, ConfigError> {
    let mut derived: Vec<AnalysisConfiguration> = Vec::with_capacity(plan.variants.len());
    let mut by_suffix: FxHashMap<&str, usize> = FxHashMap::default();
    let mut names: FxHashSet<String> = FxHashSet::default();
    names.insert(source.name.clone());

    for definition in &plan.variants {
        let suffix = definition.suffix.as_str();
        validate_suffix(suffix)?;
        if by_suffix.contains_key(suffix) {
            return Err(ConfigError::DuplicateSuffix {
                suffix: suffix.to_string(),
            });
        }

        let base = match definition.source.as_deref() {
            None => source,
            Some(source_suffix) => {
                let idx = by_suffix.get(source_suffix).copied().ok_or_else(|| {
                    ConfigError::UnknownSource {
                        suffix: suffix.to_string(),
                        source_suffix: source_suffix.to_string(),
                    }
                })?;
                &derived[idx]
            }
        };

        let name = format!("{}_{}", base.name, suffix);
        if !names.insert(name.clone()) {
            return Err(ConfigError::DuplicateName { name });
        }

        let mut config = base
            .with_overrides(&definition.overrides)
            .map_err(|e| e.in_variant(suffix))?;
        config.name = name;
        config.lineage = Some(Lineage {
            source: base.name.clone(),
            suffix: suffix.to_string(),
        });

        let changed = config.differences(base);
        if changed.is_empty() {
            tracing::warn!(task = %config.name, "variant does not differ from its source");
        } else {
            tracing::debug!(
                task = %config.name,
                source = %base.name,
                changed = ?changed,
                "variant derived"
            );
        }

        by_suffix.insert(suffix, derived.len());
        derived.push(config);
    }

    let mut out = Vec::with_capacity(derived.len() + 1);
    if plan.include_source {
        out.push(source.clone());
    }
    out.extend(derived);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_rules() {
        assert!(validate_suffix("NoCenCor").is_ok());
        assert!(validate_suffix("").is_err());
        assert!(validate_suffix("two words").is_err());
        assert!(validate_suffix("a/b").is_err());
        assert!(validate_suffix("file:dir").is_err());
    }
}
