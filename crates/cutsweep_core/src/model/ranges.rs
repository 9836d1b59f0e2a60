//! Cut ranges, histogram binnings and correlation cuts

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Centrality percentile window a job is run for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralityWindow {
    min: f64,
    max: f64,
}

impl CentralityWindow {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidCentralityWindow { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Name fragment used for task names, e.g. `0.0-10.0`
    pub fn label(&self) -> String {
        format!("{:.1}-{:.1}", self.min, self.max)
    }
}

/// Closed interval used to reject tracks or events.
///
/// An inactive range is carried along but not applied by the analysis task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl SelectionRange {
    /// Create an active range, checking `min <= max`
    pub fn new(field: impl Into<String>, min: f64, max: f64) -> Result<Self, ConfigError> {
        let range = Self {
            min,
            max,
            active: true,
        };
        range.validate(field)?;
        Ok(range)
    }

    pub fn validate(&self, field: impl Into<String>) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field: field.into(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Fixed-width binning of a diagnostic histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBinning {
    pub bins: u32,
    pub low: f64,
    pub high: f64,
}

impl HistogramBinning {
    pub fn new(field: impl Into<String>, bins: u32, low: f64, high: f64) -> Result<Self, ConfigError> {
        let binning = Self { bins, low, high };
        binning.validate(field)?;
        Ok(binning)
    }

    pub fn validate(&self, field: impl Into<String>) -> Result<(), ConfigError> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            return Err(ConfigError::InvalidRange {
                field: field.into(),
                min: self.low,
                max: self.high,
            });
        }
        if self.bins == 0 {
            return Err(ConfigError::InvalidBinning {
                field: field.into(),
                reason: "bin count must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Binning of both axes of a 2-D estimator-correlation QA histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationQaBinning {
    pub x: HistogramBinning,
    pub y: HistogramBinning,
}

/// Linear band between two estimators of the same quantity.
///
/// Only the parameters are carried; the analysis task evaluates the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCut {
    pub slope: f64,
    pub offset: f64,
}

impl CorrelationCut {
    pub fn new(slope: f64, offset: f64) -> Self {
        Self { slope, offset }
    }

    pub fn validate(&self, pair: impl Into<String>) -> Result<(), ConfigError> {
        if !self.slope.is_finite() || !self.offset.is_finite() {
            return Err(ConfigError::InvalidCorrelationCut {
                pair: pair.into(),
                slope: self.slope,
                offset: self.offset,
            });
        }
        Ok(())
    }
}

/// Check variable-width bin edges: at least two, finite, strictly increasing
pub fn validate_bin_edges(field: &str, edges: &[f64]) -> Result<(), ConfigError> {
    if edges.len() < 2 {
        return Err(ConfigError::InvalidBinning {
            field: field.to_string(),
            reason: format!("need at least 2 edges, got {}", edges.len()),
        });
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(ConfigError::InvalidBinning {
            field: field.to_string(),
            reason: "edges must be finite".to_string(),
        });
    }
    if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
        return Err(ConfigError::InvalidBinning {
            field: field.to_string(),
            reason: format!("edges not strictly increasing at {} -> {}", w[0], w[1]),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_inverted_bounds() {
        assert!(CentralityWindow::new(10.0, 0.0).is_err());
        assert!(CentralityWindow::new(f64::NAN, 10.0).is_err());
        let window = CentralityWindow::new(5.0, 5.0).unwrap();
        assert_eq!((window.min(), window.max()), (5.0, 5.0));
    }

    #[test]
    fn window_label_uses_one_decimal() {
        let window = CentralityWindow::new(0.0, 10.0).unwrap();
        assert_eq!(window.label(), "0.0-10.0");
    }

    #[test]
    fn selection_range_invariant() {
        assert!(SelectionRange::new("DCAXY", -2.2, 2.2).is_ok());
        let err = SelectionRange::new("DCAXY", 2.2, -2.2).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { ref field, .. } if field == "DCAXY"));
    }

    #[test]
    fn binning_needs_a_bin() {
        assert!(HistogramBinning::new("PT", 0, 0.0, 1.0).is_err());
        let binning = HistogramBinning::new("PT", 480, 0.2, 5.0).unwrap();
        assert_eq!(binning.bins, 480);
    }

    #[test]
    fn bin_edges_must_increase() {
        assert!(validate_bin_edges("PT", &[0.2, 0.5, 1.0]).is_ok());
        assert!(validate_bin_edges("PT", &[0.2]).is_err());
        assert!(validate_bin_edges("PT", &[0.2, 0.2, 1.0]).is_err());
    }
}
