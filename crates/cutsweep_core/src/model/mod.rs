mod configuration;
mod estimators;
mod ids;
mod quantities;
mod ranges;

pub use configuration::{
    AnalysisConfiguration, CorrelatorSettings, FilterBit, Lineage, Toggle, Toggles,
};
pub use estimators::{Estimator, EstimatorFamily, EstimatorPair};
pub use ids::{ContainerId, TaskId};
pub use quantities::{
    CentralityEstimator, EventQuantity, MultiplicityEstimator, Quantity, TrackQuantity,
};
pub use ranges::{
    CentralityWindow, CorrelationCut, CorrelationQaBinning, HistogramBinning, SelectionRange,
    validate_bin_edges,
};
