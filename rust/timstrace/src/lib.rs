//! Ion mobility trace building.
//!
//! Groups centroided (m/z, intensity) observations from mobility resolved
//! frames into traces: disjoint m/z intervals, each collecting the points of
//! one putative species across frames. See [`builder`] for the algorithm.

// Declare modules
pub mod builder;
pub mod errors;
pub mod models;
pub mod traits;
pub mod utils;

// Re-export main structures
pub use crate::builder::{
    BuildMonitor,
    BuildOutcome,
    BuildPhase,
    BuildStats,
    RtPointsPolicy,
    ScanSelection,
    TraceBuilder,
    TraceBuilderConfig,
};
pub use crate::models::{
    CentroidPeak,
    Frame,
    IntervalIndex,
    MobilityScan,
    MzInterval,
    MzTolerance,
    Polarity,
    PointOrder,
    RepresentativeMzPolicy,
    Trace,
    TracePoint,
    TraceSummary,
};
pub use crate::utils::TupleRange;

// Re-export traits
pub use crate::traits::{
    FrameLike,
    MobilityScanLike,
};

// Re-export errors
pub use crate::errors::TraceBuildError;
