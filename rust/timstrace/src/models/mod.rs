pub mod frames;
pub mod indices;
pub mod point;
pub mod tolerance;
pub mod trace;

pub use frames::{
    CentroidPeak,
    Frame,
    MobilityScan,
    Polarity,
};
pub use indices::{
    IntervalIndex,
    MzInterval,
};
pub use point::{
    PointOrder,
    TracePoint,
};
pub use tolerance::MzTolerance;
pub use trace::{
    RepresentativeMzPolicy,
    Trace,
    TraceSummary,
};
