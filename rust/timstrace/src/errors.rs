use thiserror::Error;

/// Terminal failures of a trace build.
///
/// Cancellation is not an error, it is reported as
/// [`BuildOutcome::Cancelled`](crate::builder::BuildOutcome::Cancelled).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceBuildError {
    /// A mobility scan that should be centroided has no peak list.
    #[error(
        "Mobility scan #{scan_id} of frame #{frame_id} does not have centroided data, run peak detection first"
    )]
    MissingCentroidData { frame_id: u32, scan_id: u32 },

    /// A centroid intensity is negative, NaN or infinite.
    #[error(
        "Peak at m/z {mz} of mobility scan #{scan_id} of frame #{frame_id} has invalid intensity {intensity}"
    )]
    InvalidIntensity {
        frame_id: u32,
        scan_id: u32,
        mz: f64,
        intensity: f64,
    },

    /// The interval assignment reached a state it cannot resolve,
    /// usually a zero (or non-finite) m/z tolerance or a non-finite m/z.
    #[error("Incorrect range [{lower}, {upper}] for m/z {mz}")]
    IllegalAssignmentState { mz: f64, lower: f64, upper: f64 },

    #[error("Invalid trace builder configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TraceBuildError>;
