use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::{
    Result,
    TraceBuildError,
};
use crate::models::frames::Polarity;
use crate::models::point::PointOrder;
use crate::models::tolerance::MzTolerance;
use crate::models::trace::RepresentativeMzPolicy;
use crate::traits::FrameLike;
use crate::utils::TupleRange;

/// Filter applied to frames before any point is extracted.
///
/// Every `None` field leaves that dimension unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSelection {
    #[serde(default)]
    pub ms_level: Option<u8>,
    #[serde(default)]
    pub rt_range_minutes: Option<TupleRange<f32>>,
    #[serde(default)]
    pub polarity: Option<Polarity>,
}

impl ScanSelection {
    pub fn matches<F: FrameLike>(&self, frame: &F) -> bool {
        self.ms_level.is_none_or(|lvl| frame.ms_level() == lvl)
            && self
                .rt_range_minutes
                .is_none_or(|rt| rt.contains(frame.rt_minutes()))
            && self.polarity.is_none_or(|pol| frame.polarity() == pol)
    }
}

/// What the minimum RT points threshold counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RtPointsPolicy {
    /// Number of distinct RT values among the members, wherever they are.
    #[default]
    #[serde(rename = "distinct")]
    Distinct,
    /// Adjacent pairs in the longest run of back-to-back selected frames
    /// holding at least one member. A run of `n` frames counts `n - 1`, so
    /// a trace seen in a single frame never passes.
    #[serde(rename = "consecutive_frames")]
    ConsecutiveFrames,
}

/// Configuration of a [`TraceBuilder`](super::TraceBuilder).
///
/// Example:
/// ```
/// use timstrace::TraceBuilderConfig;
///
/// let config: TraceBuilderConfig = serde_json::from_str(r#"{
///     "mz_tolerance": {"absolute": 0.002, "ppm": 10.0},
///     "min_total_signals": 20,
///     "min_rt_points": 3
/// }"#).unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceBuilderConfig {
    pub mz_tolerance: MzTolerance,
    /// Minimum number of points a trace needs to be kept.
    pub min_total_signals: usize,
    /// Minimum number of RT points a trace needs, see [`RtPointsPolicy`].
    pub min_rt_points: usize,
    #[serde(default)]
    pub scan_selection: ScanSelection,
    #[serde(default)]
    pub point_order: PointOrder,
    #[serde(default)]
    pub rt_points_policy: RtPointsPolicy,
    #[serde(default)]
    pub representative_mz_policy: RepresentativeMzPolicy,
}

impl Default for TraceBuilderConfig {
    fn default() -> Self {
        Self {
            mz_tolerance: MzTolerance::default(),
            min_total_signals: 50,
            min_rt_points: 5,
            scan_selection: ScanSelection {
                ms_level: Some(1),
                ..Default::default()
            },
            point_order: PointOrder::default(),
            rt_points_policy: RtPointsPolicy::default(),
            representative_mz_policy: RepresentativeMzPolicy::default(),
        }
    }
}

impl TraceBuilderConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.mz_tolerance.is_valid() {
            return Err(TraceBuildError::InvalidConfig(format!(
                "m/z tolerance components must be finite and non-negative, got {:?}",
                self.mz_tolerance
            )));
        }
        if self.min_total_signals == 0 {
            return Err(TraceBuildError::InvalidConfig(
                "min_total_signals must be at least 1".to_string(),
            ));
        }
        if self.min_rt_points == 0 {
            return Err(TraceBuildError::InvalidConfig(
                "min_rt_points must be at least 1".to_string(),
            ));
        }
        // Deserialization does not go through `TupleRange::try_new`
        if let Some(rt) = self.scan_selection.rt_range_minutes {
            if TupleRange::try_new(rt.start(), rt.end()).is_err() {
                return Err(TraceBuildError::InvalidConfig(format!(
                    "RT range must be ordered, got {:?}",
                    rt.as_tuple()
                )));
            }
        }
        Ok(())
    }
}
