use serde::{
    Deserialize,
    Serialize,
};

/// One centroided observation, tagged with where it was measured.
///
/// Points are plain values: once extracted they are moved into exactly one
/// trace and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub mz: f64,
    pub intensity: f64,
    pub rt_minutes: f32,
    pub mobility: f64,
    pub frame_id: u32,
    pub scan_id: u32,
}

/// Order in which extracted points are offered to the interval assignment.
///
/// The order decides interval shapes (an interval is opened by whichever
/// point reaches an empty region first), so it is part of the contract of a
/// build and not an implementation detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointOrder {
    /// Weakest signals first.
    #[default]
    #[serde(rename = "ascending_intensity")]
    AscendingIntensity,
    /// Strongest signals first.
    #[serde(rename = "descending_intensity")]
    DescendingIntensity,
}

/// Sorts the points in place, ties keep their extraction order.
pub fn sort_by_intensity(points: &mut [TracePoint], order: PointOrder) {
    match order {
        PointOrder::AscendingIntensity => {
            points.sort_by(|a, b| a.intensity.total_cmp(&b.intensity));
        }
        PointOrder::DescendingIntensity => {
            points.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        }
    }
}

#[cfg(test)]
pub(crate) fn testing_point(mz: f64, intensity: f64, rt_minutes: f32, frame_id: u32) -> TracePoint {
    TracePoint {
        mz,
        intensity,
        rt_minutes,
        mobility: 1.0,
        frame_id,
        scan_id: 0,
    }
}
