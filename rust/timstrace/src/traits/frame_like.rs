use crate::models::frames::{
    CentroidPeak,
    Polarity,
};

/// A single mobility resolved spectrum inside a frame.
pub trait MobilityScanLike {
    fn scan_id(&self) -> u32;
    fn mobility(&self) -> f64;
    /// Centroided (m/z, intensity) peaks of the scan.
    ///
    /// `None` means the scan was never centroided, which aborts a build.
    /// An empty slice is a valid scan with no signal.
    fn centroids(&self) -> Option<&[CentroidPeak]>;
}

/// One acquisition cycle at a given retention time.
///
/// This is the seam between the trace builder and whatever reads the raw
/// data; anything exposing these accessors can be fed to
/// [`TraceBuilder::build`](crate::builder::TraceBuilder::build).
pub trait FrameLike {
    type Scan: MobilityScanLike;

    fn frame_id(&self) -> u32;
    fn ms_level(&self) -> u8;
    fn rt_minutes(&self) -> f32;
    fn polarity(&self) -> Polarity;
    fn mobility_scans(&self) -> &[Self::Scan];
}
