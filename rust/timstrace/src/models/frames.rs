use serde::{
    Deserialize,
    Serialize,
};

use crate::traits::{
    FrameLike,
    MobilityScanLike,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "negative")]
    Negative,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentroidPeak {
    pub mz: f64,
    pub intensity: f64,
}

/// In-memory mobility scan, also the on-disk (json) representation
/// used by the command line tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobilityScan {
    pub scan_id: u32,
    pub mobility: f64,
    /// `None` (or a missing key in json) marks a scan without centroided data.
    #[serde(default)]
    pub centroids: Option<Vec<CentroidPeak>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub frame_id: u32,
    pub ms_level: u8,
    pub rt_minutes: f32,
    #[serde(default)]
    pub polarity: Polarity,
    pub mobility_scans: Vec<MobilityScan>,
}

impl MobilityScan {
    pub fn new(scan_id: u32, mobility: f64, peaks: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            scan_id,
            mobility,
            centroids: Some(
                peaks
                    .into_iter()
                    .map(|(mz, intensity)| CentroidPeak { mz, intensity })
                    .collect(),
            ),
        }
    }

    pub fn without_centroids(scan_id: u32, mobility: f64) -> Self {
        Self {
            scan_id,
            mobility,
            centroids: None,
        }
    }
}

impl MobilityScanLike for MobilityScan {
    fn scan_id(&self) -> u32 {
        self.scan_id
    }

    fn mobility(&self) -> f64 {
        self.mobility
    }

    fn centroids(&self) -> Option<&[CentroidPeak]> {
        self.centroids.as_deref()
    }
}

impl FrameLike for Frame {
    type Scan = MobilityScan;

    fn frame_id(&self) -> u32 {
        self.frame_id
    }

    fn ms_level(&self) -> u8 {
        self.ms_level
    }

    fn rt_minutes(&self) -> f32 {
        self.rt_minutes
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn mobility_scans(&self) -> &[MobilityScan] {
        &self.mobility_scans
    }
}
