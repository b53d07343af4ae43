use serde::{
    Deserialize,
    Serialize,
};

/// M/Z tolerance used to open new trace intervals.
///
/// The half width of the window is the larger of the absolute and the
/// relative (ppm) component, so low m/z values are governed by the absolute
/// term and high m/z values by the ppm term.
///
/// Example:
/// ```
/// use timstrace::MzTolerance;
///
/// let tol = MzTolerance { absolute: 0.002, ppm: 10.0 };
/// // 10 ppm of 100 is 0.001, the absolute term wins.
/// assert_eq!(tol.half_width(100.0), 0.002);
/// // 10 ppm of 1000 is 0.01, the relative term wins.
/// assert!((tol.half_width(1000.0) - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzTolerance {
    /// Absolute component in daltons.
    pub absolute: f64,
    /// Relative component in parts per million.
    pub ppm: f64,
}

impl Default for MzTolerance {
    fn default() -> Self {
        Self {
            absolute: 0.002,
            ppm: 10.0,
        }
    }
}

impl MzTolerance {
    pub fn absolute(absolute: f64) -> Self {
        Self { absolute, ppm: 0.0 }
    }

    pub fn ppm(ppm: f64) -> Self {
        Self { absolute: 0.0, ppm }
    }

    pub fn half_width(&self, mz: f64) -> f64 {
        self.absolute.max(mz * self.ppm / 1e6)
    }

    /// Bounds of the closed tolerance window `[mz - w, mz + w]`.
    pub fn bounds(&self, mz: f64) -> (f64, f64) {
        let w = self.half_width(mz);
        (mz - w, mz + w)
    }

    pub fn is_valid(&self) -> bool {
        self.absolute.is_finite() && self.ppm.is_finite() && self.absolute >= 0.0 && self.ppm >= 0.0
    }
}
