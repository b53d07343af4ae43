use std::fmt::Display;
use std::time::Duration;

/// Counters collected along a build.
///
/// Usually used for logging and performance monitoring.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub frames_selected: usize,
    pub frames_skipped: usize,
    pub scans_read: usize,
    pub points_extracted: usize,
    pub intervals_created: usize,
    /// Points that landed exactly on the lower bound of an interval.
    pub boundary_merges: usize,
    pub traces_qualified: usize,
    pub traces_rejected: usize,
    pub extraction_time: Duration,
    pub assignment_time: Duration,
    pub finalization_time: Duration,
}

impl Display for BuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Trace Building Stats:")?;
        writeln!(
            f,
            "Frames selected: {} (skipped {})",
            self.frames_selected, self.frames_skipped
        )?;
        writeln!(f, "Mobility scans read: {}", self.scans_read)?;
        writeln!(f, "Points extracted: {}", self.points_extracted)?;
        writeln!(f, "Intervals created: {}", self.intervals_created)?;
        writeln!(f, "Boundary merges: {}", self.boundary_merges)?;
        writeln!(
            f,
            "Traces kept: {} (rejected {})",
            self.traces_qualified, self.traces_rejected
        )?;
        writeln!(f, "Extraction time: {:.2?}", self.extraction_time)?;
        writeln!(f, "Assignment time: {:.2?}", self.assignment_time)?;
        writeln!(f, "Finalization time: {:.2?}", self.finalization_time)?;
        Ok(())
    }
}
