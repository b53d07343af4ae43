//! Streaming construction of m/z traces from mobility resolved frames.
//!
//! A build runs three phases, strictly in order:
//! 1. Extracting: every centroid of every selected frame becomes a [`TracePoint`].
//! 2. Assigning: points are sorted by intensity and assigned, one at a
//!    time, to disjoint m/z intervals (each interval owns one trace).
//! 3. Finalizing: traces that pass the size thresholds are summarized,
//!    in ascending m/z order.
//!
//! Cancellation is checked between frames and between points/traces and
//! discards everything built so far.

mod assignment;
pub mod config;
mod extraction;
mod finalization;
pub mod monitor;
pub mod stats;

pub use config::{
    RtPointsPolicy,
    ScanSelection,
    TraceBuilderConfig,
};
pub use monitor::{
    BuildMonitor,
    BuildPhase,
};
pub use stats::BuildStats;

use nohash_hasher::IntMap;
use std::time::Instant;
use tracing::{
    debug,
    error,
    info,
    instrument,
};

use crate::errors::{
    Result,
    TraceBuildError,
};
use crate::models::point::{
    TracePoint,
    sort_by_intensity,
};
use crate::models::trace::{
    Trace,
    TraceSummary,
};
use crate::traits::FrameLike;
use assignment::{
    Assignment,
    TraceAssigner,
};

/// Share of the progress bar each of the three phases accounts for.
pub(crate) const PHASE_WEIGHT: f64 = 1.0 / 3.0;

/// Result of a build that did not fail.
#[derive(Debug)]
pub enum BuildOutcome {
    /// Qualifying traces in ascending m/z order.
    Completed {
        traces: Vec<TraceSummary>,
        stats: BuildStats,
    },
    /// The monitor was cancelled, nothing is returned.
    Cancelled,
}

impl BuildOutcome {
    pub fn traces(&self) -> Option<&[TraceSummary]> {
        match self {
            BuildOutcome::Completed { traces, .. } => Some(traces),
            BuildOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BuildOutcome::Cancelled)
    }
}

/// Groups points into traces: contiguous, non-overlapping m/z regions
/// observed across frames.
///
/// The builder only holds the configuration, all the state of a build
/// (interval index, traces) lives inside a single call, so one builder can
/// be used for many independent builds (including concurrently).
///
/// # Example
///
/// ```
/// use timstrace::{BuildMonitor, Frame, MobilityScan, MzTolerance, TraceBuilder, TraceBuilderConfig};
///
/// let frames: Vec<Frame> = (0..3)
///     .map(|i| Frame {
///         frame_id: i,
///         ms_level: 1,
///         rt_minutes: i as f32 * 0.1,
///         polarity: Default::default(),
///         mobility_scans: vec![MobilityScan::new(0, 1.0, [(500.0, 100.0 + i as f64)])],
///     })
///     .collect();
///
/// let config = TraceBuilderConfig {
///     mz_tolerance: MzTolerance::absolute(0.01),
///     min_total_signals: 3,
///     min_rt_points: 3,
///     ..Default::default()
/// };
/// let builder = TraceBuilder::new(config).unwrap();
/// let outcome = builder.build(&frames, &BuildMonitor::new()).unwrap();
/// let traces = outcome.traces().unwrap();
/// assert_eq!(traces.len(), 1);
/// assert_eq!(traces[0].points.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    config: TraceBuilderConfig,
}

impl TraceBuilder {
    pub fn new(config: TraceBuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TraceBuilderConfig {
        &self.config
    }

    /// Builds traces from the frames matching the configured scan selection.
    ///
    /// Frames are expected in acquisition order. Fails on the first
    /// selected mobility scan without centroided data.
    #[instrument(level = "debug", skip_all)]
    pub fn build<F: FrameLike>(&self, frames: &[F], monitor: &BuildMonitor) -> Result<BuildOutcome> {
        if monitor.is_cancelled() {
            return Ok(Self::cancelled(monitor));
        }
        let mut stats = BuildStats::default();
        monitor.set_phase(BuildPhase::Extracting);

        let st = Instant::now();
        let extracted = extraction::extract_points(
            frames,
            &self.config.scan_selection,
            monitor,
            &mut stats,
        );
        stats.extraction_time = st.elapsed();

        let extracted = match extracted {
            Ok(Some(x)) => x,
            Ok(None) => return Ok(Self::cancelled(monitor)),
            Err(e) => return Err(Self::failed(monitor, e)),
        };

        self.build_from_extracted(extracted.points, &extracted.frame_positions, monitor, stats)
    }

    /// Builds traces from an already extracted point stream.
    ///
    /// The scan selection is not applied. Intensities are checked the same
    /// way as during extraction. Frame adjacency (for
    /// [`RtPointsPolicy::ConsecutiveFrames`]) is derived from the frames
    /// present in the stream, ordered by RT.
    pub fn build_from_points(
        &self,
        points: Vec<TracePoint>,
        monitor: &BuildMonitor,
    ) -> Result<BuildOutcome> {
        if monitor.is_cancelled() {
            return Ok(Self::cancelled(monitor));
        }
        monitor.set_phase(BuildPhase::Extracting);
        if let Some(p) = points
            .iter()
            .find(|p| !(p.intensity >= 0.0 && p.intensity.is_finite()))
        {
            return Err(Self::failed(
                monitor,
                TraceBuildError::InvalidIntensity {
                    frame_id: p.frame_id,
                    scan_id: p.scan_id,
                    mz: p.mz,
                    intensity: p.intensity,
                },
            ));
        }
        let stats = BuildStats {
            points_extracted: points.len(),
            ..Default::default()
        };
        let frame_positions = extraction::frame_positions_from_points(&points);
        monitor.set_progress(PHASE_WEIGHT);
        self.build_from_extracted(points, &frame_positions, monitor, stats)
    }

    fn build_from_extracted(
        &self,
        mut points: Vec<TracePoint>,
        frame_positions: &IntMap<u32, usize>,
        monitor: &BuildMonitor,
        stats: BuildStats,
    ) -> Result<BuildOutcome> {
        sort_by_intensity(&mut points, self.config.point_order);
        let num_points = points.len();
        self.build_from_ordered(points, num_points, frame_positions, monitor, stats)
    }

    /// Runs the assignment and finalization phases over points already in
    /// processing order.
    pub(crate) fn build_from_ordered(
        &self,
        points: impl IntoIterator<Item = TracePoint>,
        num_points: usize,
        frame_positions: &IntMap<u32, usize>,
        monitor: &BuildMonitor,
        mut stats: BuildStats,
    ) -> Result<BuildOutcome> {
        monitor.set_phase(BuildPhase::Assigning);
        let st = Instant::now();
        let assigner = match self.assign(points, num_points, monitor, &mut stats) {
            Ok(Some(x)) => x,
            Ok(None) => return Ok(Self::cancelled(monitor)),
            Err(e) => return Err(Self::failed(monitor, e)),
        };
        stats.assignment_time = st.elapsed();

        monitor.set_phase(BuildPhase::Finalizing);
        let st = Instant::now();
        let Some(traces) = self.finalize(
            assigner.ordered_traces(),
            assigner.num_traces(),
            frame_positions,
            monitor,
            &mut stats,
        ) else {
            return Ok(Self::cancelled(monitor));
        };
        stats.finalization_time = st.elapsed();

        info!("Trace building finished\n{}", stats);
        monitor.set_progress(1.0);
        monitor.set_phase(BuildPhase::Done);
        Ok(BuildOutcome::Completed { traces, stats })
    }

    #[instrument(level = "debug", skip_all)]
    fn assign(
        &self,
        points: impl IntoIterator<Item = TracePoint>,
        num_points: usize,
        monitor: &BuildMonitor,
        stats: &mut BuildStats,
    ) -> Result<Option<TraceAssigner>> {
        info!("Start m/z ranges calculation for {} points", num_points);
        let mut assigner = TraceAssigner::new(self.config.mz_tolerance);
        let step = PHASE_WEIGHT / num_points.max(1) as f64;

        for (i, point) in points.into_iter().enumerate() {
            if monitor.is_cancelled() {
                return Ok(None);
            }
            match assigner.assign(point)? {
                Assignment::Created(_) => stats.intervals_created += 1,
                Assignment::Merged(_) => stats.boundary_merges += 1,
                Assignment::Extended(_) => {}
            }
            monitor.set_progress(PHASE_WEIGHT + (i + 1) as f64 * step);
        }

        info!("Created {} m/z intervals", assigner.num_traces());
        Ok(Some(assigner))
    }

    #[instrument(level = "debug", skip_all)]
    fn finalize<'a>(
        &self,
        traces: impl IntoIterator<Item = &'a Trace>,
        num_traces: usize,
        frame_positions: &IntMap<u32, usize>,
        monitor: &BuildMonitor,
        stats: &mut BuildStats,
    ) -> Option<Vec<TraceSummary>> {
        let step = PHASE_WEIGHT / num_traces.max(1) as f64;
        let mut out = Vec::new();

        for (i, trace) in traces.into_iter().enumerate() {
            if monitor.is_cancelled() {
                return None;
            }
            if finalization::qualifies(trace, &self.config, frame_positions) {
                out.push(trace.summarize(self.config.representative_mz_policy));
                stats.traces_qualified += 1;
            } else {
                debug!(
                    "Dropping trace at m/z {} with {} points",
                    trace.mz(),
                    trace.len()
                );
                stats.traces_rejected += 1;
            }
            monitor.set_progress(2.0 * PHASE_WEIGHT + (i + 1) as f64 * step);
        }
        Some(out)
    }

    fn cancelled(monitor: &BuildMonitor) -> BuildOutcome {
        info!("Trace building cancelled, discarding partial results");
        monitor.set_phase(BuildPhase::Cancelled);
        BuildOutcome::Cancelled
    }

    fn failed(monitor: &BuildMonitor, e: TraceBuildError) -> TraceBuildError {
        error!("Trace building failed: {}", e);
        monitor.set_phase(BuildPhase::Failed);
        e
    }
}
