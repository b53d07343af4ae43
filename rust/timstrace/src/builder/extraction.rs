use nohash_hasher::IntMap;
use tracing::{
    info,
    instrument,
};

use super::config::ScanSelection;
use super::monitor::BuildMonitor;
use super::stats::BuildStats;
use super::PHASE_WEIGHT;
use crate::errors::{
    Result,
    TraceBuildError,
};
use crate::models::point::TracePoint;
use crate::traits::{
    FrameLike,
    MobilityScanLike,
};

/// Points pulled out of the selected frames, in extraction order.
#[derive(Debug, Default)]
pub(crate) struct ExtractedPoints {
    pub points: Vec<TracePoint>,
    /// Position of each selected frame id in the selected frame sequence.
    pub frame_positions: IntMap<u32, usize>,
}

/// Turns every centroid of every mobility scan of the selected frames into a point.
///
/// Returns `Ok(None)` if the monitor was cancelled between two frames.
#[instrument(level = "debug", skip_all)]
pub(crate) fn extract_points<F: FrameLike>(
    frames: &[F],
    selection: &ScanSelection,
    monitor: &BuildMonitor,
    stats: &mut BuildStats,
) -> Result<Option<ExtractedPoints>> {
    info!("Start data point extraction from {} frames", frames.len());
    let mut out = ExtractedPoints::default();
    let num_frames = frames.len().max(1) as f64;

    for (i, frame) in frames.iter().enumerate() {
        if monitor.is_cancelled() {
            return Ok(None);
        }
        if !selection.matches(frame) {
            stats.frames_skipped += 1;
            continue;
        }

        let frame_id = frame.frame_id();
        let rt_minutes = frame.rt_minutes();
        for scan in frame.mobility_scans() {
            let Some(centroids) = scan.centroids() else {
                return Err(TraceBuildError::MissingCentroidData {
                    frame_id,
                    scan_id: scan.scan_id(),
                });
            };
            let scan_id = scan.scan_id();
            let mobility = scan.mobility();
            out.points.reserve(centroids.len());
            for peak in centroids {
                if !(peak.intensity >= 0.0 && peak.intensity.is_finite()) {
                    return Err(TraceBuildError::InvalidIntensity {
                        frame_id,
                        scan_id,
                        mz: peak.mz,
                        intensity: peak.intensity,
                    });
                }
                out.points.push(TracePoint {
                    mz: peak.mz,
                    intensity: peak.intensity,
                    rt_minutes,
                    mobility,
                    frame_id,
                    scan_id,
                });
            }
            stats.scans_read += 1;
        }

        let position = out.frame_positions.len();
        out.frame_positions.insert(frame_id, position);
        stats.frames_selected += 1;
        monitor.set_progress(((i + 1) as f64 / num_frames) * PHASE_WEIGHT);
    }

    stats.points_extracted = out.points.len();
    info!(
        "Extracted {} ims data points from {} frames",
        out.points.len(),
        stats.frames_selected
    );
    Ok(Some(out))
}

/// Frame positions for a stream of points that did not come from frames,
/// ordered by (RT, frame id) of the frames present in the stream.
pub(crate) fn frame_positions_from_points(points: &[TracePoint]) -> IntMap<u32, usize> {
    let mut frames: Vec<(f32, u32)> = points.iter().map(|p| (p.rt_minutes, p.frame_id)).collect();
    frames.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    frames.dedup_by_key(|x| x.1);

    let mut positions = IntMap::default();
    for (_, frame_id) in frames {
        let position = positions.len();
        positions.entry(frame_id).or_insert(position);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frames::{
        Frame,
        MobilityScan,
        Polarity,
    };

    fn frame(frame_id: u32, ms_level: u8, rt: f32, scans: Vec<MobilityScan>) -> Frame {
        Frame {
            frame_id,
            ms_level,
            rt_minutes: rt,
            polarity: Polarity::Positive,
            mobility_scans: scans,
        }
    }

    #[test]
    fn test_points_are_tagged_with_their_origin() {
        let frames = vec![
            frame(
                7,
                1,
                2.5,
                vec![
                    MobilityScan::new(0, 1.2, [(500.0, 10.0), (600.0, 20.0)]),
                    MobilityScan::new(1, 1.1, [(700.0, 5.0)]),
                ],
            ),
            frame(8, 2, 2.6, vec![MobilityScan::new(0, 1.2, [(800.0, 1.0)])]),
        ];
        let selection = ScanSelection {
            ms_level: Some(1),
            ..Default::default()
        };
        let monitor = BuildMonitor::new();
        let mut stats = BuildStats::default();
        let out = extract_points(&frames, &selection, &monitor, &mut stats)
            .unwrap()
            .unwrap();

        assert_eq!(out.points.len(), 3);
        assert_eq!(stats.frames_selected, 1);
        assert_eq!(stats.frames_skipped, 1);
        assert_eq!(stats.scans_read, 2);
        let last = out.points[2];
        assert_eq!(last.mz, 700.0);
        assert_eq!(last.frame_id, 7);
        assert_eq!(last.scan_id, 1);
        assert_eq!(last.mobility, 1.1);
        assert_eq!(last.rt_minutes, 2.5);
        assert_eq!(out.frame_positions.get(&7), Some(&0));
        assert!(out.frame_positions.get(&8).is_none());
    }

    #[test]
    fn test_missing_centroids_abort() {
        let frames = vec![
            frame(1, 1, 1.0, vec![MobilityScan::new(0, 1.0, [(500.0, 10.0)])]),
            frame(
                2,
                1,
                1.1,
                vec![
                    MobilityScan::new(0, 1.0, [(500.0, 10.0)]),
                    MobilityScan::without_centroids(1, 0.9),
                ],
            ),
        ];
        let monitor = BuildMonitor::new();
        let mut stats = BuildStats::default();
        let err = extract_points(&frames, &ScanSelection::default(), &monitor, &mut stats)
            .unwrap_err();
        assert_eq!(
            err,
            TraceBuildError::MissingCentroidData {
                frame_id: 2,
                scan_id: 1
            }
        );
    }

    #[test]
    fn test_invalid_intensities_abort() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let frames = vec![frame(
                4,
                1,
                1.0,
                vec![MobilityScan::new(2, 1.0, [(500.0, 10.0), (501.5, bad)])],
            )];
            let monitor = BuildMonitor::new();
            let mut stats = BuildStats::default();
            let err = extract_points(&frames, &ScanSelection::default(), &monitor, &mut stats)
                .unwrap_err();
            match err {
                TraceBuildError::InvalidIntensity {
                    frame_id,
                    scan_id,
                    mz,
                    ..
                } => assert_eq!((frame_id, scan_id, mz), (4, 2, 501.5)),
                other => panic!("Unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_intensity_is_accepted() {
        let frames = vec![frame(1, 1, 1.0, vec![MobilityScan::new(0, 1.0, [(500.0, 0.0)])])];
        let monitor = BuildMonitor::new();
        let mut stats = BuildStats::default();
        let out = extract_points(&frames, &ScanSelection::default(), &monitor, &mut stats)
            .unwrap()
            .unwrap();
        assert_eq!(out.points.len(), 1);
    }

    #[test]
    fn test_missing_centroids_in_skipped_frame_are_ignored() {
        let frames = vec![frame(1, 2, 1.0, vec![MobilityScan::without_centroids(0, 1.0)])];
        let selection = ScanSelection {
            ms_level: Some(1),
            ..Default::default()
        };
        let monitor = BuildMonitor::new();
        let mut stats = BuildStats::default();
        let out = extract_points(&frames, &selection, &monitor, &mut stats).unwrap();
        assert!(out.unwrap().points.is_empty());
    }

    #[test]
    fn test_cancelled_before_first_frame() {
        let frames = vec![frame(1, 1, 1.0, vec![MobilityScan::new(0, 1.0, [(500.0, 1.0)])])];
        let monitor = BuildMonitor::new();
        monitor.cancel();
        let mut stats = BuildStats::default();
        let out = extract_points(&frames, &ScanSelection::default(), &monitor, &mut stats).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_frame_positions_from_points() {
        let pts = vec![
            crate::models::point::testing_point(100.0, 1.0, 3.0, 30),
            crate::models::point::testing_point(100.0, 1.0, 1.0, 10),
            crate::models::point::testing_point(101.0, 1.0, 3.0, 30),
            crate::models::point::testing_point(100.0, 1.0, 2.0, 20),
        ];
        let positions = frame_positions_from_points(&pts);
        assert_eq!(positions.len(), 3);
        assert_eq!(positions[&10], 0);
        assert_eq!(positions[&20], 1);
        assert_eq!(positions[&30], 2);
    }
}
