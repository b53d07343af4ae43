use nohash_hasher::IntMap;

use super::config::{
    RtPointsPolicy,
    TraceBuilderConfig,
};
use crate::models::trace::Trace;

/// Whether a trace is big enough to be reported.
///
/// The RT points threshold is checked according to the configured
/// [`RtPointsPolicy`]. With the default (`Distinct`) the RT values do not
/// need to be contiguous, a trace scattered over the whole run passes as
/// long as it has enough distinct RTs.
pub(crate) fn qualifies(
    trace: &Trace,
    config: &TraceBuilderConfig,
    frame_positions: &IntMap<u32, usize>,
) -> bool {
    if trace.len() < config.min_total_signals {
        return false;
    }
    let rt_points = match config.rt_points_policy {
        RtPointsPolicy::Distinct => trace.distinct_rt_count(),
        RtPointsPolicy::ConsecutiveFrames => {
            longest_frame_run(trace, frame_positions).saturating_sub(1)
        }
    };
    rt_points >= config.min_rt_points
}

/// Length of the longest run of back-to-back selected frames with at
/// least one member of the trace.
fn longest_frame_run(trace: &Trace, frame_positions: &IntMap<u32, usize>) -> usize {
    let mut positions: Vec<usize> = trace
        .points()
        .iter()
        .filter_map(|p| frame_positions.get(&p.frame_id).copied())
        .collect();
    positions.sort_unstable();
    positions.dedup();

    let mut best = 0;
    let mut run = 0;
    let mut last: Option<usize> = None;
    for pos in positions {
        run = match last {
            Some(prev) if prev + 1 == pos => run + 1,
            _ => 1,
        };
        best = best.max(run);
        last = Some(pos);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::indices::MzInterval;
    use crate::models::point::testing_point;

    const IV: MzInterval = MzInterval {
        lower: 99.0,
        upper: 101.0,
    };

    fn trace_with_frames(frames: &[(u32, f32)]) -> Trace {
        let mut iter = frames.iter();
        let (f, rt) = iter.next().unwrap();
        let mut trace = Trace::new(testing_point(100.0, 1.0, *rt, *f), IV);
        for (f, rt) in iter {
            trace.push(testing_point(100.0, 1.0, *rt, *f));
        }
        trace
    }

    fn positions(n: u32) -> IntMap<u32, usize> {
        (0..n).map(|i| (i, i as usize)).collect()
    }

    fn config(min_total_signals: usize, min_rt_points: usize, policy: RtPointsPolicy) -> TraceBuilderConfig {
        TraceBuilderConfig {
            min_total_signals,
            min_rt_points,
            rt_points_policy: policy,
            ..Default::default()
        }
    }

    #[test]
    fn test_min_total_signals_boundary() {
        let trace = trace_with_frames(&[(0, 0.0), (1, 0.1), (2, 0.2)]);
        let pos = positions(3);
        assert!(qualifies(&trace, &config(3, 1, RtPointsPolicy::Distinct), &pos));
        assert!(!qualifies(&trace, &config(4, 1, RtPointsPolicy::Distinct), &pos));
    }

    #[test]
    fn test_distinct_rt_ignores_gaps() {
        // Frames 0, 5 and 9, nowhere near each other
        let trace = trace_with_frames(&[(0, 0.0), (5, 0.5), (9, 0.9), (9, 0.9)]);
        let pos = positions(10);
        assert!(qualifies(&trace, &config(1, 3, RtPointsPolicy::Distinct), &pos));
        assert!(!qualifies(&trace, &config(1, 4, RtPointsPolicy::Distinct), &pos));
        assert!(!qualifies(
            &trace,
            &config(1, 2, RtPointsPolicy::ConsecutiveFrames),
            &pos
        ));
    }

    #[test]
    fn test_longest_frame_run() {
        let trace = trace_with_frames(&[(1, 0.1), (2, 0.2), (4, 0.4), (5, 0.5), (6, 0.6), (6, 0.6)]);
        assert_eq!(longest_frame_run(&trace, &positions(10)), 3);
        // A run of 3 frames holds 2 adjacent pairs
        assert!(qualifies(
            &trace,
            &config(1, 2, RtPointsPolicy::ConsecutiveFrames),
            &positions(10)
        ));
        assert!(!qualifies(
            &trace,
            &config(1, 3, RtPointsPolicy::ConsecutiveFrames),
            &positions(10)
        ));
    }

    #[test]
    fn test_single_frame_never_has_consecutive_points() {
        let trace = trace_with_frames(&[(3, 0.3), (3, 0.3), (3, 0.3)]);
        let pos = positions(10);
        assert!(qualifies(&trace, &config(1, 1, RtPointsPolicy::Distinct), &pos));
        assert!(!qualifies(
            &trace,
            &config(1, 1, RtPointsPolicy::ConsecutiveFrames),
            &pos
        ));
    }

    #[test]
    fn test_frame_run_follows_selected_positions() {
        // Frame ids 10 and 20 are neighbors in the selected sequence
        let trace = trace_with_frames(&[(10, 1.0), (20, 2.0)]);
        let pos: IntMap<u32, usize> = [(10, 0), (20, 1)].into_iter().collect();
        assert_eq!(longest_frame_run(&trace, &pos), 2);
    }
}
