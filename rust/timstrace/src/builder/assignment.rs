use tracing::debug;

use crate::errors::{
    Result,
    TraceBuildError,
};
use crate::models::indices::{
    IntervalIndex,
    MzInterval,
};
use crate::models::point::TracePoint;
use crate::models::tolerance::MzTolerance;
use crate::models::trace::Trace;

pub(crate) type TraceId = usize;

/// What happened to a point handed to [`TraceAssigner::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assignment {
    /// The point fell inside an existing interval.
    Extended(TraceId),
    /// The point opened a new interval and trace.
    Created(TraceId),
    /// The point sat exactly on the lower bound of an interval and
    /// joined it.
    Merged(TraceId),
}

/// Owns the interval index and the traces of one build.
///
/// Intervals are greedy and order dependent: a new interval spans the
/// tolerance window of the point that opens it, clipped so it does not
/// overlap its neighbors. Existing intervals are never widened or moved.
#[derive(Debug)]
pub(crate) struct TraceAssigner {
    tolerance: MzTolerance,
    index: IntervalIndex<TraceId>,
    traces: Vec<Trace>,
}

impl TraceAssigner {
    pub fn new(tolerance: MzTolerance) -> Self {
        Self {
            tolerance,
            index: IntervalIndex::new(),
            traces: Vec::new(),
        }
    }

    pub fn assign(&mut self, point: TracePoint) -> Result<Assignment> {
        let mz = point.mz;
        if let Some((_, id)) = self.index.containing(mz) {
            self.traces[id].push(point);
            return Ok(Assignment::Extended(id));
        }

        let (window_lower, window_upper) = self.tolerance.bounds(mz);
        // Nearest interval on each side that reaches into the window.
        // When an interval contains a window bound it is necessarily the
        // nearest one on that side.
        let minus = self
            .index
            .nearest_below(mz)
            .filter(|(iv, _)| iv.upper > window_lower);
        let plus = self
            .index
            .nearest_above(mz)
            .filter(|(iv, _)| iv.lower < window_upper);

        let (lower, upper) = clip_window(
            (window_lower, window_upper),
            minus.map(|(iv, _)| iv),
            plus.map(|(iv, _)| iv),
        );

        match plus {
            Some((iv, id)) if iv.lower == mz => {
                debug!("m/z {} sits on an interval bound, merging upwards", mz);
                self.traces[id].push(point);
                Ok(Assignment::Merged(id))
            }
            _ if lower < upper => {
                let id = self.traces.len();
                let interval = MzInterval { lower, upper };
                self.traces.push(Trace::new(point, interval));
                self.index.insert(interval, id);
                Ok(Assignment::Created(id))
            }
            _ => Err(TraceBuildError::IllegalAssignmentState { mz, lower, upper }),
        }
    }

    pub fn num_traces(&self) -> usize {
        self.traces.len()
    }

    /// Traces in ascending m/z order of their intervals.
    pub fn ordered_traces(&self) -> impl Iterator<Item = &Trace> + '_ {
        self.index.iter().map(|(_, id)| &self.traces[id])
    }
}

/// Bounds of a new interval: the window, with each side replaced by the
/// facing bound of the neighbor on that side.
fn clip_window(
    window: (f64, f64),
    minus: Option<MzInterval>,
    plus: Option<MzInterval>,
) -> (f64, f64) {
    match (minus, plus) {
        (None, None) => window,
        (Some(minus), None) => (minus.upper, window.1),
        (None, Some(plus)) => (window.0, plus.lower),
        (Some(minus), Some(plus)) => (minus.upper, plus.lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::point::testing_point;

    fn assign_all(tol: MzTolerance, mzs: &[f64]) -> (TraceAssigner, Vec<Assignment>) {
        let mut assigner = TraceAssigner::new(tol);
        let out = mzs
            .iter()
            .map(|&mz| assigner.assign(testing_point(mz, 1.0, 1.0, 1)).unwrap())
            .collect();
        (assigner, out)
    }

    fn intervals(assigner: &TraceAssigner) -> Vec<(f64, f64)> {
        assigner
            .ordered_traces()
            .map(|t| (t.interval().lower, t.interval().upper))
            .collect()
    }

    #[test]
    fn test_clip_window_branches() {
        let window = (9.0, 11.0);
        let minus = MzInterval {
            lower: 8.0,
            upper: 9.5,
        };
        let plus = MzInterval {
            lower: 10.5,
            upper: 12.0,
        };
        assert_eq!(clip_window(window, None, None), (9.0, 11.0));
        assert_eq!(clip_window(window, Some(minus), None), (9.5, 11.0));
        assert_eq!(clip_window(window, None, Some(plus)), (9.0, 10.5));
        assert_eq!(clip_window(window, Some(minus), Some(plus)), (9.5, 10.5));
    }

    #[test]
    fn test_point_inside_interval_extends_trace() {
        let (assigner, out) = assign_all(MzTolerance::absolute(1.0), &[10.0, 10.5, 9.5]);
        assert_eq!(
            out,
            vec![
                Assignment::Created(0),
                Assignment::Extended(0),
                Assignment::Extended(0)
            ]
        );
        assert_eq!(intervals(&assigner), vec![(9.0, 11.0)]);
    }

    #[test]
    fn test_new_interval_is_clipped_by_lower_neighbor() {
        let (assigner, out) = assign_all(MzTolerance::absolute(1.0), &[10.0, 11.5]);
        assert_eq!(out[1], Assignment::Created(1));
        assert_eq!(intervals(&assigner), vec![(9.0, 11.0), (11.0, 12.5)]);
    }

    #[test]
    fn test_new_interval_is_clipped_by_upper_neighbor() {
        let (assigner, _) = assign_all(MzTolerance::absolute(1.0), &[10.0, 8.5]);
        assert_eq!(intervals(&assigner), vec![(7.5, 9.0), (9.0, 11.0)]);
    }

    #[test]
    fn test_new_interval_is_squeezed_between_neighbors() {
        let (assigner, _) = assign_all(MzTolerance::absolute(1.0), &[10.0, 13.0, 11.5]);
        assert_eq!(
            intervals(&assigner),
            vec![(9.0, 11.0), (11.0, 12.0), (12.0, 14.0)]
        );
    }

    #[test]
    fn test_point_on_shared_bound_merges_upwards() {
        // (9, 11) and (11, 13) share the bound 11
        let (assigner, out) = assign_all(MzTolerance::absolute(1.0), &[10.0, 12.0, 11.0]);
        assert_eq!(out[2], Assignment::Merged(1));
        assert_eq!(assigner.num_traces(), 2);
        let lens: Vec<usize> = assigner.ordered_traces().map(|t| t.len()).collect();
        assert_eq!(lens, vec![1, 2]);
    }

    #[test]
    fn test_point_on_lower_bound_joins_that_interval() {
        // (9, 11) then 8.5 gives (7.5, 9), 9.0 is the lower bound of the first
        // interval and the upper bound of the second one
        let (assigner, out) = assign_all(MzTolerance::absolute(1.0), &[10.0, 8.5, 9.0]);
        assert_eq!(out[2], Assignment::Merged(0));

        // Lower bound of an interval with no neighbor below it
        let (assigner2, out) = assign_all(MzTolerance::absolute(1.0), &[10.0, 9.0]);
        assert_eq!(out[1], Assignment::Merged(0));
        assert_eq!(intervals(&assigner2), vec![(9.0, 11.0)]);
        assert_eq!(intervals(&assigner), vec![(7.5, 9.0), (9.0, 11.0)]);
    }

    #[test]
    fn test_zero_tolerance_is_an_illegal_state() {
        let mut assigner = TraceAssigner::new(MzTolerance::absolute(0.0));
        let err = assigner
            .assign(testing_point(100.0, 1.0, 1.0, 1))
            .unwrap_err();
        assert_eq!(
            err,
            TraceBuildError::IllegalAssignmentState {
                mz: 100.0,
                lower: 100.0,
                upper: 100.0
            }
        );
    }

    #[test]
    fn test_nan_mz_is_an_illegal_state() {
        let (mut assigner, _) = assign_all(MzTolerance::absolute(1.0), &[10.0]);
        let err = assigner
            .assign(testing_point(f64::NAN, 1.0, 1.0, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            TraceBuildError::IllegalAssignmentState { .. }
        ));
    }

    #[test]
    fn test_interval_far_away_is_not_a_neighbor() {
        let (assigner, _) = assign_all(MzTolerance::absolute(1.0), &[10.0, 20.0, 15.0]);
        assert_eq!(
            intervals(&assigner),
            vec![(9.0, 11.0), (14.0, 16.0), (19.0, 21.0)]
        );
    }

    #[test]
    fn test_seed_mz_is_kept() {
        let (assigner, _) = assign_all(MzTolerance::absolute(1.0), &[10.0, 10.7, 9.2]);
        let trace = assigner.ordered_traces().next().unwrap();
        assert_eq!(trace.mz(), 10.0);
        assert_eq!(trace.len(), 3);
    }
}
