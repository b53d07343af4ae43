use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeSet;

use super::indices::MzInterval;
use super::point::TracePoint;
use crate::utils::TupleRange;

/// How the representative m/z of a finished trace is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepresentativeMzPolicy {
    /// m/z of the point that opened the interval. Depends on the
    /// processing order, the seed is not necessarily the strongest point.
    #[default]
    #[serde(rename = "first_inserted")]
    FirstInserted,
    /// m/z of the most intense member.
    #[serde(rename = "strongest")]
    Strongest,
}

/// Points sharing one m/z interval, while the build is running.
#[derive(Debug, Clone)]
pub struct Trace {
    mz: f64,
    interval: MzInterval,
    points: Vec<TracePoint>,
}

/// Finished, immutable description of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub mz: f64,
    /// RT of the most intense point.
    pub rt_minutes: f32,
    /// Mobility of the most intense point.
    pub mobility: f64,
    /// Median of the distinct mobility values of the members.
    pub median_mobility: f64,
    pub max_intensity: f64,
    pub interval: MzInterval,
    pub mz_range: TupleRange<f64>,
    pub rt_range: TupleRange<f32>,
    pub mobility_range: TupleRange<f64>,
    pub intensity_range: TupleRange<f64>,
    pub frame_ids: BTreeSet<u32>,
    pub scan_ids: BTreeSet<u32>,
    /// Members ordered by (scan id, frame id).
    pub points: Vec<TracePoint>,
}

impl Trace {
    pub fn new(seed: TracePoint, interval: MzInterval) -> Self {
        Self {
            mz: seed.mz,
            interval,
            points: vec![seed],
        }
    }

    pub fn push(&mut self, point: TracePoint) {
        self.points.push(point);
    }

    /// m/z of the seed point, fixed at creation.
    pub fn mz(&self) -> f64 {
        self.mz
    }

    pub fn interval(&self) -> MzInterval {
        self.interval
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn distinct_rt_count(&self) -> usize {
        let mut rts: Vec<f32> = self.points.iter().map(|p| p.rt_minutes).collect();
        rts.sort_by(|a, b| a.total_cmp(b));
        rts.dedup();
        rts.len()
    }

    /// Summarizes the members in a single pass.
    ///
    /// Members are visited in (scan id, frame id) order so ties on the
    /// maximum intensity resolve the same way on every run. Does not
    /// modify the trace.
    pub fn summarize(&self, policy: RepresentativeMzPolicy) -> TraceSummary {
        let mut points = self.points.clone();
        points.sort_by_key(|p| (p.scan_id, p.frame_id));

        let first = points[0];
        let mut apex = first;
        let mut mz_range = TupleRange::point(first.mz);
        let mut rt_range = TupleRange::point(first.rt_minutes);
        let mut mobility_range = TupleRange::point(first.mobility);
        let mut intensity_range = TupleRange::point(first.intensity);
        let mut frame_ids = BTreeSet::new();
        let mut scan_ids = BTreeSet::new();

        for p in points.iter() {
            mz_range.include(p.mz);
            rt_range.include(p.rt_minutes);
            mobility_range.include(p.mobility);
            intensity_range.include(p.intensity);
            frame_ids.insert(p.frame_id);
            scan_ids.insert(p.scan_id);
            if p.intensity > apex.intensity {
                apex = *p;
            }
        }

        let mz = match policy {
            RepresentativeMzPolicy::FirstInserted => self.mz,
            RepresentativeMzPolicy::Strongest => apex.mz,
        };

        TraceSummary {
            mz,
            rt_minutes: apex.rt_minutes,
            mobility: apex.mobility,
            median_mobility: median_distinct(points.iter().map(|p| p.mobility)),
            max_intensity: apex.intensity,
            interval: self.interval,
            mz_range,
            rt_range,
            mobility_range,
            intensity_range,
            frame_ids,
            scan_ids,
            points,
        }
    }
}

fn median_distinct(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    let n = values.len();
    match n {
        0 => f64::NAN,
        _ if n % 2 == 1 => values[n / 2],
        _ => (values[n / 2 - 1] + values[n / 2]) / 2.0,
    }
}
