pub mod interval_index;

pub use interval_index::{
    IntervalIndex,
    MzInterval,
};
