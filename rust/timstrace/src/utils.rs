use thiserror::Error;

/// TupleRange represents a closed range [a, b] over a pair of values.
///
/// The first element is always less than or equal to the second. Construction
/// with an inverted pair fails early instead of propagating an empty range.
///
/// Besides being used as an input filter (e.g. the RT window of a scan
/// selection), it doubles as a running bounding span: start from
/// [`TupleRange::point`] and widen it with [`TupleRange::include`].
///
/// ```
/// use timstrace::utils::TupleRange;
///
/// let mut span = TupleRange::point(10.0);
/// span.include(12.0);
/// span.include(9.5);
/// assert_eq!(span.as_tuple(), (9.5, 12.0));
/// assert!(span.contains(11.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TupleRange<T: Copy + PartialOrd>(T, T);

#[derive(Error, Debug)]
pub enum TupleRangeError<T: Copy + PartialOrd + std::fmt::Debug> {
    #[error(
        "Expected the first element to be less than or equal to the second, got ({0:?}, {1:?})"
    )]
    ExpectedOrderedRange(T, T),
}

impl<T: Copy + PartialOrd + std::fmt::Debug> TupleRange<T> {
    pub fn try_new(left: T, right: T) -> Result<Self, TupleRangeError<T>> {
        if left > right {
            Err(TupleRangeError::ExpectedOrderedRange(left, right))
        } else {
            Ok(Self(left, right))
        }
    }

    /// Degenerate range holding a single value.
    pub fn point(x: T) -> Self {
        Self(x, x)
    }

    /// Widens the range so it covers `x`.
    pub fn include(&mut self, x: T) {
        if x < self.0 {
            self.0 = x;
        }
        if x > self.1 {
            self.1 = x;
        }
    }

    pub fn as_tuple(&self) -> (T, T) {
        (self.0, self.1)
    }

    pub fn contains(&self, x: T) -> bool {
        self.0 <= x && x <= self.1
    }

    pub fn start(&self) -> T {
        self.0
    }

    pub fn end(&self) -> T {
        self.1
    }
}
