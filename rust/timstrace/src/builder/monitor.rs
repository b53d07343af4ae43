use std::sync::atomic::{
    AtomicBool,
    AtomicU8,
    AtomicU64,
    Ordering,
};

/// Phases of a build. They only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BuildPhase {
    Idle = 0,
    Extracting = 1,
    Assigning = 2,
    Finalizing = 3,
    Done = 4,
    Cancelled = 5,
    Failed = 6,
}

impl BuildPhase {
    fn from_u8(x: u8) -> Self {
        match x {
            1 => Self::Extracting,
            2 => Self::Assigning,
            3 => Self::Finalizing,
            4 => Self::Done,
            5 => Self::Cancelled,
            6 => Self::Failed,
            _ => Self::Idle,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }
}

/// Shared handle between a running build and whoever is watching it.
///
/// The build is the only writer of the progress and the phase, the cancel
/// flag is the only thing written from the outside. Everything uses relaxed
/// atomics, a slightly stale progress value is fine.
///
/// ```
/// use std::sync::Arc;
/// use timstrace::builder::{BuildMonitor, BuildPhase};
///
/// let monitor = Arc::new(BuildMonitor::new());
/// assert_eq!(monitor.phase(), BuildPhase::Idle);
/// assert_eq!(monitor.progress(), 0.0);
/// monitor.cancel();
/// assert!(monitor.is_cancelled());
/// ```
#[derive(Debug)]
pub struct BuildMonitor {
    cancelled: AtomicBool,
    progress: AtomicU64,
    phase: AtomicU8,
}

impl Default for BuildMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildMonitor {
    pub fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            progress: AtomicU64::new(0.0f64.to_bits()),
            phase: AtomicU8::new(BuildPhase::Idle as u8),
        }
    }

    /// Requests cancellation. The build notices it at its next checkpoint
    /// (between frames while extracting, between points or traces after that).
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fraction of the build done, in [0, 1].
    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress.load(Ordering::Relaxed))
    }

    pub fn phase(&self) -> BuildPhase {
        BuildPhase::from_u8(self.phase.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.phase().is_terminal()
    }

    pub(crate) fn set_phase(&self, phase: BuildPhase) {
        self.phase.store(phase as u8, Ordering::Relaxed);
    }

    /// Never moves backwards, values are clamped to [0, 1].
    pub(crate) fn set_progress(&self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction > self.progress() {
            self.progress.store(fraction.to_bits(), Ordering::Relaxed);
        }
    }
}
