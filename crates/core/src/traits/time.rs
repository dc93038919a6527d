//! Time source abstraction
//!
//! IMU drivers stamp their samples through `TimeSource`, so the orientation
//! tracker derives its integration step from timestamps rather than from a
//! fixed loop rate. Firmware supplies a monotonic hardware clock; host tests
//! drive `MockTime` by hand.

use core::cell::Cell;

/// Microseconds per second
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Monotonic microsecond clock
///
/// # Example
///
/// ```
/// use lighthouse_tracker_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let stamp = time.now_us();
/// time.advance(2_000);
/// assert_eq!(time.elapsed_since(stamp), 2_000);
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Microseconds since start
    fn now_us(&self) -> u64;

    /// Milliseconds since start
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Microseconds elapsed since `reference_us`, saturating at zero
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Seconds between two microsecond stamps; zero if `now_us` is not later
pub fn step_seconds(previous_us: u64, now_us: u64) -> f64 {
    now_us.saturating_sub(previous_us) as f64 / MICROS_PER_SECOND
}

/// Hand-driven clock for host tests
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

// Safety: MockTime is confined to single-threaded tests. The bounds exist for
// firmware clocks shared between executor tasks.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    pub fn new() -> Self {
        Self::with_initial(0)
    }

    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
