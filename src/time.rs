//! Wall-clock access for the frame scheduler

use embassy_time::Instant;

/// Source of the current time
///
/// The scheduler reads the clock twice per frame: once at the frame start
/// and once after the update to measure its cost.
pub trait TimeSource {
    fn now(&self) -> Instant;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// The host clock through embassy-time's std driver
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
