//! Shared test infrastructure for light show integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use myrtio_light_show::{Duration, FrameContext, Instant, OutputDriver, OutputError, TimeSource};

// ============================================================================
// Float comparison
// ============================================================================

pub const EPSILON: f64 = 1e-9;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[track_caller]
pub fn assert_approx(actual: f64, expected: f64) {
    assert!(
        approx(actual, expected),
        "expected {expected}, got {actual}"
    );
}

#[track_caller]
pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// Frame with the given timecode and delta, in seconds
pub fn frame(timecode: f64, time_delta: f64) -> FrameContext {
    FrameContext::new(timecode, time_delta)
}

// ============================================================================
// Mock clock
// ============================================================================

/// Manually driven clock
///
/// Every `now()` call returns the current time and then moves it forward
/// by `auto_step`, so a scheduler that reads the clock before and after an
/// update sees that update cost `auto_step`.
pub struct ManualClock {
    micros: Cell<u64>,
    auto_step: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            micros: Cell::new(0),
            auto_step: Cell::new(0),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.micros.set(self.micros.get() + duration.as_micros());
    }

    pub fn set_auto_step(&self, duration: Duration) {
        self.auto_step.set(duration.as_micros());
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        let now = self.micros.get();
        self.micros.set(now + self.auto_step.get());
        Instant::from_micros(now)
    }
}

// ============================================================================
// Mock drivers
// ============================================================================

/// Driver that records every frame it is handed
#[derive(Clone, Default)]
pub struct RecordingDriver {
    frames: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.borrow().clone()
    }

    pub fn last_frame(&self) -> Option<Vec<u8>> {
        self.frames.borrow().last().cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, data: &[u8]) -> Result<(), OutputError> {
        self.frames.borrow_mut().push(data.to_vec());
        Ok(())
    }
}

/// Driver whose transport is always down
#[derive(Clone, Default)]
pub struct FailingDriver {
    attempts: Rc<Cell<usize>>,
}

impl FailingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl OutputDriver for FailingDriver {
    fn write(&mut self, _data: &[u8]) -> Result<(), OutputError> {
        self.attempts.set(self.attempts.get() + 1);
        Err(OutputError::Unavailable)
    }
}
