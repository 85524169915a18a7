//! Frame scheduling and timing utilities.
//!
//! Portable frame pacing without async/await. Each tick applies queued
//! intents, advances the show to a projected frame boundary and adapts the
//! frame delay to what updates actually cost. The caller sleeps for the
//! returned slack and then flushes.

use embassy_time::{Duration, Instant};
use heapless::HistoryBuffer;
use log::{debug, warn};

use crate::error::ConfigError;
use crate::intent_processor::{IntentProcessor, IntentReceiver};
use crate::show::{FrameContext, Show, ShowConfig};
use crate::time::TimeSource;

/// Number of frame costs averaged when adapting the delay.
pub const COST_WINDOW: usize = 8;

/// Frames between frame-rate reports.
pub const REPORT_INTERVAL: u32 = 40;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    /// Slack left in this frame; sleep this long before flushing.
    pub sleep_duration: Duration,
    /// Frame delay after this frame's adjustment.
    pub frame_delay: Duration,
    /// Timecode the show was advanced to, in seconds.
    pub timecode: f64,
    /// The averaged cost overran the delay by more than the slow threshold.
    pub slow: bool,
}

fn seconds(duration: Duration) -> f64 {
    duration.as_micros() as f64 / 1_000_000.0
}

/// Adaptive frame loop around a [`Show`].
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(show, clock, intents.receiver(), ShowConfig::default())?;
///
/// loop {
///     let result = scheduler.tick();
///     // platform-specific sleep
///     sleep(result.sleep_duration);
///     scheduler.flush();
/// }
/// ```
pub struct FrameScheduler<'a, C: TimeSource, const INTENT_CHANNEL_SIZE: usize> {
    show: Show,
    clock: C,
    intents: IntentProcessor<'a, INTENT_CHANNEL_SIZE>,
    config: ShowConfig,
    min_delay: Duration,
    frame_delay: Duration,
    costs: HistoryBuffer<Duration, COST_WINDOW>,
    start: Option<Instant>,
    timecode: f64,
    frame: u32,
}

impl<'a, C: TimeSource, const INTENT_CHANNEL_SIZE: usize> FrameScheduler<'a, C, INTENT_CHANNEL_SIZE> {
    /// Create a scheduler that starts at the configured frame rate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(
        show: Show,
        clock: C,
        intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>,
        config: ShowConfig,
    ) -> Result<Self, ConfigError> {
        if !(config.frame_rate > 0.0 && config.frame_rate.is_finite()) {
            return Err(ConfigError::NonPositiveFrameRate(config.frame_rate));
        }
        let min_delay = Duration::from_micros(libm::round(1_000_000.0 / config.frame_rate) as u64);
        Ok(Self {
            show,
            clock,
            intents: IntentProcessor::new(intents),
            config,
            min_delay,
            frame_delay: min_delay,
            costs: HistoryBuffer::new(),
            start: None,
            timecode: 0.0,
            frame: 0,
        })
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies every queued intent
    /// 2. Advances the show to `now + frame_delay`
    /// 3. Measures the update cost and adapts the frame delay
    /// 4. Returns the slack the caller should sleep before [`Self::flush`]
    pub fn tick(&mut self) -> FrameResult {
        let frame_start = self.clock.now();
        let start = *self.start.get_or_insert(frame_start);

        self.intents.process_pending(&mut self.show);

        // the frame is shown at the end of the delay, not now
        let projected = frame_start + self.frame_delay;
        let timecode = seconds(projected.saturating_duration_since(start));
        let frame = FrameContext::new(timecode, timecode - self.timecode);
        self.timecode = timecode;
        self.show.update(&frame);

        let cost = self.clock.now().saturating_duration_since(frame_start);
        let average = self.record_cost(cost);
        let slow = self.adjust_delay(average);

        let sleep_duration = self.frame_delay.checked_sub(cost).unwrap_or(Duration::from_ticks(0));

        self.frame += 1;
        if self.frame == REPORT_INTERVAL {
            debug!(
                "framerate: {:.1} remainder: {}us",
                1.0 / seconds(self.frame_delay),
                sleep_duration.as_micros()
            );
            self.frame = 0;
        }

        FrameResult {
            sleep_duration,
            frame_delay: self.frame_delay,
            timecode,
            slow,
        }
    }

    /// Add a cost sample and return the window average
    ///
    /// Once the window is full the oldest sample is overwritten.
    fn record_cost(&mut self, cost: Duration) -> Duration {
        self.costs.write(cost);
        let samples = self.costs.as_slice();
        let total: u64 = samples.iter().map(|sample| sample.as_ticks()).sum();
        Duration::from_ticks(total / samples.len() as u64)
    }

    /// Returns whether the refresh is slow
    fn adjust_delay(&mut self, average: Duration) -> bool {
        let tolerance = self.config.overrun_tolerance;
        if average > self.frame_delay + tolerance {
            let overrun = average - self.frame_delay;
            self.frame_delay += self.config.delay_step;
            if overrun > self.config.slow_refresh {
                warn!("slow refresh: frame cost {}ms", average.as_millis());
                return true;
            }
        } else if average + tolerance < self.frame_delay && self.frame_delay > self.min_delay {
            self.frame_delay = self
                .frame_delay
                .checked_sub(self.config.delay_step)
                .unwrap_or(self.min_delay)
                .max(self.min_delay);
        }
        false
    }

    /// Push the current channel data to every network
    pub fn flush(&mut self) {
        self.show.flush();
    }

    /// Simulate `count` frames without sleeping
    ///
    /// Every frame advances by the current frame delay and is flushed
    /// straight away.
    pub fn step(&mut self, count: usize) {
        let delta = seconds(self.frame_delay);
        for _ in 0..count {
            self.intents.process_pending(&mut self.show);
            self.timecode += delta;
            self.show.update(&FrameContext::new(self.timecode, delta));
            self.show.flush();
        }
    }

    /// Run frames until `running` is cleared
    ///
    /// The flag is only checked between frames.
    #[cfg(feature = "std")]
    pub fn run_live(&mut self, running: &core::sync::atomic::AtomicBool) {
        use core::sync::atomic::Ordering;

        while running.load(Ordering::Relaxed) {
            let result = self.tick();
            if result.sleep_duration.as_ticks() > 0 {
                std::thread::sleep(std::time::Duration::from_micros(
                    result.sleep_duration.as_micros(),
                ));
            }
            self.flush();
        }
    }

    pub const fn show(&self) -> &Show {
        &self.show
    }

    pub fn show_mut(&mut self) -> &mut Show {
        &mut self.show
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Current frame delay; never below `1 / frame_rate`
    pub const fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Timecode of the last frame, in seconds
    pub const fn timecode(&self) -> f64 {
        self.timecode
    }

    pub const fn config(&self) -> &ShowConfig {
        &self.config
    }
}
