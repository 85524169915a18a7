use crate::error::JumpTimeNotFound;
use crate::tween::Tween;

/// Immutable shape of one envelope phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeProfile {
    pub tween: Tween,
    pub start: f64,
    pub change: f64,
    pub duration: f64,
}

impl EnvelopeProfile {
    pub const fn new(tween: Tween, start: f64, change: f64, duration: f64) -> Self {
        Self {
            tween,
            start,
            change,
            duration,
        }
    }

    pub const fn linear(start: f64, change: f64, duration: f64) -> Self {
        Self::new(Tween::Linear, start, change, duration)
    }

    /// Value of the curve after `elapsed` seconds, clamped to the duration
    pub fn value_at(&self, elapsed: f64) -> f64 {
        let elapsed = elapsed.min(self.duration);
        self.tween
            .apply(elapsed, self.start, self.change, self.duration)
    }

    pub fn end_value(&self) -> f64 {
        self.start + self.change
    }

    /// Elapsed time at which the curve reaches `value`
    pub fn jump_time(&self, value: f64) -> Result<f64, JumpTimeNotFound> {
        self.tween
            .jump_time(value, self.start, self.change, self.duration)
    }
}

impl Default for EnvelopeProfile {
    fn default() -> Self {
        Self::linear(0.0, 1.0, 1.0)
    }
}
