//! Easing curves
//!
//! Every curve maps `(t, start, change, duration)` to a value, following the
//! Robert Penner easing equations. All curves return `start` at `t == 0` and
//! `start + change` at `t == duration`.

use core::f64::consts::PI;

use crate::error::JumpTimeNotFound;

/// Number of equal steps sampled across a curve by [`Tween::jump_time`].
const JUMP_STEPS: u32 = 100;

/// Back easing overshoot
const BACK_OVERSHOOT: f64 = 1.701_58;

/// Easing curve selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tween {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    OutInQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    OutInCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InExpo,
    OutExpo,
    InCirc,
    OutCirc,
    InBack,
    OutBack,
    InOutBack,
    OutBounce,
    OutElastic,
}

impl Tween {
    pub const ALL: [Tween; 21] = [
        Tween::Linear,
        Tween::InQuad,
        Tween::OutQuad,
        Tween::InOutQuad,
        Tween::OutInQuad,
        Tween::InCubic,
        Tween::OutCubic,
        Tween::InOutCubic,
        Tween::OutInCubic,
        Tween::InQuart,
        Tween::OutQuart,
        Tween::InOutQuart,
        Tween::InExpo,
        Tween::OutExpo,
        Tween::InCirc,
        Tween::OutCirc,
        Tween::InBack,
        Tween::OutBack,
        Tween::InOutBack,
        Tween::OutBounce,
        Tween::OutElastic,
    ];

    /// Evaluate the curve at elapsed time `t`
    ///
    /// A non-positive `duration` is treated as an instant change and yields
    /// the end value.
    pub fn apply(self, t: f64, start: f64, change: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return start + change;
        }
        let (b, c, d) = (start, change, duration);
        match self {
            Tween::Linear => c * t / d + b,
            Tween::InQuad => {
                let t = t / d;
                c * t * t + b
            }
            Tween::OutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Tween::InOutQuad => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t + b;
                }
                let t = t - 1.0;
                -c / 2.0 * (t * (t - 2.0) - 1.0) + b
            }
            Tween::OutInQuad => {
                if t < d / 2.0 {
                    return Tween::OutQuad.apply(t * 2.0, b, c / 2.0, d);
                }
                Tween::InQuad.apply(t * 2.0 - d, b + c / 2.0, c / 2.0, d)
            }
            Tween::InCubic => {
                let t = t / d;
                c * t * t * t + b
            }
            Tween::OutCubic => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Tween::InOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t * t + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t * t * t + 2.0) + b
            }
            Tween::OutInCubic => {
                if t < d / 2.0 {
                    return Tween::OutCubic.apply(t * 2.0, b, c / 2.0, d);
                }
                Tween::InCubic.apply(t * 2.0 - d, b + c / 2.0, c / 2.0, d)
            }
            Tween::InQuart => {
                let t = t / d;
                c * t * t * t * t + b
            }
            Tween::OutQuart => {
                let t = t / d - 1.0;
                -c * (t * t * t * t - 1.0) + b
            }
            Tween::InOutQuart => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * t * t * t * t + b;
                }
                let t = t - 2.0;
                -c / 2.0 * (t * t * t * t - 2.0) + b
            }
            // Exponential curves never reach their asymptote, so the ends
            // are pinned explicitly.
            Tween::InExpo => {
                if t == 0.0 {
                    return b;
                }
                if t >= d {
                    return b + c;
                }
                c * libm::pow(2.0, 10.0 * (t / d - 1.0)) + b
            }
            Tween::OutExpo => {
                if t >= d {
                    return b + c;
                }
                c * (-libm::pow(2.0, -10.0 * t / d) + 1.0) + b
            }
            Tween::InCirc => {
                let t = (t / d).min(1.0);
                -c * (libm::sqrt(1.0 - t * t) - 1.0) + b
            }
            Tween::OutCirc => {
                let t = (t / d).min(1.0) - 1.0;
                c * libm::sqrt(1.0 - t * t) + b
            }
            Tween::InBack => {
                let s = BACK_OVERSHOOT;
                let t = t / d;
                c * t * t * ((s + 1.0) * t - s) + b
            }
            Tween::OutBack => {
                let s = BACK_OVERSHOOT;
                let t = t / d - 1.0;
                c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
            }
            Tween::InOutBack => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b;
                }
                let t = t - 2.0;
                c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
            }
            Tween::OutBounce => {
                let t = t / d;
                if t < 1.0 / 2.75 {
                    c * (7.5625 * t * t) + b
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    c * (7.5625 * t * t + 0.75) + b
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    c * (7.5625 * t * t + 0.9375) + b
                } else {
                    let t = t - 2.625 / 2.75;
                    c * (7.5625 * t * t + 0.984_375) + b
                }
            }
            Tween::OutElastic => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t >= 1.0 {
                    return b + c;
                }
                let period = d * 0.3;
                let mut amplitude = 1.0;
                let shift = if amplitude < libm::fabs(c) {
                    amplitude = c;
                    period / 4.0
                } else {
                    period / (2.0 * PI) * libm::asin(c / amplitude)
                };
                amplitude
                    * libm::pow(2.0, -10.0 * t)
                    * libm::sin((t * d - shift) * (2.0 * PI) / period)
                    + c
                    + b
            }
        }
    }

    /// Find the earliest elapsed time whose value lands on `target`
    ///
    /// The curve is sampled forward in 1% steps of `duration`; a sample
    /// matches when it is within `|change| / 200` of the target. Curves that
    /// move fast relative to the step size can skip past the band entirely,
    /// which is reported as [`JumpTimeNotFound`].
    pub fn jump_time(
        self,
        target: f64,
        start: f64,
        change: f64,
        duration: f64,
    ) -> Result<f64, JumpTimeNotFound> {
        let tolerance = libm::fabs(change) / 200.0;
        let resolution = duration / f64::from(JUMP_STEPS);
        for step in 0..=JUMP_STEPS {
            let t = f64::from(step) * resolution;
            let value = self.apply(t, start, change, duration);
            if libm::fabs(value - target) <= tolerance {
                return Ok(t);
            }
        }
        Err(JumpTimeNotFound { target })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Tween::Linear => "linear",
            Tween::InQuad => "in_quad",
            Tween::OutQuad => "out_quad",
            Tween::InOutQuad => "in_out_quad",
            Tween::OutInQuad => "out_in_quad",
            Tween::InCubic => "in_cubic",
            Tween::OutCubic => "out_cubic",
            Tween::InOutCubic => "in_out_cubic",
            Tween::OutInCubic => "out_in_cubic",
            Tween::InQuart => "in_quart",
            Tween::OutQuart => "out_quart",
            Tween::InOutQuart => "in_out_quart",
            Tween::InExpo => "in_expo",
            Tween::OutExpo => "out_expo",
            Tween::InCirc => "in_circ",
            Tween::OutCirc => "out_circ",
            Tween::InBack => "in_back",
            Tween::OutBack => "out_back",
            Tween::InOutBack => "in_out_back",
            Tween::OutBounce => "out_bounce",
            Tween::OutElastic => "out_elastic",
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tween| tween.as_str() == s)
    }
}
