use crate::effect::Effect;
use crate::element::Attributes;
use crate::show::FrameContext;

/// Square-wave blink; targets are forced dark during the off half
#[derive(Debug, Clone, PartialEq)]
pub struct BlinkEffect {
    period: f64,
    blink_on: bool,
    last_changed: Option<f64>,
}

impl BlinkEffect {
    /// Blink `frequency` times per second
    pub fn new(frequency: f64) -> Self {
        Self {
            period: 1.0 / (2.0 * frequency),
            blink_on: true,
            last_changed: None,
        }
    }

    pub const fn period(&self) -> f64 {
        self.period
    }

    pub const fn is_on(&self) -> bool {
        self.blink_on
    }
}

impl Default for BlinkEffect {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Effect for BlinkEffect {
    fn trigger(&mut self, intensity: f64) {
        if intensity > 0.0 {
            self.reset();
        }
    }

    fn advance(&mut self, frame: &FrameContext) {
        let Some(last_changed) = self.last_changed else {
            self.last_changed = Some(frame.timecode);
            return;
        };
        if frame.timecode - last_changed > self.period {
            self.blink_on = !self.blink_on;
            self.last_changed = Some(frame.timecode);
        }
    }

    fn apply(&mut self, _target: usize, attributes: &mut Attributes) {
        if !self.blink_on {
            attributes.intensity = 0.0;
        }
    }

    fn reset(&mut self) {
        self.blink_on = true;
        self.last_changed = None;
    }
}
