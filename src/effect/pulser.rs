use crate::effect::Effect;
use crate::element::Attributes;
use crate::envelope::{Envelope, EnvelopeProfile, EnvelopeSegment};
use crate::show::FrameContext;
use crate::tween::Tween;

/// Multiplies intensity by an endlessly looping rise and fall
#[derive(Debug, Clone, PartialEq)]
pub struct PulserEffect {
    envelope: Envelope,
    active: bool,
    value: f64,
}

impl PulserEffect {
    pub fn new(frequency: f64) -> Self {
        Self::with_shape(frequency, Tween::Linear)
    }

    /// Pulse `frequency` times per second, easing both halves with `shape`
    pub fn with_shape(frequency: f64, shape: Tween) -> Self {
        let half = 1.0 / (2.0 * frequency);
        let envelope = Envelope::new(-1)
            .then(EnvelopeSegment::new(EnvelopeProfile::new(shape, 0.0, 1.0, half)))
            .then(EnvelopeSegment::new(EnvelopeProfile::new(shape, 1.0, -1.0, half)));
        Self {
            envelope,
            active: true,
            value: 0.0,
        }
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Effect for PulserEffect {
    fn trigger(&mut self, intensity: f64) {
        if intensity > 0.0 {
            self.reset();
            self.active = true;
        } else {
            self.active = false;
        }
    }

    fn advance(&mut self, frame: &FrameContext) {
        if self.active {
            self.value = self.envelope.update(frame.time_delta);
        }
    }

    fn apply(&mut self, _target: usize, attributes: &mut Attributes) {
        if self.active {
            attributes.intensity *= self.value;
        }
    }

    fn reset(&mut self) {
        self.envelope.reset();
        self.value = 0.0;
    }
}
