use crate::effect::Effect;
use crate::element::{Attributes, Role};
use crate::envelope::{Envelope, EnvelopeProfile, EnvelopeSegment};
use crate::show::FrameContext;
use crate::tween::Tween;

/// Scripted shifts of hue, saturation and intensity
///
/// Each channel is an independent sequence of `start -> end` shifts. Hue
/// and saturation replace the target's colour; intensity scales it. All
/// sequences loop forever unless [`ColorShiftEffect::set_loop`] says
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorShiftEffect {
    hue: Envelope,
    saturation: Envelope,
    intensity: Envelope,
    active: bool,
}

fn shift(start: f64, end: f64, duration: f64, shape: Tween) -> EnvelopeSegment {
    EnvelopeSegment::new(EnvelopeProfile::new(shape, start, end - start, duration))
}

impl ColorShiftEffect {
    pub fn new() -> Self {
        Self {
            hue: Envelope::new(-1),
            saturation: Envelope::new(-1),
            intensity: Envelope::new(-1),
            active: true,
        }
    }

    pub fn add_hue_shift(&mut self, start: f64, end: f64, duration: f64, shape: Tween) -> &mut Self {
        self.hue.push(shift(start, end, duration, shape));
        self
    }

    pub fn add_saturation_shift(
        &mut self,
        start: f64,
        end: f64,
        duration: f64,
        shape: Tween,
    ) -> &mut Self {
        self.saturation.push(shift(start, end, duration, shape));
        self
    }

    pub fn add_intensity_shift(
        &mut self,
        start: f64,
        end: f64,
        duration: f64,
        shape: Tween,
    ) -> &mut Self {
        self.intensity.push(shift(start, end, duration, shape));
        self
    }

    /// Loop count for every channel; `0` plays the shifts once and holds
    pub fn set_loop(&mut self, loops: i64) -> &mut Self {
        for envelope in [&mut self.hue, &mut self.saturation, &mut self.intensity] {
            envelope.set_loop(loops);
            envelope.reset();
        }
        self
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn hue(&self) -> &Envelope {
        &self.hue
    }

    pub const fn saturation(&self) -> &Envelope {
        &self.saturation
    }

    pub const fn intensity(&self) -> &Envelope {
        &self.intensity
    }
}

impl Default for ColorShiftEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ColorShiftEffect {
    fn trigger(&mut self, intensity: f64) {
        if intensity > 0.0 {
            self.reset();
            self.active = true;
        } else {
            self.active = false;
        }
    }

    fn advance(&mut self, frame: &FrameContext) {
        if !self.active {
            return;
        }
        for envelope in [&mut self.hue, &mut self.saturation, &mut self.intensity] {
            if !envelope.is_empty() {
                envelope.update(frame.time_delta);
            }
        }
    }

    fn apply(&mut self, _target: usize, attributes: &mut Attributes) {
        if !self.active {
            return;
        }
        if !self.hue.is_empty() {
            attributes.set(Role::Hue, self.hue.value());
        }
        if !self.saturation.is_empty() {
            attributes.set(Role::Saturation, self.saturation.value());
        }
        if !self.intensity.is_empty() {
            attributes.intensity *= self.intensity.value();
        }
    }

    fn reset(&mut self) {
        self.hue.reset();
        self.saturation.reset();
        self.intensity.reset();
    }
}
