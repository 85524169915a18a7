//! Effect system with compile-time known effect variants
//!
//! Effects modulate the public attributes of one or more lights after the
//! base envelope contribution. All effects are stored in an enum so
//! elements can own them by value.

mod blink;
mod color_shift;
mod pulser;
mod twinkle;

pub use blink::BlinkEffect;
pub use color_shift::ColorShiftEffect;
pub use pulser::PulserEffect;
pub use twinkle::{TwinkleConfig, TwinkleEffect};

use crate::element::Attributes;
use crate::show::FrameContext;

const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_PULSER: &str = "pulser";
const EFFECT_NAME_TWINKLE: &str = "twinkle";
const EFFECT_NAME_COLOR_SHIFT: &str = "color_shift";

pub trait Effect {
    /// React to the owner being triggered; zero means the owner went idle
    fn trigger(&mut self, intensity: f64);

    /// Advance internal time, once per frame
    fn advance(&mut self, frame: &FrameContext);

    /// Modulate one target. `target` is the target's position among the
    /// effect's targets for this frame.
    fn apply(&mut self, target: usize, attributes: &mut Attributes);

    /// Reset effect state
    fn reset(&mut self) {}
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Square-wave on/off
    Blink(BlinkEffect),
    /// Looping rise and fall of intensity
    Pulser(PulserEffect),
    /// Random independent sparkles per target
    Twinkle(TwinkleEffect),
    /// Scripted hue, saturation and intensity shifts
    ColorShift(ColorShiftEffect),
}

/// Known effect ids
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectId {
    Blink,
    Pulser,
    Twinkle,
    ColorShift,
}

impl EffectId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Pulser => EFFECT_NAME_PULSER,
            Self::Twinkle => EFFECT_NAME_TWINKLE,
            Self::ColorShift => EFFECT_NAME_COLOR_SHIFT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_BLINK => Some(Self::Blink),
            EFFECT_NAME_PULSER => Some(Self::Pulser),
            EFFECT_NAME_TWINKLE => Some(Self::Twinkle),
            EFFECT_NAME_COLOR_SHIFT => Some(Self::ColorShift),
            _ => None,
        }
    }
}

impl EffectSlot {
    pub fn trigger(&mut self, intensity: f64) {
        match self {
            Self::Blink(effect) => effect.trigger(intensity),
            Self::Pulser(effect) => effect.trigger(intensity),
            Self::Twinkle(effect) => effect.trigger(intensity),
            Self::ColorShift(effect) => effect.trigger(intensity),
        }
    }

    pub fn advance(&mut self, frame: &FrameContext) {
        match self {
            Self::Blink(effect) => effect.advance(frame),
            Self::Pulser(effect) => effect.advance(frame),
            Self::Twinkle(effect) => effect.advance(frame),
            Self::ColorShift(effect) => effect.advance(frame),
        }
    }

    pub fn apply(&mut self, target: usize, attributes: &mut Attributes) {
        match self {
            Self::Blink(effect) => effect.apply(target, attributes),
            Self::Pulser(effect) => effect.apply(target, attributes),
            Self::Twinkle(effect) => effect.apply(target, attributes),
            Self::ColorShift(effect) => effect.apply(target, attributes),
        }
    }

    /// Reset the effect state
    pub fn reset(&mut self) {
        match self {
            Self::Blink(effect) => Effect::reset(effect),
            Self::Pulser(effect) => Effect::reset(effect),
            Self::Twinkle(effect) => Effect::reset(effect),
            Self::ColorShift(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Blink(_) => EffectId::Blink,
            Self::Pulser(_) => EffectId::Pulser,
            Self::Twinkle(_) => EffectId::Twinkle,
            Self::ColorShift(_) => EffectId::ColorShift,
        }
    }
}

impl From<BlinkEffect> for EffectSlot {
    fn from(effect: BlinkEffect) -> Self {
        Self::Blink(effect)
    }
}

impl From<PulserEffect> for EffectSlot {
    fn from(effect: PulserEffect) -> Self {
        Self::Pulser(effect)
    }
}

impl From<TwinkleEffect> for EffectSlot {
    fn from(effect: TwinkleEffect) -> Self {
        Self::Twinkle(effect)
    }
}

impl From<ColorShiftEffect> for EffectSlot {
    fn from(effect: ColorShiftEffect) -> Self {
        Self::ColorShift(effect)
    }
}
