//! Light elements and the trigger capability shared by every show node

mod attributes;
mod channels;

use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

pub use attributes::{Attributes, CHASE_ROLES, ColorMode, GROUP_ROLES, LIGHT_ROLES, Role};
pub use channels::{ChannelMap, write_highest};

use crate::arena::ElementHandle;
use crate::color::{hsv_to_rgb, rgb_to_hue_saturation, unit_to_byte};
use crate::effect::EffectSlot;
use crate::envelope::{AdsrConfig, AdsrEnvelope, AdsrStage, GateState};
use crate::show::FrameContext;

/// Identity of the physical control that produced a trigger, e.g. a MIDI
/// channel and note
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub source: u8,
    pub code: u16,
}

impl Key {
    pub const fn new(source: u8, code: u16) -> Self {
        Self { source, code }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Active,
}

/// Follow-up work a trigger asks the owning show to perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fanout {
    None,
    /// Trigger every child at this level
    Children(f64),
    /// Create or reuse a spawned instance for the key and trigger it
    Spawn { key: Option<Key>, intensity: f64 },
    /// Pass the trigger on to another element
    Forward { target: ElementHandle, intensity: f64 },
}

/// Anything an input adapter can trigger
pub trait Triggerable {
    fn name(&self) -> &str;

    fn trigger(&mut self, intensity: f64, key: Option<Key>) -> Fanout;

    fn trigger_state(&self) -> TriggerState;

    fn set_bell_mode(&mut self, bell_mode: bool);

    /// Shorthand for a zero-intensity trigger
    fn off(&mut self) -> Fanout {
        self.trigger(0.0, None)
    }
}

/// A single fixture driven by an ADSR envelope
///
/// Triggers scale the envelope's `0..=1` output by the trigger level.
/// Bell mode plays the full envelope on the on-trigger alone; toggle mode
/// treats every nonzero trigger while active as an off-trigger; simple
/// mode writes the trigger level straight to intensity and skips updates.
#[derive(Debug, Clone)]
pub struct LightElement {
    name: String,
    trigger_intensity: f64,
    trigger_state: TriggerState,
    envelope: AdsrEnvelope,
    bell_mode: bool,
    toggle_mode: bool,
    simple: bool,
    effects: Vec<EffectSlot>,
    attributes: Attributes,
    channels: ChannelMap,
    roles: &'static [Role],
}

impl LightElement {
    pub fn new(name: impl Into<String>, channels: ChannelMap) -> Self {
        Self {
            name: name.into(),
            trigger_intensity: 0.0,
            trigger_state: TriggerState::Idle,
            envelope: AdsrEnvelope::default(),
            bell_mode: false,
            toggle_mode: false,
            simple: false,
            effects: Vec::new(),
            attributes: Attributes::default(),
            channels,
            roles: LIGHT_ROLES,
        }
    }

    /// Single-channel dimmer at `start_channel`
    pub fn dimmer(name: impl Into<String>, start_channel: u16) -> Self {
        Self::new(name, ChannelMap::intensity(start_channel))
    }

    /// RGB fixture occupying `start_channel` and the two channels after it
    pub fn rgb(name: impl Into<String>, start_channel: u16) -> Self {
        Self::new(name, ChannelMap::rgb(start_channel))
    }

    #[must_use]
    pub fn with_adsr(mut self, config: AdsrConfig) -> Self {
        self.envelope = AdsrEnvelope::new(config);
        self
    }

    #[must_use]
    pub fn with_bell_mode(mut self, bell_mode: bool) -> Self {
        self.bell_mode = bell_mode;
        self
    }

    #[must_use]
    pub fn with_toggle_mode(mut self, toggle_mode: bool) -> Self {
        self.toggle_mode = toggle_mode;
        self
    }

    #[must_use]
    pub fn with_simple(mut self, simple: bool) -> Self {
        self.simple = simple;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<EffectSlot>) -> Self {
        self.effects.push(effect.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, hue: f64, saturation: f64) -> Self {
        self.attributes.set(Role::Hue, hue);
        self.attributes.set(Role::Saturation, saturation);
        self
    }

    pub fn trigger(&mut self, intensity: f64) {
        if self.simple {
            self.attributes.intensity = intensity.clamp(0.0, 1.0);
            return;
        }
        let active = self.trigger_state == TriggerState::Active;
        if intensity > 0.0 && !active {
            if self.bell_mode {
                self.off_trigger();
            }
            self.trigger_state = TriggerState::Active;
            for effect in &mut self.effects {
                effect.trigger(intensity);
            }
            self.trigger_intensity = intensity;
            self.attributes.intensity = 0.0;
            debug!("{}: trigger on @ {}", self.name, intensity);
            self.envelope.trigger(GateState::On, 1.0, false);
        } else if active && intensity == 0.0 && !self.toggle_mode && !self.bell_mode {
            self.off_trigger();
        } else if active && intensity != 0.0 && self.toggle_mode {
            self.off_trigger();
        } else if active && intensity > self.attributes.intensity {
            self.trigger_intensity = intensity;
            self.attributes.intensity = 0.0;
            debug!("{}: override trigger on @ {}", self.name, intensity);
            self.envelope.trigger(GateState::On, 1.0, true);
        }
    }

    fn off_trigger(&mut self) {
        self.trigger_state = TriggerState::Idle;
        debug!("{}: trigger off", self.name);
        self.envelope.trigger(GateState::Off, 1.0, false);
    }

    /// Advance one frame and return the resulting intensity
    pub fn update(&mut self, frame: &FrameContext) -> f64 {
        if self.simple || !self.is_active() {
            return self.attributes.intensity;
        }
        if self.bell_mode
            && self.trigger_state == TriggerState::Active
            && self.envelope.stage() == AdsrStage::Sustain
        {
            self.off_trigger();
        }

        if self.envelope.is_advancing() {
            let scale = self.envelope.update(frame.time_delta);
            self.attributes.intensity = (self.trigger_intensity * scale).clamp(0.0, 1.0);
        } else {
            debug!("{}: envelope finished", self.name);
            self.trigger_intensity = 0.0;
            self.attributes.intensity = self.attributes.intensity.max(0.0);
            for effect in &mut self.effects {
                effect.trigger(0.0);
            }
        }

        for effect in &mut self.effects {
            effect.advance(frame);
            effect.apply(0, &mut self.attributes);
        }
        self.attributes.intensity
    }

    /// Still producing light, including an ongoing release
    pub fn is_active(&self) -> bool {
        self.trigger_intensity != 0.0
    }

    /// Merge this light's channel bytes into a frame buffer
    pub fn write_channels(&self, data: &mut [u8]) {
        let rgb = self.channels.has_color().then(|| self.output_rgb());
        for (channel, role) in self.channels.iter() {
            let value = match (role, rgb) {
                (Role::Intensity, _) => unit_to_byte(self.attributes.intensity),
                (Role::Hue, _) => unit_to_byte(self.attributes.hue),
                (Role::Saturation, _) => unit_to_byte(self.attributes.saturation),
                (Role::Red, Some(rgb)) => rgb.r,
                (Role::Green, Some(rgb)) => rgb.g,
                (Role::Blue, Some(rgb)) => rgb.b,
                _ => continue,
            };
            write_highest(data, channel, value);
        }
    }

    /// Colour as sent to the fixture; full brightness when the fixture has
    /// its own dimmer channel
    pub fn output_rgb(&self) -> crate::color::Rgb {
        let level = if self.channels.has_role(Role::Intensity) {
            1.0
        } else {
            self.attributes.intensity
        };
        let attrs = &self.attributes;
        match attrs.color_mode {
            ColorMode::Hsv => hsv_to_rgb(attrs.hue, attrs.saturation, level),
            ColorMode::Rgb => crate::color::Rgb {
                r: unit_to_byte(attrs.red * level),
                g: unit_to_byte(attrs.green * level),
                b: unit_to_byte(attrs.blue * level),
            },
        }
    }

    /// Derive hue and saturation from the raw RGB attributes as lit at
    /// the current intensity; a dark light reads as unsaturated
    pub fn update_hue(&mut self) {
        let attrs = &self.attributes;
        let level = attrs.intensity;
        let (hue, saturation) =
            rgb_to_hue_saturation(attrs.red * level, attrs.green * level, attrs.blue * level);
        self.attributes.set(Role::Hue, hue);
        self.attributes.set(Role::Saturation, saturation);
    }

    pub fn set_attribute(&mut self, role: Role, value: f64) -> bool {
        self.roles.contains(&role) && self.attributes.set(role, value)
    }

    pub fn set_intensity(&mut self, intensity: f64) {
        self.attributes.intensity = intensity.clamp(0.0, 1.0);
    }

    pub const fn intensity(&self) -> f64 {
        self.attributes.intensity
    }

    pub const fn trigger_intensity(&self) -> f64 {
        self.trigger_intensity
    }

    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub const fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }

    pub const fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    pub fn effects(&self) -> &[EffectSlot] {
        &self.effects
    }

    pub fn add_effect(&mut self, effect: impl Into<EffectSlot>) {
        self.effects.push(effect.into());
    }

    pub const fn roles(&self) -> &'static [Role] {
        self.roles
    }

    pub const fn bell_mode(&self) -> bool {
        self.bell_mode
    }

    pub const fn toggle_mode(&self) -> bool {
        self.toggle_mode
    }

    pub fn set_toggle_mode(&mut self, toggle_mode: bool) {
        self.toggle_mode = toggle_mode;
    }

    pub const fn is_simple(&self) -> bool {
        self.simple
    }
}

impl Triggerable for LightElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn trigger(&mut self, intensity: f64, _key: Option<Key>) -> Fanout {
        LightElement::trigger(self, intensity);
        Fanout::None
    }

    fn trigger_state(&self) -> TriggerState {
        self.trigger_state
    }

    fn set_bell_mode(&mut self, bell_mode: bool) {
        self.bell_mode = bell_mode;
    }
}
