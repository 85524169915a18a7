//! Spatial composition of elements
//!
//! A [`Group`] triggers its children as one ensemble. A [`Chase`] moves a
//! centre position across its children and triggers the cells it passes;
//! a [`PulseChase`] renders a shaped pulse around that centre instead.

mod chase;
mod pulse;

use alloc::string::String;
use alloc::vec::Vec;

pub use chase::{Chase, ChaseConfig, ChaseStep, Continuation, OffMode, SpeedMode};
pub use pulse::{Pulse, PulseChase, PulseConfig};

use crate::arena::ElementHandle;
use crate::effect::EffectSlot;
use crate::element::{Fanout, GROUP_ROLES, Key, Role, TriggerState, Triggerable};

/// Ensemble of elements triggered together
///
/// Children are handles into the show's arena; the same element may also
/// be registered with the show directly.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    elements: Vec<ElementHandle>,
    trigger_state: TriggerState,
    trigger_intensity: f64,
    max_intensity: f64,
    bell_mode: bool,
    toggle_mode: bool,
    effects: Vec<EffectSlot>,
    roles: &'static [Role],
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            trigger_state: TriggerState::Idle,
            trigger_intensity: 0.0,
            max_intensity: 1.0,
            bell_mode: false,
            toggle_mode: false,
            effects: Vec::new(),
            roles: GROUP_ROLES,
        }
    }

    #[must_use]
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementHandle>) -> Self {
        self.elements.extend(elements);
        self
    }

    #[must_use]
    pub fn with_max_intensity(mut self, max_intensity: f64) -> Self {
        self.max_intensity = max_intensity;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<EffectSlot>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn push(&mut self, element: ElementHandle) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    pub(crate) fn set_elements(&mut self, elements: Vec<ElementHandle>) {
        self.elements = elements;
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger_state == TriggerState::Active
    }

    pub const fn trigger_intensity(&self) -> f64 {
        self.trigger_intensity
    }

    pub const fn max_intensity(&self) -> f64 {
        self.max_intensity
    }

    pub const fn bell_mode(&self) -> bool {
        self.bell_mode
    }

    pub fn set_toggle_mode(&mut self, toggle_mode: bool) {
        self.toggle_mode = toggle_mode;
    }

    pub fn effects(&self) -> &[EffectSlot] {
        &self.effects
    }

    pub fn add_effect(&mut self, effect: impl Into<EffectSlot>) {
        self.effects.push(effect.into());
    }

    pub(crate) fn take_effects(&mut self) -> Vec<EffectSlot> {
        core::mem::take(&mut self.effects)
    }

    pub(crate) fn restore_effects(&mut self, effects: Vec<EffectSlot>) {
        self.effects = effects;
    }

    pub const fn roles(&self) -> &'static [Role] {
        self.roles
    }

    /// Trigger the ensemble; returns the level every child receives
    pub fn trigger(&mut self, intensity: f64) -> f64 {
        let level = if intensity != 0.0 {
            self.trigger_state = TriggerState::Active;
            intensity.min(self.max_intensity)
        } else {
            self.trigger_state = TriggerState::Idle;
            0.0
        };
        self.trigger_intensity = level;
        for effect in &mut self.effects {
            effect.trigger(level);
        }
        level
    }
}

impl Triggerable for Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn trigger(&mut self, intensity: f64, _key: Option<Key>) -> Fanout {
        Fanout::Children(Group::trigger(self, intensity))
    }

    fn trigger_state(&self) -> TriggerState {
        self.trigger_state
    }

    fn set_bell_mode(&mut self, bell_mode: bool) {
        self.bell_mode = bell_mode;
    }
}
