use alloc::vec;

use log::debug;

use crate::envelope::{Envelope, EnvelopeProfile, EnvelopeSegment, Segment, StaticSegment};
use crate::tween::Tween;

const ON: usize = 0;
const OFF: usize = 1;

/// Gate position of a [`TriggeredEnvelope`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Off,
    On,
}

/// Two-phase envelope: an on branch played while the gate is held and an
/// off branch played after release
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredEnvelope {
    envelope: Envelope,
    state: GateState,
}

impl TriggeredEnvelope {
    pub fn new(on: impl Into<Segment>, off: impl Into<Segment>) -> Self {
        Self {
            envelope: Envelope::with_segments(vec![on.into(), off.into()], 0),
            state: GateState::Off,
        }
    }

    /// Open or close the gate
    ///
    /// A zero `value` always closes it. Repeating the current state is a
    /// no-op unless `force` is set. Closing while below the release start
    /// jumps into the release at the matching level, so it continues from
    /// the current brightness instead of snapping up to the sustain level.
    pub fn trigger(&mut self, state: GateState, value: f64, force: bool) {
        let state = if value == 0.0 { GateState::Off } else { state };
        if self.state == state && !force {
            return;
        }
        self.state = state;
        match state {
            GateState::On => {
                self.envelope.reset();
            }
            GateState::Off => {
                self.envelope.advance();
                let Some(release) = self.release_profile() else {
                    return;
                };
                let current = self.envelope.value();
                if current < release.start {
                    match release.jump_time(current) {
                        Ok(jump) => {
                            self.update(jump);
                        }
                        Err(err) => {
                            debug!("release restarts from its start: {}", err);
                        }
                    }
                }
            }
        }
    }

    /// Advance by `delta`; idle envelopes at rest cost nothing
    pub fn update(&mut self, delta: f64) -> f64 {
        if self.is_at_rest() {
            return self.envelope.value();
        }
        self.envelope.update(delta)
    }

    pub fn is_at_rest(&self) -> bool {
        self.state == GateState::Off
            && self.envelope.index() == 0
            && self.envelope.segment_elapsed() == 0.0
    }

    pub fn reset(&mut self) {
        self.envelope.reset();
    }

    pub const fn state(&self) -> GateState {
        self.state
    }

    pub const fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    pub const fn value(&self) -> f64 {
        self.envelope.value()
    }

    pub fn set_value(&mut self, value: f64) {
        self.envelope.set_value(value);
    }

    pub const fn index(&self) -> usize {
        self.envelope.index()
    }

    pub const fn segment_elapsed(&self) -> f64 {
        self.envelope.segment_elapsed()
    }

    pub const fn is_advancing(&self) -> bool {
        self.envelope.is_advancing()
    }

    pub fn on_segment(&self) -> Option<&Segment> {
        self.envelope.segment(ON)
    }

    pub fn off_segment(&self) -> Option<&Segment> {
        self.envelope.segment(OFF)
    }

    fn release_profile(&self) -> Option<EnvelopeProfile> {
        self.off_segment().and_then(Segment::profile)
    }
}

/// ADSR envelope parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrConfig {
    pub peak: f64,
    pub sustain: f64,
    pub attack: f64,
    pub attack_shape: Tween,
    pub decay: f64,
    pub decay_shape: Tween,
    pub release: f64,
    pub release_shape: Tween,
}

impl Default for AdsrConfig {
    fn default() -> Self {
        Self {
            peak: 1.0,
            sustain: 0.8,
            attack: 0.5,
            attack_shape: Tween::Linear,
            decay: 0.2,
            decay_shape: Tween::Linear,
            release: 0.5,
            release_shape: Tween::Linear,
        }
    }
}

/// Phase an [`AdsrEnvelope`] is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdsrStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
    Done,
}

/// Attack, decay and sustain on the gate; release after it closes
///
/// The decay phase is omitted when the peak equals the sustain level.
#[derive(Debug, Clone, PartialEq)]
pub struct AdsrEnvelope {
    inner: TriggeredEnvelope,
    config: AdsrConfig,
    has_decay: bool,
}

impl AdsrEnvelope {
    pub fn new(config: AdsrConfig) -> Self {
        let mut on = Envelope::new(0).then(EnvelopeSegment::new(EnvelopeProfile::new(
            config.attack_shape,
            0.0,
            config.peak,
            config.attack,
        )));
        let decay_change = -(config.peak - config.sustain);
        let has_decay = decay_change != 0.0;
        if has_decay {
            on.push(EnvelopeSegment::new(EnvelopeProfile::new(
                config.decay_shape,
                config.peak,
                decay_change,
                config.decay,
            )));
        }
        on.push(StaticSegment::new(config.sustain));

        let off = Envelope::new(0).then(EnvelopeSegment::new(EnvelopeProfile::new(
            config.release_shape,
            config.sustain,
            -config.sustain,
            config.release,
        )));

        Self {
            inner: TriggeredEnvelope::new(on, off),
            config,
            has_decay,
        }
    }

    pub fn trigger(&mut self, state: GateState, value: f64, force: bool) {
        self.inner.trigger(state, value, force);
    }

    pub fn update(&mut self, delta: f64) -> f64 {
        self.inner.update(delta)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn stage(&self) -> AdsrStage {
        if self.inner.is_at_rest() {
            return AdsrStage::Idle;
        }
        match self.inner.index() {
            ON => {
                let phase = match self.inner.on_segment() {
                    Some(Segment::Nested(on)) => on.index(),
                    _ => 0,
                };
                match (phase, self.has_decay) {
                    (0, _) => AdsrStage::Attack,
                    (1, true) => AdsrStage::Decay,
                    _ => AdsrStage::Sustain,
                }
            }
            OFF => AdsrStage::Release,
            _ => AdsrStage::Done,
        }
    }

    pub const fn config(&self) -> &AdsrConfig {
        &self.config
    }

    pub const fn has_decay(&self) -> bool {
        self.has_decay
    }

    pub const fn state(&self) -> GateState {
        self.inner.state()
    }

    pub const fn value(&self) -> f64 {
        self.inner.value()
    }

    pub fn set_value(&mut self, value: f64) {
        self.inner.set_value(value);
    }

    pub const fn is_advancing(&self) -> bool {
        self.inner.is_advancing()
    }

    pub const fn envelope(&self) -> &TriggeredEnvelope {
        &self.inner
    }
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(AdsrConfig::default())
    }
}
