use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::effect::Effect;
use crate::element::Attributes;
use crate::envelope::{AdsrConfig, AdsrEnvelope, GateState};
use crate::show::FrameContext;
use crate::tween::Tween;

/// Timing and level ranges for [`TwinkleEffect`], all in seconds or unit
/// intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwinkleConfig {
    pub on_min: f64,
    pub on_max: f64,
    pub off_min: f64,
    pub off_max: f64,
    pub intensity_min: f64,
    pub intensity_max: f64,
    pub attack: f64,
    pub release: f64,
    pub seed: u64,
}

impl Default for TwinkleConfig {
    fn default() -> Self {
        Self {
            on_min: 0.1,
            on_max: 0.5,
            off_min: 0.5,
            off_max: 2.0,
            intensity_min: 0.1,
            intensity_max: 1.0,
            attack: 0.1,
            release: 0.3,
            seed: 1,
        }
    }
}

#[derive(Debug, Clone)]
struct Sparkle {
    envelope: AdsrEnvelope,
    level: f64,
    lit: bool,
    remaining: f64,
}

/// Random sparkles, independent for every target
///
/// Each target alternates between dark and lit spells of random length.
/// A lit spell fades up to a random level and back down again. The
/// sparkle never dims a target below what it already shows.
#[derive(Debug, Clone)]
pub struct TwinkleEffect {
    config: TwinkleConfig,
    adsr: AdsrConfig,
    rng: SmallRng,
    sparkles: Vec<Sparkle>,
    delta: f64,
    running: bool,
}

fn sample(rng: &mut SmallRng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

impl TwinkleEffect {
    pub fn new(config: TwinkleConfig) -> Self {
        let adsr = AdsrConfig {
            peak: 1.0,
            sustain: 1.0,
            attack: config.attack,
            attack_shape: Tween::Linear,
            decay: 0.0,
            decay_shape: Tween::Linear,
            release: config.release,
            release_shape: Tween::Linear,
        };
        Self {
            config,
            adsr,
            rng: SmallRng::seed_from_u64(config.seed),
            sparkles: Vec::new(),
            delta: 0.0,
            running: true,
        }
    }

    pub const fn config(&self) -> &TwinkleConfig {
        &self.config
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    fn sparkle(&mut self, target: usize) -> (&mut Sparkle, &mut SmallRng) {
        while self.sparkles.len() <= target {
            let remaining = sample(&mut self.rng, 0.0, self.config.off_max);
            self.sparkles.push(Sparkle {
                envelope: AdsrEnvelope::new(self.adsr),
                level: 0.0,
                lit: false,
                remaining,
            });
        }
        (&mut self.sparkles[target], &mut self.rng)
    }
}

impl Default for TwinkleEffect {
    fn default() -> Self {
        Self::new(TwinkleConfig::default())
    }
}

impl Effect for TwinkleEffect {
    fn trigger(&mut self, intensity: f64) {
        self.running = intensity > 0.0;
    }

    fn advance(&mut self, frame: &FrameContext) {
        self.delta = frame.time_delta;
    }

    fn apply(&mut self, target: usize, attributes: &mut Attributes) {
        let config = self.config;
        let delta = self.delta;
        let running = self.running;
        let (sparkle, rng) = self.sparkle(target);

        if running {
            sparkle.remaining -= delta;
            if sparkle.remaining <= 0.0 {
                if sparkle.lit {
                    sparkle.envelope.trigger(GateState::Off, 1.0, false);
                    sparkle.lit = false;
                    sparkle.remaining = sample(rng, config.off_min, config.off_max);
                } else {
                    sparkle.level = sample(rng, config.intensity_min, config.intensity_max);
                    sparkle.envelope.trigger(GateState::On, 1.0, false);
                    sparkle.lit = true;
                    sparkle.remaining = sample(rng, config.on_min, config.on_max);
                }
            }
        } else if sparkle.lit {
            sparkle.envelope.trigger(GateState::Off, 1.0, false);
            sparkle.lit = false;
        }

        let value = sparkle.envelope.update(delta);
        attributes.intensity = attributes.intensity.max(sparkle.level * value);
    }

    fn reset(&mut self) {
        self.sparkles.clear();
        self.rng = SmallRng::seed_from_u64(self.config.seed);
    }
}
