use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::arena::ElementHandle;
use crate::bounds::{ChaseBounds, bounded};
use crate::effect::EffectSlot;
use crate::element::{CHASE_ROLES, Fanout, Key, Role, TriggerState, Triggerable};
use crate::envelope::{EnvelopeProfile, EnvelopeSegment};
use crate::error::ConfigError;
use crate::group::{Group, Pulse};
use crate::show::FrameContext;
use crate::tween::Tween;

/// How [`ChaseConfig::speed`] is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    /// Every move takes `speed` seconds
    #[default]
    Duration,
    /// Moves travel `speed` cells per second
    Speed,
}

/// What an off-trigger does to a running chase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffMode {
    /// Black out every cell at once
    #[default]
    All,
    /// Run again from the start at zero level, erasing behind the on edge
    Follow,
    /// Run back towards the start at zero level
    Reverse,
}

/// What a chase does on reaching its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    #[default]
    None,
    /// Jump back to the start and run again
    Loop,
    /// Bounce between start and end
    Pong,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseConfig {
    pub bounds: ChaseBounds,
    pub speed: f64,
    pub speed_mode: SpeedMode,
    pub move_tween: Tween,
    pub off_mode: OffMode,
    pub continuation: Continuation,
    /// Trigger every cell the centre passes instead of a fixed window
    pub sweep: bool,
    /// Window size in cells when not sweeping
    pub width: u32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            bounds: ChaseBounds::default(),
            speed: 1.0,
            speed_mode: SpeedMode::Duration,
            move_tween: Tween::Linear,
            off_mode: OffMode::All,
            continuation: Continuation::None,
            sweep: true,
            width: 1,
        }
    }
}

impl ChaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.bounds.cells();
        if !self.sweep && self.width > range {
            return Err(ConfigError::WidthExceedsRange {
                width: self.width,
                range,
            });
        }
        if self.speed_mode == SpeedMode::Speed && self.speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(self.speed));
        }
        Ok(())
    }
}

/// Cell triggers produced by one chase frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChaseStep {
    /// `(child index, level)` in the order they must be applied
    pub triggers: Vec<(usize, f64)>,
    pub fanout: Option<Fanout>,
}

/// Positional sweep across an ordered list of elements
#[derive(Debug, Clone)]
pub struct Chase {
    group: Group,
    config: ChaseConfig,
    center_position: f64,
    moveto: f64,
    current_moveto: Option<f64>,
    move_envelope: EnvelopeSegment,
    last_center: Option<i64>,
    moving: bool,
    move_complete: bool,
}

impl Chase {
    pub fn new(name: impl Into<String>, config: ChaseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = config.bounds.start_position();
        let mut group = Group::new(name);
        group.roles = CHASE_ROLES;
        Ok(Self {
            group,
            config,
            center_position: start,
            moveto: config.bounds.end_position(),
            current_moveto: None,
            move_envelope: EnvelopeSegment::new(EnvelopeProfile::new(
                config.move_tween,
                start,
                0.0,
                0.0,
            )),
            last_center: None,
            moving: false,
            move_complete: false,
        })
    }

    #[must_use]
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementHandle>) -> Self {
        self.group.elements.extend(elements);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<EffectSlot>) -> Self {
        self.group.effects.push(effect.into());
        self
    }

    pub fn push(&mut self, element: ElementHandle) {
        self.group.push(element);
    }

    pub fn elements(&self) -> &[ElementHandle] {
        self.group.elements()
    }

    pub(crate) fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    pub const fn config(&self) -> &ChaseConfig {
        &self.config
    }

    pub const fn center_position(&self) -> f64 {
        self.center_position
    }

    pub const fn moveto(&self) -> f64 {
        self.moveto
    }

    pub const fn is_moving(&self) -> bool {
        self.moving
    }

    pub const fn is_move_complete(&self) -> bool {
        self.move_complete
    }

    pub fn is_triggered(&self) -> bool {
        self.group.is_triggered()
    }

    /// Off with nothing left to run; an off-all chase renders nothing
    pub fn is_idle(&self) -> bool {
        self.group.trigger_intensity == 0.0 && self.config.off_mode == OffMode::All
    }

    pub const fn trigger_intensity(&self) -> f64 {
        self.group.trigger_intensity
    }

    pub const fn roles(&self) -> &'static [Role] {
        self.group.roles
    }

    pub fn set_continuation(&mut self, continuation: Continuation) {
        self.config.continuation = continuation;
    }

    pub fn set_toggle_mode(&mut self, toggle_mode: bool) {
        self.group.toggle_mode = toggle_mode;
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), ConfigError> {
        if self.config.speed_mode == SpeedMode::Speed && speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(speed));
        }
        self.config.speed = speed;
        Ok(())
    }

    pub fn trigger(&mut self, intensity: f64) -> Fanout {
        let active = self.group.is_triggered();
        if intensity > 0.0 && !active {
            if self.moving {
                // an on or off run is still in flight
                return Fanout::None;
            }
            let level = intensity.min(self.group.max_intensity);
            self.group.trigger_state = TriggerState::Active;
            self.group.trigger_intensity = level;
            for effect in &mut self.group.effects {
                effect.trigger(level);
            }
            self.center_position = self.config.bounds.start_position();
            self.last_center = None;
            self.moveto = self.config.bounds.end_position();
            debug!("{}: chase trigger on @ {}", self.group.name, level);
            self.moving = true;
            self.setup_move(None);
            Fanout::None
        } else if active && intensity == 0.0 && !self.group.toggle_mode && !self.group.bell_mode {
            self.off_trigger()
        } else if active && intensity != 0.0 && self.group.toggle_mode {
            self.off_trigger()
        } else {
            Fanout::None
        }
    }

    fn off_trigger(&mut self) -> Fanout {
        self.group.trigger_state = TriggerState::Idle;
        self.group.trigger_intensity = 0.0;
        for effect in &mut self.group.effects {
            effect.trigger(0.0);
        }
        debug!("{}: chase trigger off", self.group.name);
        self.reset_positions();
        match self.config.off_mode {
            OffMode::All => {
                self.moving = false;
                Fanout::Children(0.0)
            }
            OffMode::Follow | OffMode::Reverse => {
                self.moving = true;
                Fanout::None
            }
        }
    }

    fn reset_positions(&mut self) {
        let start = self.config.bounds.start_position();
        let end = self.config.bounds.end_position();
        if self.config.off_mode == OffMode::Reverse {
            let target = if self.center_position == start { end } else { start };
            self.moveto = libm::trunc(target);
        } else {
            let target = if self.group.is_triggered() {
                self.center_position
            } else {
                end
            };
            self.center_position = start;
            self.last_center = None;
            self.moveto = libm::trunc(target);
            self.setup_move(None);
        }
        self.moving = false;
    }

    /// Start a move from the current centre, optionally retargeting it
    pub fn setup_move(&mut self, moveto: Option<f64>) {
        if let Some(moveto) = moveto {
            self.moveto = moveto;
        }
        let change = self.moveto - self.center_position;
        let duration = match self.config.speed_mode {
            SpeedMode::Duration => self.config.speed,
            SpeedMode::Speed => libm::fabs(change) / self.config.speed,
        };
        self.move_envelope.set_profile(EnvelopeProfile::new(
            self.config.move_tween,
            self.center_position,
            change,
            duration,
        ));
        self.move_envelope.reset();
        self.current_moveto = Some(self.moveto);
        self.move_complete = false;
        if self.group.is_triggered() {
            self.moving = true;
        }
    }

    fn update_position(&mut self, delta: f64) {
        if self.current_moveto != Some(self.moveto) {
            self.setup_move(None);
        }
        self.center_position = self.move_envelope.update(delta);
    }

    fn move_completed(&mut self) -> Option<Fanout> {
        let start = self.config.bounds.start_position();
        let end = self.config.bounds.end_position();
        match self.config.continuation {
            Continuation::Pong => {
                let cell = libm::round(self.center_position);
                if cell == end {
                    debug!("{}: pong at {}", self.group.name, end);
                    self.moveto = start;
                }
                if cell == start {
                    self.moveto = end;
                }
            }
            Continuation::Loop => {
                self.center_position = start;
                self.last_center = None;
                self.setup_move(None);
            }
            Continuation::None => self.moving = false,
        }
        self.move_complete = true;
        if self.group.bell_mode && self.group.is_triggered() {
            return Some(self.off_trigger());
        }
        None
    }

    /// Advance the move and render one frame
    ///
    /// The returned triggers must land before the children are updated for
    /// this frame, so re-triggered cells light up in the same frame. With a
    /// pulse the cells are rendered through its kernel instead of the
    /// sweep or window.
    pub fn step(&mut self, frame: &FrameContext, pulse: Option<&mut Pulse>) -> ChaseStep {
        let mut step = ChaseStep::default();
        if self.is_idle() {
            return step;
        }
        if self.moving {
            self.update_position(frame.time_delta);
        }
        match pulse {
            Some(pulse) => pulse.render(self.center_position, self.group.elements.len(), &mut step.triggers),
            None => self.render(&mut step.triggers),
        }
        if self.moving && self.move_envelope.is_complete() {
            step.fanout = self.move_completed();
        }
        step
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, triggers: &mut Vec<(usize, f64)>) {
        let len = self.group.elements.len();
        let level = self.group.trigger_intensity;
        let current = libm::trunc(self.center_position) as i64;
        if self.config.sweep {
            let cells = match self.last_center {
                None => {
                    let start = i64::from(self.config.bounds.start);
                    bounded(start.min(current), start.max(current) + 1, len)
                }
                Some(last) if last < current => bounded(last + 1, current + 1, len),
                Some(last) if last > current => bounded(current, last, len),
                Some(_) => 0..0,
            };
            triggers.extend(cells.map(|cell| (cell, level)));
        } else {
            triggers.extend((0..len).map(|cell| (cell, 0.0)));
            let lower = i64::from(self.config.bounds.lower());
            let window = bounded(
                lower.max(current - i64::from(self.config.width)),
                current,
                len,
            );
            triggers.extend(window.map(|cell| (cell, level)));
        }
        self.last_center = Some(current);
    }
}

impl Triggerable for Chase {
    fn name(&self) -> &str {
        &self.group.name
    }

    fn trigger(&mut self, intensity: f64, _key: Option<Key>) -> Fanout {
        Chase::trigger(self, intensity)
    }

    fn trigger_state(&self) -> TriggerState {
        self.group.trigger_state
    }

    fn set_bell_mode(&mut self, bell_mode: bool) {
        self.group.bell_mode = bell_mode;
    }
}
