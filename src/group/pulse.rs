use alloc::string::String;
use alloc::vec::Vec;

use crate::arena::ElementHandle;
use crate::element::{Fanout, Key, TriggerState, Triggerable};
use crate::error::ConfigError;
use crate::group::{Chase, ChaseConfig, ChaseStep, Continuation};
use crate::show::FrameContext;
use crate::tween::Tween;

/// Shape of a pulse on either side of its centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseConfig {
    pub left_width: u32,
    pub left_shape: Tween,
    pub right_width: u32,
    pub right_shape: Tween,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            left_width: 3,
            left_shape: Tween::Linear,
            right_width: 3,
            right_shape: Tween::Linear,
        }
    }
}

/// Intensity kernel around a fractional centre position
///
/// The centre cell is the brightest; each side falls off over its width
/// along its own curve and ends in a zero cell so trailing cells go dark.
#[derive(Debug, Clone, PartialEq)]
pub struct Pulse {
    config: PulseConfig,
    nodes: Vec<f64>,
    node_start: i64,
}

impl Pulse {
    pub const fn new(config: PulseConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            node_start: 0,
        }
    }

    pub const fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Kernel values, leftmost first
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Cell index of the first kernel value
    pub const fn node_start(&self) -> i64 {
        self.node_start
    }

    /// Value of the kernel at `cell`, if the cell is covered
    pub fn node_at(&self, cell: i64) -> Option<f64> {
        let offset = usize::try_from(cell - self.node_start).ok()?;
        self.nodes.get(offset).copied()
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn set_current_nodes(&mut self, center: f64) {
        let left_of_center = libm::floor(center);
        let offset = center - left_of_center;
        let left_width = self.config.left_width;
        let right_width = self.config.right_width;
        let mut far_left = left_of_center as i64 - i64::from(left_width);

        self.nodes.clear();
        let left_span = f64::from(left_width) + 1.0;
        for n in 0..=left_width {
            self.nodes.push(
                self.config
                    .left_shape
                    .apply(f64::from(n) + offset, 1.0, -1.0, left_span),
            );
        }
        if far_left >= 1 {
            self.nodes.push(0.0);
            far_left -= 1;
        }
        self.nodes.reverse();

        let right_span = f64::from(right_width) + 1.0;
        for n in 1..=right_width {
            let distance = (f64::from(n) - offset).max(0.0);
            self.nodes
                .push(self.config.right_shape.apply(distance, 1.0, -1.0, right_span));
        }
        self.nodes.push(0.0);
        self.node_start = far_left;
    }

    /// Every cell is first released; covered cells are then re-triggered
    /// at their kernel value
    pub fn render(&mut self, center: f64, len: usize, triggers: &mut Vec<(usize, f64)>) {
        self.set_current_nodes(center);
        for cell in 0..len {
            triggers.push((cell, 0.0));
            let value = i64::try_from(cell).ok().and_then(|cell| self.node_at(cell));
            if let Some(value) = value {
                triggers.push((cell, value.clamp(0.0, 1.0)));
            }
        }
    }
}

impl Default for Pulse {
    fn default() -> Self {
        Self::new(PulseConfig::default())
    }
}

/// A chase that renders an antialiased pulse, bouncing by default
#[derive(Debug, Clone)]
pub struct PulseChase {
    chase: Chase,
    pulse: Pulse,
}

impl PulseChase {
    pub fn new(
        name: impl Into<String>,
        config: ChaseConfig,
        pulse: PulseConfig,
    ) -> Result<Self, ConfigError> {
        let mut chase = Chase::new(name, config)?;
        chase.set_continuation(Continuation::Pong);
        Ok(Self {
            chase,
            pulse: Pulse::new(pulse),
        })
    }

    #[must_use]
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementHandle>) -> Self {
        self.chase = self.chase.with_elements(elements);
        self
    }

    pub fn chase(&self) -> &Chase {
        &self.chase
    }

    pub fn chase_mut(&mut self) -> &mut Chase {
        &mut self.chase
    }

    pub fn pulse(&self) -> &Pulse {
        &self.pulse
    }

    pub fn step(&mut self, frame: &FrameContext) -> ChaseStep {
        self.chase.step(frame, Some(&mut self.pulse))
    }
}

impl Triggerable for PulseChase {
    fn name(&self) -> &str {
        self.chase.name()
    }

    fn trigger(&mut self, intensity: f64, key: Option<Key>) -> Fanout {
        Triggerable::trigger(&mut self.chase, intensity, key)
    }

    fn trigger_state(&self) -> TriggerState {
        self.chase.trigger_state()
    }

    fn set_bell_mode(&mut self, bell_mode: bool) {
        self.chase.set_bell_mode(bell_mode);
    }
}
