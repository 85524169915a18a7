#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod arena;
pub mod bounds;
pub mod color;
pub mod effect;
pub mod element;
pub mod envelope;
pub mod error;
pub mod frame_scheduler;
pub mod group;
pub mod intent_processor;
pub mod network;
pub mod show;
pub mod spawner;
pub mod time;
pub mod tween;

pub use arena::{Arena, ElementHandle, Node};
pub use bounds::ChaseBounds;
pub use effect::{
    BlinkEffect, ColorShiftEffect, Effect, EffectId, EffectSlot, PulserEffect, TwinkleConfig,
    TwinkleEffect,
};
pub use element::{
    Attributes, ChannelMap, Fanout, Key, LightElement, Role, TriggerState, Triggerable,
};
pub use envelope::{
    AdsrConfig, AdsrEnvelope, AdsrStage, Envelope, EnvelopeProfile, EnvelopeSegment, GateState,
    Segment, StaticSegment, TriggeredEnvelope,
};
pub use error::{AttributeError, ConfigError, JumpTimeNotFound, OutputError};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use group::{
    Chase, ChaseConfig, Continuation, Group, OffMode, Pulse, PulseChase, PulseConfig, SpeedMode,
};
pub use intent_processor::{
    Intent, IntentChannel, IntentProcessor, IntentReceiver, IntentSender, Target, submit,
};
pub use network::{Network, NetworkId, NullDriver};
pub use show::{FrameContext, Show, ShowConfig};
pub use spawner::Spawner;
#[cfg(feature = "std")]
pub use time::SystemClock;
pub use time::TimeSource;
pub use tween::Tween;

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract channel transport
///
/// Implement this trait for each output (DMX interface, network protocol,
/// preview). A network hands its whole channel buffer to the driver once
/// per frame.
pub trait OutputDriver {
    /// Send one frame of channel bytes, channel 1 first
    fn write(&mut self, data: &[u8]) -> Result<(), OutputError>;
}
