//! Envelope engine
//!
//! Envelopes describe how a value evolves after a trigger. Leaves are timed
//! [`EnvelopeSegment`]s and [`StaticSegment`] holds; an [`Envelope`]
//! sequences them, loops, and nests. [`TriggeredEnvelope`] adds an on/off
//! gate and [`AdsrEnvelope`] builds the classic attack-decay-sustain-release
//! shape on top of it.
//!
//! All times are `f64` seconds.

mod profile;
mod segment;
mod sequence;
mod triggered;

pub use profile::EnvelopeProfile;
pub use segment::{EnvelopeSegment, Segment, StaticSegment};
pub use sequence::Envelope;
pub use triggered::{AdsrConfig, AdsrEnvelope, AdsrStage, GateState, TriggeredEnvelope};
