use crate::envelope::{Envelope, EnvelopeProfile};

/// A timed leaf of an envelope
///
/// Tracks its own elapsed time so a containing [`Envelope`] only needs to
/// forward frame deltas and reset it when moving on.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSegment {
    profile: EnvelopeProfile,
    elapsed: f64,
    value: f64,
}

impl EnvelopeSegment {
    pub const fn new(profile: EnvelopeProfile) -> Self {
        Self {
            profile,
            elapsed: 0.0,
            value: 0.0,
        }
    }

    pub const fn linear(start: f64, change: f64, duration: f64) -> Self {
        Self::new(EnvelopeProfile::linear(start, change, duration))
    }

    pub fn update(&mut self, delta: f64) -> f64 {
        self.elapsed += delta;
        self.value = if self.profile.duration <= 0.0 {
            self.profile.end_value()
        } else {
            self.profile.value_at(self.elapsed)
        };
        self.value
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.value = 0.0;
    }

    pub const fn profile(&self) -> &EnvelopeProfile {
        &self.profile
    }

    /// Re-parameterize the curve; elapsed time is kept
    pub fn set_profile(&mut self, profile: EnvelopeProfile) {
        self.profile = profile;
    }

    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn duration(&self) -> f64 {
        self.profile.duration
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.profile.duration
    }
}

/// Hold at a fixed level until something outside advances past it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSegment {
    level: f64,
}

impl StaticSegment {
    pub const fn new(level: f64) -> Self {
        Self { level }
    }

    pub const fn update(&self, _delta: f64) -> f64 {
        self.level
    }

    pub const fn level(&self) -> f64 {
        self.level
    }

    pub const fn profile(&self) -> EnvelopeProfile {
        EnvelopeProfile::linear(self.level, 0.0, f64::INFINITY)
    }
}

/// Child of an [`Envelope`]
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Timed(EnvelopeSegment),
    Static(StaticSegment),
    Nested(Envelope),
}

impl Segment {
    pub fn update(&mut self, delta: f64) -> f64 {
        match self {
            Segment::Timed(segment) => segment.update(delta),
            Segment::Static(segment) => segment.update(delta),
            Segment::Nested(envelope) => envelope.update(delta),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Segment::Timed(segment) => segment.reset(),
            Segment::Static(_) => {}
            Segment::Nested(envelope) => envelope.reset(),
        }
    }

    /// Time this child occupies before its parent moves on
    ///
    /// Static holds and nested envelopes containing one are unbounded.
    pub fn span(&self) -> f64 {
        match self {
            Segment::Timed(segment) => segment.duration(),
            Segment::Static(_) => f64::INFINITY,
            Segment::Nested(envelope) => envelope.span(),
        }
    }

    pub const fn is_static(&self) -> bool {
        matches!(self, Segment::Static(_))
    }

    /// Profile of the innermost leaf currently in play
    pub fn profile(&self) -> Option<EnvelopeProfile> {
        match self {
            Segment::Timed(segment) => Some(*segment.profile()),
            Segment::Static(segment) => Some(segment.profile()),
            Segment::Nested(envelope) => envelope.current_profile(),
        }
    }
}

impl From<EnvelopeSegment> for Segment {
    fn from(segment: EnvelopeSegment) -> Self {
        Segment::Timed(segment)
    }
}

impl From<StaticSegment> for Segment {
    fn from(segment: StaticSegment) -> Self {
        Segment::Static(segment)
    }
}

impl From<Envelope> for Segment {
    fn from(envelope: Envelope) -> Self {
        Segment::Nested(envelope)
    }
}
