use alloc::vec::Vec;

use log::debug;

use crate::envelope::{EnvelopeProfile, Segment};

/// Ordered, optionally looping sequence of segments or sub-envelopes
///
/// `index` is either a valid child index or exactly `segments.len()`, in
/// which case the envelope is exhausted and holds its last value until
/// [`Envelope::reset`].
///
/// Loop counts: negative loops forever, zero plays once, positive replays
/// the sequence that many extra times.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    segments: Vec<Segment>,
    index: usize,
    loops: i64,
    loop_counter: i64,
    advancing: bool,
    value: f64,
    segment_elapsed: f64,
}

impl Envelope {
    pub fn new(loops: i64) -> Self {
        Self::with_segments(Vec::new(), loops)
    }

    pub fn with_segments(segments: Vec<Segment>, loops: i64) -> Self {
        let mut envelope = Self {
            segments,
            index: 0,
            loops,
            loop_counter: loops,
            advancing: true,
            value: 0.0,
            segment_elapsed: 0.0,
        };
        envelope.reset();
        envelope
    }

    /// Append a child, builder style
    #[must_use]
    pub fn then(mut self, segment: impl Into<Segment>) -> Self {
        self.push(segment);
        self
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn loops(&self) -> i64 {
        self.loops
    }

    /// Change the loop count; takes effect on the next [`Envelope::reset`]
    pub fn set_loop(&mut self, loops: i64) {
        self.loops = loops;
    }

    pub const fn loop_counter(&self) -> i64 {
        self.loop_counter
    }

    pub const fn is_advancing(&self) -> bool {
        self.advancing
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.segments.len()
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Override the cached value, e.g. to resume a release from a level the
    /// envelope did not produce itself
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Time spent in the current child so far
    pub const fn segment_elapsed(&self) -> f64 {
        self.segment_elapsed
    }

    /// Sum of child spans; infinite when any child is open-ended
    pub fn span(&self) -> f64 {
        self.segments.iter().map(Segment::span).sum()
    }

    /// Total length in seconds, `0.0` for open-ended envelopes
    pub fn duration(&self) -> f64 {
        let span = self.span();
        if span.is_finite() { span } else { 0.0 }
    }

    pub fn current_profile(&self) -> Option<EnvelopeProfile> {
        let last = self.segments.len().checked_sub(1)?;
        self.segments[self.index.min(last)].profile()
    }

    pub fn reset(&mut self) {
        self.loop_counter = self.loops;
        self.index = 0;
        self.value = 0.0;
        self.segment_elapsed = 0.0;
        for segment in &mut self.segments {
            segment.reset();
        }
        self.advancing = true;
    }

    /// Move to the next child, wrapping when loops remain
    ///
    /// Returns `false` once the sequence is exhausted.
    pub fn advance(&mut self) -> bool {
        let Some(last) = self.segments.len().checked_sub(1) else {
            self.advancing = false;
            return false;
        };
        if self.index >= last {
            if self.loops != 0 && self.loop_counter != 0 {
                self.segments[last].reset();
                self.index = 0;
                self.segment_elapsed = 0.0;
                if self.loops > 0 {
                    self.loop_counter -= 1;
                }
                return true;
            }
            self.advancing = false;
            self.index = self.segments.len();
            return false;
        }
        self.segments[self.index].reset();
        self.index += 1;
        self.segment_elapsed = 0.0;
        true
    }

    /// Feed `delta` seconds and return the new value
    ///
    /// Crossing a child boundary carries the overage into the next child,
    /// one boundary per call.
    pub fn update(&mut self, delta: f64) -> f64 {
        if self.is_exhausted() {
            return self.value;
        }
        self.segment_elapsed += delta;
        let span = self.segments[self.index].span();
        if self.segment_elapsed > span && !self.segments[self.index].is_static() {
            let overage = self.segment_elapsed - span;
            let held = self.index;
            if self.advance() {
                self.segment_elapsed = overage;
                self.value = self.segments[self.index].update(overage);
            } else {
                self.value = self.segments[held].update(delta);
                debug!("envelope exhausted at {}", self.value);
            }
            return self.value;
        }
        self.value = self.segments[self.index].update(delta);
        self.value
    }
}
