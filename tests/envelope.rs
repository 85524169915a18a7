mod common;
use common::*;

use myrtio_light_show::{
    Envelope, EnvelopeProfile, EnvelopeSegment, GateState, Segment, StaticSegment, Tween,
    TriggeredEnvelope,
};

fn ramp(start: f64, end: f64) -> EnvelopeSegment {
    EnvelopeSegment::linear(start, end - start, 1.0)
}

fn up_down(loops: i64) -> Envelope {
    Envelope::new(loops).then(ramp(0.0, 1.0)).then(ramp(1.0, 0.0))
}

#[test]
fn test_segment_linear_midpoint() {
    let mut segment = EnvelopeSegment::linear(0.0, 1.0, 1.0);
    assert_approx(segment.update(0.5), 0.5);
    assert!(!segment.is_complete());
}

#[test]
fn test_segment_clamps_past_duration() {
    let mut segment = EnvelopeSegment::new(EnvelopeProfile::new(Tween::InQuad, 0.2, 0.6, 1.0));
    assert_approx(segment.update(5.0), 0.8);
    assert!(segment.is_complete());
    segment.reset();
    assert_eq!(segment.elapsed(), 0.0);
}

#[test]
fn test_static_segment_holds() {
    let segment = StaticSegment::new(0.3);
    assert_approx(segment.update(0.01), 0.3);
    assert_approx(segment.update(1.0e9), 0.3);
}

#[test]
fn test_two_segment_sequence() {
    let mut envelope = up_down(0);
    assert_approx(envelope.update(0.5), 0.5);
    assert_approx(envelope.update(0.4), 0.9);

    assert_approx(envelope.update(0.11), 0.99);
    assert_eq!(envelope.index(), 1);

    assert_approx(envelope.update(0.19), 0.8);
    assert_approx(envelope.update(0.8), 0.0);

    for _ in 0..3 {
        assert_approx(envelope.update(0.5), 0.0);
    }
    assert!(envelope.is_exhausted());
    assert!(!envelope.is_advancing());

    envelope.reset();
    assert_eq!(envelope.index(), 0);
    assert_approx(envelope.update(0.8), 0.8);
}

#[test]
fn test_finite_loops_count_down() {
    let mut envelope = up_down(2);
    for _ in 0..12 {
        envelope.update(0.25);
    }
    // 3 s in: one wrap done
    assert_eq!(envelope.loop_counter(), 1);

    for _ in 0..6 {
        envelope.update(0.25);
    }
    // 4.5 s in: both wraps done, playing the last pass
    assert_eq!(envelope.loop_counter(), 0);
    assert!(!envelope.is_exhausted());

    for _ in 0..10 {
        envelope.update(0.25);
    }
    assert!(envelope.is_exhausted());
    assert_eq!(envelope.loop_counter(), 0);
    assert_approx(envelope.value(), 0.0);
}

#[test]
fn test_infinite_loop_keeps_running() {
    let mut envelope = up_down(2);
    envelope.set_loop(-1);
    envelope.reset();

    let mut value = 0.0;
    for _ in 0..51 {
        value = envelope.update(0.5);
    }
    assert_eq!(envelope.loop_counter(), -1);
    assert!(envelope.is_advancing());
    assert_approx(value, 0.5);
}

#[test]
fn test_nested_matches_flat() {
    let mut nested = Envelope::new(0)
        .then(Envelope::new(0).then(ramp(0.0, 1.0)).then(ramp(1.0, 0.5)))
        .then(Envelope::new(0).then(ramp(0.5, 0.8)).then(ramp(0.8, 0.0)));
    let mut flat = Envelope::new(0)
        .then(ramp(0.0, 1.0))
        .then(ramp(1.0, 0.5))
        .then(ramp(0.5, 0.8))
        .then(ramp(0.8, 0.0));

    for step in 0..20 {
        let a = nested.update(0.25);
        let b = flat.update(0.25);
        assert!(approx(a, b), "step {step}: nested {a} vs flat {b}");
    }
}

#[test]
fn test_span_and_duration() {
    let timed = up_down(0);
    assert_approx(timed.span(), 2.0);
    assert_approx(timed.duration(), 2.0);

    let open = Envelope::new(0)
        .then(ramp(0.0, 1.0))
        .then(StaticSegment::new(1.0));
    assert!(open.span().is_infinite());
    assert_eq!(open.duration(), 0.0);

    let nested = Segment::from(up_down(0));
    assert_approx(nested.span(), 2.0);
}

#[test]
fn test_empty_envelope_is_inert() {
    let mut envelope = Envelope::new(0);
    assert!(envelope.is_exhausted());
    assert_eq!(envelope.update(1.0), 0.0);
    assert!(!envelope.advance());
}

fn hold_and_release() -> TriggeredEnvelope {
    let on = Envelope::new(0)
        .then(EnvelopeSegment::linear(0.0, 0.3, 0.5))
        .then(StaticSegment::new(0.3));
    let off = Envelope::new(0).then(EnvelopeSegment::linear(0.3, -0.3, 1.0));
    TriggeredEnvelope::new(on, off)
}

#[test]
fn test_triggered_release_jumps_to_current_level() {
    let mut envelope = hold_and_release();
    envelope.trigger(GateState::On, 1.0, false);
    envelope.update(0.5);
    assert_approx(envelope.update(0.5), 0.3);

    envelope.set_value(0.2);
    envelope.trigger(GateState::Off, 1.0, false);

    assert_eq!(envelope.index(), 1);
    assert_near(envelope.segment_elapsed(), 0.33, 0.011);
    assert_near(envelope.value(), 0.2, 0.005);
}

#[test]
fn test_triggered_release_from_hold_starts_at_top() {
    let mut envelope = hold_and_release();
    envelope.trigger(GateState::On, 1.0, false);
    envelope.update(0.5);
    envelope.update(0.5);
    envelope.trigger(GateState::Off, 1.0, false);

    assert_eq!(envelope.segment_elapsed(), 0.0);
    assert_approx(envelope.update(0.5), 0.15);
}

#[test]
fn test_triggered_at_rest_ignores_time() {
    let mut envelope = hold_and_release();
    assert!(envelope.is_at_rest());
    assert_eq!(envelope.update(10.0), 0.0);
    assert_eq!(envelope.index(), 0);
    assert!(envelope.is_at_rest());
}

#[test]
fn test_triggered_repeat_needs_force() {
    let mut envelope = hold_and_release();
    envelope.trigger(GateState::On, 1.0, false);
    envelope.update(0.25);
    envelope.trigger(GateState::On, 1.0, false);
    assert_approx(envelope.segment_elapsed(), 0.25);

    envelope.trigger(GateState::On, 1.0, true);
    assert_eq!(envelope.segment_elapsed(), 0.0);
}

#[test]
fn test_zero_value_closes_gate() {
    let mut envelope = hold_and_release();
    envelope.trigger(GateState::On, 1.0, false);
    envelope.update(0.25);
    envelope.trigger(GateState::On, 0.0, false);
    assert_eq!(envelope.state(), GateState::Off);
    assert_eq!(envelope.index(), 1);
}
