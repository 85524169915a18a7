mod tests {
    use myrtio_light_show::{AdsrConfig, AdsrEnvelope, AdsrStage, GateState, Segment, Tween};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn on_index(envelope: &AdsrEnvelope) -> usize {
        match envelope.envelope().on_segment() {
            Some(Segment::Nested(on)) => on.index(),
            _ => unreachable!("on branch is always an envelope"),
        }
    }

    #[test]
    fn test_default_adsr_scenario() {
        let mut envelope = AdsrEnvelope::default();
        assert_eq!(envelope.stage(), AdsrStage::Idle);
        envelope.trigger(GateState::On, 1.0, false);

        assert!(approx(envelope.update(0.25), 0.5));
        assert_eq!(envelope.stage(), AdsrStage::Attack);

        assert!(approx(envelope.update(0.25), 1.0));
        assert_eq!(on_index(&envelope), 0);

        assert!(approx(envelope.update(0.1), 0.9));
        assert_eq!(on_index(&envelope), 1);
        assert_eq!(envelope.stage(), AdsrStage::Decay);

        assert!(approx(envelope.update(0.1), 0.8));

        assert!(approx(envelope.update(0.1), 0.8));
        assert_eq!(on_index(&envelope), 2);
        assert_eq!(envelope.stage(), AdsrStage::Sustain);

        assert!(approx(envelope.update(1000.0), 0.8));
        assert_eq!(envelope.stage(), AdsrStage::Sustain);
    }

    #[test]
    fn test_release_runs_to_done() {
        let mut envelope = AdsrEnvelope::default();
        envelope.trigger(GateState::On, 1.0, false);
        for _ in 0..10 {
            envelope.update(0.1);
        }
        envelope.trigger(GateState::Off, 1.0, false);
        assert_eq!(envelope.stage(), AdsrStage::Release);

        assert!(approx(envelope.update(0.25), 0.4));
        for _ in 0..4 {
            envelope.update(0.25);
        }
        assert_eq!(envelope.stage(), AdsrStage::Done);
        assert!(!envelope.is_advancing());
        assert!(approx(envelope.value(), 0.0));
    }

    #[test]
    fn test_early_release_continues_from_attack_level() {
        let mut envelope = AdsrEnvelope::default();
        envelope.trigger(GateState::On, 1.0, false);
        // 0.4 into a 0.8 sustain release
        assert!(approx(envelope.update(0.2), 0.4));

        envelope.trigger(GateState::Off, 1.0, false);
        assert!((envelope.value() - 0.4).abs() < 0.01);

        let next = envelope.update(0.05);
        assert!(next < 0.4, "release jumped back up to {next}");
    }

    #[test]
    fn test_no_decay_when_peak_is_sustain() {
        let config = AdsrConfig {
            peak: 0.6,
            sustain: 0.6,
            attack: 0.2,
            attack_shape: Tween::OutQuad,
            ..AdsrConfig::default()
        };
        let mut envelope = AdsrEnvelope::new(config);
        assert!(!envelope.has_decay());

        envelope.trigger(GateState::On, 1.0, false);
        envelope.update(0.2);
        envelope.update(0.1);
        assert_eq!(envelope.stage(), AdsrStage::Sustain);
        assert!(approx(envelope.value(), 0.6));
    }

    #[test]
    fn test_retrigger_restarts_attack() {
        let mut envelope = AdsrEnvelope::default();
        envelope.trigger(GateState::On, 1.0, false);
        envelope.update(0.4);
        envelope.trigger(GateState::On, 1.0, true);
        assert_eq!(envelope.stage(), AdsrStage::Attack);
        assert!(approx(envelope.update(0.1), 0.2));
    }

    #[test]
    fn test_release_restarts_when_level_is_off_curve() {
        let config = AdsrConfig {
            attack: 1.0,
            attack_shape: Tween::InBack,
            ..AdsrConfig::default()
        };
        let mut envelope = AdsrEnvelope::new(config);
        envelope.trigger(GateState::On, 1.0, false);
        // back-in dips below zero first, which the release never reaches
        assert!(envelope.update(0.1) < 0.0);

        envelope.trigger(GateState::Off, 1.0, false);
        assert_eq!(envelope.stage(), AdsrStage::Release);
        assert_eq!(envelope.envelope().segment_elapsed(), 0.0);

        // 0.1 into a 0.5 release from 0.8
        assert!(approx(envelope.update(0.1), 0.64));
    }
}
