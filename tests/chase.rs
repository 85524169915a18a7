mod common;
use common::*;

use myrtio_light_show::{
    AdsrConfig, BlinkEffect, Chase, ChaseBounds, ChaseConfig, ConfigError, Continuation,
    ElementHandle, Group, LightElement, Network, OffMode, Pulse, PulseChase, PulseConfig, Show,
    SpeedMode, TriggerState, Triggerable,
};

fn lights(show: &mut Show, count: u16) -> Vec<ElementHandle> {
    (0..count)
        .map(|n| show.insert(LightElement::dimmer(format!("cell-{n}"), n + 1)))
        .collect()
}

/// Lights that reach their trigger level on the first update and go dark
/// on the first update after release
fn instant_lights(show: &mut Show, count: u16) -> Vec<ElementHandle> {
    let adsr = AdsrConfig {
        attack: 0.0,
        sustain: 1.0,
        release: 0.0,
        ..AdsrConfig::default()
    };
    (0..count)
        .map(|n| show.insert(LightElement::dimmer(format!("cell-{n}"), n + 1).with_adsr(adsr)))
        .collect()
}

/// Twelve cells crossed at one cell per quarter second
fn stepping_config() -> ChaseConfig {
    ChaseConfig {
        speed_mode: SpeedMode::Speed,
        speed: 4.0,
        ..sweep_config(11)
    }
}

fn sweep_config(end: u32) -> ChaseConfig {
    ChaseConfig {
        bounds: ChaseBounds::new(0, end),
        speed: 1.0,
        ..ChaseConfig::default()
    }
}

fn triggered(show: &Show, cells: &[ElementHandle]) -> Vec<bool> {
    cells
        .iter()
        .map(|cell| show.light(*cell).unwrap().trigger_state() == TriggerState::Active)
        .collect()
}

fn run(show: &mut Show, frames: usize, delta: f64) {
    let start = show.timecode();
    for n in 0..frames {
        show.update(&frame(start + delta * (n + 1) as f64, delta));
    }
}

#[test]
fn test_group_fans_out_clamped() {
    let mut show = Show::new();
    let cells = lights(&mut show, 3);
    let group = show.add(
        Group::new("all")
            .with_elements(cells.clone())
            .with_max_intensity(0.6),
        None,
    );

    show.trigger(group, 0.9, None);
    for cell in &cells {
        assert_approx(show.light(*cell).unwrap().trigger_intensity(), 0.6);
    }
    assert!(show.group(group).unwrap().is_triggered());
    assert!(show.is_active(group));

    show.trigger(group, 0.0, None);
    assert!(!show.group(group).unwrap().is_triggered());
    assert!(show.is_active(group));

    run(&mut show, 20, 0.1);
    assert!(!show.is_active(group));
}

#[test]
fn test_group_updates_shared_child_once() {
    let mut show = Show::new();
    let cells = lights(&mut show, 2);
    let group = show.insert(Group::new("pair").with_elements(cells.clone()));
    show.add_element(cells[0], None);
    show.add_element(group, None);

    show.trigger(group, 1.0, None);
    show.update(&frame(0.25, 0.25));
    assert_approx(show.light(cells[0]).unwrap().intensity(), 0.5);
    assert_approx(show.light(cells[1]).unwrap().intensity(), 0.5);
}

#[test]
fn test_sweep_step_covers_every_cell_once() {
    let mut show = Show::new();
    let cells = lights(&mut show, 10);
    let mut chase = Chase::new("sweep", sweep_config(9))
        .unwrap()
        .with_elements(cells);

    chase.trigger(1.0);
    assert!(chase.is_moving());

    let mut hit = Vec::new();
    for n in 0..4 {
        let step = chase.step(&frame(0.25 * f64::from(n + 1), 0.25), None);
        hit.extend(step.triggers.iter().map(|(cell, level)| {
            assert_approx(*level, 1.0);
            *cell
        }));
        assert_eq!(step.fanout, None);
    }
    assert_eq!(hit, (0..10).collect::<Vec<_>>());
    assert!(!chase.is_moving());
    assert!(chase.is_move_complete());
}

#[test]
fn test_chase_lights_cells_as_it_moves() {
    let mut show = Show::new();
    let cells = lights(&mut show, 10);
    let chase = show.add(
        Chase::new("sweep", sweep_config(9))
            .unwrap()
            .with_elements(cells.clone()),
        None,
    );

    show.trigger(chase, 1.0, None);
    run(&mut show, 1, 0.25);
    assert_eq!(
        triggered(&show, &cells),
        [true, true, true, false, false, false, false, false, false, false]
    );

    run(&mut show, 3, 0.25);
    assert!(triggered(&show, &cells).iter().all(|on| *on));

    show.trigger(chase, 0.0, None);
    assert!(triggered(&show, &cells).iter().all(|on| !on));
}

#[test]
fn test_reverse_off_runs_back() {
    let mut show = Show::new();
    let cells = lights(&mut show, 10);
    let config = ChaseConfig {
        off_mode: OffMode::Reverse,
        ..sweep_config(9)
    };
    let chase = show.add(
        Chase::new("there-and-back", config)
            .unwrap()
            .with_elements(cells.clone()),
        None,
    );

    show.trigger(chase, 1.0, None);
    run(&mut show, 4, 0.25);
    show.trigger(chase, 0.0, None);
    let state = show.chase(chase).unwrap();
    assert!(state.is_moving());
    assert_eq!(state.moveto(), 0.0);

    run(&mut show, 5, 0.25);
    // the cell the reverse run starts from is left to the caller
    assert!(triggered(&show, &cells[..9]).iter().all(|on| !on));
    assert!(!show.chase(chase).unwrap().is_moving());
}

#[test]
fn test_follow_off_erases_from_start() {
    let mut show = Show::new();
    let cells = lights(&mut show, 10);
    let config = ChaseConfig {
        off_mode: OffMode::Follow,
        ..sweep_config(9)
    };
    let chase = show.add(
        Chase::new("follow", config)
            .unwrap()
            .with_elements(cells.clone()),
        None,
    );

    show.trigger(chase, 1.0, None);
    run(&mut show, 4, 0.25);
    show.trigger(chase, 0.0, None);
    assert_eq!(show.chase(chase).unwrap().center_position(), 0.0);

    run(&mut show, 1, 0.25);
    let on = triggered(&show, &cells);
    assert!(!on[0] && !on[1] && !on[2]);
    assert!(on[5]);
}

#[test]
fn test_loop_restarts_from_start() {
    let mut show = Show::new();
    let cells = lights(&mut show, 5);
    let config = ChaseConfig {
        continuation: Continuation::Loop,
        ..sweep_config(4)
    };
    let chase = show.add(
        Chase::new("loop", config).unwrap().with_elements(cells),
        None,
    );

    show.trigger(chase, 1.0, None);
    run(&mut show, 2, 0.5);
    let state = show.chase(chase).unwrap();
    assert!(state.is_moving());
    assert_eq!(state.center_position(), 0.0);
}

#[test]
fn test_pong_flips_target() {
    let mut show = Show::new();
    let cells = lights(&mut show, 5);
    let config = ChaseConfig {
        continuation: Continuation::Pong,
        ..sweep_config(4)
    };
    let chase = show.add(
        Chase::new("pong", config).unwrap().with_elements(cells),
        None,
    );

    show.trigger(chase, 1.0, None);
    run(&mut show, 2, 0.5);
    assert_eq!(show.chase(chase).unwrap().moveto(), 0.0);

    run(&mut show, 2, 0.5);
    assert_eq!(show.chase(chase).unwrap().moveto(), 4.0);
}

#[test]
fn test_bell_chase_turns_itself_off() {
    let mut show = Show::new();
    let cells = lights(&mut show, 5);
    let chase = show.add(
        Chase::new("bell", sweep_config(4)).unwrap().with_elements(cells),
        None,
    );
    show.set_bell_mode(chase, true);

    show.trigger(chase, 1.0, None);
    show.trigger(chase, 0.0, None);
    assert!(show.chase(chase).unwrap().is_triggered());

    run(&mut show, 2, 0.5);
    assert!(!show.chase(chase).unwrap().is_triggered());
}

#[test]
fn test_speed_mode_uses_distance() {
    let mut show = Show::new();
    let cells = lights(&mut show, 9);
    let config = ChaseConfig {
        speed_mode: SpeedMode::Speed,
        speed: 4.0,
        ..sweep_config(8)
    };
    let mut chase = Chase::new("rate", config).unwrap().with_elements(cells);
    chase.trigger(1.0);
    chase.step(&frame(1.0, 1.0), None);
    assert_approx(chase.center_position(), 4.0);
    chase.step(&frame(2.0, 1.0), None);
    assert_approx(chase.center_position(), 8.0);
    assert!(!chase.is_moving());
}

#[test]
fn test_width_window_trails_center() {
    let mut show = Show::new();
    let cells = lights(&mut show, 10);
    let config = ChaseConfig {
        sweep: false,
        width: 3,
        ..sweep_config(9)
    };
    let mut chase = Chase::new("window", config).unwrap().with_elements(cells);
    chase.trigger(0.8);
    let step = chase.step(&frame(0.5, 0.5), None);

    let lit: Vec<(usize, f64)> = step
        .triggers
        .iter()
        .copied()
        .filter(|(_, level)| *level > 0.0)
        .collect();
    assert_eq!(lit, vec![(1, 0.8), (2, 0.8), (3, 0.8)]);
    assert_eq!(step.triggers.len(), 13);
}

#[test]
fn test_width_wider_than_range_is_rejected() {
    let config = ChaseConfig {
        sweep: false,
        width: 6,
        ..sweep_config(4)
    };
    let err = Chase::new("too-wide", config).unwrap_err();
    assert_eq!(err, ConfigError::WidthExceedsRange { width: 6, range: 5 });
}

#[test]
fn test_zero_speed_is_rejected_in_speed_mode() {
    let config = ChaseConfig {
        speed_mode: SpeedMode::Speed,
        speed: 0.0,
        ..sweep_config(4)
    };
    assert!(matches!(
        Chase::new("stuck", config),
        Err(ConfigError::NonPositiveSpeed(_))
    ));
}

#[test]
fn test_pulse_kernel_nodes() {
    let mut pulse = Pulse::new(PulseConfig::default());
    pulse.set_current_nodes(5.0);

    assert_eq!(pulse.node_start(), 1);
    let expected = [0.0, 0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25, 0.0];
    assert_eq!(pulse.nodes().len(), expected.len());
    for (node, want) in pulse.nodes().iter().zip(expected) {
        assert_approx(*node, want);
    }
    assert_eq!(pulse.node_at(0), None);
    assert_approx(pulse.node_at(5).unwrap(), 1.0);
    assert_eq!(pulse.node_at(10), None);
}

#[test]
fn test_pulse_render_releases_then_sets() {
    let mut pulse = Pulse::default();
    let mut triggers = Vec::new();
    pulse.render(5.0, 12, &mut triggers);

    assert_eq!(triggers.len(), 12 + 9);
    assert_eq!(triggers[0], (0, 0.0));
    let cell_five: Vec<f64> = triggers
        .iter()
        .filter(|(cell, _)| *cell == 5)
        .map(|(_, level)| *level)
        .collect();
    assert_eq!(cell_five.len(), 2);
    assert_approx(cell_five[0], 0.0);
    assert_approx(cell_five[1], 1.0);
}

#[test]
fn test_pulse_chase_bounces() {
    let mut show = Show::new();
    let cells = lights(&mut show, 12);
    let pulse = show.add(
        PulseChase::new("comet", sweep_config(11), PulseConfig::default())
            .unwrap()
            .with_elements(cells.clone()),
        None,
    );
    assert_eq!(
        show.pulse_chase(pulse).unwrap().chase().config().continuation,
        Continuation::Pong
    );

    show.trigger(pulse, 1.0, None);
    run(&mut show, 2, 0.5);
    let state = show.chase(pulse).unwrap();
    assert!(state.is_moving());
    assert_eq!(state.moveto(), 0.0);
    assert!(show.light(cells[11]).unwrap().is_active());
}

#[test]
fn test_pulse_chase_lights_its_network() {
    let mut show = Show::new();
    let driver = RecordingDriver::new();
    let network = show.add_network(Network::new("strip", driver.clone()));
    let cells = instant_lights(&mut show, 12);
    let pulse = show.add(
        PulseChase::new("comet", stepping_config(), PulseConfig::default())
            .unwrap()
            .with_elements(cells),
        Some(network),
    );

    show.trigger(pulse, 1.0, None);
    for n in 1..=8_i64 {
        show.update(&frame(0.25 * n as f64, 0.25));
        show.flush();
        assert_approx(show.chase(pulse).unwrap().center_position(), n as f64);

        let expected: Vec<u8> = (0..12_i64)
            .map(|cell| match (cell - n).abs() {
                0 => 255,
                1 => 191,
                2 => 127,
                3 => 63,
                _ => 0,
            })
            .collect();
        assert_eq!(driver.last_frame(), Some(expected), "frame {n}");
    }
}

#[test]
fn test_width_window_lights_its_network() {
    let mut show = Show::new();
    let driver = RecordingDriver::new();
    let network = show.add_network(Network::new("strip", driver.clone()));
    let cells = instant_lights(&mut show, 12);
    let config = ChaseConfig {
        sweep: false,
        width: 3,
        ..stepping_config()
    };
    let chase = show.add(
        Chase::new("window", config).unwrap().with_elements(cells),
        Some(network),
    );

    show.trigger(chase, 1.0, None);
    for n in 1..=10_i64 {
        show.update(&frame(0.25 * n as f64, 0.25));
        show.flush();

        let expected: Vec<u8> = (0..12_i64)
            .map(|cell| if cell < n && cell >= n - 3 { 255 } else { 0 })
            .collect();
        assert_eq!(driver.last_frame(), Some(expected), "frame {n}");
    }
}

#[test]
fn test_idle_chase_leaves_effects_alone() {
    let mut show = Show::new();
    let cells: Vec<_> = (0..3)
        .map(|n| show.insert(LightElement::dimmer(format!("cell-{n}"), n + 1).with_simple(true)))
        .collect();
    let chase = show.add(
        Chase::new("blinker", sweep_config(2))
            .unwrap()
            .with_elements(cells.clone())
            .with_effect(BlinkEffect::new(2.0)),
        None,
    );
    for cell in &cells {
        show.trigger(*cell, 0.7, None);
    }
    assert!(show.chase(chase).unwrap().is_idle());

    // a running blink would be in its dark half by now
    show.update(&frame(0.0, 0.0));
    show.update(&frame(0.3, 0.3));
    for cell in &cells {
        assert_approx(show.light(*cell).unwrap().intensity(), 0.7);
    }
}
