mod common;
use common::*;

use myrtio_light_show::{
    FrameScheduler, Group, Intent, IntentChannel, IntentProcessor, Key, LightElement, Role, Show,
    ShowConfig, Spawner, Target, TriggerState, Triggerable, submit,
};

#[test]
fn test_named_trigger_reaches_element() {
    let mut show = Show::new();
    let front = show.add(LightElement::dimmer("front", 1), None);

    let channel: IntentChannel<8> = IntentChannel::new();
    let sender = channel.sender();
    let mut processor = IntentProcessor::new(channel.receiver());

    assert!(submit(&sender, Intent::trigger("front", 0.8)));
    assert_eq!(channel.len(), 1);
    // nothing happens until the frame loop drains the queue
    assert_eq!(show.light(front).unwrap().trigger_state(), TriggerState::Idle);

    assert_eq!(processor.process_pending(&mut show), 1);
    assert!(channel.is_empty());
    let light = show.light(front).unwrap();
    assert_eq!(light.trigger_state(), TriggerState::Active);
    assert_approx(light.trigger_intensity(), 0.8);
}

#[test]
fn test_unknown_targets_are_dropped() {
    let mut show = Show::new();
    let gone = show.add(LightElement::dimmer("gone", 1), None);
    show.destroy(gone);
    let front = show.add(LightElement::dimmer("front", 1), None);

    let channel: IntentChannel<8> = IntentChannel::new();
    let sender = channel.sender();
    let mut processor = IntentProcessor::new(channel.receiver());
    submit(&sender, Intent::trigger("nobody", 1.0));
    submit(&sender, Intent::trigger(gone, 1.0));
    submit(&sender, Intent::set_attribute("front", Role::Speed, 2.0));
    submit(&sender, Intent::trigger(front, 1.0));

    assert_eq!(processor.process_pending(&mut show), 4);
    assert_eq!(show.light(front).unwrap().trigger_state(), TriggerState::Active);
}

#[test]
fn test_full_queue_rejects() {
    let channel: IntentChannel<2> = IntentChannel::new();
    let sender = channel.sender();
    assert!(submit(&sender, Intent::Blackout));
    assert!(submit(&sender, Intent::Blackout));
    assert!(!submit(&sender, Intent::Blackout));
    assert_eq!(channel.len(), 2);
    assert!(matches!(channel.receiver().try_receive(), Ok(Intent::Blackout)));
    assert!(submit(&sender, Intent::Blackout));
}

#[test]
fn test_attribute_and_blackout_intents() {
    let mut show = Show::new();
    let left = show.insert(LightElement::rgb("left", 1).with_simple(true));
    let group = show.add(Group::new("wash").with_elements([left]), None);

    let channel: IntentChannel<8> = IntentChannel::new();
    let sender = channel.sender();
    let mut processor = IntentProcessor::new(channel.receiver());

    submit(&sender, Intent::trigger(group, 1.0));
    submit(&sender, Intent::set_attribute(left, Role::Hue, 0.25));
    processor.process_pending(&mut show);
    assert_approx(show.light(left).unwrap().intensity(), 1.0);
    assert_approx(show.light(left).unwrap().attributes().hue, 0.25);

    submit(&sender, Intent::Blackout);
    processor.process_pending(&mut show);
    assert_eq!(show.light(left).unwrap().intensity(), 0.0);
}

#[test]
fn test_keyed_intents_drive_spawner() {
    let mut show = Show::new();
    let template = show.insert(LightElement::dimmer("note", 1));
    let spawner = show.add(Spawner::new("keys", template), None);

    let channel: IntentChannel<8> = IntentChannel::new();
    let sender = channel.sender();
    let mut processor = IntentProcessor::new(channel.receiver());

    let key = Key::new(1, 60);
    submit(&sender, Intent::keyed_trigger("keys", 1.0, key));
    processor.process_pending(&mut show);
    assert_eq!(show.spawner(spawner).unwrap().spawned_count(), 1);
    assert_eq!(
        Intent::keyed_trigger("keys", 0.0, key),
        Intent::Trigger {
            target: Target::Named("keys".into()),
            intensity: 0.0,
            key: Some(key),
        }
    );
}

#[test]
fn test_tick_applies_queued_intents() {
    let clock = ManualClock::new();
    let channel: IntentChannel<8> = IntentChannel::new();
    let sender = channel.sender();

    let mut show = Show::new();
    let front = show.add(LightElement::dimmer("front", 1), None);
    let mut scheduler =
        FrameScheduler::new(show, &clock, channel.receiver(), ShowConfig::default()).unwrap();

    submit(&sender, Intent::trigger(front, 1.0));
    scheduler.tick();
    assert!(channel.is_empty());

    let light = scheduler.show().light(front).unwrap();
    assert_eq!(light.trigger_state(), TriggerState::Active);
    // the trigger lands before the frame's update
    assert_approx(light.intensity(), 0.05);
}
