use alloc::vec::Vec;

use log::debug;

use crate::arena::{ElementHandle, Node};
use crate::element::{TriggerState, Triggerable};
use crate::show::{FrameContext, Show};

impl Show {
    /// Advance every scheduled element by one frame
    ///
    /// Elements run in registration order, then show-level effects. An
    /// element reachable through several containers is updated once.
    pub fn update(&mut self, frame: &FrameContext) {
        self.timecode = frame.timecode;
        let elements = self.elements.clone();
        for element in elements {
            self.update_node(element, frame);
        }

        let mut effects = core::mem::take(&mut self.effects);
        for slot in &mut effects {
            slot.effect.advance(frame);
            let leaves: Vec<ElementHandle> = slot
                .targets
                .iter()
                .flat_map(|target| self.leaves(*target))
                .collect();
            for (index, leaf) in leaves.into_iter().enumerate() {
                if let Some(light) = self.light_mut(leaf) {
                    slot.effect.apply(index, light.attributes_mut());
                }
            }
        }
        // effects added while updating go after the existing ones
        effects.append(&mut self.effects);
        self.effects = effects;
    }

    pub(crate) fn update_node(&mut self, element: ElementHandle, frame: &FrameContext) {
        if !self.arena.stamp(element, frame.timecode) {
            return;
        }
        match self.arena.get_mut(element) {
            Some(Node::Light(light)) => {
                light.update(frame);
            }
            Some(Node::Group(_)) => self.update_group(element, frame),
            Some(Node::Chase(_) | Node::PulseChase(_)) => self.update_chase(element, frame),
            Some(Node::Spawner(_)) => self.reap_spawned(element),
            None => {}
        }
    }

    /// Update children while the container is triggered or still has
    /// anything releasing; returns whether it did
    fn update_children(&mut self, element: ElementHandle, frame: &FrameContext) -> bool {
        let Some(node) = self.arena.get(element) else {
            return false;
        };
        let children = node.children().to_vec();
        let triggered = node.as_triggerable().trigger_state() == TriggerState::Active;
        if !triggered && !self.is_active(element) {
            return false;
        }
        for child in children {
            self.update_node(child, frame);
        }
        true
    }

    fn update_group(&mut self, element: ElementHandle, frame: &FrameContext) {
        if self.update_children(element, frame) {
            self.apply_node_effects(element, frame);
        }
    }

    fn update_chase(&mut self, element: ElementHandle, frame: &FrameContext) {
        let (idle, step) = match self.arena.get_mut(element) {
            Some(Node::Chase(chase)) => (chase.is_idle(), chase.step(frame, None)),
            Some(Node::PulseChase(pulse)) => (pulse.chase().is_idle(), pulse.step(frame)),
            _ => return,
        };
        let children = self
            .arena
            .get(element)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for (index, level) in step.triggers {
            if let Some(child) = children.get(index) {
                self.trigger(*child, level, None);
            }
        }

        self.update_children(element, frame);
        if !idle {
            self.apply_node_effects(element, frame);
        }
        if let Some(fanout) = step.fanout {
            self.dispatch(element, fanout);
        }
    }

    /// Run a container's effects over the lights beneath it
    fn apply_node_effects(&mut self, element: ElementHandle, frame: &FrameContext) {
        let mut effects = match self.arena.get_mut(element) {
            Some(node) => node.take_effects(),
            None => return,
        };
        if effects.is_empty() {
            return;
        }
        let leaves = self.leaves(element);
        for effect in &mut effects {
            effect.advance(frame);
            for (index, leaf) in leaves.iter().enumerate() {
                if let Some(light) = self.light_mut(*leaf) {
                    effect.apply(index, light.attributes_mut());
                }
            }
        }
        if let Some(node) = self.arena.get_mut(element) {
            node.restore_effects(effects);
        }
    }

    /// Destroy spawned copies that have played out
    fn reap_spawned(&mut self, element: ElementHandle) {
        let Some(Node::Spawner(spawner)) = self.arena.get(element) else {
            return;
        };
        let finished: Vec<(u32, ElementHandle)> = spawner
            .spawned()
            .filter(|(_, instance)| !self.is_active(*instance))
            .collect();
        if finished.is_empty() {
            return;
        }

        for (_, instance) in &finished {
            self.destroy(*instance);
        }
        if let Some(Node::Spawner(spawner)) = self.arena.get_mut(element) {
            for (slot, _) in finished {
                spawner.forget(slot);
            }
            debug!("{}: {} spawned copies left", spawner.name(), spawner.spawned_count());
        }
    }
}
