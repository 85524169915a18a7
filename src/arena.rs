//! Element storage
//!
//! The arena is the single owner of every show node. Groups, chases,
//! spawners and networks refer to nodes by [`ElementHandle`]; a handle
//! carries the slot generation so it stops resolving once its node is
//! destroyed, even if the slot is reused.

use alloc::vec::Vec;

use crate::effect::EffectSlot;
use crate::element::{LightElement, Role, Triggerable};
use crate::group::{Chase, Group, PulseChase};
use crate::spawner::Spawner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementHandle {
    index: u32,
    generation: u32,
}

impl ElementHandle {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// Every kind of element a show can hold
#[derive(Debug, Clone)]
pub enum Node {
    Light(LightElement),
    Group(Group),
    Chase(Chase),
    PulseChase(PulseChase),
    Spawner(Spawner),
}

impl Node {
    pub fn as_triggerable(&self) -> &dyn Triggerable {
        match self {
            Node::Light(light) => light,
            Node::Group(group) => group,
            Node::Chase(chase) => chase,
            Node::PulseChase(pulse) => pulse,
            Node::Spawner(spawner) => spawner,
        }
    }

    pub fn as_triggerable_mut(&mut self) -> &mut dyn Triggerable {
        match self {
            Node::Light(light) => light,
            Node::Group(group) => group,
            Node::Chase(chase) => chase,
            Node::PulseChase(pulse) => pulse,
            Node::Spawner(spawner) => spawner,
        }
    }

    pub fn name(&self) -> &str {
        self.as_triggerable().name()
    }

    /// Direct children; empty for lights and spawners
    pub fn children(&self) -> &[ElementHandle] {
        match self {
            Node::Group(group) => group.elements(),
            Node::Chase(chase) => chase.elements(),
            Node::PulseChase(pulse) => pulse.chase().elements(),
            Node::Light(_) | Node::Spawner(_) => &[],
        }
    }

    pub(crate) fn set_children(&mut self, children: Vec<ElementHandle>) {
        match self {
            Node::Group(group) => group.set_elements(children),
            Node::Chase(chase) => chase.group_mut().set_elements(children),
            Node::PulseChase(pulse) => pulse.chase_mut().group_mut().set_elements(children),
            Node::Light(_) | Node::Spawner(_) => {}
        }
    }

    pub fn roles(&self) -> &'static [Role] {
        match self {
            Node::Light(light) => light.roles(),
            Node::Group(group) => group.roles(),
            Node::Chase(chase) => chase.roles(),
            Node::PulseChase(pulse) => pulse.chase().roles(),
            Node::Spawner(_) => &[],
        }
    }

    /// Detach container effects so they can be applied to the leaves
    pub(crate) fn take_effects(&mut self) -> Vec<EffectSlot> {
        match self {
            Node::Group(group) => group.take_effects(),
            Node::Chase(chase) => chase.group_mut().take_effects(),
            Node::PulseChase(pulse) => pulse.chase_mut().group_mut().take_effects(),
            Node::Light(_) | Node::Spawner(_) => Vec::new(),
        }
    }

    pub(crate) fn restore_effects(&mut self, effects: Vec<EffectSlot>) {
        match self {
            Node::Group(group) => group.restore_effects(effects),
            Node::Chase(chase) => chase.group_mut().restore_effects(effects),
            Node::PulseChase(pulse) => pulse.chase_mut().group_mut().restore_effects(effects),
            Node::Light(_) | Node::Spawner(_) => {}
        }
    }
}

impl From<LightElement> for Node {
    fn from(light: LightElement) -> Self {
        Node::Light(light)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<Chase> for Node {
    fn from(chase: Chase) -> Self {
        Node::Chase(chase)
    }
}

impl From<PulseChase> for Node {
    fn from(pulse: PulseChase) -> Self {
        Node::PulseChase(pulse)
    }
}

impl From<Spawner> for Node {
    fn from(spawner: Spawner) -> Self {
        Node::Spawner(spawner)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
    last_update: f64,
}

/// Generational slot storage for show nodes
#[derive(Debug, Clone, Default)]
pub struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Arena {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, node: Node) -> ElementHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            slot.last_update = f64::NEG_INFINITY;
            return ElementHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
            last_update: f64::NEG_INFINITY,
        });
        ElementHandle {
            index,
            generation: 0,
        }
    }

    fn slot(&self, handle: ElementHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.node.is_some())
    }

    fn slot_mut(&mut self, handle: ElementHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.node.is_some())
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&Node> {
        self.slot(handle).and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut Node> {
        self.slot_mut(handle).and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.slot(handle).is_some()
    }

    /// Free the slot; the handle and any copies of it stop resolving
    pub fn remove(&mut self, handle: ElementHandle) -> Option<Node> {
        let slot = self.slot_mut(handle)?;
        let node = slot.node.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        node
    }

    /// Mark the node as updated for `timecode`
    ///
    /// Returns `false` if it was already updated in this frame.
    pub fn stamp(&mut self, handle: ElementHandle, timecode: f64) -> bool {
        match self.slot_mut(handle) {
            Some(slot) if slot.last_update != timecode => {
                slot.last_update = timecode;
                true
            }
            _ => false,
        }
    }

    /// Live nodes in slot order
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (ElementHandle, &Node)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|node| {
                (
                    ElementHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    node,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
