//! Show - the element owner and per-frame orchestrator
//!
//! The show owns every element through its [`Arena`], keeps the ordered
//! list of registered top-level elements, and fans triggers out to
//! children and spawners. Frame pacing lives in
//! [`FrameScheduler`](crate::FrameScheduler); the show only knows how to
//! advance one frame and how to flush its networks.

mod update;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use embassy_time::Duration;
use log::{debug, warn};

use crate::arena::{Arena, ElementHandle, Node};
use crate::effect::EffectSlot;
use crate::element::{Fanout, Key, LightElement, Role, Triggerable};
use crate::error::AttributeError;
use crate::group::{Chase, Continuation, Group, PulseChase};
use crate::network::{Network, NetworkId};
use crate::spawner::Spawner;

/// Timing shared by every element for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Seconds since the show started
    pub timecode: f64,
    /// Seconds since the previous frame
    pub time_delta: f64,
}

impl FrameContext {
    pub const fn new(timecode: f64, time_delta: f64) -> Self {
        Self {
            timecode,
            time_delta,
        }
    }
}

/// Frame pacing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowConfig {
    /// Target frames per second; the frame delay never drops below its
    /// reciprocal
    pub frame_rate: f64,
    /// Amount the frame delay moves by per adjustment
    pub delay_step: Duration,
    /// Allowed difference between frame cost and frame delay before the
    /// delay is adjusted
    pub overrun_tolerance: Duration,
    /// Overrun past which a slow refresh is reported
    pub slow_refresh: Duration,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            frame_rate: 40.0,
            delay_step: Duration::from_millis(10),
            overrun_tolerance: Duration::from_millis(10),
            slow_refresh: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone)]
struct ShowEffect {
    effect: EffectSlot,
    targets: Vec<ElementHandle>,
}

/// Owner of all elements, networks and show-level effects
pub struct Show {
    arena: Arena,
    elements: Vec<ElementHandle>,
    networks: Vec<Network>,
    effects: Vec<ShowEffect>,
    named: BTreeMap<String, ElementHandle>,
    timecode: f64,
}

impl Show {
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            elements: Vec::new(),
            networks: Vec::new(),
            effects: Vec::new(),
            named: BTreeMap::new(),
            timecode: 0.0,
        }
    }

    /// Store an element without scheduling it
    ///
    /// Use this for children of groups and for spawner templates.
    pub fn insert(&mut self, node: impl Into<Node>) -> ElementHandle {
        self.arena.insert(node.into())
    }

    /// Store an element and schedule it
    pub fn add(&mut self, node: impl Into<Node>, network: Option<NetworkId>) -> ElementHandle {
        let handle = self.insert(node);
        self.add_element(handle, network);
        handle
    }

    /// Schedule a stored element for per-frame updates
    ///
    /// With a network, every light in the element's subtree is added to
    /// it. Registering twice is a no-op. Returns `false` for a stale
    /// handle.
    pub fn add_element(&mut self, element: ElementHandle, network: Option<NetworkId>) -> bool {
        if !self.arena.contains(element) {
            return false;
        }
        if let Some(network) = network {
            let leaves = self.leaves(element);
            if let Some(network) = self.networks.get_mut(network.0) {
                for leaf in leaves {
                    network.add_element(leaf);
                }
            }
        }
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
        true
    }

    /// Unschedule an element and its whole subtree
    ///
    /// The elements are also dropped from every network and from the name
    /// cache but stay in storage. Returns whether `element` itself was
    /// scheduled.
    pub fn remove_element(&mut self, element: ElementHandle) -> bool {
        let children = self
            .arena
            .get(element)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for child in children {
            self.remove_element(child);
        }
        for network in &mut self.networks {
            network.remove_element(element);
        }
        self.named.retain(|_, handle| *handle != element);
        let before = self.elements.len();
        self.elements.retain(|handle| *handle != element);
        before != self.elements.len()
    }

    /// Unschedule an element and free its subtree from storage
    ///
    /// Spawned copies owned by spawners in the subtree are destroyed too.
    pub fn destroy(&mut self, element: ElementHandle) {
        self.remove_element(element);
        let Some(mut node) = self.arena.remove(element) else {
            return;
        };
        if let Node::Spawner(spawner) = &mut node {
            for spawned in spawner.drain_handles() {
                self.destroy(spawned);
            }
        }
        for child in node.children() {
            self.destroy(*child);
        }
    }

    pub fn get(&self, element: ElementHandle) -> Option<&Node> {
        self.arena.get(element)
    }

    pub fn get_mut(&mut self, element: ElementHandle) -> Option<&mut Node> {
        self.arena.get_mut(element)
    }

    pub fn light(&self, element: ElementHandle) -> Option<&LightElement> {
        match self.arena.get(element) {
            Some(Node::Light(light)) => Some(light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self, element: ElementHandle) -> Option<&mut LightElement> {
        match self.arena.get_mut(element) {
            Some(Node::Light(light)) => Some(light),
            _ => None,
        }
    }

    pub fn group(&self, element: ElementHandle) -> Option<&Group> {
        match self.arena.get(element) {
            Some(Node::Group(group)) => Some(group),
            _ => None,
        }
    }

    pub fn chase(&self, element: ElementHandle) -> Option<&Chase> {
        match self.arena.get(element) {
            Some(Node::Chase(chase)) => Some(chase),
            Some(Node::PulseChase(pulse)) => Some(pulse.chase()),
            _ => None,
        }
    }

    pub fn chase_mut(&mut self, element: ElementHandle) -> Option<&mut Chase> {
        match self.arena.get_mut(element) {
            Some(Node::Chase(chase)) => Some(chase),
            Some(Node::PulseChase(pulse)) => Some(pulse.chase_mut()),
            _ => None,
        }
    }

    pub fn pulse_chase(&self, element: ElementHandle) -> Option<&PulseChase> {
        match self.arena.get(element) {
            Some(Node::PulseChase(pulse)) => Some(pulse),
            _ => None,
        }
    }

    pub fn spawner(&self, element: ElementHandle) -> Option<&Spawner> {
        match self.arena.get(element) {
            Some(Node::Spawner(spawner)) => Some(spawner),
            _ => None,
        }
    }

    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Scheduled top-level elements in registration order
    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    pub fn is_registered(&self, element: ElementHandle) -> bool {
        self.elements.contains(&element)
    }

    /// Timecode of the last frame
    pub const fn timecode(&self) -> f64 {
        self.timecode
    }

    pub fn add_network(&mut self, network: Network) -> NetworkId {
        self.networks.push(network);
        NetworkId(self.networks.len() - 1)
    }

    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.networks.get(id.0)
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    /// Apply `effect` to `targets` every frame after all elements updated
    ///
    /// Groups in `targets` resolve to their lights.
    pub fn add_effect(
        &mut self,
        effect: impl Into<EffectSlot>,
        targets: impl IntoIterator<Item = ElementHandle>,
    ) {
        self.effects.push(ShowEffect {
            effect: effect.into(),
            targets: targets.into_iter().collect(),
        });
    }

    /// Look an element up by exact name
    ///
    /// Scheduled subtrees are searched in registration order, then the
    /// network lights. Hits are cached until the element is removed.
    pub fn get_named_element(&mut self, name: &str) -> Option<ElementHandle> {
        if let Some(handle) = self.named.get(name).copied() {
            if self.arena.get(handle).is_some_and(|node| node.name() == name) {
                return Some(handle);
            }
            self.named.remove(name);
        }

        let mut candidates = Vec::new();
        for element in &self.elements {
            self.collect_subtree(*element, &mut candidates);
        }
        candidates.extend(self.networks.iter().flat_map(|network| network.elements().iter().copied()));

        let found = candidates
            .into_iter()
            .find(|handle| self.arena.get(*handle).is_some_and(|node| node.name() == name))?;
        self.named.insert(String::from(name), found);
        Some(found)
    }

    /// Force every scheduled element and network light to zero
    ///
    /// Bell-mode lights ignore the off-trigger and finish their release
    /// from zero.
    pub fn blackout(&mut self) {
        let mut handles = Vec::new();
        for element in &self.elements {
            self.collect_subtree(*element, &mut handles);
        }
        handles.extend(self.networks.iter().flat_map(|network| network.elements().iter().copied()));

        debug!("blackout of {} elements", handles.len());
        for handle in handles {
            let Some(node) = self.arena.get_mut(handle) else {
                continue;
            };
            node.as_triggerable_mut().off();
            if let Node::Light(light) = node {
                light.set_intensity(0.0);
            }
        }
    }

    /// Write an attribute on an element
    ///
    /// Intensity on a container scales every light beneath it. `Speed`
    /// and `MoveTo` retarget a chase.
    pub fn set_attribute(
        &mut self,
        element: ElementHandle,
        role: Role,
        value: f64,
    ) -> Result<(), AttributeError> {
        let node = self
            .arena
            .get(element)
            .ok_or(AttributeError::UnknownElement(element))?;
        if !node.roles().contains(&role) {
            return Err(AttributeError::Unsupported { element, role });
        }
        if role == Role::Intensity && !matches!(node, Node::Light(_)) {
            for leaf in self.leaves(element) {
                if let Some(Node::Light(light)) = self.arena.get_mut(leaf) {
                    light.set_intensity(light.intensity() * value);
                }
            }
            return Ok(());
        }

        let chase = match self.arena.get_mut(element) {
            Some(Node::Light(light)) => {
                light.set_attribute(role, value);
                return Ok(());
            }
            Some(Node::Chase(chase)) => chase,
            Some(Node::PulseChase(pulse)) => pulse.chase_mut(),
            _ => return Err(AttributeError::Unsupported { element, role }),
        };
        match role {
            Role::Speed => chase.set_speed(value)?,
            Role::MoveTo => chase.setup_move(Some(value)),
            _ => return Err(AttributeError::Unsupported { element, role }),
        }
        Ok(())
    }

    /// Trigger an element and carry out whatever it fans out to
    ///
    /// Returns `false` for a stale handle.
    pub fn trigger(&mut self, element: ElementHandle, intensity: f64, key: Option<Key>) -> bool {
        let Some(node) = self.arena.get_mut(element) else {
            return false;
        };
        let fanout = node.as_triggerable_mut().trigger(intensity, key);
        self.dispatch(element, fanout);
        true
    }

    fn dispatch(&mut self, source: ElementHandle, fanout: Fanout) {
        match fanout {
            Fanout::None => {}
            Fanout::Children(level) => {
                let children = self
                    .arena
                    .get(source)
                    .map(|node| node.children().to_vec())
                    .unwrap_or_default();
                for child in children {
                    self.trigger(child, level, None);
                }
            }
            Fanout::Spawn { key, intensity } => self.spawn(source, key, intensity),
            Fanout::Forward { target, intensity } => {
                self.trigger(target, intensity, None);
            }
        }
    }

    fn spawn(&mut self, spawner: ElementHandle, key: Option<Key>, intensity: f64) {
        let Some(Node::Spawner(source)) = self.arena.get(spawner) else {
            return;
        };
        let template = source.template();
        let network = source.network();
        let existing = source
            .existing(key)
            .filter(|instance| self.arena.contains(*instance));

        let instance = match existing {
            Some(instance) => instance,
            None => {
                let Some(instance) = self.clone_subtree(template) else {
                    warn!("spawn template {:?} is gone", template);
                    return;
                };
                self.add_element(instance, network);
                if let Some(Node::Spawner(source)) = self.arena.get_mut(spawner) {
                    source.record(key, instance);
                    debug!("{}: spawned {} copies", source.name(), source.spawned_count());
                }
                instance
            }
        };

        self.set_bell_mode(instance, true);
        match self.arena.get_mut(instance) {
            Some(Node::Chase(chase)) => chase.set_continuation(Continuation::None),
            Some(Node::PulseChase(pulse)) => pulse.chase_mut().set_continuation(Continuation::None),
            _ => {}
        }
        self.trigger(instance, intensity, key);
    }

    /// Deep copy of a subtree; children are copied, never shared
    fn clone_subtree(&mut self, element: ElementHandle) -> Option<ElementHandle> {
        let mut node = self.arena.get(element)?.clone();
        let children = node.children().to_vec();
        if !children.is_empty() {
            let copies = children
                .into_iter()
                .filter_map(|child| self.clone_subtree(child))
                .collect();
            node.set_children(copies);
        }
        if let Node::Spawner(spawner) = &mut node {
            spawner.drain_handles();
        }
        Some(self.arena.insert(node))
    }

    /// Set bell mode on an element and everything beneath it
    pub fn set_bell_mode(&mut self, element: ElementHandle, bell_mode: bool) {
        let Some(node) = self.arena.get_mut(element) else {
            return;
        };
        node.as_triggerable_mut().set_bell_mode(bell_mode);
        let children = node.children().to_vec();
        for child in children {
            self.set_bell_mode(child, bell_mode);
        }
    }

    /// Whether the element still needs updates
    ///
    /// Lights are active until their release ends; containers while any
    /// child is active, and chases also while moving.
    pub fn is_active(&self, element: ElementHandle) -> bool {
        match self.arena.get(element) {
            Some(Node::Light(light)) => light.is_active(),
            Some(Node::Group(group)) => self.any_child_active(group.elements()),
            Some(Node::Chase(chase)) => chase.is_moving() || self.any_child_active(chase.elements()),
            Some(Node::PulseChase(pulse)) => {
                pulse.chase().is_moving() || self.any_child_active(pulse.chase().elements())
            }
            Some(Node::Spawner(spawner)) => spawner.spawned_count() > 0,
            None => false,
        }
    }

    fn any_child_active(&self, children: &[ElementHandle]) -> bool {
        children.iter().any(|child| self.is_active(*child))
    }

    /// Lights beneath `element`, depth first; a light is its own leaf
    pub fn leaves(&self, element: ElementHandle) -> Vec<ElementHandle> {
        let mut subtree = Vec::new();
        self.collect_subtree(element, &mut subtree);
        subtree.retain(|handle| matches!(self.arena.get(*handle), Some(Node::Light(_))));
        subtree
    }

    fn collect_subtree(&self, element: ElementHandle, out: &mut Vec<ElementHandle>) {
        let Some(node) = self.arena.get(element) else {
            return;
        };
        out.push(element);
        for child in node.children() {
            self.collect_subtree(*child, out);
        }
    }

    /// Rebuild every network buffer and hand it to its driver
    ///
    /// Transport failures are logged and do not stop the other networks.
    pub fn flush(&mut self) {
        for network in &mut self.networks {
            network.update_data(&self.arena);
            if let Err(err) = network.send_data() {
                warn!("{}: send failed: {}", network.name(), err);
            }
        }
    }
}

impl Default for Show {
    fn default() -> Self {
        Self::new()
    }
}
