//! Ephemeral copies of a template element
//!
//! Each on-trigger creates (or, per key, reuses) a copy of the template
//! subtree, registers it with the show in bell mode, and lets it play out.
//! Copies that are no longer active are destroyed on the spawner's update.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::arena::ElementHandle;
use crate::element::{Fanout, Key, TriggerState, Triggerable};
use crate::network::NetworkId;

#[derive(Debug, Clone)]
pub struct Spawner {
    name: String,
    template: ElementHandle,
    network: Option<NetworkId>,
    spawned: BTreeMap<u32, ElementHandle>,
    unique_per_key: bool,
    counter: u32,
}

impl Spawner {
    /// `template` must be in the show's arena but need not be registered
    pub fn new(name: impl Into<String>, template: ElementHandle) -> Self {
        Self {
            name: name.into(),
            template,
            network: None,
            spawned: BTreeMap::new(),
            unique_per_key: true,
            counter: 0,
        }
    }

    /// Network the copies' lights are added to
    #[must_use]
    pub fn with_network(mut self, network: NetworkId) -> Self {
        self.network = Some(network);
        self
    }

    /// When false, every trigger creates a fresh copy
    #[must_use]
    pub fn with_unique_per_key(mut self, unique_per_key: bool) -> Self {
        self.unique_per_key = unique_per_key;
        self
    }

    pub const fn template(&self) -> ElementHandle {
        self.template
    }

    pub const fn network(&self) -> Option<NetworkId> {
        self.network
    }

    pub const fn unique_per_key(&self) -> bool {
        self.unique_per_key
    }

    /// Live copies keyed by key code or spawn number
    pub fn spawned(&self) -> impl Iterator<Item = (u32, ElementHandle)> + '_ {
        self.spawned.iter().map(|(slot, handle)| (*slot, *handle))
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }

    pub(crate) fn existing(&self, key: Option<Key>) -> Option<ElementHandle> {
        if !self.unique_per_key {
            return None;
        }
        key.and_then(|key| self.spawned.get(&u32::from(key.code)).copied())
    }

    pub(crate) fn record(&mut self, key: Option<Key>, handle: ElementHandle) {
        let slot = match key {
            Some(key) if self.unique_per_key => u32::from(key.code),
            _ => {
                // spawn numbers live above the key-code range
                let slot = u32::from(u16::MAX) + 1 + self.counter;
                self.counter = self.counter.wrapping_add(1);
                slot
            }
        };
        self.spawned.insert(slot, handle);
    }

    pub(crate) fn forget(&mut self, slot: u32) {
        self.spawned.remove(&slot);
    }

    pub(crate) fn drain_handles(&mut self) -> Vec<ElementHandle> {
        let handles = self.spawned.values().copied().collect();
        self.spawned.clear();
        handles
    }
}

impl Triggerable for Spawner {
    fn name(&self) -> &str {
        &self.name
    }

    fn trigger(&mut self, intensity: f64, key: Option<Key>) -> Fanout {
        if intensity > 0.0 {
            return Fanout::Spawn { key, intensity };
        }
        match key.and_then(|key| self.spawned.get(&u32::from(key.code))) {
            Some(target) => Fanout::Forward {
                target: *target,
                intensity: 0.0,
            },
            None => Fanout::None,
        }
    }

    fn trigger_state(&self) -> TriggerState {
        TriggerState::Idle
    }

    fn set_bell_mode(&mut self, _bell_mode: bool) {}
}
