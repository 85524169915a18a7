//! Channel buffers and their transports
//!
//! A network owns one flat byte buffer (DMX-style, channel 1 at index 0)
//! and the handles of the lights that write into it.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::OutputDriver;
use crate::arena::{Arena, ElementHandle, Node};
use crate::error::OutputError;

/// Index of a network within its show
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkId(pub(crate) usize);

impl NetworkId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Driver that accepts and discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDriver;

impl OutputDriver for NullDriver {
    fn write(&mut self, _data: &[u8]) -> Result<(), OutputError> {
        Ok(())
    }
}

pub struct Network {
    name: String,
    data: Vec<u8>,
    elements: Vec<ElementHandle>,
    driver: Box<dyn OutputDriver>,
}

impl Network {
    pub fn new(name: impl Into<String>, driver: impl OutputDriver + 'static) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
            elements: Vec::new(),
            driver: Box::new(driver),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lights writing into this network, in registration order
    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    /// Add a light; adding it twice is a no-op
    pub fn add_element(&mut self, element: ElementHandle) {
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
    }

    pub fn remove_element(&mut self, element: ElementHandle) {
        self.elements.retain(|handle| *handle != element);
    }

    /// Rebuild the buffer from the current light attributes
    ///
    /// Every light writes its channel bytes; where two lights share a
    /// channel the higher byte wins. Handles that no longer resolve are
    /// skipped.
    pub fn update_data(&mut self, arena: &Arena) {
        let lights = self.elements.iter().filter_map(|handle| match arena.get(*handle) {
            Some(Node::Light(light)) => Some(light),
            _ => None,
        });
        let size = lights
            .clone()
            .map(|light| usize::from(light.channels().max_channel()))
            .max()
            .unwrap_or(0);

        self.data.clear();
        self.data.resize(size, 0);
        for light in lights {
            light.write_channels(&mut self.data);
        }
    }

    /// Hand the current buffer to the driver
    pub fn send_data(&mut self) -> Result<(), OutputError> {
        self.driver.write(&self.data)
    }

    /// Last buffer built by [`Network::update_data`]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
