//! Intent processing module
//!
//! Input adapters never touch show state directly. They submit intents to
//! a bounded queue, and the frame loop applies them all at the start of the
//! next frame, so a trigger takes effect with at most one frame of latency.

use alloc::string::String;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use log::warn;

use crate::arena::ElementHandle;
use crate::element::{Key, Role};
use crate::show::Show;

/// Element an intent is addressed to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Handle(ElementHandle),
    /// Resolved through [`Show::get_named_element`]
    Named(String),
}

impl From<ElementHandle> for Target {
    fn from(handle: ElementHandle) -> Self {
        Target::Handle(handle)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Named(String::from(name))
    }
}

/// A change requested by an input adapter
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Trigger an element; zero intensity is an off-trigger
    Trigger {
        target: Target,
        intensity: f64,
        key: Option<Key>,
    },
    /// Write a value already scaled into the role's range
    SetAttribute {
        target: Target,
        role: Role,
        value: f64,
    },
    /// Force everything to zero
    Blackout,
}

impl Intent {
    pub fn trigger(target: impl Into<Target>, intensity: f64) -> Self {
        Intent::Trigger {
            target: target.into(),
            intensity,
            key: None,
        }
    }

    pub fn keyed_trigger(target: impl Into<Target>, intensity: f64, key: Key) -> Self {
        Intent::Trigger {
            target: target.into(),
            intensity,
            key: Some(key),
        }
    }

    pub fn set_attribute(target: impl Into<Target>, role: Role, value: f64) -> Self {
        Intent::SetAttribute {
            target: target.into(),
            role,
            value,
        }
    }
}

/// Type alias for intent sender
pub type IntentSender<'a, const SIZE: usize> =
    Sender<'a, CriticalSectionRawMutex, Intent, SIZE>;

/// Type alias for intent receiver
pub type IntentReceiver<'a, const SIZE: usize> =
    Receiver<'a, CriticalSectionRawMutex, Intent, SIZE>;

/// Type alias for the intent channel
///
/// Place it in a `static` (or anywhere that outlives both sides) so input
/// adapters on other tasks or interrupts can hold a sender.
pub type IntentChannel<const SIZE: usize> = Channel<CriticalSectionRawMutex, Intent, SIZE>;

/// Queue an intent, logging instead of failing when the queue is full
///
/// Returns whether the intent was queued.
pub fn submit<const SIZE: usize>(sender: &IntentSender<'_, SIZE>, intent: Intent) -> bool {
    match sender.try_send(intent) {
        Ok(()) => true,
        Err(TrySendError::Full(rejected)) => {
            warn!("intent queue full, dropping {:?}", rejected);
            false
        }
    }
}

/// Applies queued intents to a show
pub struct IntentProcessor<'a, const SIZE: usize> {
    intents: IntentReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> IntentProcessor<'a, SIZE> {
    pub const fn new(intents: IntentReceiver<'a, SIZE>) -> Self {
        Self { intents }
    }

    /// Drain and apply every pending intent (non-blocking)
    ///
    /// Intents for unknown elements and rejected attribute writes are
    /// logged and dropped. Returns the number of intents taken from the
    /// queue.
    pub fn process_pending(&mut self, show: &mut Show) -> usize {
        let mut processed = 0;
        while let Ok(intent) = self.intents.try_receive() {
            processed += 1;
            Self::apply(show, intent);
        }
        processed
    }

    fn apply(show: &mut Show, intent: Intent) {
        match intent {
            Intent::Trigger {
                target,
                intensity,
                key,
            } => {
                let Some(element) = Self::resolve(show, &target) else {
                    warn!("trigger for unknown element {:?}", target);
                    return;
                };
                if !show.trigger(element, intensity, key) {
                    warn!("trigger for removed element {:?}", target);
                }
            }
            Intent::SetAttribute {
                target,
                role,
                value,
            } => {
                let Some(element) = Self::resolve(show, &target) else {
                    warn!("{} for unknown element {:?}", role.as_str(), target);
                    return;
                };
                if let Err(err) = show.set_attribute(element, role, value) {
                    warn!("{:?}: {}", target, err);
                }
            }
            Intent::Blackout => show.blackout(),
        }
    }

    fn resolve(show: &mut Show, target: &Target) -> Option<ElementHandle> {
        match target {
            Target::Handle(handle) => Some(*handle),
            Target::Named(name) => show.get_named_element(name),
        }
    }
}
