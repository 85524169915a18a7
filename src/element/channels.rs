use alloc::vec::Vec;

use crate::element::Role;

/// Output channels occupied by a light
///
/// Channel numbers are 1-based, matching DMX addressing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelMap {
    channels: Vec<(u16, Role)>,
}

impl ChannelMap {
    pub const fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Single dimmer channel
    pub fn intensity(start: u16) -> Self {
        Self::new().with(start, Role::Intensity)
    }

    /// Three consecutive red, green and blue channels
    pub fn rgb(start: u16) -> Self {
        Self::new()
            .with(start, Role::Red)
            .with(start + 1, Role::Green)
            .with(start + 2, Role::Blue)
    }

    #[must_use]
    pub fn with(mut self, channel: u16, role: Role) -> Self {
        self.insert(channel, role);
        self
    }

    /// Map `channel` to `role`, replacing an earlier mapping of that channel
    pub fn insert(&mut self, channel: u16, role: Role) {
        debug_assert!(channel > 0, "channels are 1-based");
        match self.channels.iter_mut().find(|(ch, _)| *ch == channel) {
            Some(entry) => entry.1 = role,
            None => self.channels.push((channel, role)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, Role)> + '_ {
        self.channels.iter().copied()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.channels.iter().any(|(_, r)| *r == role)
    }

    pub fn has_color(&self) -> bool {
        self.channels
            .iter()
            .any(|(_, r)| matches!(r, Role::Red | Role::Green | Role::Blue))
    }

    /// Highest channel number in use, zero when empty
    pub fn max_channel(&self) -> u16 {
        self.channels.iter().map(|(ch, _)| *ch).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Merge a byte into a frame buffer; the brightest writer wins
pub fn write_highest(data: &mut [u8], channel: u16, value: u8) {
    let Some(index) = usize::from(channel).checked_sub(1) else {
        return;
    };
    if let Some(slot) = data.get_mut(index) {
        *slot = (*slot).max(value);
    }
}
