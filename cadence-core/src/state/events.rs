//! Events that trigger mode transitions

use super::machine::Channel;

/// Events that can trigger mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Debounced button press
    KeyPressed,
    /// Menu key received on the console
    Select(Channel),
}

impl Event {
    /// Decode a console key (`'1'`..`'3'`) into a selection
    pub fn from_menu_key(key: u8) -> Option<Self> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.menu_key() == key)
            .map(Event::Select)
    }
}
