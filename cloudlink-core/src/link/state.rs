//! Link synchronisation state
//!
//! The link starts unsynced. A handshake that sees the coprocessor's RESET
//! marker syncs it; any framing fault drops it back.

/// Sync state of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Next transaction must handshake first
    #[default]
    Unsynced,
    /// Frames can be exchanged directly
    Synced,
}

/// Events that move the link between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// RESET observed while clocking the handshake
    HandshakeComplete,
    /// Unexpected echo, bad size, bad CRC, timeout or transport failure
    SyncLost,
    /// Engine restarted by the application
    Restart,
}

impl LinkState {
    /// Check if frames can be sent without a handshake
    pub fn is_synced(&self) -> bool {
        matches!(self, LinkState::Synced)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        match event {
            LinkEvent::HandshakeComplete => LinkState::Synced,
            LinkEvent::SyncLost | LinkEvent::Restart => LinkState::Unsynced,
        }
    }
}
