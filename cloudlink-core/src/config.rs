//! Link configuration
//!
//! Timeouts and size limits for the transaction engine. The defaults match
//! the coprocessor firmware.

use cloudlink_protocol::MAX_PAYLOAD_SIZE;

/// Default handshake timeout
pub const SYNC_TIMEOUT_MS: u32 = 1000;

/// Default response poll timeout
pub const POLL_TIMEOUT_MS: u32 = 1000;

/// Transaction engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// How long to clock PAD waiting for the coprocessor's RESET
    pub sync_timeout_ms: u32,
    /// How long to clock PAD waiting for a response header
    pub poll_timeout_ms: u32,
    /// Largest outbound payload accepted by `execute`
    pub max_payload: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            sync_timeout_ms: SYNC_TIMEOUT_MS,
            poll_timeout_ms: POLL_TIMEOUT_MS,
            max_payload: MAX_PAYLOAD_SIZE as u16,
        }
    }
}

/// Invalid configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `max_payload` is above the protocol limit
    PayloadTooLarge,
    /// A timeout of zero would fail every transaction
    ZeroTimeout,
}

impl LinkConfig {
    /// Check the values against protocol limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload as usize > MAX_PAYLOAD_SIZE {
            return Err(ConfigError::PayloadTooLarge);
        }
        if self.sync_timeout_ms == 0 || self.poll_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
