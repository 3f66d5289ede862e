//! Command ids and parameter layouts for the coprocessor link
//!
//! Commands are sent host → coprocessor in the header code byte. The
//! coprocessor answers with a status in the same position.

// Command ids: Host → Coprocessor
pub const CMD_POLL_FOR_COMMAND: u8 = 0x10;
pub const CMD_SEND_EVENT: u8 = 0x11;
pub const CMD_SEND_PRODUCT_ANNOUNCE: u8 = 0x12;

/// Event parameter flag: payload is opaque bytes
pub const EVENT_FORMAT_BINARY: u16 = 0x0100;
/// Event parameter flag: payload is codec-packed values
pub const EVENT_FORMAT_PACKED: u16 = 0x0200;

/// Product identifier length in bytes
pub const PRODUCT_ID_SIZE: usize = 16;

/// Product id for devices that announce without one
pub const NULL_PRODUCT_ID: [u8; PRODUCT_ID_SIZE] = [0; PRODUCT_ID_SIZE];

/// Product announce payload: product id then big-endian version
pub const ANNOUNCE_SIZE: usize = PRODUCT_ID_SIZE + 4;

/// Payload format of an outgoing event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventFormat {
    /// Raw application bytes
    Binary,
    /// Values written with the codec
    Packed,
}

impl EventFormat {
    /// Parameter word announcing an event of this format
    pub fn param(self, event_code: u8) -> u16 {
        let flag = match self {
            EventFormat::Binary => EVENT_FORMAT_BINARY,
            EventFormat::Packed => EVENT_FORMAT_PACKED,
        };
        flag | event_code as u16
    }

    /// Split an event parameter word into format and event code
    pub fn from_param(param: u16) -> Option<(Self, u8)> {
        let code = (param & 0x00FF) as u8;
        match param & 0xFF00 {
            EVENT_FORMAT_BINARY => Some((EventFormat::Binary, code)),
            EVENT_FORMAT_PACKED => Some((EventFormat::Packed, code)),
            _ => None,
        }
    }
}

/// Build the product announce payload
pub fn announce_payload(product_id: &[u8; PRODUCT_ID_SIZE], version: u32) -> [u8; ANNOUNCE_SIZE] {
    let mut payload = [0u8; ANNOUNCE_SIZE];
    payload[..PRODUCT_ID_SIZE].copy_from_slice(product_id);
    payload[PRODUCT_ID_SIZE..].copy_from_slice(&version.to_be_bytes());
    payload
}
