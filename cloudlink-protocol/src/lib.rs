//! Cloudlink Coprocessor Protocol
//!
//! This crate defines the wire format spoken between a host microcontroller
//! and a network coprocessor over SPI: frame layout, CRC, command ids and
//! the compact binary codec used for event and command payloads.
//!
//! # Frame Format
//!
//! Both directions use the same frame:
//! ```text
//! ┌──────────┬──────────┬──────┬──────────┬─────────────┐
//! │ SIZE     │ CRC      │ CODE │ PARAM    │ PAYLOAD     │
//! │ 2B (BE)  │ 2B (BE)  │ 1B   │ 0 or 2B  │ 0–64B       │
//! └──────────┴──────────┴──────┴──────────┴─────────────┘
//! ```
//!
//! SIZE counts PARAM and PAYLOAD. CRC is CRC-16/CCITT-FALSE over the header
//! with its CRC field zeroed, then the body. CODE is a command id from the
//! host and a status from the coprocessor. Idle bytes are [`PAD`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod codec;
pub mod commands;
pub mod crc;
pub mod frame;

pub use buffer::Buffer;
pub use codec::{Pack, PackError, Unpack, UnpackError, Value, ValueKind, MAX_KEY_LEN};
pub use crc::{crc16, crc16_slice, CRC16_SEED};
pub use frame::{
    Frame, FrameCrc, FrameError, FrameParser, Header, HEADER_SIZE, MAX_BODY_SIZE,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, PAD, PARAM_SIZE, RESET, STATUS_SUCCESS,
};
