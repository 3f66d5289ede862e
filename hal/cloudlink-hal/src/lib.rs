//! cloudlink Hardware Abstraction Layer
//!
//! This crate defines the two capabilities the link engine needs from the
//! platform: a full-duplex byte transport with a select line, and a
//! monotonic millisecond clock. Chip-specific code provides them, either by
//! implementing the traits directly or through the adapters here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (events, commands, codec)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cloudlink-core (transaction engine)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cloudlink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │ embassy-time  │
//! │  SPI + CS pin │       │    Instant    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::ByteTransport`] - One byte out, one byte in, select line control
//! - [`clock::Clock`] - Monotonic milliseconds for timeouts

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
#[cfg(feature = "embassy-time")]
pub use clock::EmbassyClock;
pub use transport::{ByteTransport, SpiTransport, SpiTransportError};
