//! Host-side core for the cloudlink coprocessor link
//!
//! This crate contains everything above the byte transport:
//!
//! - Link configuration
//! - Transaction engine with handshake and resynchronisation
//! - Event and command calls built on the engine
//!
//! Platforms supply a [`ByteTransport`](cloudlink_hal::ByteTransport) and a
//! [`Clock`](cloudlink_hal::Clock); payloads are built and read with
//! [`cloudlink_protocol::Buffer`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod client;
pub mod config;
pub mod link;

pub use client::Client;
pub use config::{ConfigError, LinkConfig};
pub use link::{Link, LinkError, LinkState, Request, Response};
