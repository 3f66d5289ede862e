//! Framed transactions with the coprocessor
//!
//! [`Link`] owns the byte transport and clock and runs one command/response
//! exchange per call, keeping track of whether the two ends are in sync.

pub mod engine;
pub mod error;
pub mod retry;
pub mod state;

#[cfg(test)]
pub(crate) mod peer;

pub use engine::{Link, Request, Response};
pub use error::LinkError;
pub use state::{LinkEvent, LinkState};
