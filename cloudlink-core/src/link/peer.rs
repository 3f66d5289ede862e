//! In-memory coprocessor for tests

use core::cell::Cell;
use core::convert::Infallible;
use std::collections::VecDeque;

use cloudlink_hal::{ByteTransport, Clock};
use cloudlink_protocol::{Frame, FrameParser, PAD, RESET};

/// Coprocessor that decodes host frames and answers from a script
///
/// Every exchange clocks out the next scripted byte, or PAD when the script
/// is empty. Each complete host frame appends the next queued reply to the
/// script. Releasing select or clocking out RESET restarts frame decoding.
#[derive(Debug, Default)]
pub struct Peer {
    outgoing: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    parser: FrameParser,
    /// Frames decoded from the host
    pub received: Vec<Frame>,
    /// Every exchange as (byte sent by host, select released)
    pub log: Vec<(u8, bool)>,
}

impl Peer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peer that will answer the next handshake
    pub fn after_reset() -> Self {
        let mut peer = Self::new();
        peer.script(&[RESET]);
        peer
    }

    /// Append raw bytes to clock out
    pub fn script(&mut self, bytes: &[u8]) {
        self.outgoing.extend(bytes.iter().copied());
    }

    /// Queue raw reply bytes for the next host frame
    pub fn reply_raw(&mut self, bytes: Vec<u8>) {
        self.replies.push_back(bytes);
    }

    /// Queue a well-formed reply for the next host frame
    pub fn reply(&mut self, status: u8, param: Option<u16>, payload: &[u8]) {
        self.reply_raw(encode(status, param, payload));
    }

    pub fn exchanges(&self) -> usize {
        self.log.len()
    }

    /// Log entries from exchange `start` onwards
    pub fn since(&self, start: usize) -> &[(u8, bool)] {
        &self.log[start..]
    }
}

impl ByteTransport for Peer {
    type Error = Infallible;

    fn exchange(&mut self, byte: u8, release_select: bool) -> Result<u8, Infallible> {
        self.log.push((byte, release_select));
        let out = self.outgoing.pop_front().unwrap_or(PAD);

        if let Ok(Some(frame)) = self.parser.feed(byte) {
            self.received.push(frame);
            if let Some(reply) = self.replies.pop_front() {
                self.outgoing.extend(reply);
            }
        }
        if release_select || out == RESET {
            self.parser.reset();
        }
        Ok(out)
    }
}

/// Encode a complete frame
pub fn encode(code: u8, param: Option<u16>, payload: &[u8]) -> Vec<u8> {
    match Frame::new(code, param, payload).and_then(|f| f.encode_to_vec()) {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => panic!("test frame does not encode: {:?}", e),
    }
}

/// Clock that advances one millisecond per reading
#[derive(Debug, Default)]
pub struct StepClock {
    now: Cell<u32>,
}

impl Clock for StepClock {
    fn now_millis(&self) -> u32 {
        let t = self.now.get();
        self.now.set(t.wrapping_add(1));
        t
    }
}
