//! Transaction engine
//!
//! One call to [`Link::execute`] is one command frame out and one response
//! frame back:
//!
//! 1. Handshake if unsynced: clock PAD until the coprocessor answers RESET.
//! 2. Send header, optional parameter and payload. Every echo must be PAD.
//! 3. Clock PAD until the first response byte arrives.
//! 4. Read the response header, parameter and payload, folding the CRC as
//!    bytes arrive. Select is released on the last byte of the frame.
//! 5. Check size, CRC and status.
//!
//! Framing faults drop the link to unsynced so the next call handshakes
//! again. A RESET seen mid-transaction or a non-success status only fails
//! the current call.

use cloudlink_hal::{ByteTransport, Clock};
use cloudlink_protocol::{FrameCrc, Header, HEADER_SIZE, PAD, PARAM_SIZE, RESET, STATUS_SUCCESS};

use super::error::LinkError;
use super::retry::retry_until;
use super::state::{LinkEvent, LinkState};
use crate::config::{ConfigError, LinkConfig};

/// One outbound command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request<'a> {
    /// Command id placed in the header code byte
    pub command: u8,
    /// Payload sent after the parameter
    pub payload: &'a [u8],
    /// Parameter sent ahead of the payload
    pub param: Option<u16>,
    /// Largest response payload accepted, excluding a parameter
    pub in_max_size: u16,
    /// Whether the response leads with a parameter
    pub want_param: bool,
}

impl<'a> Request<'a> {
    /// Command with no payload that expects an empty response
    pub fn new(command: u8) -> Self {
        Self {
            command,
            payload: &[],
            param: None,
            in_max_size: 0,
            want_param: false,
        }
    }

    /// Send `payload` after the parameter
    pub fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = payload;
        self
    }

    /// Send `param` ahead of the payload
    pub fn with_param(mut self, param: u16) -> Self {
        self.param = Some(param);
        self
    }

    /// Accept a response payload of up to `in_max_size` bytes
    pub fn with_response(mut self, in_max_size: u16, want_param: bool) -> Self {
        self.in_max_size = in_max_size;
        self.want_param = want_param;
        self
    }

    fn body_len(&self) -> usize {
        self.param.map_or(0, |_| PARAM_SIZE) + self.payload.len()
    }
}

/// Result of a successful transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Payload bytes stored in the caller's buffer
    pub len: usize,
    /// Payload bytes the coprocessor sent; more than `len` if truncated
    pub received: usize,
    /// Leading parameter, when requested and present
    pub param: Option<u16>,
    /// Status code from the response header
    pub status: u8,
}

impl Response {
    /// True if payload bytes were dropped for lack of room
    pub fn is_truncated(&self) -> bool {
        self.received > self.len
    }
}

/// Host side of the coprocessor link
pub struct Link<T, C> {
    transport: T,
    clock: C,
    config: LinkConfig,
    state: LinkState,
    last_status: u8,
}

impl<T: ByteTransport, C: Clock> Link<T, C> {
    /// Create an unsynced link with the default configuration
    pub fn new(transport: T, clock: C) -> Self {
        Self {
            transport,
            clock,
            config: LinkConfig::default(),
            state: LinkState::Unsynced,
            last_status: STATUS_SUCCESS,
        }
    }

    /// Create an unsynced link, rejecting a configuration outside protocol limits
    pub fn with_config(transport: T, clock: C, config: LinkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(transport, clock)
        })
    }

    /// Active configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Current sync state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// True once a handshake has completed and no framing fault followed
    pub fn is_synced(&self) -> bool {
        self.state.is_synced()
    }

    /// Status code of the last response received
    pub fn last_status(&self) -> u8 {
        self.last_status
    }

    /// Forget sync and status, as after a coprocessor power cycle
    pub fn restart(&mut self) {
        self.state = self.state.transition(LinkEvent::Restart);
        self.last_status = STATUS_SUCCESS;
    }

    /// The owned transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The owned transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport and clock
    pub fn release(self) -> (T, C) {
        (self.transport, self.clock)
    }

    /// Run one transaction
    ///
    /// The response payload, after any parameter, is written to `rx`. Bytes
    /// that do not fit are read and checksummed but dropped.
    pub fn execute(&mut self, request: &Request<'_>, rx: &mut [u8]) -> Result<Response, LinkError> {
        if request.payload.len() > self.config.max_payload as usize {
            warn!(
                "link: payload of {} bytes exceeds {}",
                request.payload.len(),
                self.config.max_payload
            );
            return Err(LinkError::Parameter);
        }
        let header = Header::new(request.command, request.body_len()).map_err(|_| {
            warn!("link: frame for cmd {:#x} too large", request.command);
            LinkError::Parameter
        })?;

        let result = self.transact(request, header, rx);
        if let Err(e) = &result {
            if e.forces_resync() {
                self.state = self.state.transition(LinkEvent::SyncLost);
            }
        }
        result
    }

    fn transact(&mut self, request: &Request<'_>, header: Header, rx: &mut [u8]) -> Result<Response, LinkError> {
        if !self.state.is_synced() {
            self.handshake()?;
        }

        self.send_frame(request, header)?;
        let first = self.await_response()?;
        self.read_response(first, request, rx)
    }

    fn handshake(&mut self) -> Result<(), LinkError> {
        let Self {
            transport,
            clock,
            config,
            ..
        } = self;

        let found = retry_until(&*clock, config.sync_timeout_ms, || {
            let byte = exchange(transport, PAD, true)?;
            Ok((byte == RESET).then_some(()))
        })?;

        if found.is_none() {
            warn!("link: handshake timed out");
            return Err(LinkError::SyncTimeout);
        }

        debug!("link: synced");
        self.state = self.state.transition(LinkEvent::HandshakeComplete);
        Ok(())
    }

    fn send_frame(&mut self, request: &Request<'_>, mut header: Header) -> Result<(), LinkError> {
        let param = request.param.map(u16::to_be_bytes);
        let param: &[u8] = match &param {
            Some(bytes) => bytes,
            None => &[],
        };

        let mut crc = header.crc_start();
        crc.update_slice(param);
        crc.update_slice(request.payload);
        header.crc = crc.value();

        trace!(
            "link: send cmd {:#x} with {} body bytes",
            request.command,
            request.body_len()
        );

        for &byte in header.to_bytes().iter().chain(param).chain(request.payload) {
            self.send_byte(byte)?;
        }
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        match exchange(&mut self.transport, byte, false)? {
            PAD => Ok(()),
            RESET => {
                warn!("link: coprocessor reset during send");
                Err(LinkError::PeerReset)
            }
            other => {
                warn!("link: unexpected echo {:#x} during send", other);
                Err(LinkError::UnexpectedByte(other))
            }
        }
    }

    /// Clock PAD until the first byte of the response header
    fn await_response(&mut self) -> Result<u8, LinkError> {
        let Self {
            transport,
            clock,
            config,
            ..
        } = self;

        let first = retry_until(&*clock, config.poll_timeout_ms, || {
            match exchange(transport, PAD, false)? {
                PAD => Ok(None),
                RESET => {
                    warn!("link: coprocessor reset while polling");
                    Err(LinkError::PeerReset)
                }
                byte => Ok(Some(byte)),
            }
        })?;

        first.ok_or_else(|| {
            warn!("link: response poll timed out");
            LinkError::SyncTimeout
        })
    }

    fn read_response(&mut self, first: u8, request: &Request<'_>, rx: &mut [u8]) -> Result<Response, LinkError> {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = first;
        for i in 1..HEADER_SIZE {
            // Bytes 0 and 1 carry the size, so an empty frame is known
            // before its last header byte is clocked
            let release = i == HEADER_SIZE - 1
                && u16::from_be_bytes([bytes[0], bytes[1]]) as usize <= HEADER_SIZE;
            bytes[i] = exchange(&mut self.transport, PAD, release)?;
        }
        let header = Header::from_bytes(&bytes);

        let param_room = if request.want_param { PARAM_SIZE } else { 0 };
        let body_len = match header.body_len() {
            Ok(len) if len <= request.in_max_size as usize + param_room => len,
            _ => {
                warn!("link: response size {} out of range", header.size);
                return Err(LinkError::Size(header.size));
            }
        };

        let mut crc = header.crc_start();
        let mut remaining = body_len;

        let param = if request.want_param && body_len >= PARAM_SIZE {
            let hi = self.receive(&mut crc, remaining == 1)?;
            remaining -= 1;
            let lo = self.receive(&mut crc, remaining == 1)?;
            remaining -= 1;
            Some(u16::from_be_bytes([hi, lo]))
        } else {
            None
        };

        let received = remaining;
        for i in 0..received {
            let byte = self.receive(&mut crc, i + 1 == received)?;
            if let Some(slot) = rx.get_mut(i) {
                *slot = byte;
            }
        }

        if crc.value() != header.crc {
            warn!(
                "link: response CRC {:#x}, computed {:#x}",
                header.crc,
                crc.value()
            );
            return Err(LinkError::Crc {
                expected: header.crc,
                actual: crc.value(),
            });
        }

        self.last_status = header.code;
        if header.code != STATUS_SUCCESS {
            debug!("link: coprocessor status {:#x}", header.code);
            return Err(LinkError::Status(header.code));
        }

        Ok(Response {
            len: received.min(rx.len()),
            received,
            param,
            status: header.code,
        })
    }

    fn receive(&mut self, crc: &mut FrameCrc, last: bool) -> Result<u8, LinkError> {
        let byte = exchange(&mut self.transport, PAD, last)?;
        crc.update(byte);
        Ok(byte)
    }
}

fn exchange<T: ByteTransport>(transport: &mut T, byte: u8, release_select: bool) -> Result<u8, LinkError> {
    transport.exchange(byte, release_select).map_err(|_| {
        error!("link: transport exchange failed");
        LinkError::Transport
    })
}
