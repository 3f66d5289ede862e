//! Event and command calls over a [`Link`]

use cloudlink_hal::{ByteTransport, Clock};
use cloudlink_protocol::commands::{
    announce_payload, EventFormat, CMD_POLL_FOR_COMMAND, CMD_SEND_EVENT,
    CMD_SEND_PRODUCT_ANNOUNCE, PRODUCT_ID_SIZE,
};
use cloudlink_protocol::Buffer;

use crate::link::{Link, LinkError, Request};

/// Application-level access to the coprocessor
pub struct Client<T, C> {
    link: Link<T, C>,
}

impl<T: ByteTransport, C: Clock> Client<T, C> {
    pub fn new(link: Link<T, C>) -> Self {
        Self { link }
    }

    pub fn link(&self) -> &Link<T, C> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut Link<T, C> {
        &mut self.link
    }

    /// Give back the underlying link
    pub fn into_link(self) -> Link<T, C> {
        self.link
    }

    /// Send an event carrying opaque bytes
    pub fn send_event(&mut self, event_code: u8, data: &[u8]) -> Result<(), LinkError> {
        debug!("client: binary event {:#x}, {} bytes", event_code, data.len());
        let request = Request::new(CMD_SEND_EVENT)
            .with_param(EventFormat::Binary.param(event_code))
            .with_payload(data);
        self.link.execute(&request, &mut []).map(|_| ())
    }

    /// Send an event carrying codec-packed values
    ///
    /// The buffer is cleared afterwards whether or not the send succeeded.
    pub fn send_packed_event<const N: usize>(
        &mut self,
        event_code: u8,
        buffer: &mut Buffer<N>,
    ) -> Result<(), LinkError> {
        debug!("client: packed event {:#x}, {} bytes", event_code, buffer.len());
        let request = Request::new(CMD_SEND_EVENT)
            .with_param(EventFormat::Packed.param(event_code))
            .with_payload(buffer.as_slice());
        let result = self.link.execute(&request, &mut []).map(|_| ());
        buffer.clear();
        result
    }

    /// Fetch the next pending command into `buffer`
    ///
    /// Returns the command id carried in the response parameter, or `None`
    /// if the response had no parameter. On error the buffer is left empty.
    pub fn poll_for_command<const N: usize>(
        &mut self,
        buffer: &mut Buffer<N>,
    ) -> Result<Option<u8>, LinkError> {
        let request = Request::new(CMD_POLL_FOR_COMMAND)
            .with_response(u16::try_from(N).unwrap_or(u16::MAX), true);

        let link = &mut self.link;
        let mut param = None;
        buffer.load(|storage| -> Result<usize, LinkError> {
            let response = link.execute(&request, storage)?;
            param = response.param;
            Ok(response.len)
        })?;

        let command = param.map(|p| (p & 0x00FF) as u8);
        if let Some(id) = command {
            debug!("client: command {:#x}, {} bytes", id, buffer.len());
        }
        Ok(command)
    }

    /// Announce the product so the coprocessor can join its network
    ///
    /// Pass [`NULL_PRODUCT_ID`](cloudlink_protocol::commands::NULL_PRODUCT_ID)
    /// when the device has no product id.
    pub fn join_network(
        &mut self,
        product_id: &[u8; PRODUCT_ID_SIZE],
        version: u32,
    ) -> Result<(), LinkError> {
        let payload = announce_payload(product_id, version);
        let request = Request::new(CMD_SEND_PRODUCT_ANNOUNCE).with_payload(&payload);
        self.link.execute(&request, &mut []).map(|_| ())
    }
}
