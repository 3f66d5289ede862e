//! Frame encoding and decoding for the coprocessor link.
//!
//! Frame format:
//! - SIZE (2 bytes, big-endian): header + parameter + payload byte count
//! - CRC (2 bytes, big-endian): CRC16 of the whole frame with this field zeroed
//! - CODE (1 byte): command id (host → coprocessor) or status (coprocessor → host)
//! - PARAM (0 or 2 bytes, big-endian): optional parameter, agreed per command
//! - PAYLOAD (0-64 bytes)
//!
//! Between frames both ends clock [`PAD`] bytes. [`RESET`] is sent by the
//! coprocessor after it restarts.

use heapless::Vec;

use crate::crc::{crc16, CRC16_SEED};

/// Header size in bytes: size, CRC and command/status
pub const HEADER_SIZE: usize = 5;

/// Size of the optional parameter carried ahead of the payload
pub const PARAM_SIZE: usize = 2;

/// Filler byte clocked while idle, and the echo for every accepted byte
pub const PAD: u8 = 0xFF;

/// Coprocessor restart marker
pub const RESET: u8 = 0xF5;

/// Status code for a successfully executed command
pub const STATUS_SUCCESS: u8 = 0x00;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// Maximum parameter + payload size
pub const MAX_BODY_SIZE: usize = PARAM_SIZE + MAX_PAYLOAD_SIZE;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_BODY_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Size field smaller than a header or larger than a frame
    InvalidSize,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Running CRC over one frame
///
/// Fed the header with its CRC field zeroed, then the parameter, then the
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCrc {
    state: u16,
}

impl Default for FrameCrc {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCrc {
    /// Start a new frame checksum
    pub fn new() -> Self {
        Self { state: CRC16_SEED }
    }

    /// Fold one byte
    pub fn update(&mut self, byte: u8) {
        self.state = crc16(byte, self.state);
    }

    /// Fold a run of bytes
    pub fn update_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Current checksum value
    pub fn value(&self) -> u16 {
        self.state
    }
}

/// Fixed 5-byte frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    /// Total frame size including this header
    pub size: u16,
    /// Frame checksum
    pub crc: u16,
    /// Command id or status code
    pub code: u8,
}

impl Header {
    /// Header for a frame carrying `body_len` parameter + payload bytes
    ///
    /// The CRC field starts at zero.
    pub fn new(code: u8, body_len: usize) -> Result<Self, FrameError> {
        let size = HEADER_SIZE
            .checked_add(body_len)
            .filter(|&s| s <= u16::MAX as usize)
            .ok_or(FrameError::PayloadTooLarge)?;

        Ok(Self {
            size: size as u16,
            crc: 0,
            code,
        })
    }

    /// Decode a header from its wire bytes
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            size: u16::from_be_bytes([bytes[0], bytes[1]]),
            crc: u16::from_be_bytes([bytes[2], bytes[3]]),
            code: bytes[4],
        }
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let size = self.size.to_be_bytes();
        let crc = self.crc.to_be_bytes();
        [size[0], size[1], crc[0], crc[1], self.code]
    }

    /// Number of parameter + payload bytes following the header
    pub fn body_len(&self) -> Result<usize, FrameError> {
        (self.size as usize)
            .checked_sub(HEADER_SIZE)
            .ok_or(FrameError::InvalidSize)
    }

    /// Checksum state after folding this header with a zeroed CRC field
    pub fn crc_start(&self) -> FrameCrc {
        let mut bytes = self.to_bytes();
        bytes[2] = 0;
        bytes[3] = 0;

        let mut crc = FrameCrc::new();
        crc.update_slice(&bytes);
        crc
    }
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command id or status code
    pub code: u8,
    /// Parameter (if any) followed by payload
    pub body: Vec<u8, MAX_BODY_SIZE>,
}

impl Frame {
    /// Create a new frame with an optional parameter and a payload
    pub fn new(code: u8, param: Option<u16>, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut body = Vec::new();
        if let Some(param) = param {
            body.extend_from_slice(&param.to_be_bytes())
                .map_err(|_| FrameError::PayloadTooLarge)?;
        }
        body.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self { code, body })
    }

    /// Create a frame with no parameter or payload
    pub fn empty(code: u8) -> Self {
        Self {
            code,
            body: Vec::new(),
        }
    }

    /// First two body bytes read as a parameter
    pub fn param(&self) -> Option<u16> {
        match self.body.as_slice() {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// Body bytes after a leading parameter
    pub fn payload_after_param(&self) -> &[u8] {
        self.body.get(PARAM_SIZE..).unwrap_or(&[])
    }

    /// Header with the CRC field filled in
    pub fn header(&self) -> Header {
        let mut header = Header {
            size: (HEADER_SIZE + self.body.len()) as u16,
            crc: 0,
            code: self.code,
        };
        let mut crc = header.crc_start();
        crc.update_slice(&self.body);
        header.crc = crc.value();
        header
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = HEADER_SIZE + self.body.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[..HEADER_SIZE].copy_from_slice(&self.header().to_bytes());
        buffer[HEADER_SIZE..frame_len].copy_from_slice(&self.body);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for parsing a stream of frames separated by PAD bytes
///
/// This is the receiving side of the protocol as the coprocessor sees it;
/// the host engine reads responses inline instead.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    header: [u8; HEADER_SIZE],
    header_len: usize,
    body: Vec<u8, MAX_BODY_SIZE>,
    expected_body: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Skipping PAD filler
    WaitingForStart,
    /// Collecting the 5 header bytes
    ReadingHeader,
    /// Reading parameter + payload bytes
    ReadingBody,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            header: [0; HEADER_SIZE],
            header_len: 0,
            body: Vec::new(),
            expected_body: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.header_len = 0;
        self.body.clear();
        self.expected_body = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                // A size high byte is never PAD for a legal frame
                if byte != PAD {
                    self.header[0] = byte;
                    self.header_len = 1;
                    self.state = ParseState::ReadingHeader;
                }
                Ok(None)
            }
            ParseState::ReadingHeader => {
                self.header[self.header_len] = byte;
                self.header_len += 1;
                if self.header_len < HEADER_SIZE {
                    return Ok(None);
                }

                let header = Header::from_bytes(&self.header);
                let body_len = match header.body_len() {
                    Ok(len) if len <= MAX_BODY_SIZE => len,
                    _ => {
                        self.reset();
                        return Err(FrameError::InvalidSize);
                    }
                };

                self.expected_body = body_len;
                self.body.clear();
                if body_len == 0 {
                    self.finish()
                } else {
                    self.state = ParseState::ReadingBody;
                    Ok(None)
                }
            }
            ParseState::ReadingBody => {
                // Cannot overflow: expected_body was checked against MAX_BODY_SIZE
                let _ = self.body.push(byte);
                if self.body.len() == self.expected_body {
                    self.finish()
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn finish(&mut self) -> Result<Option<Frame>, FrameError> {
        let header = Header::from_bytes(&self.header);
        let mut crc = header.crc_start();
        crc.update_slice(&self.body);

        if crc.value() != header.crc {
            self.reset();
            return Err(FrameError::InvalidChecksum);
        }

        let frame = Frame {
            code: header.code,
            body: self.body.clone(),
        };

        self.reset();
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::crc16_slice;

    #[test]
    fn test_header_roundtrip() {
        let header = Header {
            size: 0x0107,
            crc: 0xBEEF,
            code: 0x11,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0x01, 0x07, 0xBE, 0xEF, 0x11]);
        assert_eq!(Header::from_bytes(&bytes), header);
    }

    #[test]
    fn test_header_body_len() {
        let header = Header::new(0x10, 7).unwrap();
        assert_eq!(header.size, 12);
        assert_eq!(header.body_len(), Ok(7));

        let short = Header {
            size: 4,
            crc: 0,
            code: 0,
        };
        assert_eq!(short.body_len(), Err(FrameError::InvalidSize));
    }

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(0x20);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, HEADER_SIZE);
        assert_eq!(buffer[0], 0); // size hi
        assert_eq!(buffer[1], 5); // size lo
        assert_eq!(buffer[4], 0x20); // code

        // CRC covers the header with the CRC field zeroed
        let crc = crc16_slice(&[0, 5, 0, 0, 0x20]);
        assert_eq!(u16::from_be_bytes([buffer[2], buffer[3]]), crc);
    }

    #[test]
    fn test_frame_encode_with_param() {
        let frame = Frame::new(0x11, Some(0x0203), b"hi").unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(encoded.len(), 9);
        assert_eq!(&encoded[..2], &[0, 9]);
        assert_eq!(&encoded[5..], &[0x02, 0x03, b'h', b'i']);

        let crc = crc16_slice(&[0, 9, 0, 0, 0x11, 0x02, 0x03, b'h', b'i']);
        assert_eq!(frame.header().crc, crc);
        assert_eq!(frame.param(), Some(0x0203));
        assert_eq!(frame.payload_after_param(), b"hi");
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = Frame::new(0x21, None, &[1, 2, 3, 4, 5]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let parsed = parser.feed_bytes(&encoded).unwrap().unwrap();

        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let frame = Frame::new(0x21, None, &[9, 9]).unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        // Corrupt the last payload byte
        let last_idx = encoded.len() - 1;
        encoded[last_idx] ^= 0x01;

        let mut parser = FrameParser::new();
        let result = parser.feed_bytes(&encoded);
        assert_eq!(result, Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_parser_skips_pad() {
        let frame = Frame::empty(0x24);
        let encoded = frame.encode_to_vec().unwrap();

        let mut data = Vec::<u8, 20>::new();
        data.extend_from_slice(&[PAD, PAD, PAD]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let mut parser = FrameParser::new();
        let parsed = parser.feed_bytes(&data).unwrap().unwrap();

        assert_eq!(parsed.code, 0x24);
    }

    #[test]
    fn test_parser_rejects_oversized() {
        let mut parser = FrameParser::new();
        let result = parser.feed_bytes(&[0x01, 0x00, 0x00, 0x00, 0x10]);
        assert_eq!(result, Err(FrameError::InvalidSize));

        // Parser recovers for the next frame
        let encoded = Frame::empty(0x30).encode_to_vec().unwrap();
        assert_eq!(parser.feed_bytes(&encoded).unwrap().unwrap().code, 0x30);
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(0x21, None, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }
}
