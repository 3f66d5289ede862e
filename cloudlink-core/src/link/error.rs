//! Transaction errors

/// Why a transaction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Request rejected before any byte was exchanged
    Parameter,
    /// No RESET seen within the handshake timeout, or no response within
    /// the poll timeout
    SyncTimeout,
    /// Echo during transmit was neither PAD nor RESET
    UnexpectedByte(u8),
    /// Response size field out of range
    Size(u16),
    /// Response checksum mismatch
    Crc { expected: u16, actual: u16 },
    /// Coprocessor sent RESET mid-transaction
    PeerReset,
    /// Coprocessor answered with a non-success status
    Status(u8),
    /// The byte transport itself failed
    Transport,
}

impl LinkError {
    /// True if the link must handshake again before the next transaction
    pub fn forces_resync(&self) -> bool {
        matches!(
            self,
            LinkError::SyncTimeout
                | LinkError::UnexpectedByte(_)
                | LinkError::Size(_)
                | LinkError::Crc { .. }
                | LinkError::Transport
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resync_mapping() {
        assert!(LinkError::SyncTimeout.forces_resync());
        assert!(LinkError::UnexpectedByte(0x12).forces_resync());
        assert!(LinkError::Size(3).forces_resync());
        assert!(LinkError::Crc { expected: 1, actual: 2 }.forces_resync());
        assert!(LinkError::Transport.forces_resync());

        assert!(!LinkError::Parameter.forces_resync());
        assert!(!LinkError::PeerReset.forces_resync());
        assert!(!LinkError::Status(0x80).forces_resync());
    }
}
