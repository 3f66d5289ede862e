//! CRC16 used to protect link frames
//!
//! CRC-16/CCITT-FALSE: polynomial 0x1021, not reflected, no final xor.
//! The running state is seeded with [`CRC16_SEED`] at the start of every
//! frame and folded one byte at a time, so both ends can check a frame
//! while it is still streaming.

/// Initial CRC state for every frame
pub const CRC16_SEED: u16 = 0xFFFF;

/// Fold one byte into a running CRC
pub fn crc16(byte: u8, crc: u16) -> u16 {
    // Table-free form of the 0x1021 division, one byte per step
    let mut crc = crc.rotate_left(8) ^ byte as u16;
    crc ^= (crc & 0x00FF) >> 4;
    crc ^= crc << 12;
    crc ^= (crc & 0x00FF) << 5;
    crc
}

/// CRC of a complete byte slice, starting from [`CRC16_SEED`]
pub fn crc16_slice(data: &[u8]) -> u16 {
    data.iter().fold(CRC16_SEED, |crc, &byte| crc16(byte, crc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_check_value() {
        // Standard CCITT-FALSE check string
        assert_eq!(crc16_slice(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(crc16_slice(b""), CRC16_SEED);
        assert_eq!(crc16_slice(b"A"), 0xB915);
    }

    #[test]
    fn test_incremental_matches_slice() {
        let data = [0x00, 0x0A, 0x00, 0x00, 0xA1, 0x12, 0x34];
        let mut crc = CRC16_SEED;
        for &b in &data {
            crc = crc16(b, crc);
        }
        assert_eq!(crc, crc16_slice(&data));
    }

    proptest! {
        #[test]
        fn test_deterministic(data in proptest::collection::vec(any::<u8>(), 0..128)) {
            prop_assert_eq!(crc16_slice(&data), crc16_slice(&data));
        }

        #[test]
        fn test_single_bit_flip_detected(
            data in proptest::collection::vec(any::<u8>(), 1..128),
            bit in any::<usize>(),
        ) {
            let bit = bit % (data.len() * 8);
            let mut flipped = data.clone();
            flipped[bit / 8] ^= 1 << (bit % 8);
            prop_assert_ne!(crc16_slice(&data), crc16_slice(&flipped));
        }
    }
}
