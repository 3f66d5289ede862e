//! Key and index lookup over flat documents

use super::ValueKind;
use crate::buffer::Buffer;

/// Longest map key that can be searched for
pub const MAX_KEY_LEN: usize = 16;

impl<const N: usize> Buffer<N> {
    /// Position the cursor on the value stored under `key`
    ///
    /// Scans every top-level map from the start of the data. On a match the
    /// cursor is left on the value and `true` is returned; otherwise the
    /// cursor is restored. Keys must match exactly, and keys longer than
    /// [`MAX_KEY_LEN`] are never found.
    pub fn find_by_key(&mut self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        if key.len() > MAX_KEY_LEN {
            return false;
        }

        let saved = self.read_position();
        self.restart();

        if self.scan_maps(key) {
            return true;
        }
        self.seek(saved);
        false
    }

    fn scan_maps(&mut self, key: &[u8]) -> bool {
        while let Some(kind) = self.peek_kind() {
            if kind != ValueKind::Map {
                if self.skip_value().is_err() {
                    return false;
                }
                continue;
            }

            let Ok(pairs) = self.unpack_map() else {
                return false;
            };
            for _ in 0..pairs {
                let matched = self.unpack_bytes().map(|candidate| candidate == key);
                match matched {
                    Ok(true) => return true,
                    Ok(false) => {}
                    Err(_) => {
                        // Not a raw key: step over it
                        if self.skip_value().is_err() {
                            return false;
                        }
                    }
                }
                if self.skip_value().is_err() {
                    return false;
                }
            }
        }
        false
    }

    /// Position the cursor on element `index` of the first array that has one
    ///
    /// Indices start at 1. Index 0 or no such element restores the cursor
    /// and returns `false`.
    pub fn find_by_index(&mut self, index: u16) -> bool {
        if index == 0 {
            return false;
        }

        let saved = self.read_position();
        self.restart();

        if self.scan_arrays(index) {
            return true;
        }
        self.seek(saved);
        false
    }

    fn scan_arrays(&mut self, index: u16) -> bool {
        while let Some(kind) = self.peek_kind() {
            if kind != ValueKind::Array {
                if self.skip_value().is_err() {
                    return false;
                }
                continue;
            }

            let Ok(items) = self.unpack_array() else {
                return false;
            };
            for item in 1..=items {
                if item == index {
                    return true;
                }
                if self.skip_value().is_err() {
                    return false;
                }
            }
        }
        false
    }
}
