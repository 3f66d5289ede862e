//! Unpack methods
//!
//! Every method either consumes one whole item and returns it, or returns
//! an error and leaves the read cursor where it was.

use core::ops::Range;

use super::{tag, UnpackError, Value, ValueKind};
use crate::buffer::Buffer;

impl<const N: usize> Buffer<N> {
    /// Tag of the next item, without consuming it
    pub fn peek_tag(&self) -> Option<u8> {
        self.peek()
    }

    /// Kind of the next item, without consuming it
    pub fn peek_kind(&self) -> Option<ValueKind> {
        self.peek().map(ValueKind::of)
    }

    fn next_tag(&self) -> Result<u8, UnpackError> {
        self.peek().ok_or(UnpackError::DataExhausted)
    }

    /// Big-endian operand of `width` bytes following the tag
    fn operand(&self, width: usize) -> Result<u32, UnpackError> {
        let bytes = self
            .unread()
            .get(1..1 + width)
            .ok_or(UnpackError::DataExhausted)?;
        Ok(bytes.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32))
    }

    /// Decode an unsigned integer at most `width` bytes wide
    ///
    /// Returns the value and the number of bytes it occupies.
    fn peek_unsigned(&self, width: usize) -> Result<(u32, usize), UnpackError> {
        let t = self.next_tag()?;
        let len = match t {
            tag::FIXNUM_POS_MIN..=tag::FIXNUM_POS_MAX => return Ok((t as u32, 1)),
            tag::UINT8 => 1,
            tag::UINT16 => 2,
            tag::UINT32 => 4,
            _ => return Err(UnpackError::TypeError),
        };
        if len > width {
            return Err(UnpackError::TypeError);
        }
        Ok((self.operand(len)?, 1 + len))
    }

    /// Decode a signed integer at most `width` bytes wide
    fn peek_signed(&self, width: usize) -> Result<(i32, usize), UnpackError> {
        let t = self.next_tag()?;
        let len = match t {
            tag::FIXNUM_POS_MIN..=tag::FIXNUM_POS_MAX => return Ok((t as i32, 1)),
            tag::FIXNUM_NEG_MIN..=tag::FIXNUM_NEG_MAX => return Ok((t as i8 as i32, 1)),
            tag::INT8 => 1,
            tag::INT16 => 2,
            tag::INT32 => 4,
            _ => return Err(UnpackError::TypeError),
        };
        if len > width {
            return Err(UnpackError::TypeError);
        }
        let shift = 32 - 8 * len as u32;
        let raw = self.operand(len)?;
        Ok((((raw << shift) as i32) >> shift, 1 + len))
    }

    /// Read an unsigned integer that fits in a `u8`
    pub fn unpack_u8(&mut self) -> Result<u8, UnpackError> {
        let (value, used) = self.peek_unsigned(1)?;
        self.advance(used);
        Ok(value as u8)
    }

    /// Read an unsigned integer that fits in a `u16`
    pub fn unpack_u16(&mut self) -> Result<u16, UnpackError> {
        let (value, used) = self.peek_unsigned(2)?;
        self.advance(used);
        Ok(value as u16)
    }

    /// Read an unsigned integer up to 32 bits
    pub fn unpack_u32(&mut self) -> Result<u32, UnpackError> {
        let (value, used) = self.peek_unsigned(4)?;
        self.advance(used);
        Ok(value)
    }

    /// Read a signed integer that fits in an `i8`
    pub fn unpack_i8(&mut self) -> Result<i8, UnpackError> {
        let (value, used) = self.peek_signed(1)?;
        self.advance(used);
        Ok(value as i8)
    }

    /// Read a signed integer that fits in an `i16`
    pub fn unpack_i16(&mut self) -> Result<i16, UnpackError> {
        let (value, used) = self.peek_signed(2)?;
        self.advance(used);
        Ok(value as i16)
    }

    /// Read a signed integer up to 32 bits
    pub fn unpack_i32(&mut self) -> Result<i32, UnpackError> {
        let (value, used) = self.peek_signed(4)?;
        self.advance(used);
        Ok(value)
    }

    /// Read a single-precision float
    pub fn unpack_f32(&mut self) -> Result<f32, UnpackError> {
        if self.next_tag()? != tag::FLOAT {
            return Err(UnpackError::TypeError);
        }
        let bits = self.operand(4)?;
        self.advance(5);
        Ok(f32::from_bits(bits))
    }

    /// Consume a nil
    pub fn unpack_nil(&mut self) -> Result<(), UnpackError> {
        if self.next_tag()? != tag::NIL {
            return Err(UnpackError::TypeError);
        }
        self.advance(1);
        Ok(())
    }

    /// Read a boolean
    pub fn unpack_bool(&mut self) -> Result<bool, UnpackError> {
        let value = match self.next_tag()? {
            tag::TRUE => true,
            tag::FALSE => false,
            _ => return Err(UnpackError::TypeError),
        };
        self.advance(1);
        Ok(value)
    }

    /// Decode a 16-bit count header for an array or map
    fn unpack_count(&mut self, fix_min: u8, fix_max: u8, tag16: u8) -> Result<u16, UnpackError> {
        let t = self.next_tag()?;
        if (fix_min..=fix_max).contains(&t) {
            self.advance(1);
            return Ok((t - fix_min) as u16);
        }
        if t != tag16 {
            // 32-bit counts included
            return Err(UnpackError::TypeError);
        }
        let count = self.operand(2)? as u16;
        self.advance(3);
        Ok(count)
    }

    /// Read an array header and return its element count
    pub fn unpack_array(&mut self) -> Result<u16, UnpackError> {
        self.unpack_count(tag::FIXARRAY_MIN, tag::FIXARRAY_MAX, tag::ARRAY16)
    }

    /// Read a map header and return its pair count
    pub fn unpack_map(&mut self) -> Result<u16, UnpackError> {
        self.unpack_count(tag::FIXMAP_MIN, tag::FIXMAP_MAX, tag::MAP16)
    }

    /// Decode a raw header: declared data length and header size
    fn peek_raw_header(&self) -> Result<(usize, usize), UnpackError> {
        let t = self.next_tag()?;
        match t {
            tag::FIXRAW_MIN..=tag::FIXRAW_MAX => Ok(((t - tag::FIXRAW_MIN) as usize, 1)),
            tag::RAW16 => Ok((self.operand(2)? as usize, 3)),
            tag::RAW32 => Ok((self.operand(4)? as usize, 5)),
            _ => Err(UnpackError::TypeError),
        }
    }

    /// Locate a complete raw item: absolute data range and total size
    fn peek_raw(&self) -> Result<(Range<usize>, usize), UnpackError> {
        let (len, header) = self.peek_raw_header()?;
        // A RAW32 length can exceed anything addressable on 32-bit targets
        if len > self.remaining_len().saturating_sub(header) {
            return Err(UnpackError::DataExhausted);
        }
        let start = self.read_position() + header;
        Ok((start..start + len, header + len))
    }

    /// Read a raw header and return the declared data length
    ///
    /// The data itself is left unread.
    pub fn unpack_raw_header(&mut self) -> Result<usize, UnpackError> {
        let (len, header) = self.peek_raw_header()?;
        self.advance(header);
        Ok(len)
    }

    /// Read a raw item, borrowing its data
    pub fn unpack_bytes(&mut self) -> Result<&[u8], UnpackError> {
        let (range, used) = self.peek_raw()?;
        self.advance(used);
        Ok(&self.as_slice()[range])
    }

    /// Read a raw item as UTF-8 text
    ///
    /// Invalid UTF-8 is a [`UnpackError::TypeError`].
    pub fn unpack_str(&mut self) -> Result<&str, UnpackError> {
        let (range, used) = self.peek_raw()?;
        let (data, cursor) = self.split_cursor();
        let text = core::str::from_utf8(&data[range]).map_err(|_| UnpackError::TypeError)?;
        *cursor += used;
        Ok(text)
    }

    /// Read a raw item into `out`
    ///
    /// The whole item is consumed; data beyond `out.len()` is dropped.
    /// Returns the declared length.
    pub fn unpack_raw_into(&mut self, out: &mut [u8]) -> Result<usize, UnpackError> {
        let (range, used) = self.peek_raw()?;
        let len = range.len();
        let copied = len.min(out.len());
        out[..copied].copy_from_slice(&self.as_slice()[range.start..range.start + copied]);
        self.advance(used);
        Ok(len)
    }

    /// Size in bytes of the next item as skipping sees it
    ///
    /// Array and map headers count alone; their elements are separate items.
    fn item_len(&self) -> Result<usize, UnpackError> {
        let t = self.next_tag()?;
        let len = match t {
            tag::FIXRAW_MIN..=tag::FIXRAW_MAX => 1 + (t - tag::FIXRAW_MIN) as usize,
            tag::UINT8 | tag::INT8 => 2,
            tag::UINT16 | tag::INT16 | tag::ARRAY16 | tag::MAP16 => 3,
            tag::UINT32 | tag::INT32 | tag::FLOAT | tag::ARRAY32 | tag::MAP32 => 5,
            tag::UINT64 | tag::INT64 | tag::DOUBLE => 9,
            tag::RAW16 => 3 + self.operand(2)? as usize,
            tag::RAW32 => (self.operand(4)? as usize)
                .checked_add(5)
                .ok_or(UnpackError::DataExhausted)?,
            _ => 1,
        };
        Ok(len)
    }

    /// Step over the next item
    ///
    /// Only the header of an array or map is skipped. Unknown tags count as
    /// one byte.
    pub fn skip_value(&mut self) -> Result<(), UnpackError> {
        let len = self.item_len()?;
        if !self.remaining(len) {
            return Err(UnpackError::DataExhausted);
        }
        self.advance(len);
        Ok(())
    }

    /// Read the next item, whatever its kind
    pub fn unpack_value(&mut self) -> Result<Value<'_>, UnpackError> {
        let kind = ValueKind::of(self.next_tag()?);
        let value = match kind {
            ValueKind::Nil => {
                self.unpack_nil()?;
                Value::Nil
            }
            ValueKind::Bool => Value::Bool(self.unpack_bool()?),
            ValueKind::UInt => Value::UInt(self.unpack_u32()?),
            ValueKind::Int => Value::Int(self.unpack_i32()?),
            ValueKind::Float => Value::Float(self.unpack_f32()?),
            ValueKind::Raw => Value::Raw(self.unpack_bytes()?),
            ValueKind::Array => Value::Array(self.unpack_array()?),
            ValueKind::Map => Value::Map(self.unpack_map()?),
            ValueKind::Unsupported | ValueKind::Unknown => return Err(UnpackError::TypeError),
        };
        Ok(value)
    }

    /// Unpack any [`Unpack`] value
    pub fn unpack<T: Unpack>(&mut self) -> Result<T, UnpackError> {
        T::unpack_from(self)
    }
}

/// Types that can be unpacked from a [`Buffer`]
pub trait Unpack: Sized {
    /// Consume the next item and decode it
    fn unpack_from<const N: usize>(buf: &mut Buffer<N>) -> Result<Self, UnpackError>;
}

macro_rules! impl_unpack_scalar {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Unpack for $ty {
                fn unpack_from<const N: usize>(buf: &mut Buffer<N>) -> Result<Self, UnpackError> {
                    buf.$method()
                }
            }
        )*
    };
}

impl_unpack_scalar! {
    u8 => unpack_u8,
    u16 => unpack_u16,
    u32 => unpack_u32,
    i8 => unpack_i8,
    i16 => unpack_i16,
    i32 => unpack_i32,
    f32 => unpack_f32,
    bool => unpack_bool,
    () => unpack_nil,
}

impl<T: Unpack> Unpack for Option<T> {
    fn unpack_from<const N: usize>(buf: &mut Buffer<N>) -> Result<Self, UnpackError> {
        if buf.peek_tag() == Some(tag::NIL) {
            buf.unpack_nil()?;
            return Ok(None);
        }
        T::unpack_from(buf).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buffer(bytes: &[u8]) -> Buffer<64> {
        Buffer::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_unpack_fixed_width() {
        let mut buf = buffer(&[0xCC, 0x05, 0xCD, 0x12, 0x34, 0xD2, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(buf.unpack_u8(), Ok(5));
        assert_eq!(buf.unpack_u16(), Ok(0x1234));
        assert_eq!(buf.unpack_i32(), Ok(-2));
        assert_eq!(buf.remaining_len(), 0);
    }

    #[test]
    fn test_fixnums_accepted_by_every_integer() {
        let mut buf = buffer(&[0x07, 0x07, 0x07, 0xFF]);
        assert_eq!(buf.unpack_u8(), Ok(7));
        assert_eq!(buf.unpack_i16(), Ok(7));
        assert_eq!(buf.unpack_u32(), Ok(7));
        assert_eq!(buf.unpack_i8(), Ok(-1));
    }

    #[test]
    fn test_negative_fixnum_sign_extends() {
        let mut buf = buffer(&[0xE0, 0xD0, 0x80]);
        assert_eq!(buf.unpack_i32(), Ok(-32));
        assert_eq!(buf.unpack_i16(), Ok(-128));
    }

    #[test]
    fn test_width_and_signedness_checked() {
        let mut buf = buffer(&[0xCD, 0x01, 0x00]);
        assert_eq!(buf.unpack_u8(), Err(UnpackError::TypeError));
        assert_eq!(buf.unpack_i32(), Err(UnpackError::TypeError));
        assert_eq!(buf.read_position(), 0);
        assert_eq!(buf.unpack_u16(), Ok(0x100));

        let mut buf = buffer(&[0xFF]);
        assert_eq!(buf.unpack_u8(), Err(UnpackError::TypeError));
    }

    #[test]
    fn test_64bit_is_type_error() {
        let mut buf = buffer(&[0xCF, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(buf.unpack_u32(), Err(UnpackError::TypeError));
        assert_eq!(buf.unpack_value(), Err(UnpackError::TypeError));
        assert_eq!(buf.read_position(), 0);
    }

    #[test]
    fn test_truncated_leaves_cursor() {
        let mut buf = buffer(&[0xCE, 0x00, 0x01]);
        assert_eq!(buf.unpack_u32(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.read_position(), 0);

        let mut buf = buffer(&[0xA4, b'a', b'b']);
        assert_eq!(buf.unpack_bytes(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.read_position(), 0);
    }

    #[test]
    fn test_empty_is_exhausted() {
        let mut buf = Buffer::<4>::new();
        assert_eq!(buf.unpack_nil(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.skip_value(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.peek_kind(), None);
    }

    #[test]
    fn test_bool_nil_float() {
        let mut buf = buffer(&[0xC3, 0xC2, 0xC0, 0xCA, 0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(buf.unpack_bool(), Ok(true));
        assert_eq!(buf.unpack_bool(), Ok(false));
        assert_eq!(buf.unpack_nil(), Ok(()));
        assert_eq!(buf.unpack_f32(), Ok(1.0));
    }

    #[test]
    fn test_array_and_map_headers() {
        let mut buf = buffer(&[0x93, 0xDC, 0x00, 0x10, 0x82, 0xDE, 0x01, 0x00]);
        assert_eq!(buf.unpack_array(), Ok(3));
        assert_eq!(buf.unpack_array(), Ok(16));
        assert_eq!(buf.unpack_map(), Ok(2));
        assert_eq!(buf.unpack_map(), Ok(256));
    }

    #[test]
    fn test_32bit_counts_rejected() {
        let mut buf = buffer(&[0xDF, 0, 0, 0, 1]);
        assert_eq!(buf.unpack_map(), Err(UnpackError::TypeError));
        let mut buf = buffer(&[0xDD, 0, 0, 0, 1]);
        assert_eq!(buf.unpack_array(), Err(UnpackError::TypeError));
    }

    #[test]
    fn test_unpack_str() {
        let mut buf = buffer(&[0xA3, b'a', b'b', b'c', 0xA2, 0xC3, 0x28]);
        assert_eq!(buf.unpack_str(), Ok("abc"));
        assert_eq!(buf.unpack_str(), Err(UnpackError::TypeError));
        assert_eq!(buf.read_position(), 4);
    }

    #[test]
    fn test_raw_header_then_data() {
        let mut buf = buffer(&[0xDA, 0x00, 0x02, 9, 8]);
        assert_eq!(buf.unpack_raw_header(), Ok(2));
        assert_eq!(buf.read(), 9);
        assert_eq!(buf.read(), 8);
    }

    #[test]
    fn test_raw_into_truncates() {
        let mut buf = buffer(&[0xA4, 1, 2, 3, 4, 0xC0]);
        let mut out = [0u8; 2];
        assert_eq!(buf.unpack_raw_into(&mut out), Ok(4));
        assert_eq!(out, [1, 2]);
        assert_eq!(buf.unpack_nil(), Ok(()));
    }

    #[test]
    fn test_skip_rules() {
        let mut buf = buffer(&[
            0xC1, // unknown
            0xD3, 0, 0, 0, 0, 0, 0, 0, 0, // int64
            0xA2, b'h', b'i',
            0xDC, 0x00, 0x02, // array16 header only
            0x05,
        ]);
        buf.skip_value().unwrap();
        assert_eq!(buf.read_position(), 1);
        buf.skip_value().unwrap();
        assert_eq!(buf.read_position(), 10);
        buf.skip_value().unwrap();
        assert_eq!(buf.read_position(), 13);
        buf.skip_value().unwrap();
        assert_eq!(buf.read_position(), 16);
        assert_eq!(buf.unpack_u8(), Ok(5));
    }

    #[test]
    fn test_skip_truncated() {
        let mut buf = buffer(&[0xDA, 0x00, 0x05, 1, 2]);
        assert_eq!(buf.skip_value(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.read_position(), 0);
    }

    #[test]
    fn test_skip_is_flat() {
        // [[1, 2], 3]: skipping the outer array's first element only
        // steps over the inner header
        let mut buf = buffer(&[0x92, 0x92, 0x01, 0x02, 0x03]);
        assert_eq!(buf.unpack_array(), Ok(2));
        buf.skip_value().unwrap();
        assert_eq!(buf.unpack_u8(), Ok(1));
    }

    #[test]
    fn test_unpack_value() {
        let mut buf = buffer(&[0x82, 0xA1, b'a', 0x01, 0xA1, b'b', 0xF0]);
        assert_eq!(buf.unpack_value(), Ok(Value::Map(2)));
        assert_eq!(buf.unpack_value(), Ok(Value::Raw(b"a")));
        assert_eq!(buf.unpack_value(), Ok(Value::UInt(1)));
        assert_eq!(buf.unpack_value(), Ok(Value::Raw(b"b")));
        assert_eq!(buf.unpack_value(), Ok(Value::Int(-16)));
    }

    #[test]
    fn test_raw32_length_beyond_data() {
        let bytes = [0xDB, 0xFF, 0xFF, 0xFF, 0xFF, 1, 2];
        let mut buf = buffer(&bytes);
        let mut out = [0u8; 4];

        assert_eq!(buf.unpack_bytes(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.unpack_str(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.unpack_raw_into(&mut out), Err(UnpackError::DataExhausted));
        assert_eq!(buf.unpack_value(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.skip_value(), Err(UnpackError::DataExhausted));
        assert_eq!(buf.read_position(), 0);

        // the header alone is still readable
        assert_eq!(buf.unpack_raw_header(), Ok(0xFFFF_FFFF));
        assert_eq!(buf.read_position(), 5);
    }

    #[test]
    fn test_str_consumes_item_once_valid() {
        let mut buf = buffer(&[0xA2, 0xC3, 0xA9, 0xA1, b'z']);
        assert_eq!(buf.unpack_str(), Ok("é"));
        assert_eq!(buf.read_position(), 3);
        assert_eq!(buf.unpack_str(), Ok("z"));
        assert_eq!(buf.remaining_len(), 0);
    }

    #[test]
    fn test_generic_option() {
        let mut buf = buffer(&[0xC0, 0x2A]);
        assert_eq!(buf.unpack::<Option<u8>>(), Ok(None));
        assert_eq!(buf.unpack::<Option<u8>>(), Ok(Some(42)));
    }

    proptest! {
        #[test]
        fn test_u32_roundtrip(n in any::<u32>()) {
            let mut buf = Buffer::<16>::new();
            buf.pack_u32(n).unwrap();
            buf.pack_uint(n).unwrap();
            prop_assert_eq!(buf.unpack_u32(), Ok(n));
            prop_assert_eq!(buf.unpack_u32(), Ok(n));
            prop_assert_eq!(buf.remaining_len(), 0);
        }

        #[test]
        fn test_i32_roundtrip(n in any::<i32>()) {
            let mut buf = Buffer::<16>::new();
            buf.pack_i32(n).unwrap();
            buf.pack_int(n).unwrap();
            prop_assert_eq!(buf.unpack_i32(), Ok(n));
            prop_assert_eq!(buf.unpack_i32(), Ok(n));
        }

        #[test]
        fn test_i16_roundtrip(n in any::<i16>()) {
            let mut buf = Buffer::<8>::new();
            buf.pack(n).unwrap();
            prop_assert_eq!(buf.unpack::<i16>(), Ok(n));
        }

        #[test]
        fn test_str_roundtrip(s in "[a-z]{0,40}") {
            let mut buf = Buffer::<64>::new();
            buf.pack_str(&s).unwrap();
            prop_assert_eq!(buf.unpack_str(), Ok(s.as_str()));
        }

        #[test]
        fn test_small_scalars_roundtrip(
            a in any::<u8>(),
            b in any::<u16>(),
            c in any::<i8>(),
            flag in any::<bool>(),
            x in any::<f32>(),
        ) {
            let mut buf = Buffer::<32>::new();
            buf.pack_u8(a).unwrap();
            buf.pack_u16(b).unwrap();
            buf.pack_i8(c).unwrap();
            buf.pack_bool(flag).unwrap();
            buf.pack_f32(x).unwrap();
            buf.pack(a).unwrap();
            buf.pack(c).unwrap();

            prop_assert_eq!(buf.unpack_u8(), Ok(a));
            prop_assert_eq!(buf.unpack_u16(), Ok(b));
            prop_assert_eq!(buf.unpack_i8(), Ok(c));
            prop_assert_eq!(buf.unpack_bool(), Ok(flag));
            // compare bits so NaN payloads count too
            prop_assert_eq!(buf.unpack_f32().map(f32::to_bits), Ok(x.to_bits()));
            prop_assert_eq!(buf.unpack::<u8>(), Ok(a));
            prop_assert_eq!(buf.unpack::<i8>(), Ok(c));
            prop_assert_eq!(buf.remaining_len(), 0);
        }

        #[test]
        fn test_raw_bytes_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..300)) {
            let mut buf = Buffer::<512>::new();
            buf.pack_raw(&data).unwrap();
            let header = if data.len() < 32 { 1 } else { 3 };
            prop_assert_eq!(buf.len(), header + data.len());

            prop_assert_eq!(buf.unpack_bytes(), Ok(data.as_slice()));
            buf.restart();
            prop_assert!(buf.skip_value().is_ok());
            prop_assert_eq!(buf.remaining_len(), 0);
        }

        #[test]
        fn test_array_of_scalars_roundtrip(items in proptest::collection::vec(any::<u32>(), 0..40)) {
            let mut buf = Buffer::<512>::new();
            buf.pack_array(items.len() as u16).unwrap();
            for &n in &items {
                buf.pack_uint(n).unwrap();
            }

            prop_assert_eq!(buf.unpack_array(), Ok(items.len() as u16));
            for &n in &items {
                prop_assert_eq!(buf.unpack_u32(), Ok(n));
            }
            prop_assert_eq!(buf.remaining_len(), 0);
        }

        #[test]
        fn test_map_of_scalars_roundtrip(
            pairs in proptest::collection::vec(("[a-z]{1,12}", any::<i32>()), 0..20),
        ) {
            let mut buf = Buffer::<512>::new();
            buf.pack_map(pairs.len() as u16).unwrap();
            for (key, value) in &pairs {
                buf.pack_str(key).unwrap();
                buf.pack_int(*value).unwrap();
            }

            prop_assert_eq!(buf.unpack_map(), Ok(pairs.len() as u16));
            for (key, value) in &pairs {
                prop_assert_eq!(buf.unpack_str(), Ok(key.as_str()));
                prop_assert_eq!(buf.unpack_i32(), Ok(*value));
            }
            prop_assert_eq!(buf.remaining_len(), 0);
        }
    }
}
