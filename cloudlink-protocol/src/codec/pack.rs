//! Pack methods
//!
//! Every method checks for room first and either writes the whole item or
//! nothing.

use super::{tag, PackError};
use crate::buffer::Buffer;

impl<const N: usize> Buffer<N> {
    fn reserve(&self, n: usize) -> Result<(), PackError> {
        if self.available(n) {
            Ok(())
        } else {
            Err(PackError::NoSpace)
        }
    }

    fn pack_tagged(&mut self, tag_byte: u8, bytes: &[u8]) -> Result<(), PackError> {
        self.reserve(1 + bytes.len())?;
        self.put(&[tag_byte]);
        self.put(bytes);
        Ok(())
    }

    /// Pack any [`Pack`] value
    pub fn pack<T: Pack>(&mut self, value: T) -> Result<(), PackError> {
        value.pack_into(self)
    }

    /// Pack nil
    pub fn pack_nil(&mut self) -> Result<(), PackError> {
        self.pack_tagged(tag::NIL, &[])
    }

    /// Pack a boolean
    pub fn pack_bool(&mut self, value: bool) -> Result<(), PackError> {
        self.pack_tagged(if value { tag::TRUE } else { tag::FALSE }, &[])
    }

    /// Pack an unsigned 8-bit integer, always with its width tag
    pub fn pack_u8(&mut self, n: u8) -> Result<(), PackError> {
        self.pack_tagged(tag::UINT8, &[n])
    }

    /// Pack as `UINT16`
    pub fn pack_u16(&mut self, n: u16) -> Result<(), PackError> {
        self.pack_tagged(tag::UINT16, &n.to_be_bytes())
    }

    /// Pack as `UINT32`
    pub fn pack_u32(&mut self, n: u32) -> Result<(), PackError> {
        self.pack_tagged(tag::UINT32, &n.to_be_bytes())
    }

    /// Pack as `INT8`
    pub fn pack_i8(&mut self, n: i8) -> Result<(), PackError> {
        self.pack_tagged(tag::INT8, &n.to_be_bytes())
    }

    /// Pack as `INT16`
    pub fn pack_i16(&mut self, n: i16) -> Result<(), PackError> {
        self.pack_tagged(tag::INT16, &n.to_be_bytes())
    }

    /// Pack as `INT32`
    pub fn pack_i32(&mut self, n: i32) -> Result<(), PackError> {
        self.pack_tagged(tag::INT32, &n.to_be_bytes())
    }

    /// Pack an unsigned integer in its shortest form
    pub fn pack_uint(&mut self, n: u32) -> Result<(), PackError> {
        if n <= tag::FIXNUM_POS_MAX as u32 {
            self.pack_tagged(n as u8, &[])
        } else if let Ok(n) = u8::try_from(n) {
            self.pack_u8(n)
        } else if let Ok(n) = u16::try_from(n) {
            self.pack_u16(n)
        } else {
            self.pack_u32(n)
        }
    }

    /// Pack a signed integer in its shortest signed form
    ///
    /// Non-negative values up to 127 use the positive fixnum, which every
    /// integer unpack accepts.
    pub fn pack_int(&mut self, n: i32) -> Result<(), PackError> {
        if (0..=tag::FIXNUM_POS_MAX as i32).contains(&n) || (-32..0).contains(&n) {
            self.pack_tagged(n as u8, &[])
        } else if let Ok(n) = i8::try_from(n) {
            self.pack_i8(n)
        } else if let Ok(n) = i16::try_from(n) {
            self.pack_i16(n)
        } else {
            self.pack_i32(n)
        }
    }

    /// Pack a single-precision float
    pub fn pack_f32(&mut self, n: f32) -> Result<(), PackError> {
        self.pack_tagged(tag::FLOAT, &n.to_bits().to_be_bytes())
    }

    /// Doubles have no encoding here
    ///
    /// A native `f64` is always 8 bytes wide; convert to `f32` explicitly
    /// if the precision loss is acceptable.
    pub fn pack_f64(&mut self, _n: f64) -> Result<(), PackError> {
        Err(PackError::Unsupported)
    }

    /// Pack an array header for `items` elements
    ///
    /// Requires room for the header plus one byte per element, the least
    /// the elements can take.
    pub fn pack_array(&mut self, items: u16) -> Result<(), PackError> {
        if items <= tag::MAX_FIXARRAY {
            self.reserve(1 + items as usize)?;
            self.put(&[tag::FIXARRAY_MIN + items as u8]);
        } else {
            self.reserve(3 + items as usize)?;
            self.put(&[tag::ARRAY16]);
            self.put(&items.to_be_bytes());
        }
        Ok(())
    }

    /// Pack a map header for `pairs` key/value pairs
    ///
    /// Requires room for the header plus one byte per key and per value.
    pub fn pack_map(&mut self, pairs: u16) -> Result<(), PackError> {
        let min_body = 2 * pairs as usize;
        if pairs <= tag::MAX_FIXMAP {
            self.reserve(1 + min_body)?;
            self.put(&[tag::FIXMAP_MIN + pairs as u8]);
        } else {
            self.reserve(3 + min_body)?;
            self.put(&[tag::MAP16]);
            self.put(&pairs.to_be_bytes());
        }
        Ok(())
    }

    /// Pack the header of a raw item of `len` bytes
    ///
    /// Room is checked for the header and the data together, so a following
    /// [`pack_raw_data`](Self::pack_raw_data) of `len` bytes always fits.
    pub fn pack_raw_header(&mut self, len: usize) -> Result<(), PackError> {
        if len <= tag::MAX_FIXRAW {
            self.reserve(1 + len)?;
            self.put(&[tag::FIXRAW_MIN + len as u8]);
        } else {
            let len16 = u16::try_from(len).map_err(|_| PackError::NoSpace)?;
            self.reserve(3 + len)?;
            self.put(&[tag::RAW16]);
            self.put(&len16.to_be_bytes());
        }
        Ok(())
    }

    /// Append raw data after a [`pack_raw_header`](Self::pack_raw_header)
    pub fn pack_raw_data(&mut self, data: &[u8]) -> Result<(), PackError> {
        self.reserve(data.len())?;
        self.put(data);
        Ok(())
    }

    /// Pack a raw byte string
    pub fn pack_raw(&mut self, data: &[u8]) -> Result<(), PackError> {
        self.pack_raw_header(data.len())?;
        self.pack_raw_data(data)
    }

    /// Pack a string as raw UTF-8 bytes
    pub fn pack_str(&mut self, s: &str) -> Result<(), PackError> {
        self.pack_raw(s.as_bytes())
    }
}

/// Types that can be packed into a [`Buffer`]
pub trait Pack {
    /// Append this value's encoding
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError>;
}

macro_rules! impl_pack_scalar {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Pack for $ty {
                fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
                    buf.$method(*self)
                }
            }
        )*
    };
}

impl_pack_scalar! {
    u8 => pack_u8,
    u16 => pack_u16,
    u32 => pack_u32,
    i8 => pack_i8,
    i16 => pack_i16,
    i32 => pack_i32,
    f32 => pack_f32,
    f64 => pack_f64,
    bool => pack_bool,
}

impl Pack for () {
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
        buf.pack_nil()
    }
}

impl Pack for [u8] {
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
        buf.pack_raw(self)
    }
}

impl<const M: usize> Pack for [u8; M] {
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
        buf.pack_raw(self)
    }
}

impl Pack for str {
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
        buf.pack_str(self)
    }
}

impl<T: Pack> Pack for Option<T> {
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
        match self {
            Some(value) => value.pack_into(buf),
            None => buf.pack_nil(),
        }
    }
}

impl<T: Pack + ?Sized> Pack for &T {
    fn pack_into<const N: usize>(&self, buf: &mut Buffer<N>) -> Result<(), PackError> {
        (**self).pack_into(buf)
    }
}
