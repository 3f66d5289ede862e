//! Compact binary codec
//!
//! A schema-less, tag-based format matching pre-2013 MessagePack
//! (raw strings, no bin/ext types), restricted to
//! what a small microcontroller needs:
//!
//! | Value          | Encoding                                          |
//! |----------------|---------------------------------------------------|
//! | 0..=127        | tag = value                                       |
//! | -32..=-1       | tag 0xE0..=0xFF                                   |
//! | u8/u16/u32     | 0xCC/0xCD/0xCE + 1/2/4 big-endian bytes           |
//! | i8/i16/i32     | 0xD0/0xD1/0xD2 + 1/2/4 big-endian bytes           |
//! | f32            | 0xCA + 4 big-endian bytes                         |
//! | bool           | 0xC2 / 0xC3                                       |
//! | nil            | 0xC0                                              |
//! | raw            | 0xA0+len (len <= 31), else 0xDA + u16 length      |
//! | array(n)       | 0x90+n (n <= 15), else 0xDC + u16 count           |
//! | map(n)         | 0x80+n (n <= 15), else 0xDE + u16 count           |
//!
//! 64-bit numbers and 32-bit array/map counts are recognized but rejected.
//!
//! Values are packed into and unpacked from a [`Buffer`](crate::Buffer)
//! one at a time; arrays and maps only carry their element count and the
//! caller reads the elements that follow.
//!
//! # Flat documents only
//!
//! [`Buffer::skip_value`](crate::Buffer::skip_value),
//! [`Buffer::find_by_key`](crate::Buffer::find_by_key) and
//! [`Buffer::find_by_index`](crate::Buffer::find_by_index) step over an
//! array or map header but not over its elements. They are only reliable
//! on documents whose arrays and maps hold scalars and raw strings.

mod find;
mod pack;
mod unpack;

pub use find::MAX_KEY_LEN;
pub use pack::Pack;
pub use unpack::Unpack;

/// Wire tags
pub mod tag {
    pub const FIXNUM_POS_MIN: u8 = 0x00;
    pub const FIXNUM_POS_MAX: u8 = 0x7F;
    pub const FIXMAP_MIN: u8 = 0x80;
    pub const FIXMAP_MAX: u8 = 0x8F;
    pub const FIXARRAY_MIN: u8 = 0x90;
    pub const FIXARRAY_MAX: u8 = 0x9F;
    pub const FIXRAW_MIN: u8 = 0xA0;
    pub const FIXRAW_MAX: u8 = 0xBF;
    pub const NIL: u8 = 0xC0;
    pub const FALSE: u8 = 0xC2;
    pub const TRUE: u8 = 0xC3;
    pub const FLOAT: u8 = 0xCA;
    pub const DOUBLE: u8 = 0xCB;
    pub const UINT8: u8 = 0xCC;
    pub const UINT16: u8 = 0xCD;
    pub const UINT32: u8 = 0xCE;
    pub const UINT64: u8 = 0xCF;
    pub const INT8: u8 = 0xD0;
    pub const INT16: u8 = 0xD1;
    pub const INT32: u8 = 0xD2;
    pub const INT64: u8 = 0xD3;
    pub const RAW16: u8 = 0xDA;
    pub const RAW32: u8 = 0xDB;
    pub const ARRAY16: u8 = 0xDC;
    pub const ARRAY32: u8 = 0xDD;
    pub const MAP16: u8 = 0xDE;
    pub const MAP32: u8 = 0xDF;
    pub const FIXNUM_NEG_MIN: u8 = 0xE0;
    pub const FIXNUM_NEG_MAX: u8 = 0xFF;

    /// Largest length held in a fix-raw tag
    pub const MAX_FIXRAW: usize = (FIXRAW_MAX - FIXRAW_MIN) as usize;
    /// Largest count held in a fix-array tag
    pub const MAX_FIXARRAY: u16 = (FIXARRAY_MAX - FIXARRAY_MIN) as u16;
    /// Largest count held in a fix-map tag
    pub const MAX_FIXMAP: u16 = (FIXMAP_MAX - FIXMAP_MIN) as u16;
}

/// Errors from packing values into a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PackError {
    /// Not enough room left; nothing was written
    NoSpace,
    /// The value has no encoding in this format (64-bit floats)
    Unsupported,
}

/// Errors from unpacking values out of a buffer
///
/// The read cursor is unchanged after either error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnpackError {
    /// Next item cannot be read as the requested type
    TypeError,
    /// Item is truncated, or there is no next item
    DataExhausted,
}

/// Classification of a tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    Nil,
    Bool,
    UInt,
    Int,
    Float,
    Raw,
    Array,
    Map,
    /// Defined by the format but not supported here (64-bit, 32-bit counts)
    Unsupported,
    /// Reserved or unknown tag
    Unknown,
}

impl ValueKind {
    /// Classify a tag byte
    pub fn of(tag_byte: u8) -> Self {
        use tag::*;

        match tag_byte {
            FIXNUM_POS_MIN..=FIXNUM_POS_MAX | UINT8 | UINT16 | UINT32 => ValueKind::UInt,
            FIXNUM_NEG_MIN..=FIXNUM_NEG_MAX | INT8 | INT16 | INT32 => ValueKind::Int,
            FIXMAP_MIN..=FIXMAP_MAX | MAP16 => ValueKind::Map,
            FIXARRAY_MIN..=FIXARRAY_MAX | ARRAY16 => ValueKind::Array,
            FIXRAW_MIN..=FIXRAW_MAX | RAW16 | RAW32 => ValueKind::Raw,
            NIL => ValueKind::Nil,
            FALSE | TRUE => ValueKind::Bool,
            FLOAT => ValueKind::Float,
            DOUBLE | UINT64 | INT64 | ARRAY32 | MAP32 => ValueKind::Unsupported,
            _ => ValueKind::Unknown,
        }
    }

    /// True for array and map headers
    pub fn is_compound(self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Map)
    }
}

/// One decoded item
///
/// Arrays and maps carry only their declared count; the elements follow
/// in the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    UInt(u32),
    Int(i32),
    Float(f32),
    Raw(&'a [u8]),
    Array(u16),
    Map(u16),
}
