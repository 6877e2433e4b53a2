//! # Canonical Byte Stream
//!
//! Append-only writer producing the exact bytes the network hashes.
//!
//! ## Encoding Rules
//!
//! | Value | Encoding |
//! |-------|----------|
//! | byte / raw bytes | as is |
//! | signed integers | little-endian, by repeated truncating division by 256 |
//! | unsigned integers | little-endian |
//! | nullable | `0x00`, or `0x01` followed by the value |
//! | list | count byte (at most 255), then each element |
//!
//! Signed values follow the division rule even when negative, so `-1i16`
//! encodes as `ff 00` rather than two's complement `ff ff`.

use crate::domain::errors::StreamError;

/// Maximum element count of a counted list.
pub const MAX_LIST_LENGTH: usize = u8::MAX as usize;

/// A value with a canonical binary form.
pub trait ByteStreamer {
    /// Append the canonical bytes of `self` to `stream`.
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError>;
}

/// Growable append-only byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteStream {
    buffer: Vec<u8>,
}

macro_rules! write_signed {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Write an `", stringify!($ty), "` little-endian by repeated division.")]
        pub fn $name(&mut self, value: $ty) {
            let mut value = value;
            for _ in 0..std::mem::size_of::<$ty>() {
                self.buffer.push((value % 256) as u8);
                value /= 256;
            }
        }
    };
}

impl ByteStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    write_signed!(write_i64, i64);
    write_signed!(write_i32, i32);
    write_signed!(write_i16, i16);

    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a presence flag, then the value if present.
    pub fn write_nullable<T: ByteStreamer + ?Sized>(
        &mut self,
        value: Option<&T>,
    ) -> Result<(), StreamError> {
        match value {
            None => {
                self.write_byte(0);
                Ok(())
            }
            Some(value) => {
                self.write_byte(1);
                value.write_to(self)
            }
        }
    }

    /// Write a one-byte count followed by every element.
    pub fn write_list<T: ByteStreamer>(&mut self, items: &[T]) -> Result<(), StreamError> {
        let count = u8::try_from(items.len()).map_err(|_| StreamError::ListTooLong(items.len()))?;
        self.write_byte(count);
        for item in items {
            item.write_to(self)?;
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Canonical bytes of `value`.
pub fn serialize<T: ByteStreamer + ?Sized>(value: &T) -> Result<Vec<u8>, StreamError> {
    let mut stream = ByteStream::with_capacity(256);
    value.write_to(&mut stream)?;
    Ok(stream.into_bytes())
}
