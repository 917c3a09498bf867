// Copyright 2020 The Wirepack Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The encode side of the primitive wire codec.
//!
//! [`Encoder`] serializes semantic values into tagged wire bytes. Integers
//! always take the most compact representation their magnitude allows;
//! this width escalation is part of the format and is required for
//! interoperability with other implementations.
//!
//! Container headers carry only the element count. After
//! [`write_array_begin(n)`] the caller must write exactly `n` values
//! (`2 * n` for maps) followed by the matching `*_end` call; the end calls
//! emit no bytes and exist as bookends mirroring the decode side.
//!
//! [`Encoder`]: struct.Encoder.html
//! [`write_array_begin(n)`]: struct.Encoder.html#method.write_array_begin

use crate::{
    buffer::{WriteBuffer, DEFAULT_CAPACITY},
    error::EncodeError,
    marker::Marker,
    value::Value,
};

const MAX_FIX_STR: usize = 31;
const MAX_FIX_CONTAINER: usize = 15;

/// Serializer of semantic values into wire bytes.
#[derive(Debug)]
pub struct Encoder {
    buf: WriteBuffer,
}

impl Encoder {
    /// Creates an encoder over a growable buffer with doubling growth.
    pub fn new() -> Self {
        Self::with_buffer(WriteBuffer::doubling(DEFAULT_CAPACITY))
    }

    /// Creates an encoder over the supplied sink.
    ///
    /// The sink is exclusively owned by this encoder for the duration of
    /// the write session.
    pub fn with_buffer(buf: WriteBuffer) -> Self {
        Self { buf }
    }

    /// Writes the nil value.
    pub fn write_nil(&mut self) -> Result<(), EncodeError> {
        self.buf.write_u8(Marker::Nil.to_u8())
    }

    /// Writes a boolean.
    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        let marker = if value { Marker::True } else { Marker::False };
        self.buf.write_u8(marker.to_u8())
    }

    /// Writes an unsigned integer in its most compact representation.
    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        if value < 0x80 {
            self.buf.write_u8(value as u8)
        } else if value <= u64::from(u8::max_value()) {
            self.buf.write_u8(Marker::U8.to_u8())?;
            self.buf.write_u8(value as u8)
        } else if value <= u64::from(u16::max_value()) {
            self.buf.write_u8(Marker::U16.to_u8())?;
            self.buf.write_u16(value as u16)
        } else if value <= u64::from(u32::max_value()) {
            self.buf.write_u8(Marker::U32.to_u8())?;
            self.buf.write_u32(value as u32)
        } else {
            self.buf.write_u8(Marker::U64.to_u8())?;
            self.buf.write_u64(value)
        }
    }

    /// Writes a signed integer in its most compact representation.
    ///
    /// Non-negative values use the unsigned forms, so the same integer
    /// always encodes to the same bytes regardless of the source type.
    pub fn write_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        if value >= 0 {
            self.write_u64(value as u64)
        } else if value >= -32 {
            self.buf.write_u8(value as u8)
        } else if value >= i64::from(i8::min_value()) {
            self.buf.write_u8(Marker::I8.to_u8())?;
            self.buf.write_u8(value as u8)
        } else if value >= i64::from(i16::min_value()) {
            self.buf.write_u8(Marker::I16.to_u8())?;
            self.buf.write_u16(value as u16)
        } else if value >= i64::from(i32::min_value()) {
            self.buf.write_u8(Marker::I32.to_u8())?;
            self.buf.write_u32(value as u32)
        } else {
            self.buf.write_u8(Marker::I64.to_u8())?;
            self.buf.write_u64(value as u64)
        }
    }

    /// Writes an 8-bit unsigned integer.
    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.write_u64(u64::from(value))
    }

    /// Writes a 16-bit unsigned integer.
    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_u64(u64::from(value))
    }

    /// Writes a 32-bit unsigned integer.
    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        self.write_u64(u64::from(value))
    }

    /// Writes an 8-bit signed integer.
    pub fn write_i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.write_i64(i64::from(value))
    }

    /// Writes a 16-bit signed integer.
    pub fn write_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        self.write_i64(i64::from(value))
    }

    /// Writes a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        self.write_i64(i64::from(value))
    }

    /// Writes a 32-bit float.
    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        self.buf.write_u8(Marker::F32.to_u8())?;
        self.buf.write_f32(value)
    }

    /// Writes a 64-bit float.
    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        self.buf.write_u8(Marker::F64.to_u8())?;
        self.buf.write_f64(value)
    }

    /// Writes a length-prefixed UTF-8 string. No terminator is emitted.
    pub fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        let bytes = value.as_bytes();
        let len = bytes.len();
        if len <= MAX_FIX_STR {
            self.buf.write_u8(Marker::FixStr(len as u8).to_u8())?;
        } else if len <= usize::from(u8::max_value()) {
            self.buf.write_u8(Marker::Str8.to_u8())?;
            self.buf.write_u8(len as u8)?;
        } else if len <= usize::from(u16::max_value()) {
            self.buf.write_u8(Marker::Str16.to_u8())?;
            self.buf.write_u16(len as u16)?;
        } else if len <= u32::max_value() as usize {
            self.buf.write_u8(Marker::Str32.to_u8())?;
            self.buf.write_u32(len as u32)?;
        } else {
            return Err(EncodeError::LengthOverflow { length: len });
        }
        self.buf.write(bytes)
    }

    /// Writes a length-prefixed binary blob. No terminator is emitted.
    pub fn write_bin(&mut self, value: &[u8]) -> Result<(), EncodeError> {
        let len = value.len();
        if len <= usize::from(u8::max_value()) {
            self.buf.write_u8(Marker::Bin8.to_u8())?;
            self.buf.write_u8(len as u8)?;
        } else if len <= usize::from(u16::max_value()) {
            self.buf.write_u8(Marker::Bin16.to_u8())?;
            self.buf.write_u16(len as u16)?;
        } else if len <= u32::max_value() as usize {
            self.buf.write_u8(Marker::Bin32.to_u8())?;
            self.buf.write_u32(len as u32)?;
        } else {
            return Err(EncodeError::LengthOverflow { length: len });
        }
        self.buf.write(value)
    }

    /// Writes an array header declaring `len` elements.
    ///
    /// The caller must write exactly `len` values before the matching
    /// [`write_array_end`](#method.write_array_end).
    pub fn write_array_begin(&mut self, len: usize) -> Result<(), EncodeError> {
        if len <= MAX_FIX_CONTAINER {
            self.buf.write_u8(Marker::FixArray(len as u8).to_u8())
        } else if len <= usize::from(u16::max_value()) {
            self.buf.write_u8(Marker::Array16.to_u8())?;
            self.buf.write_u16(len as u16)
        } else if len <= u32::max_value() as usize {
            self.buf.write_u8(Marker::Array32.to_u8())?;
            self.buf.write_u32(len as u32)
        } else {
            Err(EncodeError::LengthOverflow { length: len })
        }
    }

    /// Closes an array. Emits no bytes; the format has no end marker.
    pub fn write_array_end(&mut self) -> Result<(), EncodeError> {
        Ok(())
    }

    /// Writes a map header declaring `len` key/value pairs.
    ///
    /// The caller must write exactly `2 * len` values (keys and values
    /// alternating) before the matching [`write_map_end`](#method.write_map_end).
    pub fn write_map_begin(&mut self, len: usize) -> Result<(), EncodeError> {
        if len <= MAX_FIX_CONTAINER {
            self.buf.write_u8(Marker::FixMap(len as u8).to_u8())
        } else if len <= usize::from(u16::max_value()) {
            self.buf.write_u8(Marker::Map16.to_u8())?;
            self.buf.write_u16(len as u16)
        } else if len <= u32::max_value() as usize {
            self.buf.write_u8(Marker::Map32.to_u8())?;
            self.buf.write_u32(len as u32)
        } else {
            Err(EncodeError::LengthOverflow { length: len })
        }
    }

    /// Closes a map. Emits no bytes; the format has no end marker.
    pub fn write_map_end(&mut self) -> Result<(), EncodeError> {
        Ok(())
    }

    /// Writes a generic value tree, recursively delegating per kind.
    pub fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(value) => self.write_bool(*value),
            Value::Int(value) => self.write_i64(*value),
            Value::Uint(value) => self.write_u64(*value),
            Value::F32(value) => self.write_f32(*value),
            Value::F64(value) => self.write_f64(*value),
            Value::Str(value) => self.write_str(value),
            Value::Bin(value) => self.write_bin(value),
            Value::Array(elements) => {
                self.write_array_begin(elements.len())?;
                for element in elements {
                    self.write_value(element)?;
                }
                self.write_array_end()
            }
            Value::Map(entries) => {
                self.write_map_begin(entries.len())?;
                for (key, value) in entries {
                    self.write_value(key)?;
                    self.write_value(value)?;
                }
                self.write_map_end()
            }
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View of the encoded bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Consumes the encoder, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_vec()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
