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

//! An append-only output buffer with caller-controlled growth.

use byteorder::{BigEndian, ByteOrder};

use std::fmt;

use crate::error::EncodeError;

/// Default initial capacity used by [`WriteBuffer::doubling`] and the
/// encoder facade.
///
/// [`WriteBuffer::doubling`]: struct.WriteBuffer.html#method.doubling
pub const DEFAULT_CAPACITY: usize = 1024;

/// Expansion strategy invoked when a growable buffer runs out of capacity.
///
/// Receives the currently written region and the number of additional bytes
/// required, and returns a replacement buffer whose capacity is at least
/// `written.len() + additional`. The sink copies the written bytes into the
/// replacement itself and releases the old allocation; any contents of the
/// returned buffer are discarded.
pub type GrowStrategy = Box<dyn FnMut(&[u8], usize) -> Vec<u8> + Send>;

/// An append-only byte sink over exactly one owned backing buffer.
///
/// A `WriteBuffer` either has fixed capacity (writes beyond it fail with
/// [`EncodeError::BufferOverflow`]) or grows through a caller-supplied
/// [`GrowStrategy`]. The backing buffer identity may change across any
/// [`reserve`], so callers must never hold a view obtained before a
/// reservation.
///
/// Partial writes are not rolled back: after a failed reservation the
/// already-written prefix is intact, but the sink must be discarded.
///
/// [`EncodeError::BufferOverflow`]: enum.EncodeError.html#variant.BufferOverflow
/// [`GrowStrategy`]: type.GrowStrategy.html
/// [`reserve`]: #method.reserve
pub struct WriteBuffer {
    buf: Vec<u8>,
    grow: Option<GrowStrategy>,
}

impl WriteBuffer {
    /// Creates a sink with a fixed capacity and no growth strategy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            grow: None,
        }
    }

    /// Creates a growable sink with the given initial capacity.
    pub fn growable<F>(capacity: usize, strategy: F) -> Self
    where
        F: FnMut(&[u8], usize) -> Vec<u8> + Send + 'static,
    {
        Self {
            buf: Vec::with_capacity(capacity),
            grow: Some(Box::new(strategy)),
        }
    }

    /// Creates a growable sink that doubles its capacity on overflow.
    pub fn doubling(capacity: usize) -> Self {
        Self::growable(capacity, |written, additional| {
            let required = written.len() + additional;
            let mut capacity = written.len().max(DEFAULT_CAPACITY);
            while capacity < required {
                capacity *= 2;
            }
            Vec::with_capacity(capacity)
        })
    }

    /// Guarantees that at least `additional` more bytes can be appended.
    ///
    /// Invokes the growth strategy when the remaining capacity is
    /// insufficient; without a strategy, fails with `BufferOverflow`.
    pub fn reserve(&mut self, additional: usize) -> Result<(), EncodeError> {
        if self.remaining() >= additional {
            return Ok(());
        }
        let overflow = EncodeError::BufferOverflow {
            capacity: self.buf.capacity(),
            required: additional,
        };
        let grow = match self.grow.as_mut() {
            Some(grow) => grow,
            None => return Err(overflow),
        };
        let mut replacement = grow(&self.buf, additional);
        if replacement.capacity() < self.buf.len() + additional {
            return Err(overflow);
        }
        replacement.clear();
        replacement.extend_from_slice(&self.buf);
        self.buf = replacement;
        Ok(())
    }

    /// Appends a byte slice.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.reserve(1)?;
        self.buf.push(value);
        Ok(())
    }

    /// Appends a 16-bit unsigned integer in big-endian byte order.
    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        let mut bytes = [0_u8; 2];
        BigEndian::write_u16(&mut bytes, value);
        self.write(&bytes)
    }

    /// Appends a 32-bit unsigned integer in big-endian byte order.
    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        let mut bytes = [0_u8; 4];
        BigEndian::write_u32(&mut bytes, value);
        self.write(&bytes)
    }

    /// Appends a 64-bit unsigned integer in big-endian byte order.
    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        let mut bytes = [0_u8; 8];
        BigEndian::write_u64(&mut bytes, value);
        self.write(&bytes)
    }

    /// Appends a 32-bit float in big-endian byte order.
    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        let mut bytes = [0_u8; 4];
        BigEndian::write_f32(&mut bytes, value);
        self.write(&bytes)
    }

    /// Appends a 64-bit float in big-endian byte order.
    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        let mut bytes = [0_u8; 8];
        BigEndian::write_f64(&mut bytes, value);
        self.write(&bytes)
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity of the current backing buffer.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Remaining capacity before the next growth or overflow.
    pub fn remaining(&self) -> usize {
        self.buf.capacity() - self.buf.len()
    }

    /// View of the written region. Invalidated by the next `reserve`.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the sink, returning the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl fmt::Debug for WriteBuffer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("WriteBuffer")
            .field("len", &self.buf.len())
            .field("capacity", &self.buf.capacity())
            .field("growable", &self.grow.is_some())
            .finish()
    }
}
