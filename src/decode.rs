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

//! The decode side of the primitive wire codec.
//!
//! [`Decoder`] parses wire bytes from a complete in-memory slice back into
//! semantic values. Each typed read classifies the next tag byte and fails
//! with [`DecodeError::TypeMismatch`], without advancing the position, when
//! the tag names a different kind than the caller requested. This is the
//! primary type-safety enforcement point: the format itself carries no
//! type information at the container level.
//!
//! Integer reads accept any valid encoding whose value fits the requested
//! type, so a `u8` written by a sloppy encoder as a 64-bit form still reads
//! back. Container begins push a frame onto an explicit stack; the
//! matching end call verifies that the declared element count was consumed
//! and credits the closed container as one element of its parent.
//!
//! The same low-level routines back the incremental parser in the
//! [`stream`](../stream/index.html) module; there, a read that runs past
//! the available input surfaces as the `InsufficientInput` suspend signal
//! instead of an error.
//!
//! [`Decoder`]: struct.Decoder.html
//! [`DecodeError::TypeMismatch`]: ../error/enum.DecodeError.html#variant.TypeMismatch

use byteorder::{BigEndian, ByteOrder};
use smallvec::SmallVec;

use std::str;

use crate::{error::DecodeError, error::WireKind, marker::Marker, value::Value};

/// Container kind tracked by a parser frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    /// An array frame.
    Array,
    /// A map frame; element slots count keys and values separately.
    Map,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    remaining: usize,
}

/// A non-consuming reader over a byte slice.
///
/// The position advances only when a read is fully satisfied, which makes
/// every read idempotent under "retry with more bytes appended": a failed
/// read reports `InsufficientInput` and leaves the cursor untouched.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    /// Offset of `input[0]` within the logical stream, for error reporting.
    base: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self::with_base(input, 0)
    }

    pub(crate) fn with_base(input: &'a [u8], base: usize) -> Self {
        Self { input, pos: 0, base }
    }

    /// Position within the input slice.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Absolute offset within the logical stream.
    pub(crate) fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.input.len() - self.pos;
        if available < len {
            return Err(DecodeError::InsufficientInput {
                needed: len - available,
            });
        }
        let bytes = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_u8(&mut self) -> Result<u8, DecodeError> {
        self.take(1).map(|bytes| bytes[0])
    }

    fn take_u16(&mut self) -> Result<u16, DecodeError> {
        self.take(2).map(BigEndian::read_u16)
    }

    fn take_u32(&mut self) -> Result<u32, DecodeError> {
        self.take(4).map(BigEndian::read_u32)
    }

    fn take_u64(&mut self) -> Result<u64, DecodeError> {
        self.take(8).map(BigEndian::read_u64)
    }

    /// Reads and classifies the next tag byte. The reserved byte `0xc1`
    /// is rejected here, so downstream code never sees it.
    fn take_marker(&mut self) -> Result<Marker, DecodeError> {
        let at = self.offset();
        let byte = self.take_u8()?;
        match Marker::from_u8(byte) {
            Marker::Reserved => Err(DecodeError::Malformed { byte, offset: at }),
            marker => Ok(marker),
        }
    }
}

/// One parse step: either a complete scalar or a container opening.
#[derive(Debug)]
pub(crate) enum Token {
    /// A complete scalar value.
    Scalar(Value),
    /// An array header declaring this many elements.
    ArrayBegin(usize),
    /// A map header declaring this many key/value pairs.
    MapBegin(usize),
}

/// Reads one token, consuming input only if the whole token is available.
pub(crate) fn next_token(cur: &mut Cursor<'_>) -> Result<Token, DecodeError> {
    let mut probe = *cur;
    let at = probe.offset();
    let marker = probe.take_marker()?;
    let token = match marker {
        Marker::Nil => Token::Scalar(Value::Nil),
        Marker::False => Token::Scalar(Value::Bool(false)),
        Marker::True => Token::Scalar(Value::Bool(true)),
        Marker::FixPos(value) => Token::Scalar(Value::Int(i64::from(value))),
        Marker::FixNeg(value) => Token::Scalar(Value::Int(i64::from(value))),
        Marker::U8 => Token::Scalar(Value::Int(i64::from(probe.take_u8()?))),
        Marker::U16 => Token::Scalar(Value::Int(i64::from(probe.take_u16()?))),
        Marker::U32 => Token::Scalar(Value::Int(i64::from(probe.take_u32()?))),
        Marker::U64 => Token::Scalar(Value::from_u64(probe.take_u64()?)),
        Marker::I8 => Token::Scalar(Value::Int(i64::from(probe.take_u8()? as i8))),
        Marker::I16 => Token::Scalar(Value::Int(i64::from(probe.take_u16()? as i16))),
        Marker::I32 => Token::Scalar(Value::Int(i64::from(probe.take_u32()? as i32))),
        Marker::I64 => Token::Scalar(Value::Int(probe.take_u64()? as i64)),
        Marker::F32 => Token::Scalar(Value::F32(f32::from_bits(probe.take_u32()?))),
        Marker::F64 => Token::Scalar(Value::F64(f64::from_bits(probe.take_u64()?))),
        Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => {
            // Re-parse from the tag so the string reader owns the length logic.
            let value = read_str_at(cur)?;
            return Ok(Token::Scalar(Value::Str(value.to_owned())));
        }
        Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => {
            let bytes = read_bin_at(cur)?;
            return Ok(Token::Scalar(Value::Bin(bytes.to_vec())));
        }
        Marker::FixArray(len) => Token::ArrayBegin(usize::from(len)),
        Marker::Array16 => Token::ArrayBegin(usize::from(probe.take_u16()?)),
        Marker::Array32 => Token::ArrayBegin(probe.take_u32()? as usize),
        Marker::FixMap(len) => Token::MapBegin(usize::from(len)),
        Marker::Map16 => Token::MapBegin(usize::from(probe.take_u16()?)),
        Marker::Map32 => Token::MapBegin(probe.take_u32()? as usize),
        Marker::Ext8
        | Marker::Ext16
        | Marker::Ext32
        | Marker::FixExt1
        | Marker::FixExt2
        | Marker::FixExt4
        | Marker::FixExt8
        | Marker::FixExt16 => {
            return Err(DecodeError::Unsupported {
                kind: WireKind::Ext,
                offset: at,
            });
        }
        Marker::Reserved => unreachable!("rejected by take_marker"),
    };
    *cur = probe;
    Ok(token)
}

/// Reads a complete string (tag, length, payload), committing the cursor
/// only on success.
fn read_str_at<'a>(cur: &mut Cursor<'a>) -> Result<&'a str, DecodeError> {
    let mut probe = *cur;
    let at = probe.offset();
    let len = match probe.take_marker()? {
        Marker::FixStr(len) => usize::from(len),
        Marker::Str8 => usize::from(probe.take_u8()?),
        Marker::Str16 => usize::from(probe.take_u16()?),
        Marker::Str32 => probe.take_u32()? as usize,
        other => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Str,
                found: other.kind(),
                offset: at,
            });
        }
    };
    let payload_at = probe.offset();
    let bytes = probe.take(len)?;
    let value = str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset: payload_at })?;
    *cur = probe;
    Ok(value)
}

/// Reads a complete binary blob, also accepting the string forms since
/// old-format writers emit raw data under the string tags.
fn read_bin_at<'a>(cur: &mut Cursor<'a>) -> Result<&'a [u8], DecodeError> {
    let mut probe = *cur;
    let at = probe.offset();
    let len = match probe.take_marker()? {
        Marker::Bin8 => usize::from(probe.take_u8()?),
        Marker::Bin16 => usize::from(probe.take_u16()?),
        Marker::Bin32 => probe.take_u32()? as usize,
        Marker::FixStr(len) => usize::from(len),
        Marker::Str8 => usize::from(probe.take_u8()?),
        Marker::Str16 => usize::from(probe.take_u16()?),
        Marker::Str32 => probe.take_u32()? as usize,
        other => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Bin,
                found: other.kind(),
                offset: at,
            });
        }
    };
    let bytes = probe.take(len)?;
    *cur = probe;
    Ok(bytes)
}

/// Reads an integer of any width as `i64`, committing only on success.
fn read_i64_at(cur: &mut Cursor<'_>) -> Result<i64, DecodeError> {
    let mut probe = *cur;
    let at = probe.offset();
    let value = match next_token(&mut probe)? {
        Token::Scalar(Value::Int(value)) => value,
        Token::Scalar(Value::Uint(_)) => {
            return Err(DecodeError::IntegerOutOfRange { offset: at });
        }
        Token::Scalar(other) => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Int,
                found: other.kind(),
                offset: at,
            });
        }
        Token::ArrayBegin(_) => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Int,
                found: WireKind::Array,
                offset: at,
            });
        }
        Token::MapBegin(_) => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Int,
                found: WireKind::Map,
                offset: at,
            });
        }
    };
    *cur = probe;
    Ok(value)
}

/// Reads an integer of any width as `u64`, committing only on success.
fn read_u64_at(cur: &mut Cursor<'_>) -> Result<u64, DecodeError> {
    let mut probe = *cur;
    let at = probe.offset();
    let value = match next_token(&mut probe)? {
        Token::Scalar(Value::Int(value)) if value >= 0 => value as u64,
        Token::Scalar(Value::Int(_)) => {
            return Err(DecodeError::IntegerOutOfRange { offset: at });
        }
        Token::Scalar(Value::Uint(value)) => value,
        Token::Scalar(other) => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Int,
                found: other.kind(),
                offset: at,
            });
        }
        Token::ArrayBegin(_) => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Int,
                found: WireKind::Array,
                offset: at,
            });
        }
        Token::MapBegin(_) => {
            return Err(DecodeError::TypeMismatch {
                expected: WireKind::Int,
                found: WireKind::Map,
                offset: at,
            });
        }
    };
    *cur = probe;
    Ok(value)
}

/// Parser of wire bytes from a complete in-memory slice.
///
/// For input arriving in chunks, use [`StreamDecoder`] instead; here, input
/// running out mid-value is a fatal [`UnexpectedEof`] since the decoder was
/// promised the full encoding up front.
///
/// [`StreamDecoder`]: ../struct.StreamDecoder.html
/// [`UnexpectedEof`]: ../error/enum.DecodeError.html#variant.UnexpectedEof
#[derive(Debug)]
pub struct Decoder<'a> {
    cur: Cursor<'a>,
    stack: SmallVec<[Frame; 8]>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over a complete encoded byte sequence.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            cur: Cursor::new(input),
            stack: SmallVec::new(),
        }
    }

    /// Current byte offset within the input.
    pub fn position(&self) -> usize {
        self.cur.pos()
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.cur.input.len() - self.cur.pos()
    }

    /// Offset just past the last input byte, reported on hard EOF.
    fn eof_offset(&self) -> usize {
        self.cur.base + self.cur.input.len()
    }

    /// The kind of the next value, without consuming anything.
    pub fn peek_kind(&self) -> Result<WireKind, DecodeError> {
        let eof = self.eof_offset();
        let mut probe = self.cur;
        probe.take_marker().map(Marker::kind).map_err(|err| map_eof(err, eof))
    }

    /// Reads the nil value.
    pub fn read_nil(&mut self) -> Result<(), DecodeError> {
        self.read_scalar(WireKind::Nil, |value| match value {
            Value::Nil => Some(()),
            _ => None,
        })
    }

    /// Reads a boolean.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        self.read_scalar(WireKind::Bool, Value::as_bool)
    }

    /// Reads an integer of any valid width as `i64`.
    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.commit(|cur| read_i64_at(cur))
    }

    /// Reads an integer of any valid width as `u64`.
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.commit(|cur| read_u64_at(cur))
    }

    /// Reads an integer that fits into `i8`.
    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        let at = self.position();
        let value = self.read_i64()?;
        cast_int(value, at).map_err(|err| self.rewind(at, err))
    }

    /// Reads an integer that fits into `i16`.
    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        let at = self.position();
        let value = self.read_i64()?;
        cast_int(value, at).map_err(|err| self.rewind(at, err))
    }

    /// Reads an integer that fits into `i32`.
    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let at = self.position();
        let value = self.read_i64()?;
        cast_int(value, at).map_err(|err| self.rewind(at, err))
    }

    /// Reads an integer that fits into `u8`.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let at = self.position();
        let value = self.read_u64()?;
        cast_uint(value, at).map_err(|err| self.rewind(at, err))
    }

    /// Reads an integer that fits into `u16`.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let at = self.position();
        let value = self.read_u64()?;
        cast_uint(value, at).map_err(|err| self.rewind(at, err))
    }

    /// Reads an integer that fits into `u32`.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let at = self.position();
        let value = self.read_u64()?;
        cast_uint(value, at).map_err(|err| self.rewind(at, err))
    }

    /// Reads a 32-bit float. Strict: a 64-bit float on the wire is a
    /// mismatch, since narrowing would lose precision silently.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_scalar(WireKind::Float, |value| match value {
            Value::F32(value) => Some(*value),
            _ => None,
        })
    }

    /// Reads a float of either width as `f64`; widening a 32-bit float
    /// is lossless.
    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.read_scalar(WireKind::Float, Value::as_f64)
    }

    /// Reads a string, borrowing the payload from the input.
    pub fn read_str(&mut self) -> Result<&'a str, DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let value = read_str_at(&mut probe).map_err(|err| map_eof(err, eof))?;
        self.cur = probe;
        self.complete_element();
        Ok(value)
    }

    /// Reads a binary blob, borrowing the payload from the input.
    /// Also accepts string-tagged payloads (old-format raw data).
    pub fn read_bin(&mut self) -> Result<&'a [u8], DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let bytes = read_bin_at(&mut probe).map_err(|err| map_eof(err, eof))?;
        self.cur = probe;
        self.complete_element();
        Ok(bytes)
    }

    /// Reads an array header and opens a container frame expecting the
    /// declared number of elements.
    pub fn read_array_begin(&mut self) -> Result<usize, DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let at = probe.offset();
        match next_token(&mut probe).map_err(|err| map_eof(err, eof))? {
            Token::ArrayBegin(len) => {
                self.cur = probe;
                self.stack.push(Frame {
                    kind: ContainerKind::Array,
                    remaining: len,
                });
                Ok(len)
            }
            Token::MapBegin(_) => Err(DecodeError::TypeMismatch {
                expected: WireKind::Array,
                found: WireKind::Map,
                offset: at,
            }),
            Token::Scalar(other) => Err(DecodeError::TypeMismatch {
                expected: WireKind::Array,
                found: other.kind(),
                offset: at,
            }),
        }
    }

    /// Closes the innermost array. Verifies that the declared element
    /// count was fully consumed; the closed array then counts as one
    /// element of its parent.
    pub fn read_array_end(&mut self) -> Result<(), DecodeError> {
        self.end_container(ContainerKind::Array)
    }

    /// Reads a map header and opens a container frame expecting twice the
    /// declared number of entries (keys and values alternate).
    pub fn read_map_begin(&mut self) -> Result<usize, DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let at = probe.offset();
        match next_token(&mut probe).map_err(|err| map_eof(err, eof))? {
            Token::MapBegin(len) => {
                let slots = len.checked_mul(2).ok_or(DecodeError::Malformed {
                    byte: self.cur.input[self.cur.pos()],
                    offset: at,
                })?;
                self.cur = probe;
                self.stack.push(Frame {
                    kind: ContainerKind::Map,
                    remaining: slots,
                });
                Ok(len)
            }
            Token::ArrayBegin(_) => Err(DecodeError::TypeMismatch {
                expected: WireKind::Map,
                found: WireKind::Array,
                offset: at,
            }),
            Token::Scalar(other) => Err(DecodeError::TypeMismatch {
                expected: WireKind::Map,
                found: other.kind(),
                offset: at,
            }),
        }
    }

    /// Closes the innermost map, symmetric to [`read_array_end`].
    ///
    /// [`read_array_end`]: #method.read_array_end
    pub fn read_map_end(&mut self) -> Result<(), DecodeError> {
        self.end_container(ContainerKind::Map)
    }

    /// Reads the next value, whatever its kind, as a generic tree.
    ///
    /// This is the fallback for data without a registered template; the
    /// resulting [`Value`](../enum.Value.html) is self-contained.
    pub fn read_value(&mut self) -> Result<Value, DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let value = read_value_at(&mut probe).map_err(|err| map_eof(err, eof))?;
        self.cur = probe;
        self.complete_element();
        Ok(value)
    }

    /// Verifies that the input is fully consumed and no container is open.
    pub fn finish(self) -> Result<(), DecodeError> {
        if !self.stack.is_empty() {
            return Err(DecodeError::UnexpectedEof {
                offset: self.cur.offset(),
            });
        }
        if self.remaining() > 0 {
            return Err(DecodeError::TrailingBytes {
                remaining: self.remaining(),
                offset: self.cur.offset(),
            });
        }
        Ok(())
    }

    /// Runs a cursor-level read, converting the incremental-input signal
    /// into the fatal EOF error appropriate for complete-slice parsing.
    fn commit<T>(
        &mut self,
        read: impl FnOnce(&mut Cursor<'a>) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let value = read(&mut probe).map_err(|err| map_eof(err, eof))?;
        self.cur = probe;
        self.complete_element();
        Ok(value)
    }

    fn read_scalar<T>(
        &mut self,
        expected: WireKind,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T, DecodeError> {
        self.ensure_slot()?;
        let eof = self.eof_offset();
        let mut probe = self.cur;
        let at = probe.offset();
        let token = next_token(&mut probe).map_err(|err| map_eof(err, eof))?;
        let found = match &token {
            Token::Scalar(value) => {
                if let Some(extracted) = extract(value) {
                    self.cur = probe;
                    self.complete_element();
                    return Ok(extracted);
                }
                value.kind()
            }
            Token::ArrayBegin(_) => WireKind::Array,
            Token::MapBegin(_) => WireKind::Map,
        };
        Err(DecodeError::TypeMismatch {
            expected,
            found,
            offset: at,
        })
    }

    /// Fails if the enclosing container has no element slots left.
    fn ensure_slot(&self) -> Result<(), DecodeError> {
        match self.stack.last() {
            Some(frame) if frame.remaining == 0 => Err(DecodeError::ExtraElements {
                offset: self.cur.offset(),
            }),
            _ => Ok(()),
        }
    }

    /// Credits one element to the enclosing container, if any.
    fn complete_element(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            debug_assert!(frame.remaining > 0);
            frame.remaining -= 1;
        }
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<(), DecodeError> {
        let offset = self.cur.offset();
        let frame = match self.stack.last() {
            Some(frame) if frame.kind == kind => *frame,
            _ => return Err(DecodeError::MismatchedEnd { offset }),
        };
        if frame.remaining > 0 {
            return Err(DecodeError::UnfinishedContainer {
                remaining: frame.remaining,
                offset,
            });
        }
        self.stack.pop();
        self.complete_element();
        Ok(())
    }

    fn rewind(&mut self, position: usize, err: DecodeError) -> DecodeError {
        // Narrowing reads roll the consumed integer back so a mismatching
        // read does not advance the stream.
        self.cur.pos = position;
        if let Some(frame) = self.stack.last_mut() {
            frame.remaining += 1;
        }
        err
    }
}

/// Recursive generic-tree read over a cursor. Used by `Decoder::read_value`;
/// the streaming parser builds trees iteratively instead, so recursion
/// depth here is bounded by the caller's own nesting.
fn read_value_at(cur: &mut Cursor<'_>) -> Result<Value, DecodeError> {
    let mut probe = *cur;
    let value = match next_token(&mut probe)? {
        Token::Scalar(value) => value,
        Token::ArrayBegin(len) => {
            let mut elements = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                elements.push(read_value_at(&mut probe)?);
            }
            Value::Array(elements)
        }
        Token::MapBegin(len) => {
            let mut entries = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                let key = read_value_at(&mut probe)?;
                let value = read_value_at(&mut probe)?;
                entries.push((key, value));
            }
            Value::Map(entries)
        }
    };
    *cur = probe;
    Ok(value)
}

/// Cap on speculative preallocation from untrusted length headers.
const PREALLOC_LIMIT: usize = 1 << 16;

fn cast_int<T: std::convert::TryFrom<i64>>(value: i64, offset: usize) -> Result<T, DecodeError> {
    T::try_from(value).map_err(|_| DecodeError::IntegerOutOfRange { offset })
}

fn cast_uint<T: std::convert::TryFrom<u64>>(value: u64, offset: usize) -> Result<T, DecodeError> {
    T::try_from(value).map_err(|_| DecodeError::IntegerOutOfRange { offset })
}

/// A complete-slice decoder never suspends: shortfalls become hard EOFs.
fn map_eof(err: DecodeError, eof_offset: usize) -> DecodeError {
    match err {
        DecodeError::InsufficientInput { .. } => DecodeError::UnexpectedEof { offset: eof_offset },
        other => other,
    }
}
