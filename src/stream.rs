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

//! Incremental decoding of byte streams that arrive in chunks.
//!
//! [`StreamDecoder`] accepts whatever bytes the caller currently has and
//! parses as far as they allow. When the next primitive needs more bytes
//! than are buffered, [`next_value`] returns `Ok(None)`: nothing past the
//! parse frontier is consumed, the explicit stack of container frames is
//! preserved, and the identical call can be retried after another
//! [`feed`]. The frame stack is the saved continuation, so no thread is
//! blocked and no coroutine is involved; the caller drives all I/O.
//!
//! Feeding the encoding of a value in chunks, split at arbitrary byte
//! boundaries, yields the same result as decoding it in one piece.
//!
//! ```
//! use wirepack::{Encoder, StreamDecoder, Value};
//!
//! let mut encoder = Encoder::new();
//! encoder.write_array_begin(2).unwrap();
//! encoder.write_str("ping").unwrap();
//! encoder.write_u64(1).unwrap();
//! encoder.write_array_end().unwrap();
//! let bytes = encoder.into_bytes();
//!
//! let mut decoder = StreamDecoder::new();
//! let (head, tail) = bytes.split_at(3);
//! decoder.feed(head);
//! assert!(decoder.next_value().unwrap().is_none()); // suspended
//! decoder.feed(tail);
//! let value = decoder.next_value().unwrap().expect("complete value");
//! assert_eq!(value.as_array().unwrap().len(), 2);
//! ```
//!
//! [`StreamDecoder`]: struct.StreamDecoder.html
//! [`next_value`]: struct.StreamDecoder.html#method.next_value
//! [`feed`]: struct.StreamDecoder.html#method.feed

use bytes::{Buf, BytesMut};
use log::trace;
use smallvec::SmallVec;

use crate::{
    decode::{next_token, ContainerKind, Cursor, Token},
    error::DecodeError,
    value::Value,
};

/// An in-progress container being assembled by the incremental parser.
///
/// `expected` counts element slots, not entries: a map of `n` entries
/// occupies `2 * n` slots (keys and values alternate in `items`).
#[derive(Debug)]
struct StreamFrame {
    kind: ContainerKind,
    expected: usize,
    items: Vec<Value>,
}

impl StreamFrame {
    fn into_value(self) -> Value {
        match self.kind {
            ContainerKind::Array => Value::Array(self.items),
            ContainerKind::Map => {
                let mut entries = Vec::with_capacity(self.items.len() / 2);
                let mut items = self.items.into_iter();
                while let (Some(key), Some(value)) = (items.next(), items.next()) {
                    entries.push((key, value));
                }
                Value::Map(entries)
            }
        }
    }
}

/// Suspendable parser over a logically contiguous byte stream.
///
/// The decoder owns an accumulation buffer; [`feed`](#method.feed) appends
/// to it and [`next_value`](#method.next_value) consumes from it. Consumed
/// bytes are discarded eagerly, so memory usage is bounded by the size of
/// one buffered chunk plus the assembled partial value.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buf: BytesMut,
    /// Parse frontier within `buf`: bytes before it belong to tokens that
    /// are already materialized on the frame stack.
    pos: usize,
    /// Total bytes discarded from the front of `buf`, for absolute offsets.
    consumed: usize,
    stack: SmallVec<[StreamFrame; 8]>,
}

impl StreamDecoder {
    /// Creates an idle decoder with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of input to the accumulation buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Absolute offset of the parse frontier within the logical stream.
    pub fn offset(&self) -> usize {
        self.consumed + self.pos
    }

    /// Returns `true` when no partial value is pending and the buffer
    /// holds no unparsed bytes.
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty() && self.buf.is_empty()
    }

    /// Parses the next complete top-level value out of the buffered input.
    ///
    /// Returns `Ok(None)` when the buffered bytes end mid-value; this is
    /// the `InsufficientInput` control signal, not an error, and the call
    /// must be retried after more input is [`feed`](#method.feed)ed. A
    /// malformed tag is fatal and leaves the stream desynchronized.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        loop {
            let mut cur = Cursor::with_base(&self.buf[self.pos..], self.offset());
            match next_token(&mut cur) {
                Err(DecodeError::InsufficientInput { needed }) => {
                    trace!(
                        "suspending at offset {}: {} more bytes needed",
                        self.offset(),
                        needed
                    );
                    self.compact();
                    return Ok(None);
                }
                Err(err) => return Err(err),
                Ok(Token::Scalar(value)) => {
                    self.pos += cur.pos();
                    if let Some(finished) = self.complete(value) {
                        return Ok(Some(finished));
                    }
                }
                Ok(Token::ArrayBegin(len)) => {
                    self.pos += cur.pos();
                    if let Some(finished) = self.open(ContainerKind::Array, len)? {
                        return Ok(Some(finished));
                    }
                }
                Ok(Token::MapBegin(len)) => {
                    let at = self.offset();
                    let tag = self.buf[self.pos];
                    self.pos += cur.pos();
                    let slots = map_slots(len, tag, at)?;
                    if let Some(finished) = self.open(ContainerKind::Map, slots)? {
                        return Ok(Some(finished));
                    }
                }
            }
        }
    }

    /// Signals end-of-stream. Clean termination requires an empty stack
    /// and an empty buffer; anything else means the stream was cut off
    /// mid-value.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.stack.is_empty() && self.buf.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::UnexpectedEof {
                offset: self.offset(),
            })
        }
    }

    /// Opens a container frame, or completes it immediately when empty.
    fn open(&mut self, kind: ContainerKind, slots: usize) -> Result<Option<Value>, DecodeError> {
        let frame = StreamFrame {
            kind,
            expected: slots,
            items: Vec::with_capacity(slots.min(PREALLOC_LIMIT)),
        };
        if slots == 0 {
            return Ok(self.complete(frame.into_value()));
        }
        self.stack.push(frame);
        Ok(None)
    }

    /// Delivers a completed value to the innermost frame, cascading pops:
    /// a child container that fills its parent's last slot closes the
    /// parent as well, all the way up. Returns the value if it completed
    /// the outermost (top-level) one.
    fn complete(&mut self, value: Value) -> Option<Value> {
        let mut value = value;
        loop {
            let mut frame = match self.stack.pop() {
                None => {
                    self.compact();
                    return Some(value);
                }
                Some(frame) => frame,
            };
            frame.items.push(value);
            if frame.items.len() < frame.expected {
                self.stack.push(frame);
                return None;
            }
            value = frame.into_value();
        }
    }

    /// Discards the parsed prefix of the accumulation buffer. Safe at any
    /// point: bytes before the frontier are already represented by the
    /// frame stack.
    fn compact(&mut self) {
        if self.pos > 0 {
            self.buf.advance(self.pos);
            self.consumed += self.pos;
            self.pos = 0;
        }
    }
}

/// Cap on speculative preallocation from untrusted length headers.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Slot count for a map of `len` entries. Only reachable for headers
/// whose entry count exceeds `usize::MAX / 2`, which requires a 32-bit
/// target; `tag` is the actual map header byte for the error report.
fn map_slots(len: usize, tag: u8, offset: usize) -> Result<usize, DecodeError> {
    len.checked_mul(2)
        .ok_or(DecodeError::Malformed { byte: tag, offset })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::StreamDecoder;
    use crate::{encode::Encoder, error::DecodeError, value::Value};

    fn sample_value() -> Value {
        Value::Array(vec![
            Value::Int(-5),
            Value::Map(vec![
                (Value::from("inner"), Value::Array(vec![Value::Int(1), Value::Int(2)])),
                (Value::from("f"), Value::F64(0.25)),
            ]),
            Value::Str("trailer".to_owned()),
        ])
    }

    fn encode_value(value: &Value) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.write_value(value).unwrap();
        encoder.into_bytes()
    }

    #[test]
    fn whole_input_decodes_in_one_call() {
        let value = sample_value();
        let mut decoder = StreamDecoder::new();
        decoder.feed(&encode_value(&value));
        assert_eq!(decoder.next_value().unwrap(), Some(value));
        assert!(decoder.is_idle());
        decoder.finish().unwrap();
    }

    #[test]
    fn byte_at_a_time_feeding_suspends_and_resumes() {
        let value = sample_value();
        let bytes = encode_value(&value);
        let mut decoder = StreamDecoder::new();
        let mut decoded = None;
        for (i, byte) in bytes.iter().enumerate() {
            decoder.feed(&[*byte]);
            match decoder.next_value().unwrap() {
                Some(result) => {
                    assert_eq!(i, bytes.len() - 1, "completed early");
                    decoded = Some(result);
                }
                None => assert!(i < bytes.len() - 1, "suspended on the last byte"),
            }
        }
        assert_eq!(decoded, Some(value));
    }

    #[test]
    fn multiple_values_from_one_buffer() {
        let mut decoder = StreamDecoder::new();
        let mut bytes = encode_value(&Value::Int(1));
        bytes.extend_from_slice(&encode_value(&Value::from("two")));
        decoder.feed(&bytes);
        assert_eq!(decoder.next_value().unwrap(), Some(Value::Int(1)));
        assert_eq!(decoder.next_value().unwrap(), Some(Value::from("two")));
        assert_eq!(decoder.next_value().unwrap(), None);
        decoder.finish().unwrap();
    }

    #[test]
    fn nested_containers_cascade_to_empty_stack() {
        // Array containing a map containing an array: closing the innermost
        // array must pop all three frames in one cascade.
        let value = Value::Array(vec![Value::Map(vec![(
            Value::Int(1),
            Value::Array(vec![Value::Int(2)]),
        )])]);
        let bytes = encode_value(&value);
        let mut decoder = StreamDecoder::new();
        decoder.feed(&bytes);
        assert_eq!(decoder.next_value().unwrap(), Some(value));
        assert!(decoder.is_idle());
    }

    #[test]
    fn empty_containers_complete_immediately() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(&[0x90]);
        assert_eq!(decoder.next_value().unwrap(), Some(Value::Array(vec![])));
        decoder.feed(&[0x80]);
        assert_eq!(decoder.next_value().unwrap(), Some(Value::Map(vec![])));
    }

    #[test]
    fn eof_inside_container_is_fatal() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(&[0x92, 0x01]); // array of 2, only one element fed
        assert_eq!(decoder.next_value().unwrap(), None);
        assert_matches!(
            decoder.finish().unwrap_err(),
            DecodeError::UnexpectedEof { .. }
        );
    }

    #[test]
    fn eof_on_clean_boundary_is_success() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(&[0x01]);
        assert_eq!(decoder.next_value().unwrap(), Some(Value::Int(1)));
        decoder.finish().unwrap();
    }

    #[test]
    fn malformed_tag_is_fatal() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(&[0x92, 0xc1]);
        // The array header parses; the reserved byte right after is fatal.
        assert_matches!(
            decoder.next_value().unwrap_err(),
            DecodeError::Malformed { byte: 0xc1, offset: 1 }
        );
    }

    #[test]
    fn map_slot_overflow_reports_the_header_tag() {
        // An entry count this large only fits a map16/map32 header on a
        // 32-bit target; the error must carry that header byte, not a
        // fixed constant.
        let len = usize::max_value() / 2 + 1;
        assert_matches!(
            super::map_slots(len, 0xde, 3).unwrap_err(),
            DecodeError::Malformed { byte: 0xde, offset: 3 }
        );
        assert_eq!(super::map_slots(4, 0x84, 0).unwrap(), 8);
    }

    #[test]
    fn offsets_are_absolute_across_compaction() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(&encode_value(&Value::from("abcdef")));
        decoder.next_value().unwrap();
        decoder.feed(&[0xc1]);
        let err = decoder.next_value().unwrap_err();
        assert_matches!(err, DecodeError::Malformed { byte: 0xc1, offset: 7 });
    }
}
