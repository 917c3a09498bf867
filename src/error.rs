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

//! Error types shared by the encoding and decoding halves of the codec.

use thiserror::Error;

use std::fmt;

/// Classification of value kinds as they appear on the wire.
///
/// Used in error reporting; a `WireKind` names the *shape* of a value
/// (integer, string, array, ...) independently of the concrete tag byte
/// that encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// The nil (absent) value.
    Nil,
    /// A boolean.
    Bool,
    /// An integer of any width, signed or unsigned.
    Int,
    /// A 32- or 64-bit floating-point number.
    Float,
    /// A length-prefixed UTF-8 string.
    Str,
    /// A length-prefixed byte sequence.
    Bin,
    /// An ordered sequence of values.
    Array,
    /// An ordered sequence of key/value pairs.
    Map,
    /// A tagged extension blob. Classified but not decoded by this crate.
    Ext,
}

impl fmt::Display for WireKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireKind::Nil => "nil",
            WireKind::Bool => "boolean",
            WireKind::Int => "integer",
            WireKind::Float => "float",
            WireKind::Str => "string",
            WireKind::Bin => "binary",
            WireKind::Array => "array",
            WireKind::Map => "map",
            WireKind::Ext => "extension",
        };
        formatter.write_str(name)
    }
}

/// Errors that can occur while encoding values.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The sink ran out of capacity and no growth strategy was configured.
    ///
    /// This is a configuration error rather than a transient condition;
    /// a sink that reported it must be discarded.
    #[error("buffer overflow: {required} more bytes required, capacity is {capacity}")]
    BufferOverflow {
        /// Capacity of the backing buffer at the time of the failure.
        capacity: usize,
        /// Number of additional bytes the failed reservation asked for.
        required: usize,
    },

    /// A string, binary or container length exceeds the 32-bit wire headers.
    #[error("length {length} does not fit into a 32-bit wire header")]
    LengthOverflow {
        /// The offending length.
        length: usize,
    },

    /// No template is registered for the type being encoded.
    #[error("no template registered for type `{type_name}`")]
    UnknownType {
        /// Name of the type the lookup was performed for.
        type_name: &'static str,
    },

    /// Failure raised by a user-defined template.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

/// Errors and control signals that can occur while decoding.
///
/// `InsufficientInput` is *not* a failure: it tells the caller to retry the
/// identical call once more bytes are available. The streaming facade
/// ([`StreamDecoder`]) never surfaces it, reporting `Ok(None)` instead.
/// All other variants are fatal for the current decode.
///
/// [`StreamDecoder`]: ../struct.StreamDecoder.html
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The tag byte names a kind other than the one the caller requested.
    ///
    /// The decoder position is not advanced, so the caller may retry the
    /// read with the correct type.
    #[error("type mismatch at offset {offset}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The kind the caller asked for.
        expected: WireKind,
        /// The kind actually present on the wire.
        found: WireKind,
        /// Byte offset of the tag.
        offset: usize,
    },

    /// An integer value does not fit into the requested integer type.
    #[error("integer at offset {offset} does not fit into the requested type")]
    IntegerOutOfRange {
        /// Byte offset of the tag.
        offset: usize,
    },

    /// A tag byte that no valid encoder emits.
    ///
    /// The stream position after this error is undefined; the input should
    /// be considered desynchronized.
    #[error("malformed tag byte 0x{byte:02x} at offset {offset}")]
    Malformed {
        /// The offending byte.
        byte: u8,
        /// Byte offset of the tag.
        offset: usize,
    },

    /// A valid but unsupported wire kind (currently: extension values).
    #[error("unsupported {kind} value at offset {offset}")]
    Unsupported {
        /// The wire kind found.
        kind: WireKind,
        /// Byte offset of the tag.
        offset: usize,
    },

    /// The input holds fewer bytes than the next primitive requires.
    ///
    /// No bytes have been consumed; supplying more input and retrying the
    /// same call is guaranteed to make progress.
    #[error("insufficient input: {needed} more bytes required")]
    InsufficientInput {
        /// Lower bound on the number of additional bytes required.
        needed: usize,
    },

    /// The input ended while a container was still open or a value was
    /// partially read. Fatal, unlike `InsufficientInput`.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof {
        /// Offset at which the input ran out.
        offset: usize,
    },

    /// A string payload is not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the string payload.
        offset: usize,
    },

    /// A container end was requested before all declared elements were read.
    #[error("container closed at offset {offset} with {remaining} elements still unread")]
    UnfinishedContainer {
        /// Number of elements the header declared but the caller did not read.
        remaining: usize,
        /// Offset at which the end was requested.
        offset: usize,
    },

    /// More elements were read than the enclosing container header declared.
    #[error("read past the declared element count at offset {offset}")]
    ExtraElements {
        /// Offset of the excess read.
        offset: usize,
    },

    /// Input remained after the caller declared decoding complete.
    #[error("{remaining} unconsumed bytes starting at offset {offset}")]
    TrailingBytes {
        /// Number of bytes left unread.
        remaining: usize,
        /// Offset of the first unread byte.
        offset: usize,
    },

    /// A container end call without a matching begin, or for the wrong
    /// container kind.
    #[error("mismatched container end at offset {offset}")]
    MismatchedEnd {
        /// Offset at which the end was requested.
        offset: usize,
    },

    /// No template is registered for the type being decoded.
    #[error("no template registered for type `{type_name}`")]
    UnknownType {
        /// Name of the type the lookup was performed for.
        type_name: &'static str,
    },

    /// Failure raised by a user-defined template.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl DecodeError {
    /// Returns `true` if this is the `InsufficientInput` control signal.
    pub fn is_insufficient_input(&self) -> bool {
        matches!(self, DecodeError::InsufficientInput { .. })
    }
}
