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

//! A compact binary object-serialization codec.
//!
//! Values are encoded into a tagged, big-endian wire format in which small
//! payloads collapse into single-byte forms: integers from `-32` to `127`,
//! strings up to 31 bytes and containers up to 15 elements spend one tag
//! byte. Wider payloads escalate to the narrowest multi-byte form that
//! fits, so the encoding of a value depends only on its magnitude, not on
//! its Rust type.
//!
//! # Encoding
//!
//! An [`Encoder`] appends values to an owned byte sink. Containers are
//! written as a header followed by their elements; the caller states the
//! element count up front and brackets the elements with `begin`/`end`
//! calls.
//!
//! ```
//! use wirepack::Encoder;
//!
//! # fn main() -> Result<(), wirepack::EncodeError> {
//! let mut encoder = Encoder::new();
//! encoder.write_map_begin(1)?;
//! encoder.write_str("answer")?;
//! encoder.write_u64(42)?;
//! encoder.write_map_end()?;
//! assert_eq!(encoder.as_slice(), &[0x81, 0xa6, b'a', b'n', b's', b'w', b'e', b'r', 0x2a]);
//! # Ok(())
//! # }
//! ```
//!
//! # Decoding
//!
//! A [`Decoder`] reads typed values back out of a byte slice. Reads are
//! transactional: on any failure, including a type mismatch, the decoder
//! stays where it was, so the caller can retry with a different type.
//! Any valid width is accepted on decode regardless of the width the
//! value was encoded with, as long as it fits the requested Rust type.
//!
//! For input that arrives in chunks, [`StreamDecoder`] parses as far as
//! the buffered bytes allow and suspends cleanly at any byte boundary;
//! see the [`stream`] module.
//!
//! # Templates
//!
//! The [`template`] module maps Rust types onto the wire format through
//! composable [`Template`] values and a type-keyed [`TemplateRegistry`],
//! including optional in-place reuse of existing allocations on decode.
//!
//! When no static type is known, [`Value`] represents any decodable wire
//! value as a generic tree.
//!
//! [`Encoder`]: struct.Encoder.html
//! [`Decoder`]: struct.Decoder.html
//! [`StreamDecoder`]: struct.StreamDecoder.html
//! [`stream`]: stream/index.html
//! [`template`]: template/index.html
//! [`Template`]: template/trait.Template.html
//! [`TemplateRegistry`]: template/struct.TemplateRegistry.html
//! [`Value`]: enum.Value.html

#![warn(
    missing_debug_implementations,
    unsafe_code,
    bare_trait_objects,
    missing_docs
)]
#![warn(clippy::pedantic)]
#![allow(
    // Next `cast_*` lints don't give alternatives.
    clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss,
    // Next lints produce too much noise/false positives.
    clippy::module_name_repetitions, clippy::similar_names,
    // '... may panic' lints.
    clippy::indexing_slicing,
    clippy::use_self,
    clippy::default_trait_access,
)]

pub use self::{
    buffer::{GrowStrategy, WriteBuffer, DEFAULT_CAPACITY},
    decode::Decoder,
    encode::Encoder,
    error::{DecodeError, EncodeError, WireKind},
    marker::Marker,
    stream::StreamDecoder,
    template::{Template, TemplateRegistry},
    value::Value,
};

pub mod stream;
pub mod template;

mod buffer;
mod decode;
mod encode;
mod error;
mod marker;
mod value;
