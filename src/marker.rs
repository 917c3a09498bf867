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

//! Classification of wire-format tag bytes.
//!
//! Every encoded value starts with a single tag byte. Small integers and
//! short container/string lengths are embedded into the tag itself
//! (the `Fix*` variants); every other tag announces how many additional
//! length or payload bytes follow. [`Marker::from_u8`] is total: each of
//! the 256 byte values classifies into exactly one variant, with the one
//! byte the format never assigns (`0xc1`) mapping to [`Marker::Reserved`].
//!
//! [`Marker::from_u8`]: enum.Marker.html#method.from_u8
//! [`Marker::Reserved`]: enum.Marker.html#variant.Reserved

use crate::error::WireKind;

/// A classified wire-format tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `0x00..=0x7f`: a non-negative integer stored in the tag itself.
    FixPos(u8),
    /// `0xe0..=0xff`: a small negative integer stored in the tag itself.
    FixNeg(i8),
    /// `0x80..=0x8f`: a map of up to 15 entries, length in the low nibble.
    FixMap(u8),
    /// `0x90..=0x9f`: an array of up to 15 elements, length in the low nibble.
    FixArray(u8),
    /// `0xa0..=0xbf`: a string of up to 31 bytes, length in the low 5 bits.
    FixStr(u8),
    /// `0xc0`: the nil value.
    Nil,
    /// `0xc1`: never emitted by a valid encoder.
    Reserved,
    /// `0xc2`: boolean false.
    False,
    /// `0xc3`: boolean true.
    True,
    /// `0xc4`: binary, 8-bit length prefix.
    Bin8,
    /// `0xc5`: binary, 16-bit length prefix.
    Bin16,
    /// `0xc6`: binary, 32-bit length prefix.
    Bin32,
    /// `0xc7`: extension, 8-bit length prefix.
    Ext8,
    /// `0xc8`: extension, 16-bit length prefix.
    Ext16,
    /// `0xc9`: extension, 32-bit length prefix.
    Ext32,
    /// `0xca`: 32-bit float.
    F32,
    /// `0xcb`: 64-bit float.
    F64,
    /// `0xcc`: 8-bit unsigned integer.
    U8,
    /// `0xcd`: 16-bit unsigned integer.
    U16,
    /// `0xce`: 32-bit unsigned integer.
    U32,
    /// `0xcf`: 64-bit unsigned integer.
    U64,
    /// `0xd0`: 8-bit signed integer.
    I8,
    /// `0xd1`: 16-bit signed integer.
    I16,
    /// `0xd2`: 32-bit signed integer.
    I32,
    /// `0xd3`: 64-bit signed integer.
    I64,
    /// `0xd4`: 1-byte fixed extension.
    FixExt1,
    /// `0xd5`: 2-byte fixed extension.
    FixExt2,
    /// `0xd6`: 4-byte fixed extension.
    FixExt4,
    /// `0xd7`: 8-byte fixed extension.
    FixExt8,
    /// `0xd8`: 16-byte fixed extension.
    FixExt16,
    /// `0xd9`: string, 8-bit length prefix.
    Str8,
    /// `0xda`: string, 16-bit length prefix.
    Str16,
    /// `0xdb`: string, 32-bit length prefix.
    Str32,
    /// `0xdc`: array, 16-bit length prefix.
    Array16,
    /// `0xdd`: array, 32-bit length prefix.
    Array32,
    /// `0xde`: map, 16-bit length prefix.
    Map16,
    /// `0xdf`: map, 32-bit length prefix.
    Map32,
}

impl Marker {
    /// Classifies a tag byte. Total over all 256 byte values.
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            0x00..=0x7f => Marker::FixPos(byte),
            0x80..=0x8f => Marker::FixMap(byte & 0x0f),
            0x90..=0x9f => Marker::FixArray(byte & 0x0f),
            0xa0..=0xbf => Marker::FixStr(byte & 0x1f),
            0xc0 => Marker::Nil,
            0xc1 => Marker::Reserved,
            0xc2 => Marker::False,
            0xc3 => Marker::True,
            0xc4 => Marker::Bin8,
            0xc5 => Marker::Bin16,
            0xc6 => Marker::Bin32,
            0xc7 => Marker::Ext8,
            0xc8 => Marker::Ext16,
            0xc9 => Marker::Ext32,
            0xca => Marker::F32,
            0xcb => Marker::F64,
            0xcc => Marker::U8,
            0xcd => Marker::U16,
            0xce => Marker::U32,
            0xcf => Marker::U64,
            0xd0 => Marker::I8,
            0xd1 => Marker::I16,
            0xd2 => Marker::I32,
            0xd3 => Marker::I64,
            0xd4 => Marker::FixExt1,
            0xd5 => Marker::FixExt2,
            0xd6 => Marker::FixExt4,
            0xd7 => Marker::FixExt8,
            0xd8 => Marker::FixExt16,
            0xd9 => Marker::Str8,
            0xda => Marker::Str16,
            0xdb => Marker::Str32,
            0xdc => Marker::Array16,
            0xdd => Marker::Array32,
            0xde => Marker::Map16,
            0xdf => Marker::Map32,
            0xe0..=0xff => Marker::FixNeg(byte as i8),
        }
    }

    /// Returns the tag byte this marker encodes to.
    pub fn to_u8(self) -> u8 {
        match self {
            Marker::FixPos(value) => value,
            Marker::FixNeg(value) => value as u8,
            Marker::FixMap(len) => 0x80 | len,
            Marker::FixArray(len) => 0x90 | len,
            Marker::FixStr(len) => 0xa0 | len,
            Marker::Nil => 0xc0,
            Marker::Reserved => 0xc1,
            Marker::False => 0xc2,
            Marker::True => 0xc3,
            Marker::Bin8 => 0xc4,
            Marker::Bin16 => 0xc5,
            Marker::Bin32 => 0xc6,
            Marker::Ext8 => 0xc7,
            Marker::Ext16 => 0xc8,
            Marker::Ext32 => 0xc9,
            Marker::F32 => 0xca,
            Marker::F64 => 0xcb,
            Marker::U8 => 0xcc,
            Marker::U16 => 0xcd,
            Marker::U32 => 0xce,
            Marker::U64 => 0xcf,
            Marker::I8 => 0xd0,
            Marker::I16 => 0xd1,
            Marker::I32 => 0xd2,
            Marker::I64 => 0xd3,
            Marker::FixExt1 => 0xd4,
            Marker::FixExt2 => 0xd5,
            Marker::FixExt4 => 0xd6,
            Marker::FixExt8 => 0xd7,
            Marker::FixExt16 => 0xd8,
            Marker::Str8 => 0xd9,
            Marker::Str16 => 0xda,
            Marker::Str32 => 0xdb,
            Marker::Array16 => 0xdc,
            Marker::Array32 => 0xdd,
            Marker::Map16 => 0xde,
            Marker::Map32 => 0xdf,
        }
    }

    /// The wire kind this marker belongs to.
    ///
    /// `Reserved` has no kind; callers classify it as malformed before
    /// consulting the kind, so it is reported as `Ext` here only to keep
    /// the function total.
    pub fn kind(self) -> WireKind {
        match self {
            Marker::Nil => WireKind::Nil,
            Marker::False | Marker::True => WireKind::Bool,
            Marker::FixPos(_)
            | Marker::FixNeg(_)
            | Marker::U8
            | Marker::U16
            | Marker::U32
            | Marker::U64
            | Marker::I8
            | Marker::I16
            | Marker::I32
            | Marker::I64 => WireKind::Int,
            Marker::F32 | Marker::F64 => WireKind::Float,
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => WireKind::Str,
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => WireKind::Bin,
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => WireKind::Array,
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => WireKind::Map,
            Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32
            | Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16
            | Marker::Reserved => WireKind::Ext,
        }
    }
}
