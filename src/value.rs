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

//! The generic wire value tree.
//!
//! A [`Value`] losslessly represents any decodable wire value and is what
//! the decoder produces when no template is involved: nested containers
//! become nested `Value`s, available for introspection or debugging.
//!
//! Integers are normalized so that structurally equal values compare equal
//! regardless of the wire width they were decoded from: every integer
//! representable as `i64` becomes [`Value::Int`]; only magnitudes above
//! `i64::MAX` use [`Value::Uint`].
//!
//! [`Value`]: enum.Value.html
//! [`Value::Int`]: enum.Value.html#variant.Int
//! [`Value::Uint`]: enum.Value.html#variant.Uint

use std::fmt;

use crate::error::WireKind;

/// A self-contained decoded wire value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The nil value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// An integer representable as `i64`.
    Int(i64),
    /// An unsigned integer above `i64::MAX`.
    Uint(u64),
    /// A 32-bit float.
    F32(f32),
    /// A 64-bit float.
    F64(f64),
    /// A UTF-8 string.
    Str(String),
    /// A binary blob.
    Bin(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// An ordered sequence of key/value pairs. The wire format does not
    /// require keys to be unique, so duplicates are representable.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Builds an integer value with the crate-wide normalization applied.
    pub fn from_u64(value: u64) -> Self {
        if value <= i64::max_value() as u64 {
            Value::Int(value as i64)
        } else {
            Value::Uint(value)
        }
    }

    /// The wire kind of this value.
    pub fn kind(&self) -> WireKind {
        match self {
            Value::Nil => WireKind::Nil,
            Value::Bool(_) => WireKind::Bool,
            Value::Int(_) | Value::Uint(_) => WireKind::Int,
            Value::F32(_) | Value::F64(_) => WireKind::Float,
            Value::Str(_) => WireKind::Str,
            Value::Bin(_) => WireKind::Bin,
            Value::Array(_) => WireKind::Array,
            Value::Map(_) => WireKind::Map,
        }
    }

    /// Returns `true` for the nil value.
    pub fn is_nil(&self) -> bool {
        *self == Value::Nil
    }

    /// Returns the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(value) if *value >= 0 => Some(*value as u64),
            Value::Uint(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is a float of either width.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(value) => Some(f64::from(*value)),
            Value::F64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the binary payload, if any.
    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the array elements, if any.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the map entries, if any.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => formatter.write_str("nil"),
            Value::Bool(value) => write!(formatter, "{}", value),
            Value::Int(value) => write!(formatter, "{}", value),
            Value::Uint(value) => write!(formatter, "{}", value),
            Value::F32(value) => write!(formatter, "{}", value),
            Value::F64(value) => write!(formatter, "{}", value),
            Value::Str(value) => write!(formatter, "{:?}", value),
            Value::Bin(bytes) => {
                formatter.write_str("bin<")?;
                for byte in bytes {
                    write!(formatter, "{:02x}", byte)?;
                }
                formatter.write_str(">")
            }
            Value::Array(elements) => {
                formatter.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{}", element)?;
                }
                formatter.write_str("]")
            }
            Value::Map(entries) => {
                formatter.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{}: {}", key, value)?;
                }
                formatter.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::from_u64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bin(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::Array(elements)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn integer_normalization() {
        assert_eq!(Value::from_u64(42), Value::Int(42));
        assert_eq!(
            Value::from_u64(i64::max_value() as u64),
            Value::Int(i64::max_value())
        );
        assert_eq!(
            Value::from_u64(i64::max_value() as u64 + 1),
            Value::Uint(i64::max_value() as u64 + 1)
        );
    }

    #[test]
    fn display_renders_nested_trees() {
        let value = Value::Array(vec![
            Value::Int(1),
            Value::Map(vec![(Value::from("k"), Value::Bin(vec![0xde, 0xad]))]),
        ]);
        assert_eq!(value.to_string(), r#"[1, {"k": bin<dead>}]"#);
    }
}
