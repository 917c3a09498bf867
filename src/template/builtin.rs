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

//! Ready-made templates for primitives, strings, blobs and containers.

use std::collections::BTreeMap;

use crate::{
    decode::Decoder,
    encode::Encoder,
    error::{DecodeError, EncodeError, WireKind},
    template::Template,
    value::Value,
};

/// Cap on speculative preallocation from untrusted length headers.
const PREALLOC_LIMIT: usize = 1 << 16;

macro_rules! scalar_template {
    ($(#[$attr:meta])* $name:ident, $item:ty, $write:ident, $read:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Template for $name {
            type Item = $item;

            fn write(&self, encoder: &mut Encoder, item: &$item) -> Result<(), EncodeError> {
                encoder.$write(*item)
            }

            fn read(
                &self,
                decoder: &mut Decoder<'_>,
                _reuse: Option<$item>,
            ) -> Result<$item, DecodeError> {
                decoder.$read()
            }
        }
    };
}

scalar_template! {
    /// Template for `bool`.
    BoolTemplate, bool, write_bool, read_bool
}
scalar_template! {
    /// Template for `u8`.
    U8Template, u8, write_u8, read_u8
}
scalar_template! {
    /// Template for `u16`.
    U16Template, u16, write_u16, read_u16
}
scalar_template! {
    /// Template for `u32`.
    U32Template, u32, write_u32, read_u32
}
scalar_template! {
    /// Template for `u64`.
    U64Template, u64, write_u64, read_u64
}
scalar_template! {
    /// Template for `i8`.
    I8Template, i8, write_i8, read_i8
}
scalar_template! {
    /// Template for `i16`.
    I16Template, i16, write_i16, read_i16
}
scalar_template! {
    /// Template for `i32`.
    I32Template, i32, write_i32, read_i32
}
scalar_template! {
    /// Template for `i64`.
    I64Template, i64, write_i64, read_i64
}
scalar_template! {
    /// Template for `f32`.
    F32Template, f32, write_f32, read_f32
}
scalar_template! {
    /// Template for `f64`. Accepts 32-bit floats on decode.
    F64Template, f64, write_f64, read_f64
}

/// Template for `String`. Reuses the target's allocation on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTemplate;

impl Template for StringTemplate {
    type Item = String;

    fn write(&self, encoder: &mut Encoder, item: &String) -> Result<(), EncodeError> {
        encoder.write_str(item)
    }

    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<String>,
    ) -> Result<String, DecodeError> {
        let text = decoder.read_str()?;
        Ok(match reuse {
            Some(mut target) => {
                target.clear();
                target.push_str(text);
                target
            }
            None => text.to_owned(),
        })
    }
}

/// Template for `Vec<u8>`, encoded as a binary blob. Reuses the target's
/// allocation on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinTemplate;

impl Template for BinTemplate {
    type Item = Vec<u8>;

    fn write(&self, encoder: &mut Encoder, item: &Vec<u8>) -> Result<(), EncodeError> {
        encoder.write_bin(item)
    }

    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, DecodeError> {
        let bytes = decoder.read_bin()?;
        Ok(match reuse {
            Some(mut target) => {
                target.clear();
                target.extend_from_slice(bytes);
                target
            }
            None => bytes.to_vec(),
        })
    }
}

macro_rules! numeric_array_template {
    ($(#[$attr:meta])* $name:ident, $elem:ty, $write:ident, $read:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Template for $name {
            type Item = Vec<$elem>;

            fn write(&self, encoder: &mut Encoder, item: &Vec<$elem>) -> Result<(), EncodeError> {
                encoder.write_array_begin(item.len())?;
                for element in item {
                    encoder.$write(*element)?;
                }
                encoder.write_array_end()
            }

            fn read(
                &self,
                decoder: &mut Decoder<'_>,
                reuse: Option<Vec<$elem>>,
            ) -> Result<Vec<$elem>, DecodeError> {
                let len = decoder.read_array_begin()?;
                // An exact-length target is overwritten in place; any other
                // shape falls back to a fresh vector.
                let mut items = match reuse {
                    Some(mut target) if target.len() == len => {
                        for slot in target.iter_mut() {
                            *slot = decoder.$read()?;
                        }
                        decoder.read_array_end()?;
                        return Ok(target);
                    }
                    Some(mut target) => {
                        target.clear();
                        target
                    }
                    None => Vec::new(),
                };
                items.reserve(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    items.push(decoder.$read()?);
                }
                decoder.read_array_end()?;
                Ok(items)
            }
        }
    };
}

numeric_array_template! {
    /// Template for `Vec<i16>`, encoded as an array of integers.
    I16ArrayTemplate, i16, write_i16, read_i16
}
numeric_array_template! {
    /// Template for `Vec<i32>`, encoded as an array of integers.
    I32ArrayTemplate, i32, write_i32, read_i32
}
numeric_array_template! {
    /// Template for `Vec<i64>`, encoded as an array of integers.
    I64ArrayTemplate, i64, write_i64, read_i64
}
numeric_array_template! {
    /// Template for `Vec<f32>`, encoded as an array of floats.
    F32ArrayTemplate, f32, write_f32, read_f32
}
numeric_array_template! {
    /// Template for `Vec<f64>`, encoded as an array of floats.
    F64ArrayTemplate, f64, write_f64, read_f64
}

/// Template for `Vec<T>` with elements handled by a nested template.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListTemplate<E> {
    element: E,
}

impl<E: Template> ListTemplate<E> {
    /// Wraps an element template.
    pub fn new(element: E) -> Self {
        Self { element }
    }
}

impl<E: Template> Template for ListTemplate<E> {
    type Item = Vec<E::Item>;

    fn write(&self, encoder: &mut Encoder, item: &Vec<E::Item>) -> Result<(), EncodeError> {
        encoder.write_array_begin(item.len())?;
        for element in item {
            self.element.write(encoder, element)?;
        }
        encoder.write_array_end()
    }

    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<Vec<E::Item>>,
    ) -> Result<Vec<E::Item>, DecodeError> {
        let len = decoder.read_array_begin()?;
        let mut items = match reuse {
            Some(mut target) => {
                target.clear();
                target
            }
            None => Vec::new(),
        };
        items.reserve(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            items.push(self.element.read(decoder, None)?);
        }
        decoder.read_array_end()?;
        Ok(items)
    }
}

/// Template for `BTreeMap<K, V>` with keys and values handled by nested
/// templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapTemplate<K, V> {
    key: K,
    value: V,
}

impl<K, V> MapTemplate<K, V>
where
    K: Template,
    V: Template,
    K::Item: Ord,
{
    /// Wraps key and value templates.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> Template for MapTemplate<K, V>
where
    K: Template,
    V: Template,
    K::Item: Ord,
{
    type Item = BTreeMap<K::Item, V::Item>;

    fn write(&self, encoder: &mut Encoder, item: &Self::Item) -> Result<(), EncodeError> {
        encoder.write_map_begin(item.len())?;
        for (key, value) in item {
            self.key.write(encoder, key)?;
            self.value.write(encoder, value)?;
        }
        encoder.write_map_end()
    }

    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<Self::Item>,
    ) -> Result<Self::Item, DecodeError> {
        let len = decoder.read_map_begin()?;
        let mut entries = match reuse {
            Some(mut target) => {
                target.clear();
                target
            }
            None => BTreeMap::new(),
        };
        for _ in 0..len {
            let key = self.key.read(decoder, None)?;
            let value = self.value.read(decoder, None)?;
            entries.insert(key, value);
        }
        decoder.read_map_end()?;
        Ok(entries)
    }
}

/// Template for `Option<T>`: `None` is encoded as nil, `Some` delegates to
/// the inner template.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionTemplate<E> {
    inner: E,
}

impl<E: Template> OptionTemplate<E> {
    /// Wraps the template for the present case.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: Template> Template for OptionTemplate<E> {
    type Item = Option<E::Item>;

    fn write(&self, encoder: &mut Encoder, item: &Option<E::Item>) -> Result<(), EncodeError> {
        match item {
            Some(value) => self.inner.write(encoder, value),
            None => encoder.write_nil(),
        }
    }

    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<Option<E::Item>>,
    ) -> Result<Option<E::Item>, DecodeError> {
        if decoder.peek_kind()? == WireKind::Nil {
            decoder.read_nil()?;
            return Ok(None);
        }
        let target = reuse.and_then(|outer| outer);
        self.inner.read(decoder, target).map(Some)
    }
}

/// Template for the generic [`Value`](../enum.Value.html) tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueTemplate;

impl Template for ValueTemplate {
    type Item = Value;

    fn write(&self, encoder: &mut Encoder, item: &Value) -> Result<(), EncodeError> {
        encoder.write_value(item)
    }

    fn read(&self, decoder: &mut Decoder<'_>, _reuse: Option<Value>) -> Result<Value, DecodeError> {
        decoder.read_value()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use std::collections::BTreeMap;

    use super::{
        BinTemplate, F32ArrayTemplate, I16ArrayTemplate, ListTemplate, MapTemplate,
        OptionTemplate, StringTemplate, U32Template, ValueTemplate,
    };
    use crate::{
        error::DecodeError,
        template::{pack_with, unpack_with, Template},
        Decoder, Value,
    };

    fn unpack_into<U: Template>(
        template: &U,
        bytes: &[u8],
        target: U::Item,
    ) -> Result<U::Item, DecodeError> {
        let mut decoder = Decoder::new(bytes);
        let item = template.read(&mut decoder, Some(target))?;
        decoder.finish()?;
        Ok(item)
    }

    #[test]
    fn string_reuse_keeps_allocation() {
        let bytes = pack_with(&StringTemplate, &"short".to_owned()).unwrap();
        let target = String::with_capacity(64);
        let capacity = target.capacity();
        let ptr = target.as_ptr();

        let result = unpack_into(&StringTemplate, &bytes, target).unwrap();
        assert_eq!(result, "short");
        assert_eq!(result.capacity(), capacity);
        assert_eq!(result.as_ptr(), ptr);
    }

    #[test]
    fn bin_reuse_keeps_allocation() {
        let bytes = pack_with(&BinTemplate, &vec![1, 2, 3]).unwrap();
        let target = Vec::with_capacity(32);
        let ptr = target.as_ptr();

        let result = unpack_into(&BinTemplate, &bytes, target).unwrap();
        assert_eq!(result, &[1, 2, 3]);
        assert_eq!(result.as_ptr(), ptr);
    }

    #[test]
    fn exact_length_array_is_overwritten_in_place() {
        let bytes = pack_with(&I16ArrayTemplate, &vec![10, -20, 30]).unwrap();
        let target = vec![0_i16; 3];
        let ptr = target.as_ptr();

        let result = unpack_into(&I16ArrayTemplate, &bytes, target).unwrap();
        assert_eq!(result, &[10, -20, 30]);
        assert_eq!(result.as_ptr(), ptr);
    }

    #[test]
    fn mismatched_length_array_is_rebuilt() {
        let bytes = pack_with(&F32ArrayTemplate, &vec![0.5, 1.5]).unwrap();
        let result = unpack_into(&F32ArrayTemplate, &bytes, vec![0.0; 5]).unwrap();
        assert_eq!(result, &[0.5, 1.5]);
    }

    #[test]
    fn list_of_strings_round_trips() {
        let template = ListTemplate::new(StringTemplate);
        let items = vec!["a".to_owned(), "bb".to_owned(), String::new()];
        let bytes = pack_with(&template, &items).unwrap();
        assert_eq!(unpack_with(&template, &bytes).unwrap(), items);
    }

    #[test]
    fn map_round_trips_sorted() {
        let template = MapTemplate::new(StringTemplate, U32Template);
        let mut entries = BTreeMap::new();
        entries.insert("one".to_owned(), 1);
        entries.insert("two".to_owned(), 2);
        let bytes = pack_with(&template, &entries).unwrap();
        assert_eq!(unpack_with(&template, &bytes).unwrap(), entries);
    }

    #[test]
    fn option_encodes_none_as_nil() {
        let template = OptionTemplate::new(U32Template);
        assert_eq!(pack_with(&template, &None).unwrap(), vec![0xc0]);

        let bytes = pack_with(&template, &Some(7)).unwrap();
        assert_eq!(unpack_with(&template, &bytes).unwrap(), Some(7));
        assert_eq!(unpack_with(&template, &[0xc0]).unwrap(), None);
    }

    #[test]
    fn value_template_round_trips_trees() {
        let value = Value::Array(vec![Value::Nil, Value::from("x")]);
        let bytes = pack_with(&ValueTemplate, &value).unwrap();
        assert_eq!(unpack_with(&ValueTemplate, &bytes).unwrap(), value);
    }

    #[test]
    fn list_type_mismatch_surfaces_element_error() {
        let template = ListTemplate::new(U32Template);
        let bytes = pack_with(&ListTemplate::new(StringTemplate), &vec!["x".to_owned()]).unwrap();
        assert_matches!(
            unpack_with(&template, &bytes).unwrap_err(),
            DecodeError::TypeMismatch { .. }
        );
    }
}
