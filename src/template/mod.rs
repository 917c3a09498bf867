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

//! Templates: reusable serialization strategies for Rust types.
//!
//! A [`Template`] pairs the encoding and decoding of one item type. Unlike
//! a derive-style approach, templates are ordinary values: they can be
//! composed ([`ListTemplate`] wraps an element template), parameterized,
//! and swapped at run time through a [`TemplateRegistry`].
//!
//! Decoding may optionally reuse an existing item: `read` receives
//! `Option<Item>` and a template that supports reuse fills the provided
//! allocation in place instead of building a fresh one. Reuse is a hint,
//! not an obligation; a template may ignore the target when the decoded
//! shape does not fit it.
//!
//! ```
//! use wirepack::template::{pack_with, unpack_with, StringTemplate};
//!
//! let bytes = pack_with(&StringTemplate, &"hello".to_owned()).unwrap();
//! let round_trip: String = unpack_with(&StringTemplate, &bytes).unwrap();
//! assert_eq!(round_trip, "hello");
//! ```
//!
//! [`Template`]: trait.Template.html
//! [`ListTemplate`]: struct.ListTemplate.html
//! [`TemplateRegistry`]: struct.TemplateRegistry.html

use log::trace;

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use crate::{
    decode::Decoder,
    encode::Encoder,
    error::{DecodeError, EncodeError},
};

pub use self::builtin::{
    BinTemplate, BoolTemplate, F32ArrayTemplate, F32Template, F64ArrayTemplate, F64Template,
    I16ArrayTemplate, I16Template, I32ArrayTemplate, I32Template, I64ArrayTemplate, I64Template,
    I8Template, ListTemplate, MapTemplate, OptionTemplate, StringTemplate, U16Template,
    U32Template, U64Template, U8Template, ValueTemplate,
};

mod builtin;

/// A serialization strategy for items of one type.
///
/// Implementations are stateless or immutable: `&self` methods allow one
/// template instance to serve any number of concurrent calls.
pub trait Template: Send + Sync + 'static {
    /// The item type this template serializes.
    type Item: 'static;

    /// Encodes `item` onto the encoder.
    fn write(&self, encoder: &mut Encoder, item: &Self::Item) -> Result<(), EncodeError>;

    /// Decodes one item, optionally reusing an existing allocation.
    ///
    /// When `reuse` is provided and structurally compatible with the
    /// decoded data, the template should mutate it in place and return it;
    /// otherwise it builds and returns a fresh item.
    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<Self::Item>,
    ) -> Result<Self::Item, DecodeError>;
}

/// A reference-counted template handle, as stored in the registry.
pub type SharedTemplate<T> = Arc<dyn Template<Item = T>>;

/// Encodes one item into a fresh byte vector using the given template.
pub fn pack_with<U: Template + ?Sized>(template: &U, item: &U::Item) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new();
    template.write(&mut encoder, item)?;
    Ok(encoder.into_bytes())
}

/// Decodes exactly one item from `bytes` using the given template.
///
/// The input must contain the item and nothing else; trailing bytes fail
/// with [`DecodeError::TrailingBytes`].
///
/// [`DecodeError::TrailingBytes`]: ../enum.DecodeError.html#variant.TrailingBytes
pub fn unpack_with<U: Template + ?Sized>(template: &U, bytes: &[u8]) -> Result<U::Item, DecodeError> {
    let mut decoder = Decoder::new(bytes);
    let item = template.read(&mut decoder, None)?;
    decoder.finish()?;
    Ok(item)
}

/// A thread-safe mapping from item types to their templates.
///
/// Lookups are keyed by `TypeId`, so each item type has at most one
/// registered template at a time. Registration replaces any previous
/// template for the type and hands the replaced one back, which lets
/// callers layer a custom template over a builtin and restore it later.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry preloaded with templates for the primitive
    /// types, `String`, `Vec<u8>`, the numeric vector types, and
    /// [`Value`](../enum.Value.html).
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(BoolTemplate);
        registry.register(U8Template);
        registry.register(U16Template);
        registry.register(U32Template);
        registry.register(U64Template);
        registry.register(I8Template);
        registry.register(I16Template);
        registry.register(I32Template);
        registry.register(I64Template);
        registry.register(F32Template);
        registry.register(F64Template);
        registry.register(StringTemplate);
        registry.register(BinTemplate);
        registry.register(I16ArrayTemplate);
        registry.register(I32ArrayTemplate);
        registry.register(I64ArrayTemplate);
        registry.register(F32ArrayTemplate);
        registry.register(F64ArrayTemplate);
        registry.register(ValueTemplate);
        registry
    }

    /// Registers a template for its item type, returning the template it
    /// replaced, if any.
    pub fn register<U: Template>(&self, template: U) -> Option<SharedTemplate<U::Item>> {
        self.register_shared::<U::Item>(Arc::new(template))
    }

    /// Registers an already-shared template handle.
    pub fn register_shared<T: 'static>(
        &self,
        template: SharedTemplate<T>,
    ) -> Option<SharedTemplate<T>> {
        trace!("registering template for {}", std::any::type_name::<T>());
        let mut templates = self
            .templates
            .write()
            .expect("template registry lock poisoned");
        templates
            .insert(TypeId::of::<T>(), Box::new(template))
            .map(|previous| {
                *previous
                    .downcast::<SharedTemplate<T>>()
                    .expect("registry entry keyed by item type")
            })
    }

    /// Looks up the template registered for `T`.
    pub fn get<T: 'static>(&self) -> Option<SharedTemplate<T>> {
        let templates = self
            .templates
            .read()
            .expect("template registry lock poisoned");
        templates
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<SharedTemplate<T>>())
            .map(Arc::clone)
    }

    /// Encodes `item` with the template registered for its type.
    pub fn pack<T: 'static>(&self, item: &T) -> Result<Vec<u8>, EncodeError> {
        let template = self.get::<T>().ok_or(EncodeError::UnknownType {
            type_name: std::any::type_name::<T>(),
        })?;
        pack_with(&*template, item)
    }

    /// Decodes exactly one item of type `T` from `bytes`.
    pub fn unpack<T: 'static>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        let template = self.lookup_for_decode::<T>()?;
        unpack_with(&*template, bytes)
    }

    /// Decodes one item of type `T`, reusing `target` where possible.
    pub fn unpack_into<T: 'static>(&self, bytes: &[u8], target: T) -> Result<T, DecodeError> {
        let template = self.lookup_for_decode::<T>()?;
        let mut decoder = Decoder::new(bytes);
        let item = template.read(&mut decoder, Some(target))?;
        decoder.finish()?;
        Ok(item)
    }

    fn lookup_for_decode<T: 'static>(&self) -> Result<SharedTemplate<T>, DecodeError> {
        self.get::<T>().ok_or(DecodeError::UnknownType {
            type_name: std::any::type_name::<T>(),
        })
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .templates
            .read()
            .map(|templates| templates.len())
            .unwrap_or(0);
        formatter
            .debug_struct("TemplateRegistry")
            .field("templates", &len)
            .finish()
    }
}

impl<U: Template + ?Sized> Template for Arc<U> {
    type Item = U::Item;

    fn write(&self, encoder: &mut Encoder, item: &Self::Item) -> Result<(), EncodeError> {
        (**self).write(encoder, item)
    }

    fn read(
        &self,
        decoder: &mut Decoder<'_>,
        reuse: Option<Self::Item>,
    ) -> Result<Self::Item, DecodeError> {
        (**self).read(decoder, reuse)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use std::sync::Arc;

    use super::{pack_with, unpack_with, StringTemplate, Template, TemplateRegistry};
    use crate::{
        decode::Decoder,
        encode::Encoder,
        error::{DecodeError, EncodeError},
    };

    #[test]
    fn registry_round_trips_builtins() {
        let registry = TemplateRegistry::with_builtins();
        let bytes = registry.pack(&42_u64).unwrap();
        assert_eq!(registry.unpack::<u64>(&bytes).unwrap(), 42);

        let bytes = registry.pack(&"text".to_owned()).unwrap();
        assert_eq!(registry.unpack::<String>(&bytes).unwrap(), "text");
    }

    #[test]
    fn missing_template_is_reported_by_type_name() {
        #[derive(Debug)]
        struct Unregistered;

        let registry = TemplateRegistry::new();
        let err = registry.pack(&Unregistered).unwrap_err();
        assert_matches!(
            err,
            EncodeError::UnknownType { type_name } if type_name.contains("Unregistered")
        );
        let err = registry.unpack::<Unregistered>(&[0xc0]).unwrap_err();
        assert_matches!(err, DecodeError::UnknownType { .. });
    }

    #[test]
    fn registration_replaces_and_returns_previous() {
        /// Encodes strings with their length prefixed, as a marker that
        /// this template (not the builtin) handled the call.
        struct UpperTemplate;

        impl Template for UpperTemplate {
            type Item = String;

            fn write(&self, encoder: &mut Encoder, item: &String) -> Result<(), EncodeError> {
                encoder.write_str(&item.to_uppercase())
            }

            fn read(
                &self,
                decoder: &mut Decoder<'_>,
                _reuse: Option<String>,
            ) -> Result<String, DecodeError> {
                Ok(decoder.read_str()?.to_owned())
            }
        }

        let registry = TemplateRegistry::with_builtins();
        let previous = registry.register(UpperTemplate);
        let builtin = previous.expect("builtin template was registered");

        let bytes = registry.pack(&"abc".to_owned()).unwrap();
        assert_eq!(registry.unpack::<String>(&bytes).unwrap(), "ABC");

        // Restoring the replaced handle reinstates the old behavior.
        registry.register_shared(builtin);
        let bytes = registry.pack(&"abc".to_owned()).unwrap();
        assert_eq!(registry.unpack::<String>(&bytes).unwrap(), "abc");
    }

    #[test]
    fn unpack_rejects_trailing_bytes() {
        let registry = TemplateRegistry::with_builtins();
        let mut bytes = registry.pack(&1_u64).unwrap();
        bytes.push(0x02);
        assert_matches!(
            registry.unpack::<u64>(&bytes).unwrap_err(),
            DecodeError::TrailingBytes { remaining: 1, .. }
        );
    }

    #[test]
    fn templates_compose_through_arc() {
        let template: Arc<StringTemplate> = Arc::new(StringTemplate);
        let bytes = pack_with(&template, &"shared".to_owned()).unwrap();
        assert_eq!(unpack_with(&template, &bytes).unwrap(), "shared");
    }
}
