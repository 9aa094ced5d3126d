//! Serializer binding: satu domain type, satu serializer, satu nama

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::io::{Read, Write};

use hashbrown::HashMap;

use super::Serializer;
use crate::error::{Error, Result};

type SerializeFn = fn(&mut dyn Write, &dyn Any) -> Result<()>;
type DeserializeFn = fn(&mut dyn Read) -> Result<Box<dyn Any>>;
type ViewFn = Box<dyn Fn(Box<dyn Any>) -> Box<dyn Any> + Send + Sync>;

/// Binding hasil resolve
///
/// Menyimpan entry point type-erased untuk `S::default().serialize(..)` dan
/// `S::default().deserialize(..)`, plus view yang mengubah value hasil decode
/// menjadi handle lain (mis. `Box<dyn LanguageModel>`).
pub struct SerializerBinding {
    name: String,
    serializer_type: &'static str,
    value_type: TypeId,
    value_type_name: &'static str,
    serialize: SerializeFn,
    deserialize: DeserializeFn,
    views: HashMap<TypeId, ViewFn>,
}

impl SerializerBinding {
    pub(crate) fn new<T, S>(name: String) -> Self
    where
        T: Any,
        S: Serializer<T>,
    {
        Self {
            name,
            serializer_type: type_name::<S>(),
            value_type: TypeId::of::<T>(),
            value_type_name: type_name::<T>(),
            serialize: serialize_erased::<T, S>,
            deserialize: deserialize_erased::<T, S>,
            views: HashMap::new(),
        }
    }

    pub(crate) fn add_view<T: Any, V: Any>(&mut self, view: fn(T) -> V) {
        debug_assert_eq!(self.value_type, TypeId::of::<T>());
        self.views.insert(
            TypeId::of::<V>(),
            Box::new(move |value: Box<dyn Any>| match value.downcast::<T>() {
                Ok(value) => Box::new(view(*value)) as Box<dyn Any>,
                Err(value) => value,
            }),
        );
    }

    /// Nama yang ditulis ke envelope
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serializer_type(&self) -> &'static str {
        self.serializer_type
    }

    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Cek apakah value bisa dibaca sebagai `V`
    pub fn can_cast_to<V: Any>(&self) -> bool {
        TypeId::of::<V>() == self.value_type || self.views.contains_key(&TypeId::of::<V>())
    }

    /// Serialize payload; error dari serializer dibungkus `InvocationFailure`
    pub fn serialize(&self, stream: &mut dyn Write, value: &dyn Any) -> Result<()> {
        (self.serialize)(stream, value).map_err(|e| self.invocation_failure(e))
    }

    /// Deserialize payload menjadi value type-erased
    pub fn deserialize(&self, stream: &mut dyn Read) -> Result<Box<dyn Any>> {
        (self.deserialize)(stream).map_err(|e| self.invocation_failure(e))
    }

    /// Ubah value hasil decode menjadi `V`: exact type, atau lewat view
    pub fn cast<V: Any>(&self, value: Box<dyn Any>) -> Result<V> {
        let value = match value.downcast::<V>() {
            Ok(value) => return Ok(*value),
            Err(value) => value,
        };

        if let Some(view) = self.views.get(&TypeId::of::<V>()) {
            if let Ok(value) = view(value).downcast::<V>() {
                return Ok(*value);
            }
        }

        Err(Error::TypeMismatch {
            expected: type_name::<V>().to_string(),
            found: self.value_type_name.to_string(),
        })
    }

    fn invocation_failure(&self, source: Error) -> Error {
        Error::InvocationFailure {
            serializer: self.name.clone(),
            source: Box::new(source),
        }
    }
}

impl fmt::Debug for SerializerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerBinding")
            .field("name", &self.name)
            .field("serializer_type", &self.serializer_type)
            .field("value_type", &self.value_type_name)
            .field("views", &self.views.len())
            .finish()
    }
}

fn serialize_erased<T: Any, S: Serializer<T>>(
    stream: &mut dyn Write,
    value: &dyn Any,
) -> Result<()> {
    let value = value
        .downcast_ref::<T>()
        .ok_or_else(|| Error::TypeMismatch {
            expected: type_name::<T>().to_string(),
            found: "value of another type".to_string(),
        })?;
    S::default().serialize(stream, value)
}

fn deserialize_erased<T: Any, S: Serializer<T>>(stream: &mut dyn Read) -> Result<Box<dyn Any>> {
    let value = S::default().deserialize(stream)?;
    Ok(Box::new(value))
}
