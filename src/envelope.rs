//! Envelope Protocol
//!
//! Layout:
//! ┌─────────────────────────────────────────────────────┐
//! │ Chunk(utf8 serializer name)                         │
//! ├─────────────────────────────────────────────────────┤
//! │ Payload (serializer-defined, self-delimiting)       │
//! └─────────────────────────────────────────────────────┘
//!
//! Reader tidak perlu tahu concrete type di depan: nama serializer di header
//! di-resolve lewat registry, lalu value dikembalikan sebagai tipe yang
//! diminta caller (exact type atau view yang terdaftar).

use std::any::Any;
use std::io::{Read, Write};

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{put_chunk, read_chunk};
use crate::registry::{self, Persistable, SerializerRegistry};

/// Label chunk header untuk diagnostik
pub const NAME_LABEL: &str = "serializer name";

/// Tulis envelope untuk `obj`
///
/// Serializer di-resolve dari runtime type `obj`, jadi `&dyn LanguageModel`
/// juga bisa dipakai. Untuk `Box<dyn Trait>` kirim `&*boxed`.
pub fn serialize_interface<T>(
    registry: &SerializerRegistry,
    stream: &mut dyn Write,
    obj: &T,
) -> Result<()>
where
    T: Persistable + ?Sized,
{
    let value = obj.as_any();
    let binding = registry.resolve_by_type_id(value.type_id(), obj.type_name())?;

    debug!(
        "Serializing {} with {}",
        binding.value_type_name(),
        binding.name()
    );

    put_chunk(stream, binding.name().as_bytes())?;
    binding.serialize(stream, value)
}

/// Baca envelope dan kembalikan value sebagai `T`
pub fn deserialize_interface<T: Any>(
    registry: &SerializerRegistry,
    stream: &mut dyn Read,
) -> Result<T> {
    let name = read_name(stream)?;
    let binding = registry.resolve_by_name(&name)?;

    debug!(
        "Deserializing {} with {} as {}",
        binding.value_type_name(),
        name,
        std::any::type_name::<T>()
    );

    let value = binding.deserialize(stream)?;
    binding.cast::<T>(value)
}

/// [`serialize_interface`] dengan registry proses-wide
pub fn serialize_global<T>(stream: &mut dyn Write, obj: &T) -> Result<()>
where
    T: Persistable + ?Sized,
{
    serialize_interface(registry::global()?, stream, obj)
}

/// [`deserialize_interface`] dengan registry proses-wide
pub fn deserialize_global<T: Any>(stream: &mut dyn Read) -> Result<T> {
    deserialize_interface(registry::global()?, stream)
}

/// Baca header envelope (nama serializer) saja
pub fn read_name(stream: &mut dyn Read) -> Result<String> {
    let bytes = read_chunk(stream, NAME_LABEL)?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidUtf8 {
        label: NAME_LABEL.to_string(),
        source: e.utf8_error(),
    })
}
