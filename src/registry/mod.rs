//! Serializer Registry: explicit, immutable, bidirectional
//!
//! Prinsip desain:
//! - Populated sekali saat startup lewat [`RegistryBuilder`]
//! - Tepat satu serializer per domain type, tepat satu binding per nama;
//!   dicek saat registrasi, bukan saat call
//! - Index by-type dan by-name menunjuk ke binding yang sama, jadi nama yang
//!   ditulis saat serialize selalu resolve kembali ke binding yang sama
//! - Read-only setelah `build()`, aman di-share antar thread

mod binding;
mod serializer;

pub use binding::SerializerBinding;
pub use serializer::{Persistable, Serializer};

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use hashbrown::HashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Registry proses-wide, di-set sekali
static GLOBAL: OnceCell<SerializerRegistry> = OnceCell::new();

/// Builder untuk [`SerializerRegistry`]
#[derive(Default)]
pub struct RegistryBuilder {
    by_type: HashMap<TypeId, SerializerBinding>,
    by_name: HashMap<String, TypeId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Daftarkan `S` sebagai serializer untuk `T` dengan nama eksplisit
    ///
    /// Nama adalah identitas di wire, ditulis apa adanya ke setiap envelope.
    /// Harus stabil antar versi program dan compiler (jangan pakai `type_name`).
    pub fn register_named<T, S>(&mut self, name: impl Into<String>) -> Result<&mut Self>
    where
        T: Any,
        S: Serializer<T>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidSerializerName { name });
        }

        if let Some(existing) = self.by_type.get(&TypeId::of::<T>()) {
            return Err(Error::AmbiguousSerializer {
                type_name: type_name::<T>().to_string(),
                existing: existing.serializer_type().to_string(),
                candidate: type_name::<S>().to_string(),
            });
        }

        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateSerializerName { name });
        }

        debug!(
            "Registered serializer {} for {} as {:?}",
            type_name::<S>(),
            type_name::<T>(),
            name
        );
        let binding = SerializerBinding::new::<T, S>(name.clone());
        self.by_name.insert(name, TypeId::of::<T>());
        self.by_type.insert(TypeId::of::<T>(), binding);
        Ok(self)
    }

    /// Izinkan value `T` dibaca kembali sebagai `V`
    ///
    /// Dipakai untuk abstract handle, mis. `|m: Trigram| Box::new(m) as Box<dyn LanguageModel>`.
    pub fn register_view<T, V>(&mut self, view: fn(T) -> V) -> Result<&mut Self>
    where
        T: Any,
        V: Any,
    {
        let binding = self
            .by_type
            .get_mut(&TypeId::of::<T>())
            .ok_or_else(|| Error::NoSerializerFound {
                type_name: type_name::<T>().to_string(),
            })?;
        binding.add_view::<T, V>(view);
        Ok(self)
    }

    /// Bekukan menjadi registry immutable
    pub fn build(self) -> SerializerRegistry {
        let mut by_type = HashMap::with_capacity(self.by_type.len());
        let mut by_name = HashMap::with_capacity(self.by_type.len());

        for (type_id, binding) in self.by_type {
            let binding = Arc::new(binding);
            by_name.insert(binding.name().to_string(), Arc::clone(&binding));
            by_type.insert(type_id, binding);
        }

        SerializerRegistry { by_type, by_name }
    }
}

/// Registry immutable hasil [`RegistryBuilder::build`]
#[derive(Debug, Default)]
pub struct SerializerRegistry {
    by_type: HashMap<TypeId, Arc<SerializerBinding>>,
    by_name: HashMap<String, Arc<SerializerBinding>>,
}

impl SerializerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve serializer untuk domain type `T`
    pub fn resolve_by_contract<T: Any>(&self) -> Result<&SerializerBinding> {
        self.resolve_by_type_id(TypeId::of::<T>(), type_name::<T>())
    }

    /// Resolve berdasarkan runtime type; `type_name` hanya untuk pesan error
    pub fn resolve_by_type_id(
        &self,
        type_id: TypeId,
        type_name: &str,
    ) -> Result<&SerializerBinding> {
        match self.by_type.get(&type_id) {
            Some(binding) => Ok(&**binding),
            None => {
                warn!("Could not find a serializer for {}", type_name);
                Err(Error::NoSerializerFound {
                    type_name: type_name.to_string(),
                })
            }
        }
    }

    /// Resolve berdasarkan nama yang tercatat di envelope
    pub fn resolve_by_name(&self, name: &str) -> Result<&SerializerBinding> {
        match self.by_name.get(name) {
            Some(binding) => Ok(&**binding),
            None => {
                warn!("Failed to find a type matching name: {}", name);
                Err(Error::TypeNotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Semua nama terdaftar (urutan tidak ditentukan)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Pasang registry proses-wide; hanya boleh sekali
pub fn install(registry: SerializerRegistry) -> Result<&'static SerializerRegistry> {
    let count = registry.len();
    GLOBAL.set(registry).map_err(|_| Error::RegistryAlreadyInstalled)?;
    info!("Installed serializer registry with {} bindings", count);
    global()
}

/// Registry proses-wide yang sudah dipasang
pub fn global() -> Result<&'static SerializerRegistry> {
    GLOBAL.get().ok_or(Error::RegistryNotInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stateless::StatelessSerializer;
    use std::fmt::Debug;
    use std::io::{Read, Write};

    #[derive(Debug, Default, PartialEq)]
    struct Marker;

    #[derive(Debug, Default, PartialEq)]
    struct Other;

    #[derive(Default)]
    struct MarkerSerializerB;

    impl Serializer<Marker> for MarkerSerializerB {
        fn serialize(&self, _stream: &mut dyn Write, _data: &Marker) -> Result<()> {
            Ok(())
        }

        fn deserialize(&self, _stream: &mut dyn Read) -> Result<Marker> {
            Ok(Marker)
        }
    }

    #[test]
    fn test_zero_implementers() {
        let registry = SerializerRegistry::builder().build();
        let err = registry.resolve_by_contract::<Marker>().unwrap_err();
        assert!(matches!(err, Error::NoSerializerFound { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_two_implementers_is_ambiguous() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_named::<Marker, StatelessSerializer<Marker>>("Marker")
            .unwrap();
        let err = builder
            .register_named::<Marker, MarkerSerializerB>("Marker")
            .err()
            .unwrap();

        match err {
            Error::AmbiguousSerializer { existing, candidate, .. } => {
                assert!(existing.contains("StatelessSerializer"));
                assert!(candidate.contains("MarkerSerializerB"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_exactly_one_is_deterministic() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_named::<Marker, StatelessSerializer<Marker>>("Marker")
            .unwrap()
            .register_named::<Other, StatelessSerializer<Other>>("Other")
            .unwrap();
        let registry = builder.build();

        let first = registry.resolve_by_contract::<Marker>().unwrap().name().to_string();
        let second = registry.resolve_by_contract::<Marker>().unwrap().name().to_string();
        assert_eq!(first, second);
        assert_eq!(first, "Marker");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_wire_name_is_exactly_the_registered_name() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_named::<Marker, StatelessSerializer<Marker>>("augury.Marker/v1")
            .unwrap();
        let registry = builder.build();

        let binding = registry.resolve_by_contract::<Marker>().unwrap();
        assert_eq!(binding.name(), "augury.Marker/v1");
        assert_ne!(binding.name(), binding.serializer_type());
        assert!(registry.resolve_by_name("augury.Marker/v1").is_ok());

        // Nama Rust dari serializer bukan identitas di wire
        let err = registry
            .resolve_by_name(type_name::<StatelessSerializer<Marker>>())
            .unwrap_err();
        assert!(matches!(err, Error::TypeNotFound { .. }));
    }

    #[test]
    fn test_name_resolves_to_same_binding() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_named::<Marker, StatelessSerializer<Marker>>("Marker")
            .unwrap();
        let registry = builder.build();

        let by_contract = registry.resolve_by_contract::<Marker>().unwrap();
        let by_name = registry.resolve_by_name(by_contract.name()).unwrap();
        assert!(std::ptr::eq(by_contract, by_name));
        assert_eq!(by_name.value_type(), TypeId::of::<Marker>());
    }

    #[test]
    fn test_unknown_name() {
        let registry = SerializerRegistry::builder().build();
        let err = registry.resolve_by_name("NoSuchSerializer").unwrap_err();
        assert!(matches!(err, Error::TypeNotFound { name } if name == "NoSuchSerializer"));
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_named::<Marker, StatelessSerializer<Marker>>("Foo")
            .unwrap();

        let err = builder
            .register_named::<Other, StatelessSerializer<Other>>("Foo")
            .err()
            .unwrap();
        assert!(matches!(err, Error::DuplicateSerializerName { .. }));

        let err = builder
            .register_named::<Other, StatelessSerializer<Other>>("  ")
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidSerializerName { .. }));

        // Registrasi yang gagal tidak meninggalkan sisa
        let registry = builder.build();
        assert!(!registry.contains::<Other>());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Foo"]);
    }

    #[test]
    fn test_view_requires_registered_type() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register_view::<Marker, Box<dyn Debug>>(|m| Box::new(m) as Box<dyn Debug>)
            .err()
            .unwrap();
        assert!(matches!(err, Error::NoSerializerFound { .. }));
    }

    #[test]
    fn test_cast_through_view() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_named::<Marker, StatelessSerializer<Marker>>("Marker")
            .unwrap()
            .register_view::<Marker, Box<dyn Debug>>(|m| Box::new(m) as Box<dyn Debug>)
            .unwrap();
        let registry = builder.build();
        let binding = registry.resolve_by_contract::<Marker>().unwrap();

        assert!(binding.can_cast_to::<Marker>());
        assert!(binding.can_cast_to::<Box<dyn Debug>>());
        assert!(!binding.can_cast_to::<Other>());

        let viewed: Box<dyn Debug> = binding.cast(Box::new(Marker)).unwrap();
        assert_eq!(format!("{viewed:?}"), "Marker");

        let err = binding.cast::<Other>(Box::new(Marker)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
