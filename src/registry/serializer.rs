//! Serializer contract

use std::any::Any;
use std::io::{Read, Write};

use crate::error::Result;

/// Serializer untuk domain type `T`
///
/// Implementasi dibuat tanpa parameter (`Default`) setiap kali dipakai, jadi
/// serializer tidak boleh membawa state antar call. Payload yang ditulis
/// harus self-delimiting: envelope tidak menambah length prefix di sekitarnya.
pub trait Serializer<T>: Default + 'static {
    fn serialize(&self, stream: &mut dyn Write, data: &T) -> Result<()>;

    fn deserialize(&self, stream: &mut dyn Read) -> Result<T>;
}

/// Objek yang runtime type-nya bisa dipakai untuk resolve serializer
///
/// Otomatis diimplementasikan untuk semua `T: Any`. Capability traits memakai
/// ini sebagai supertrait, jadi `&dyn LanguageModel` tetap membawa concrete
/// type-nya ke envelope.
///
/// Untuk `Box<dyn Trait>`, kirim `&*boxed`; box-nya sendiri juga `Any`
/// dan akan di-resolve sebagai tipe `Box`.
pub trait Persistable: Any {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;
}

impl<T: Any> Persistable for T {
    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline(always)]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
