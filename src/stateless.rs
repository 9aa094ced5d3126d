//! Serializer untuk tipe tanpa state (marker / sentinel)

use std::fmt;
use std::io::{Read, Write};
use std::marker::PhantomData;

use crate::error::Result;
use crate::registry::Serializer;

/// Tidak menulis apa pun; deserialize menghasilkan `T::default()`
pub struct StatelessSerializer<T>(PhantomData<fn() -> T>);

impl<T> Default for StatelessSerializer<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> fmt::Debug for StatelessSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatelessSerializer<{}>", std::any::type_name::<T>())
    }
}

impl<T: Default + 'static> Serializer<T> for StatelessSerializer<T> {
    #[inline(always)]
    fn serialize(&self, _stream: &mut dyn Write, _data: &T) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn deserialize(&self, _stream: &mut dyn Read) -> Result<T> {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct EndOfSentence;

    #[test]
    fn test_writes_nothing_reads_nothing() {
        let serializer = StatelessSerializer::<EndOfSentence>::default();

        let mut out = Vec::new();
        serializer.serialize(&mut out, &EndOfSentence).unwrap();
        assert!(out.is_empty());

        let input = [0xAAu8, 0xBB];
        let mut reader = &input[..];
        assert_eq!(serializer.deserialize(&mut reader).unwrap(), EndOfSentence);
        // Stream tidak disentuh
        assert_eq!(reader.len(), 2);
    }
}
