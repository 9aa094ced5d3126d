//! Augury - Binary Serialization Core
//!
//! Arsitektur:
//! - Protocol: hand-rolled little-endian codec + length-prefixed chunks
//! - Registry: serializer binding eksplisit, satu per domain type
//! - Envelope: `Chunk(nama serializer) ++ payload`, reader tidak perlu tahu
//!   concrete type di depan
//! - Storage: snapshot file berbasis mmap
//!
//! ```no_run
//! use augury::envelope::{deserialize_interface, serialize_interface};
//! use augury::registry::RegistryBuilder;
//! use augury::stateless::StatelessSerializer;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct EndOfSentence;
//!
//! let mut builder = RegistryBuilder::new();
//! builder.register_named::<EndOfSentence, StatelessSerializer<EndOfSentence>>("eos")?;
//! let registry = builder.build();
//!
//! let mut bytes = Vec::new();
//! serialize_interface(&registry, &mut bytes, &EndOfSentence)?;
//! let back: EndOfSentence = deserialize_interface(&registry, &mut bytes.as_slice())?;
//! assert_eq!(back, EndOfSentence);
//! # Ok::<(), augury::Error>(())
//! ```

pub mod capability;
pub mod envelope;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod stateless;
pub mod storage;

pub use error::{Error, Result};
pub use registry::{Persistable, RegistryBuilder, Serializer, SerializerRegistry};
