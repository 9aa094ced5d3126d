//! Error types untuk serialization core
//!
//! Semua error fatal untuk call yang sedang berjalan. Tidak ada recovery
//! parsial: setelah error, posisi stream tidak dijamin valid.

use thiserror::Error;

/// Result alias untuk operasi augury
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type
#[derive(Error, Debug)]
pub enum Error {
    /// Panjang chunk yang dideklarasikan melebihi byte yang tersedia
    #[error(
        "Was not able to read enough bytes for {label}: declared {declared}, available {available}"
    )]
    TruncatedChunk {
        label: String,
        declared: usize,
        available: usize,
    },

    #[error("Could not find a serializer for: {type_name}")]
    NoSerializerFound { type_name: String },

    #[error("More than one serializer implements {type_name}: {existing} and {candidate}")]
    AmbiguousSerializer {
        type_name: String,
        existing: String,
        candidate: String,
    },

    #[error("Serializer name already registered: {name}")]
    DuplicateSerializerName { name: String },

    #[error("Invalid serializer name: {name:?}")]
    InvalidSerializerName { name: String },

    #[error("Failed to find a type matching name: {name}")]
    TypeNotFound { name: String },

    /// Value hasil deserialize tidak cocok dengan tipe yang diminta caller
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Error dari dalam serializer yang di-resolve (tidak di-swallow)
    #[error("Serializer {serializer} failed: {source}")]
    InvocationFailure {
        serializer: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid UTF-8 in {label}: {source}")]
    InvalidUtf8 {
        label: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Duplicate key in map: {key}")]
    DuplicateKey { key: i32 },

    #[error("Serializer registry has not been installed")]
    RegistryNotInstalled,

    #[error("Serializer registry is already installed")]
    RegistryAlreadyInstalled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True jika error (atau penyebab di dalam serializer) adalah chunk truncation
    pub fn is_truncation(&self) -> bool {
        match self {
            Error::TruncatedChunk { .. } => true,
            Error::InvocationFailure { source, .. } => source.is_truncation(),
            Error::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }

    /// Error code untuk logging
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::TruncatedChunk { .. } => "TRUNCATED_CHUNK",
            Error::NoSerializerFound { .. } => "NO_SERIALIZER_FOUND",
            Error::AmbiguousSerializer { .. } => "AMBIGUOUS_SERIALIZER",
            Error::DuplicateSerializerName { .. } => "DUPLICATE_SERIALIZER_NAME",
            Error::InvalidSerializerName { .. } => "INVALID_SERIALIZER_NAME",
            Error::TypeNotFound { .. } => "TYPE_NOT_FOUND",
            Error::TypeMismatch { .. } => "TYPE_MISMATCH",
            Error::InvocationFailure { .. } => "INVOCATION_FAILURE",
            Error::InvalidUtf8 { .. } => "INVALID_UTF8",
            Error::DuplicateKey { .. } => "DUPLICATE_KEY",
            Error::RegistryNotInstalled => "REGISTRY_NOT_INSTALLED",
            Error::RegistryAlreadyInstalled => "REGISTRY_ALREADY_INSTALLED",
            Error::Io(_) => "IO_ERROR",
        }
    }
}
