//! Storage layer: snapshot files berbasis mmap
//!
//! Satu file = satu envelope. Writer memakai buffered I/O + fsync, reader
//! memetakan file read-only sehingga header bisa diintip tanpa copy.

mod snapshot;

pub use snapshot::{write_snapshot, Snapshot};
