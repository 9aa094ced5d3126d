//! Snapshot file: satu envelope per file, dibaca lewat read-only mmap
//!
//! - Zero-copy read: header envelope bisa diintip langsung dari page cache
//! - Write atomik: envelope ditulis ke temp file di direktori yang sama,
//!   fsync, lalu di-rename menimpa target. Write yang gagal tidak menyentuh
//!   snapshot lama.

use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::envelope::{deserialize_interface, serialize_interface, NAME_LABEL};
use crate::error::{Error, Result};
use crate::protocol::{peek_chunk, CHUNK_HEADER_LEN};
use crate::registry::{Persistable, SerializerRegistry};

/// Tulis `obj` sebagai envelope ke `path`, menggantikan isi lama secara atomik
///
/// Serializer di-resolve sebelum file apa pun dibuat. Jika resolve, serialize,
/// atau I/O gagal, file di `path` tetap seperti sebelumnya.
///
/// Returns ukuran file dalam bytes.
pub fn write_snapshot<T, P>(registry: &SerializerRegistry, path: P, obj: &T) -> Result<u64>
where
    T: Persistable + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    registry.resolve_by_type_id(obj.as_any().type_id(), obj.type_name())?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        serialize_interface(registry, &mut writer, obj)?;
        writer.flush()?;
    }
    staged.as_file().sync_all()?;

    let file = staged.persist(path).map_err(|e| e.error)?;
    let size = file.metadata()?.len();

    info!("Wrote snapshot {:?} ({} bytes)", path, size);
    Ok(size)
}

/// Snapshot yang di-mmap read-only
pub struct Snapshot {
    mmap: Mmap,
    path: PathBuf,
}

impl Snapshot {
    /// Buka snapshot file
    ///
    /// File kosong tidak bisa di-mmap dan ditolak sebagai envelope terpotong.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let len = file.metadata()?.len() as usize;
        if len == 0 {
            return Err(Error::TruncatedChunk {
                label: NAME_LABEL.to_string(),
                declared: CHUNK_HEADER_LEN,
                available: 0,
            });
        }

        // SAFETY: File dibuka read-only; snapshot tidak diubah selama dipetakan
        let mmap = unsafe { Mmap::map(&file)? };
        debug!("Opened snapshot {:?} ({} bytes)", path, len);

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// Seluruh isi file (zero-copy)
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Nama serializer di header envelope, tanpa men-decode payload
    pub fn serializer_name(&self) -> Result<&str> {
        let name = self.header()?;
        std::str::from_utf8(name).map_err(|source| Error::InvalidUtf8 {
            label: NAME_LABEL.to_string(),
            source,
        })
    }

    /// Ukuran payload setelah header envelope
    pub fn payload_len(&self) -> Result<usize> {
        let name = self.header()?;
        Ok(self.len() - CHUNK_HEADER_LEN - name.len())
    }

    /// Deserialize isi snapshot sebagai `T`
    pub fn load<T: Any>(&self, registry: &SerializerRegistry) -> Result<T> {
        let mut reader = self.as_bytes();
        deserialize_interface(registry, &mut reader)
    }

    fn header(&self) -> Result<&[u8]> {
        let bytes = self.as_bytes();
        peek_chunk(bytes).ok_or_else(|| {
            let (declared, available) = match bytes.get(..CHUNK_HEADER_LEN) {
                Some(len) => (
                    LittleEndian::read_u32(len) as usize,
                    bytes.len() - CHUNK_HEADER_LEN,
                ),
                None => (CHUNK_HEADER_LEN, bytes.len()),
            };
            Error::TruncatedChunk {
                label: NAME_LABEL.to_string(),
                declared,
                available,
            }
        })
    }
}
