//! Chunk framing: `[len: u32 LE][payload: len bytes]`
//!
//! Chunk adalah unit framing dasar. Reader harus mengonsumsi tepat `len`
//! bytes atau gagal dengan `TruncatedChunk`; setelah itu stream dianggap
//! rusak dan tidak boleh dipakai lagi.

use std::io::{ErrorKind, Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::CHUNK_HEADER_LEN;
use crate::error::{Error, Result};

/// Batas pre-alokasi buffer payload. Buffer tumbuh sesuai byte yang benar-benar
/// terbaca, jadi length palsu tidak bisa memaksa alokasi besar.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Bungkus payload dengan length prefix 4-byte little-endian
///
/// # Panics
/// Panic jika payload lebih besar dari `u32::MAX` bytes
#[inline]
pub fn write_chunk(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHUNK_HEADER_LEN + payload.len());
    out.extend_from_slice(&chunk_len(payload.len()).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Tulis chunk langsung ke stream
pub fn put_chunk<W: Write + ?Sized>(stream: &mut W, payload: &[u8]) -> Result<()> {
    stream.write_u32::<LittleEndian>(chunk_len(payload.len()))?;
    stream.write_all(payload)?;
    Ok(())
}

/// Baca satu chunk dari stream
///
/// `label` hanya untuk diagnostik dan ikut di pesan error.
pub fn read_chunk<R: Read + ?Sized>(stream: &mut R, label: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; CHUNK_HEADER_LEN];
    let got = read_full(stream, &mut header)?;
    if got < CHUNK_HEADER_LEN {
        return Err(Error::TruncatedChunk {
            label: label.to_string(),
            declared: CHUNK_HEADER_LEN,
            available: got,
        });
    }

    let declared = LittleEndian::read_u32(&header) as usize;
    let mut payload = Vec::with_capacity(declared.min(PREALLOC_LIMIT));
    let available = Read::take(&mut *stream, declared as u64).read_to_end(&mut payload)?;

    if available != declared {
        return Err(Error::TruncatedChunk {
            label: label.to_string(),
            declared,
            available,
        });
    }

    Ok(payload)
}

/// Gabungkan beberapa buffer tanpa framing
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let size = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(size);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Gabungkan buffer lalu bungkus sebagai satu chunk
///
/// Bagian di dalam dianggap sudah di-frame sendiri (atau tidak perlu).
pub fn encapsulate(parts: &[&[u8]]) -> Vec<u8> {
    let size: usize = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(CHUNK_HEADER_LEN + size);
    out.extend_from_slice(&chunk_len(size).to_le_bytes());
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Intip payload chunk pertama di buffer tanpa mengonsumsi apa pun
///
/// Returns `None` jika header atau payload tidak lengkap.
#[inline]
pub fn peek_chunk(buf: &[u8]) -> Option<&[u8]> {
    if buf.len() < CHUNK_HEADER_LEN {
        return None;
    }
    let len = LittleEndian::read_u32(&buf[..CHUNK_HEADER_LEN]) as usize;
    buf.get(CHUNK_HEADER_LEN..CHUNK_HEADER_LEN.checked_add(len)?)
}

#[inline(always)]
fn chunk_len(len: usize) -> u32 {
    assert!(
        len <= u32::MAX as usize,
        "chunk payload of {} bytes does not fit a u32 length",
        len
    );
    len as u32
}

/// Isi `buf` sebanyak mungkin; berhenti di EOF. Returns jumlah byte terbaca.
fn read_full<R: Read + ?Sized>(stream: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_chunk_layout() {
        assert_eq!(write_chunk(b"hi"), vec![0x02, 0x00, 0x00, 0x00, 0x68, 0x69]);
        assert_eq!(write_chunk(&[]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_read_chunk_consumes_exactly() {
        let mut bytes = write_chunk(b"abc");
        bytes.extend_from_slice(b"rest");
        let mut cursor = Cursor::new(bytes);

        assert_eq!(read_chunk(&mut cursor, "test").unwrap(), b"abc");
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_truncated_payload() {
        // Klaim 10 bytes, hanya ada 3
        let mut bytes = 10u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");

        let err = read_chunk(&mut bytes.as_slice(), "Class name").unwrap_err();
        match err {
            Error::TruncatedChunk {
                label,
                declared,
                available,
            } => {
                assert_eq!(label, "Class name");
                assert_eq!(declared, 10);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_header() {
        let bytes = [0x01u8, 0x00];
        let err = read_chunk(&mut &bytes[..], "header").unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedChunk {
                declared: 4,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_huge_declared_length_fails_without_allocating() {
        let bytes = u32::MAX.to_le_bytes();
        let err = read_chunk(&mut &bytes[..], "huge").unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn test_put_chunk_matches_write_chunk() {
        let mut out = Vec::new();
        put_chunk(&mut out, b"payload").unwrap();
        assert_eq!(out, write_chunk(b"payload"));
    }

    #[test]
    fn test_encapsulate_and_concat() {
        let a: &[u8] = &[1, 2];
        let b: &[u8] = &[3];
        assert_eq!(concat(&[a, b]), vec![1, 2, 3]);
        assert_eq!(encapsulate(&[a, b]), vec![3, 0, 0, 0, 1, 2, 3]);
        assert_eq!(encapsulate(&[]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_peek_chunk() {
        let bytes = write_chunk(b"Foo");
        assert_eq!(peek_chunk(&bytes), Some(&b"Foo"[..]));
        assert_eq!(peek_chunk(&bytes[..5]), None);
        assert_eq!(peek_chunk(&[1, 0]), None);
    }
}
