//! Primitive codec: fixed-width values, arrays, map, UTF-8 text
//!
//! Semua encoding little-endian, fixed width, tanpa padding. Fungsi decode
//! bekerja pada region `bytes[start..start + length]`; region di luar buffer
//! atau `length` yang bukan kelipatan lebar elemen adalah bug di caller
//! (precondition violation), bukan kondisi yang bisa di-recover.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use hashbrown::HashSet;

use super::chunk::{encapsulate, write_chunk};
use super::{I32_WIDTH, PAIR_WIDTH, U16_WIDTH};
use crate::error::{Error, Result};

/// Encode sequence of i32 (4 bytes/element)
pub fn encode_i32_seq(values: &[i32]) -> Vec<u8> {
    let mut out = vec![0u8; values.len() * I32_WIDTH];
    LittleEndian::write_i32_into(values, &mut out);
    out
}

/// Decode sequence of i32 dari region `[start, start + length)`
///
/// # Panics
/// Panic jika `length` bukan kelipatan 4 atau region di luar buffer
pub fn decode_i32_seq(bytes: &[u8], start: usize, length: usize) -> Vec<i32> {
    let region = region(bytes, start, length, I32_WIDTH);
    let mut out = vec![0i32; length / I32_WIDTH];
    LittleEndian::read_i32_into(region, &mut out);
    out
}

/// Encode sequence of u16 (2 bytes/element)
pub fn encode_u16_seq(values: &[u16]) -> Vec<u8> {
    let mut out = vec![0u8; values.len() * U16_WIDTH];
    LittleEndian::write_u16_into(values, &mut out);
    out
}

/// Decode sequence of u16 dari region `[start, start + length)`
///
/// # Panics
/// Panic jika `length` bukan kelipatan 2 atau region di luar buffer
pub fn decode_u16_seq(bytes: &[u8], start: usize, length: usize) -> Vec<u16> {
    let region = region(bytes, start, length, U16_WIDTH);
    let mut out = vec![0u16; length / U16_WIDTH];
    LittleEndian::read_u16_into(region, &mut out);
    out
}

/// Encode map i32 -> u32 sebagai pasangan `(key, value)`
///
/// Pasangan ditulis urut berdasarkan key supaya output deterministik.
pub fn encode_i32_u32_map(map: &HashMap<i32, u32>) -> Vec<u8> {
    let mut pairs: Vec<(i32, u32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
    pairs.sort_unstable_by_key(|&(k, _)| k);

    let mut out = vec![0u8; pairs.len() * PAIR_WIDTH];
    for (slot, (key, value)) in out.chunks_exact_mut(PAIR_WIDTH).zip(pairs) {
        LittleEndian::write_i32(&mut slot[..I32_WIDTH], key);
        LittleEndian::write_u32(&mut slot[I32_WIDTH..], value);
    }
    out
}

/// Decode map i32 -> u32; key duplikat ditolak
///
/// # Panics
/// Panic jika `length` bukan kelipatan 8 atau region di luar buffer
pub fn decode_i32_u32_map(bytes: &[u8], start: usize, length: usize) -> Result<HashMap<i32, u32>> {
    let region = region(bytes, start, length, PAIR_WIDTH);
    let mut map = HashMap::with_capacity(length / PAIR_WIDTH);

    for pair in region.chunks_exact(PAIR_WIDTH) {
        let key = LittleEndian::read_i32(&pair[..I32_WIDTH]);
        let value = LittleEndian::read_u32(&pair[I32_WIDTH..]);
        if map.insert(key, value).is_some() {
            return Err(Error::DuplicateKey { key });
        }
    }

    Ok(map)
}

/// Encode string sebagai `Chunk(utf8)`
#[inline]
pub fn encode_string(value: &str) -> Vec<u8> {
    write_chunk(value.as_bytes())
}

/// Decode region UTF-8 mentah (payload chunk, tanpa length prefix)
///
/// # Panics
/// Panic jika region di luar buffer
pub fn decode_string(bytes: &[u8], start: usize, length: usize) -> Result<String> {
    decode_utf8(slice(bytes, start, length), "string").map(str::to_owned)
}

/// Encode char sequence sebagai `Chunk(utf8)`
pub fn encode_chars(chars: &[char]) -> Vec<u8> {
    let text: String = chars.iter().collect();
    write_chunk(text.as_bytes())
}

/// Decode region UTF-8 mentah menjadi char sequence
///
/// # Panics
/// Panic jika region di luar buffer
pub fn decode_chars(bytes: &[u8], start: usize, length: usize) -> Result<Vec<char>> {
    decode_utf8(slice(bytes, start, length), "char sequence").map(|s| s.chars().collect())
}

/// Encode pasangan `(string, i32)`: `Chunk(utf8 key) ++ i32`
pub fn encode_str_i32_pair(key: &str, value: i32) -> Vec<u8> {
    let mut out = encapsulate(&[key.as_bytes()]);
    out.extend_from_slice(&value.to_le_bytes());
    out
}

/// Decode pasangan `(string, i32)`
///
/// `key_len` adalah panjang key saja; region yang dibaca `key_len + 4` bytes,
/// dimulai setelah length prefix key.
///
/// # Panics
/// Panic jika `key_len + 4` bytes mulai dari `start` di luar buffer
pub fn decode_str_i32_pair(
    bytes: &[u8],
    start: usize,
    key_len: usize,
) -> Result<(String, i32)> {
    let region = slice(bytes, start, key_len.saturating_add(I32_WIDTH));
    let (key, value) = region.split_at(key_len);
    let key = decode_utf8(key, "pair key")?.to_owned();
    Ok((key, LittleEndian::read_i32(value)))
}

/// Tulis single i32 ke stream
#[inline]
pub fn write_i32<W: Write + ?Sized>(stream: &mut W, value: i32) -> Result<()> {
    stream.write_i32::<LittleEndian>(value)?;
    Ok(())
}

/// Tulis single u32 ke stream
#[inline]
pub fn write_u32<W: Write + ?Sized>(stream: &mut W, value: u32) -> Result<()> {
    stream.write_u32::<LittleEndian>(value)?;
    Ok(())
}

/// Tulis single u16 ke stream
#[inline]
pub fn write_u16<W: Write + ?Sized>(stream: &mut W, value: u16) -> Result<()> {
    stream.write_u16::<LittleEndian>(value)?;
    Ok(())
}

/// Dedup string hasil decode
///
/// Model besar menyimpan vocabulary yang sama berulang kali; interner
/// membuat semua kemunculan berbagi satu alokasi.
#[derive(Debug, Default)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kembalikan instance bersama untuk `value`
    pub fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(value) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(value);
        self.strings.insert(Arc::clone(&shared));
        shared
    }

    /// Decode region UTF-8 lalu intern hasilnya
    ///
    /// # Panics
    /// Panic jika region di luar buffer
    pub fn decode_string(
        &mut self,
        bytes: &[u8],
        start: usize,
        length: usize,
    ) -> Result<Arc<str>> {
        let text = decode_utf8(slice(bytes, start, length), "string")?;
        Ok(self.intern(text))
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[inline(always)]
fn region(bytes: &[u8], start: usize, length: usize, width: usize) -> &[u8] {
    assert!(
        length % width == 0,
        "length {} is not a multiple of element width {}",
        length,
        width
    );
    slice(bytes, start, length)
}

/// `bytes[start..start + length]`, dengan pesan panic yang jelas (termasuk overflow)
#[inline(always)]
fn slice(bytes: &[u8], start: usize, length: usize) -> &[u8] {
    let end = start.checked_add(length);
    match end.and_then(|end| bytes.get(start..end)) {
        Some(region) => region,
        None => panic!(
            "region {}+{} out of bounds for buffer of {} bytes",
            start,
            length,
            bytes.len()
        ),
    }
}

#[inline]
fn decode_utf8<'a>(bytes: &'a [u8], label: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|source| Error::InvalidUtf8 {
        label: label.to_string(),
        source,
    })
}
