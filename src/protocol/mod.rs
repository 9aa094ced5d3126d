//! Protocol Layer: Hand-Rolled Binary Encoding
//!
//! Prinsip desain:
//! - Little-endian, fixed width, tanpa padding
//! - Length-prefixed chunks: `[len: u32][payload]`
//! - Stateless: semua fungsi murni di atas byte buffer atau stream
//!
//! Wire format:
//! ```text
//! Chunk              := length:u32 ++ payload[length]
//! map<i32,u32>       := (key:i32 ++ value:u32){n}     n = len / 8
//! seq<i32>           := i32{n}                         n = len / 4
//! seq<u16>           := u16{n}                         n = len / 2
//! string / chars     := Chunk(utf8)
//! pair<string,i32>   := Chunk(utf8) ++ i32
//! ```

mod chunk;
mod primitive;

pub use chunk::{concat, encapsulate, peek_chunk, put_chunk, read_chunk, write_chunk};
pub use primitive::{
    decode_chars, decode_i32_seq, decode_i32_u32_map, decode_str_i32_pair, decode_string,
    decode_u16_seq, encode_chars, encode_i32_seq, encode_i32_u32_map, encode_str_i32_pair,
    encode_string, encode_u16_seq, write_i32, write_u16, write_u32, Interner,
};

/// Ukuran length prefix chunk
pub const CHUNK_HEADER_LEN: usize = 4;
pub const I32_WIDTH: usize = 4;
pub const U16_WIDTH: usize = 2;
/// `(key: i32, value: u32)`
pub const PAIR_WIDTH: usize = 8;
