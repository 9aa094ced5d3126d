//! Augury - Binary Serialization Core
//!
//! PoC benchmark untuk codec dan envelope.
//! Untuk inspeksi snapshot file: cargo run --release --bin augury_inspect -- <PATH>

use std::collections::HashMap;
use std::io::{Read, Write};
use std::time::Instant;

use augury::envelope::{deserialize_interface, serialize_interface};
use augury::protocol::{
    decode_i32_seq, decode_i32_u32_map, encode_i32_seq, encode_i32_u32_map, put_chunk, read_chunk,
};
use augury::{RegistryBuilder, Result, Serializer};

/// Model dummy untuk benchmark envelope
#[derive(Debug, Default, PartialEq)]
struct CountTable {
    counts: HashMap<i32, u32>,
}

#[derive(Default)]
struct CountTableSerializer;

impl Serializer<CountTable> for CountTableSerializer {
    fn serialize(&self, stream: &mut dyn Write, data: &CountTable) -> Result<()> {
        put_chunk(stream, &encode_i32_u32_map(&data.counts))
    }

    fn deserialize(&self, stream: &mut dyn Read) -> Result<CountTable> {
        let bytes = read_chunk(stream, "counts")?;
        let counts = decode_i32_u32_map(&bytes, 0, bytes.len())?;
        Ok(CountTable { counts })
    }
}

fn main() {
    println!("🔮 Augury Serialization Core - PoC");
    println!("==================================\n");

    benchmark_primitive();

    if let Err(e) = benchmark_envelope() {
        eprintln!("❌ Envelope benchmark failed: {}", e);
        std::process::exit(1);
    }

    println!("\n✅ All benchmarks complete!");
}

fn benchmark_primitive() {
    println!("📊 Primitive Codec Benchmark (seq<i32>)");
    println!("---------------------------------------");

    const ITERATIONS: usize = 100_000;
    const ELEMENTS: usize = 256;

    let values: Vec<i32> = (0..ELEMENTS as i32).map(|v| v * 7 - 900).collect();

    let start = Instant::now();
    let mut total_bytes = 0usize;
    for _ in 0..ITERATIONS {
        total_bytes += encode_i32_seq(&values).len();
    }
    let encode_duration = start.elapsed();

    let encoded = encode_i32_seq(&values);
    let start = Instant::now();
    let mut checksum = 0i64;
    for _ in 0..ITERATIONS {
        checksum += decode_i32_seq(&encoded, 0, encoded.len())[ELEMENTS - 1] as i64;
    }
    let decode_duration = start.elapsed();

    let encode_ns = encode_duration.as_nanos() as f64 / ITERATIONS as f64;
    let decode_ns = decode_duration.as_nanos() as f64 / ITERATIONS as f64;

    println!("  Elements: {} ({} bytes)", ELEMENTS, encoded.len());
    println!("  Operations: {}", ITERATIONS);
    println!("  Encode latency: {:.2} ns/op", encode_ns);
    println!("  Decode latency: {:.2} ns/op", decode_ns);
    println!(
        "  Encode throughput: {:.2} MB/sec",
        total_bytes as f64 / encode_duration.as_secs_f64() / 1_000_000.0
    );
    println!("  (checksum {})\n", checksum);
}

fn benchmark_envelope() -> Result<()> {
    println!("📊 Envelope Benchmark (map<i32,u32>, 1024 entries)");
    println!("--------------------------------------------------");

    const ITERATIONS: usize = 10_000;

    let mut builder = RegistryBuilder::new();
    builder.register_named::<CountTable, CountTableSerializer>("CountTable")?;
    let registry = builder.build();

    let table = CountTable {
        counts: (0..1024).map(|k| (k, (k as u32) * 3)).collect(),
    };

    let mut buffer = Vec::with_capacity(16 * 1024);
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        buffer.clear();
        serialize_interface(&registry, &mut buffer, &table)?;
    }
    let write_duration = start.elapsed();

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        let decoded: CountTable = deserialize_interface(&registry, &mut buffer.as_slice())?;
        debug_assert_eq!(decoded, table);
    }
    let read_duration = start.elapsed();

    println!("  Envelope size: {} bytes", buffer.len());
    println!(
        "  Write latency: {:.3} μs/op",
        write_duration.as_nanos() as f64 / ITERATIONS as f64 / 1000.0
    );
    println!(
        "  Read latency:  {:.3} μs/op",
        read_duration.as_nanos() as f64 / ITERATIONS as f64 / 1000.0
    );

    Ok(())
}
