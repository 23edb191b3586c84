//! The small fixed-layout TVTS sample file.
//!
//! ```text
//! 0      64                320                      486        614     678
//! ┌──────┬─────────────────┬────────────────────────┬──────────┬───────┐
//! │header│ data table      │ ASCII text             │ LCG noise│ zeros │
//! │      │ 16 x 16 bytes   │ three lines            │ 128 bytes│ 64    │
//! └──────┴─────────────────┴────────────────────────┴──────────┴───────┘
//! ```
//!
//! Unlike the streaming generator this layout never changes with size or
//! seed; it exists to give structure parsers one small known-good input.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use fixture_generator::DeterministicSource;
use fixture_writer::create_output;

pub const MAGIC: &[u8; 4] = b"TVTS";
pub const VERSION: (u8, u8) = (1, 5);
/// COMPRESSED | HAS_CHECKSUM
pub const FLAGS: u16 = 0x0011;
/// DATA
pub const FILE_TYPE: u8 = 3;
pub const CHECKSUM: u16 = 0xABCD;
pub const TIMESTAMP: u64 = 1_706_500_000;
pub const NAME: &[u8] = b"example_data_file";

pub const HEADER_SIZE: usize = 64;
pub const ENTRY_COUNT: usize = 16;
pub const ENTRY_SIZE: usize = 16;
pub const DATA_SIZE: usize = ENTRY_COUNT * ENTRY_SIZE;
const NAME_FIELD_SIZE: usize = 32;
const _: () = assert!(NAME.len() <= NAME_FIELD_SIZE);

pub const TEXT: &[u8] = b"This is sample text data in the TitanView test file format.\n\
It demonstrates various data types and patterns.\n\
You can use the Structure Inspector to parse the header.\n";

pub const NOISE_SEED: u64 = 0xDEAD_BEEF;
pub const NOISE_SIZE: usize = 128;
pub const ZERO_TAIL_SIZE: usize = 64;

/// Total size of the sample file.
pub const SAMPLE_SIZE: usize = HEADER_SIZE + DATA_SIZE + TEXT.len() + NOISE_SIZE + ZERO_TAIL_SIZE;

fn header() -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(MAGIC);
    header[4] = VERSION.0;
    header[5] = VERSION.1;
    header[6..8].copy_from_slice(&FLAGS.to_le_bytes());
    header[8] = FILE_TYPE;
    // 9..12 reserved
    header[12..16].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
    header[16..20].copy_from_slice(&(DATA_SIZE as u32).to_le_bytes());
    header[20..22].copy_from_slice(&(ENTRY_COUNT as u16).to_le_bytes());
    header[22..24].copy_from_slice(&CHECKSUM.to_le_bytes());
    header[24..32].copy_from_slice(&TIMESTAMP.to_le_bytes());
    header[32..32 + NAME.len()].copy_from_slice(NAME);
    header
}

/// Entry `i` is `[i, 2i, 3i, 4i]` followed by `(i + j) ^ 0x55` for `j` in `4..16`.
fn data_table() -> [u8; DATA_SIZE] {
    let mut table = [0u8; DATA_SIZE];
    for (i, entry) in table.chunks_exact_mut(ENTRY_SIZE).enumerate() {
        let i = i as u8;
        entry[..4].copy_from_slice(&[i, i * 2, i * 3, i * 4]);
        for (j, byte) in entry.iter_mut().enumerate().skip(4) {
            *byte = i.wrapping_add(j as u8) ^ 0x55;
        }
    }
    table
}

/// The complete sample file.
pub fn sample_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(SAMPLE_SIZE);
    bytes.extend_from_slice(&header());
    bytes.extend_from_slice(&data_table());
    bytes.extend_from_slice(TEXT);
    bytes.extend(DeterministicSource::new(NOISE_SEED).next_bytes(NOISE_SIZE));
    bytes.resize(SAMPLE_SIZE, 0);
    bytes
}

/// Write the sample file to `sink`; returns the number of bytes written.
pub fn write_sample<W: Write>(sink: &mut W) -> io::Result<u64> {
    let bytes = sample_bytes();
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(bytes.len() as u64)
}

/// Write the sample file to `path`, refusing to overwrite unless `force`.
pub fn write_sample_file(path: &Path, force: bool) -> anyhow::Result<u64> {
    let file = create_output(path, force)?;
    let mut writer = BufWriter::new(file);
    write_sample(&mut writer).with_context(|| format!("Failed to write {}", path.display()))
}
