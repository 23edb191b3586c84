//! fixture-forge
//!
//! Deterministic, reproducible synthetic binary files for exercising binary
//! structure inspection tools. Given a seed and a size, the generator emits
//! byte-identical output on every run: sections of log text, packed records,
//! random noise and zero fill, with known file-format signatures (ELF, PNG,
//! PDF, ZIP, JPEG) planted at fixed offsets.
//!
//! # Crates
//!
//! - `fixture_core` - plan types: profiles, sections, signatures, plan files
//! - `fixture_generator` - the pinned random source and profile generators
//! - `fixture_writer` - the chunked streaming writer and CLI arguments
//!
//! # CLI Usage
//!
//! ```bash
//! # 1 GiB fixture with the default layout and signatures
//! fixture-forge generate --output test_1gb.bin --size 1G
//!
//! # Custom plan, overriding the seed
//! fixture-forge generate --output mixed.bin --plan mixed.yaml --seed 7
//!
//! # Print the resolved plan without writing anything
//! fixture-forge plan --size 64M --signature 0=ELF --signature 1M=PNG
//!
//! # The small fixed-layout TVTS sample
//! fixture-forge sample --output sample_file.tvts
//! ```

pub mod sample;

pub use fixture_core::{
    EntropyProfile, GenerationPlan, KnownSignature, PlanConfig, SectionPlan, Signature,
    SignaturePlan,
};
pub use fixture_generator::{ContentGenerator, DeterministicSource};
pub use fixture_writer::{generate_to_file, GenerateMetrics, GenerationReport, StreamWriter};

use fixture_core::MIB;

/// One planted signature as a log line, e.g. `0x000000000400 (     0.0 MB) = PNG`.
pub fn format_marker(signature: &Signature) -> String {
    format!(
        "0x{:012X} ({:>8.1} MB) = {}",
        signature.offset,
        signature.offset as f64 / MIB as f64,
        signature.name
    )
}
