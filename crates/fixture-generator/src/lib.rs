//! Deterministic content generation for fixture-forge.
//!
//! This crate turns the chunks of a [`fixture_core::GenerationPlan`] into
//! bytes. All randomness comes from one [`DeterministicSource`] seeded from
//! the plan, so the same seed and plan always produce the same output,
//! regardless of chunk size.
//!
//! # Architecture
//!
//! ```text
//! GenerationPlan::chunks()
//!        │  ChunkSpec { section_index, offset, len, profile }
//!        ▼
//! ┌──────────────────────┐
//! │  ContentGenerator    │
//! │                      │
//! │  - rng (LCG, u32)    │
//! │  - active section    │──▶ ProfileGenerator
//! │  - bytes_generated   │      LogText | StructuredRecord | Random | Zero
//! └──────────┬───────────┘
//!            │
//!            ▼
//!      chunk buffer (signatures are spliced in by the writer)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{EntropyProfile, GenerationPlan, SectionPlan};
//! use fixture_generator::ContentGenerator;
//!
//! let sections = SectionPlan::single(32, EntropyProfile::Zero).unwrap();
//! let plan = GenerationPlan::new(16, 42, sections, Vec::new()).unwrap();
//!
//! let mut generator = ContentGenerator::new(plan.seed());
//! for chunk in plan.chunks() {
//!     let bytes = generator.generate_chunk(&chunk).unwrap();
//!     assert!(bytes.iter().all(|b| *b == 0));
//! }
//! ```

pub mod generator;
pub mod generators;
pub mod rng;

// Re-exports for convenience
pub use generator::{ContentGenerator, GeneratorError};
pub use generators::{generate, ByteGenerator, ProfileGenerator};
pub use rng::DeterministicSource;
