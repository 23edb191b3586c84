//! Core plan types for fixture-forge.
//!
//! This crate describes *what* a fixture run produces, independent of how the
//! bytes are generated or written:
//!
//! - [`EntropyProfile`] - the content strategy for a section
//! - [`SectionPlan`] - contiguous sections tiling `[0, total_size)`
//! - [`SignaturePlan`] - offset-sorted magic signatures to splice in
//! - [`GenerationPlan`] - the immutable, validated description of one run
//! - [`PlanConfig`] - plan files loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-generator  (fills chunks for a ChunkSpec)
//!    │
//!    └─── fixture-writer     (walks the plan chunk by chunk into a sink)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{EntropyProfile, GenerationPlan, KnownSignature, SectionPlan, Signature};
//!
//! let sections = SectionPlan::single(1024 * 1024, EntropyProfile::LogText).unwrap();
//! let plan = GenerationPlan::new(
//!     4 * 1024 * 1024,
//!     42,
//!     sections,
//!     vec![Signature::known(0, KnownSignature::Elf)],
//! )
//! .unwrap();
//!
//! assert_eq!(plan.total_size(), 1024 * 1024);
//! assert_eq!(plan.chunks().count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod plan;
pub mod profile;
pub mod section;
pub mod signature;
pub mod size;

pub use config::{AlternatingSection, PlanConfig, ProfileSection, SectionConfig, SignatureConfig};
pub use error::{ConfigError, PlanError};
pub use plan::{
    default_signatures, ChunkCursor, ChunkSpec, Chunks, DefaultSignatures, GenerationPlan,
    DEFAULT_CHUNK_SIZE, DEFAULT_SEED,
};
pub use profile::EntropyProfile;
pub use section::{Section, SectionPlan, SectionPlanBuilder, MIXED_BLOCK_SIZE};
pub use signature::{KnownSignature, Signature, SignaturePlan};
pub use size::{parse_size, SizeValue, GIB, KIB, MIB};
