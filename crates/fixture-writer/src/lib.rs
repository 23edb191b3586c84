//! Chunked streaming writer for fixture-forge.
//!
//! [`StreamWriter`] walks a [`fixture_core::GenerationPlan`] chunk by chunk:
//! each chunk is filled by the content generator, overlaid with the
//! signatures that fall inside it, and appended to the sink. Nothing larger
//! than one chunk is ever held in memory.
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{EntropyProfile, GenerationPlan, KnownSignature, SectionPlan, Signature};
//! use fixture_writer::{StreamWriter, WriterState};
//!
//! let sections = SectionPlan::single(1024, EntropyProfile::LogText).unwrap();
//! let signatures = vec![Signature::known(0, KnownSignature::Elf)];
//! let plan = GenerationPlan::new(256, 42, sections, signatures).unwrap();
//!
//! let mut writer = StreamWriter::with_plan(Vec::new(), plan);
//! let metrics = writer.run().unwrap();
//! assert_eq!(writer.state(), WriterState::Complete);
//! assert_eq!(metrics.bytes_written, 1024);
//! assert_eq!(&writer.into_inner()[..4], b"\x7fELF");
//! ```

pub mod args;
pub mod error;
pub mod file;
pub mod metrics;
pub mod writer;

pub use args::{parse_signature, GenerateArgs, PlanArgs};
pub use error::WriterError;
pub use file::{create_output, generate_to_file, DEFAULT_BUFFER_SIZE};
pub use metrics::{GenerateMetrics, GenerationReport, PlantedSignature};
pub use writer::{ChunkReport, StreamWriter, WriterState};
