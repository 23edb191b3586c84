//! Error types for plan construction and plan-file loading.

use thiserror::Error;

/// Errors raised while building or validating a plan.
///
/// Every variant is raised before any byte is written; a plan that fails
/// validation is never partially applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Requested output size is zero
    #[error("total size must be greater than zero")]
    ZeroTotalSize,

    /// Requested chunk size is zero
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// A section has no bytes
    #[error("section {index} at offset {offset} has zero length")]
    EmptySection {
        /// Position of the section in the plan
        index: usize,
        /// Start offset of the section
        offset: u64,
    },

    /// A section does not start where the previous one ended
    #[error("section {index} starts at offset {actual}, expected {expected}")]
    SectionGap {
        /// Position of the section in the plan
        index: usize,
        /// Offset where the previous section ended
        expected: u64,
        /// Offset the section actually starts at
        actual: u64,
    },

    /// Sections do not end exactly at the target size
    #[error("sections cover {actual} bytes, expected {expected}")]
    CoverageMismatch {
        /// Target total size
        expected: u64,
        /// Bytes actually covered by the sections
        actual: u64,
    },

    /// Signature has no bytes
    #[error("signature '{name}' at offset {offset} is empty")]
    EmptySignature {
        /// Signature offset
        offset: u64,
        /// Signature name
        name: String,
    },

    /// Signature offset lies outside the output
    #[error("signature offset {offset} is outside [0, {total_size})")]
    SignatureOutOfRange {
        /// Signature offset
        offset: u64,
        /// Target total size
        total_size: u64,
    },

    /// Signature starts inside the output but runs past its end
    #[error("signature at offset {offset} ({len} bytes) runs past total size {total_size}")]
    SignatureTooLong {
        /// Signature offset
        offset: u64,
        /// Signature length in bytes
        len: u64,
        /// Target total size
        total_size: u64,
    },

    /// Two signatures share at least one byte
    #[error("signature at offset {offset} overlaps signature at offset {previous} (ends at {previous_end})")]
    SignatureOverlap {
        /// Offset of the later signature
        offset: u64,
        /// Offset of the earlier signature
        previous: u64,
        /// End offset (exclusive) of the earlier signature
        previous_end: u64,
    },

    /// Signature straddles a chunk boundary and could not be spliced in one piece
    #[error("signature at offset {offset} ({len} bytes) crosses chunk boundary at offset {boundary}")]
    CrossesChunkBoundary {
        /// Signature offset
        offset: u64,
        /// Signature length in bytes
        len: u64,
        /// The boundary that is crossed
        boundary: u64,
    },

    /// Signature straddles the end of the section it starts in
    #[error("signature at offset {offset} ({len} bytes) crosses section boundary at offset {boundary}")]
    CrossesSectionBoundary {
        /// Signature offset
        offset: u64,
        /// Signature length in bytes
        len: u64,
        /// The section end that is crossed
        boundary: u64,
    },
}

/// Errors raised while reading a plan file or resolving request fields.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading the plan file
    #[error("Failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Size literal could not be parsed
    #[error("Invalid size '{value}': {reason}")]
    InvalidSize {
        /// The literal as written
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// No total size was given by the plan file or the caller
    #[error("Total size is required")]
    MissingTotalSize,

    /// Entropy profile name is not recognized
    #[error("Unknown entropy profile: {0}")]
    UnknownProfile(String),

    /// Signature name is not one of the known patterns
    #[error("Unknown signature: {0} (expected one of ELF, PNG, PDF, ZIP, JPEG)")]
    UnknownSignature(String),

    /// Signature argument is not `OFFSET=NAME`
    #[error("Invalid signature '{0}': expected OFFSET=NAME")]
    InvalidSignatureSpec(String),

    /// A section other than the last one omits its length
    #[error("Section {index} omits its length; only the last section may do so")]
    OpenSectionNotLast {
        /// Position of the offending section
        index: usize,
    },

    /// Sections with explicit lengths already exceed the target
    #[error("Section {index} needs {needed} bytes but only {available} remain")]
    SectionExceedsTarget {
        /// Position of the offending section
        index: usize,
        /// Bytes the section asks for
        needed: u64,
        /// Bytes left before the target size
        available: u64,
    },

    /// Alternating section without profiles
    #[error("Alternating section {index} needs at least one profile")]
    EmptyAlternation {
        /// Position of the offending section
        index: usize,
    },

    /// Alternating section with zero block size
    #[error("Alternating section {index} needs a block size greater than zero")]
    ZeroBlockSize {
        /// Position of the offending section
        index: usize,
    },

    /// The resolved plan failed validation
    #[error(transparent)]
    Plan(#[from] PlanError),
}
