//! The generation plan and the chunk walk over it.

use std::iter::FusedIterator;

use tracing::{debug, warn};

use crate::error::PlanError;
use crate::profile::EntropyProfile;
use crate::section::{Section, SectionPlan};
use crate::signature::{
    check_span, KnownSignature, Signature, SignaturePlan, DEFAULT_LAYOUT, TRAILING_MARKER_DISTANCE,
};
use crate::size::MIB;

/// Seed used when the request does not name one.
pub const DEFAULT_SEED: u64 = 42;

/// Chunk size used when the request does not name one.
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * MIB;

/// Immutable, validated description of one run.
///
/// Built once before any byte is written. Sections tile `[0, total_size)`
/// and every signature lands fully inside one chunk of the walk produced by
/// [`GenerationPlan::chunks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    total_size: u64,
    chunk_size: u64,
    seed: u64,
    sections: SectionPlan,
    signatures: SignaturePlan,
}

impl GenerationPlan {
    pub fn new<I>(
        chunk_size: u64,
        seed: u64,
        sections: SectionPlan,
        signatures: I,
    ) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = Signature>,
    {
        let total_size = sections.total_size();
        let signatures = SignaturePlan::new(total_size, chunk_size, signatures)?;

        // Chunks restart at every section boundary, so the aligned-boundary
        // check above is not enough on its own.
        for signature in &signatures {
            check_section_chunk(&sections, chunk_size, signature)?;
        }

        Ok(Self {
            total_size,
            chunk_size,
            seed,
            sections,
            signatures,
        })
    }

    /// Default section layout and default signatures for `total_size`.
    pub fn with_defaults(total_size: u64, chunk_size: u64, seed: u64) -> Result<Self, PlanError> {
        let sections = SectionPlan::default_layout(total_size)?;
        let signatures = default_signatures(&sections, chunk_size).planted;
        Self::new(chunk_size, seed, sections, signatures)
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn sections(&self) -> &SectionPlan {
        &self.sections
    }

    pub fn signatures(&self) -> &SignaturePlan {
        &self.signatures
    }

    /// Walk the plan chunk by chunk, in write order.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks {
            plan: self,
            cursor: ChunkCursor::default(),
        }
    }

    /// Number of chunks the walk yields.
    pub fn chunk_count(&self) -> u64 {
        self.sections
            .iter()
            .map(|section| section.length.div_ceil(self.chunk_size))
            .sum()
    }

    /// Largest chunk the walk yields; bounds the writer's buffer.
    pub fn max_chunk_len(&self) -> u64 {
        self.sections
            .iter()
            .map(|section| section.length.min(self.chunk_size))
            .max()
            .unwrap_or(0)
    }
}

/// One unit of generated and written bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    /// Index of the section the chunk belongs to
    pub section_index: usize,
    /// Position of the chunk within its section
    pub chunk_index: u64,
    /// Absolute offset of the first byte
    pub offset: u64,
    /// Number of bytes in the chunk
    pub len: u64,
    pub profile: EntropyProfile,
}

impl ChunkSpec {
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }

    /// Whether this chunk opens a new section.
    pub fn is_section_start(&self) -> bool {
        self.chunk_index == 0
    }
}

/// Restartable position in the `(section, chunk)` walk.
///
/// Holds no reference to the plan, so a writer can store it next to the plan
/// it walks and step it one chunk at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkCursor {
    section_index: usize,
    section_position: u64,
    chunk_index: u64,
}

impl ChunkCursor {
    /// Produce the next chunk and advance, or `None` once the plan is exhausted.
    pub fn next_chunk(&mut self, plan: &GenerationPlan) -> Option<ChunkSpec> {
        let section = plan.sections.get(self.section_index)?;
        let remaining = section.length - self.section_position;
        let len = remaining.min(plan.chunk_size);

        let spec = ChunkSpec {
            section_index: self.section_index,
            chunk_index: self.chunk_index,
            offset: section.start_offset + self.section_position,
            len,
            profile: section.profile,
        };

        self.section_position += len;
        self.chunk_index += 1;
        if self.section_position == section.length {
            self.section_index += 1;
            self.section_position = 0;
            self.chunk_index = 0;
        }

        Some(spec)
    }

    /// Absolute offset of the next chunk.
    pub fn offset(&self, plan: &GenerationPlan) -> u64 {
        plan.sections
            .get(self.section_index)
            .map_or(plan.total_size, |section| {
                section.start_offset + self.section_position
            })
    }

    pub fn is_finished(&self, plan: &GenerationPlan) -> bool {
        self.section_index >= plan.sections.len()
    }
}

/// Iterator over the chunks of a plan.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    plan: &'a GenerationPlan,
    cursor: ChunkCursor,
}

impl Iterator for Chunks<'_> {
    type Item = ChunkSpec;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_chunk(self.plan)
    }
}

impl FusedIterator for Chunks<'_> {}

/// The default signature list after fitting it to a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSignatures {
    /// Entries that pass every plan check, sorted by offset
    pub planted: Vec<Signature>,
    /// Entries left out, each with the check it failed
    pub dropped: Vec<(Signature, PlanError)>,
}

/// The default signature list, adapted to `sections` and `chunk_size`.
///
/// Entries past the end of the output are left out quietly, so small targets
/// simply get fewer markers. Entries that would land across a chunk or
/// section boundary, or overlap an earlier entry, are left out with a
/// warning, since they depend on the chunk size rather than the target. The
/// trailing ELF marker at `total_size - 1024` is only added for targets of at
/// least 2 KiB.
pub fn default_signatures(sections: &SectionPlan, chunk_size: u64) -> DefaultSignatures {
    let total_size = sections.total_size();
    if chunk_size == 0 {
        return DefaultSignatures::default();
    }

    let mut candidates: Vec<Signature> = DEFAULT_LAYOUT
        .iter()
        .map(|(offset, kind)| Signature::known(*offset, *kind))
        .collect();
    if total_size >= 2 * TRAILING_MARKER_DISTANCE {
        candidates.push(Signature::known(
            total_size - TRAILING_MARKER_DISTANCE,
            KnownSignature::Elf,
        ));
    }
    candidates.sort_by_key(|signature| signature.offset);

    let mut defaults = DefaultSignatures::default();
    for candidate in candidates {
        let check = check_span(&candidate, total_size, chunk_size)
            .and_then(|()| check_section_chunk(sections, chunk_size, &candidate))
            .and_then(|()| match defaults.planted.last() {
                Some(previous) if candidate.offset < previous.end() => {
                    Err(PlanError::SignatureOverlap {
                        offset: candidate.offset,
                        previous: previous.offset,
                        previous_end: previous.end(),
                    })
                }
                _ => Ok(()),
            });

        match check {
            Ok(()) => defaults.planted.push(candidate),
            Err(err) => {
                if matches!(
                    err,
                    PlanError::SignatureOutOfRange { .. } | PlanError::SignatureTooLong { .. }
                ) {
                    debug!("Default {} marker left out: {}", candidate.name, err);
                } else {
                    warn!(
                        "Default {} marker at offset {} left out (chunk size {}): {}",
                        candidate.name, candidate.offset, chunk_size, err
                    );
                }
                defaults.dropped.push((candidate, err));
            }
        }
    }
    defaults
}

/// Reject a signature that would not fit inside the chunk it starts in.
fn check_section_chunk(
    sections: &SectionPlan,
    chunk_size: u64,
    signature: &Signature,
) -> Result<(), PlanError> {
    let Some(section) = sections.section_at(signature.offset) else {
        return Ok(());
    };

    let relative = signature.offset - section.start_offset;
    let chunk_end = chunk_end_in(section, relative, chunk_size);
    if signature.end() <= chunk_end {
        return Ok(());
    }

    if chunk_end == section.end() {
        Err(PlanError::CrossesSectionBoundary {
            offset: signature.offset,
            len: signature.len(),
            boundary: chunk_end,
        })
    } else {
        Err(PlanError::CrossesChunkBoundary {
            offset: signature.offset,
            len: signature.len(),
            boundary: chunk_end,
        })
    }
}

/// End offset of the chunk holding the byte `relative` bytes into `section`.
fn chunk_end_in(section: &Section, relative: u64, chunk_size: u64) -> u64 {
    let chunk_start = relative / chunk_size * chunk_size;
    section
        .start_offset
        .saturating_add(chunk_start.saturating_add(chunk_size))
        .min(section.end())
}
