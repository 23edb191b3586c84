//! Sections: contiguous byte ranges of the output, one entropy profile each.

use serde::Serialize;

use crate::error::PlanError;
use crate::profile::EntropyProfile;
use crate::size::MIB;

/// Block size of the alternating zero/random region in the default layout.
pub const MIXED_BLOCK_SIZE: u64 = MIB;

/// A contiguous byte range assigned to one entropy profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    pub start_offset: u64,
    pub length: u64,
    pub profile: EntropyProfile,
}

impl Section {
    /// Offset one past the last byte of the section.
    pub fn end(&self) -> u64 {
        self.start_offset + self.length
    }
}

/// Ordered sections tiling `[0, total_size)` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPlan {
    total_size: u64,
    sections: Vec<Section>,
}

impl SectionPlan {
    /// Validate that `sections` tile `[0, total_size)` with positive lengths.
    pub fn new(total_size: u64, sections: Vec<Section>) -> Result<Self, PlanError> {
        if total_size == 0 {
            return Err(PlanError::ZeroTotalSize);
        }

        let mut expected = 0u64;
        for (index, section) in sections.iter().enumerate() {
            if section.start_offset != expected {
                return Err(PlanError::SectionGap {
                    index,
                    expected,
                    actual: section.start_offset,
                });
            }
            if section.length == 0 {
                return Err(PlanError::EmptySection {
                    index,
                    offset: section.start_offset,
                });
            }
            expected = section
                .start_offset
                .checked_add(section.length)
                .ok_or(PlanError::CoverageMismatch {
                    expected: total_size,
                    actual: u64::MAX,
                })?;
        }

        if expected != total_size {
            return Err(PlanError::CoverageMismatch {
                expected: total_size,
                actual: expected,
            });
        }

        Ok(Self {
            total_size,
            sections,
        })
    }

    pub fn builder(total_size: u64) -> SectionPlanBuilder {
        SectionPlanBuilder::new(total_size)
    }

    /// One section of `profile` covering the whole output.
    pub fn single(total_size: u64, profile: EntropyProfile) -> Result<Self, PlanError> {
        Self::builder(total_size).push(profile, total_size).build()
    }

    /// The default layout.
    ///
    /// Four regions of a quarter each: log text, structured records, random
    /// data, then 1 MiB blocks alternating zero and random (starting with
    /// zero). The last region absorbs the division remainder. Empty regions
    /// are skipped, so tiny targets still get a valid plan.
    pub fn default_layout(total_size: u64) -> Result<Self, PlanError> {
        let quarter = total_size / 4;
        let mixed = total_size - 3 * quarter;

        let mut builder = Self::builder(total_size);
        for profile in [
            EntropyProfile::LogText,
            EntropyProfile::StructuredRecord,
            EntropyProfile::Random,
        ] {
            if quarter > 0 {
                builder = builder.push(profile, quarter);
            }
        }
        builder
            .alternating(
                &[EntropyProfile::Zero, EntropyProfile::Random],
                MIXED_BLOCK_SIZE,
                mixed,
            )
            .build()
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Index of the section containing `offset`.
    pub fn index_at(&self, offset: u64) -> Option<usize> {
        if offset >= self.total_size {
            return None;
        }
        // First section that ends after `offset`.
        let index = self.sections.partition_point(|s| s.end() <= offset);
        (index < self.sections.len()).then_some(index)
    }

    pub fn section_at(&self, offset: u64) -> Option<&Section> {
        self.index_at(offset).and_then(|index| self.sections.get(index))
    }
}

/// Incremental builder laying sections out back to back from offset 0.
#[derive(Debug, Clone)]
pub struct SectionPlanBuilder {
    total_size: u64,
    cursor: u64,
    sections: Vec<Section>,
}

impl SectionPlanBuilder {
    pub fn new(total_size: u64) -> Self {
        Self {
            total_size,
            cursor: 0,
            sections: Vec::new(),
        }
    }

    /// Append one section. Zero lengths are kept and rejected by [`build`](Self::build).
    #[must_use]
    pub fn push(mut self, profile: EntropyProfile, length: u64) -> Self {
        self.sections.push(Section {
            start_offset: self.cursor,
            length,
            profile,
        });
        self.cursor = self.cursor.saturating_add(length);
        self
    }

    /// Append `length` bytes split into `block_size` sections cycling through `profiles`.
    ///
    /// The last block takes whatever is left. A zero `block_size` is treated as
    /// a single block; an empty `profiles` slice appends nothing.
    #[must_use]
    pub fn alternating(
        mut self,
        profiles: &[EntropyProfile],
        block_size: u64,
        length: u64,
    ) -> Self {
        if profiles.is_empty() {
            return self;
        }
        let block_size = if block_size == 0 { length } else { block_size };

        let mut written = 0u64;
        let mut block = 0usize;
        while written < length {
            let len = block_size.min(length - written);
            self = self.push(profiles[block % profiles.len()], len);
            written += len;
            block += 1;
        }
        self
    }

    /// Append one section covering everything up to the target size.
    #[must_use]
    pub fn fill(self, profile: EntropyProfile) -> Self {
        let remaining = self.remaining();
        self.push(profile, remaining)
    }

    /// Bytes left before the target size.
    pub fn remaining(&self) -> u64 {
        self.total_size.saturating_sub(self.cursor)
    }

    pub fn build(self) -> Result<SectionPlan, PlanError> {
        SectionPlan::new(self.total_size, self.sections)
    }
}
