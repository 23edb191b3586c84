//! Magic signatures and the validated plan that splices them into chunks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PlanError};
use crate::size::MIB;

const ELF_MAGIC: [u8; 16] = [
    0x7F, 0x45, 0x4C, 0x46, 0x02, 0x01, 0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0,
];
const PNG_MAGIC: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0, 0, 0, 0, 0,
];
// "%PDF-1.7\n" plus six zeros: 15 bytes, one shorter than the others.
const PDF_MAGIC: [u8; 15] = [
    0x25, 0x50, 0x44, 0x46, 0x2D, 0x31, 0x2E, 0x37, 0x0A, 0, 0, 0, 0, 0, 0,
];
const ZIP_MAGIC: [u8; 16] = [0x50, 0x4B, 0x03, 0x04, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const JPEG_MAGIC: [u8; 16] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// File-format headers the generator knows how to plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KnownSignature {
    Elf,
    Png,
    Pdf,
    Zip,
    Jpeg,
}

impl KnownSignature {
    pub const ALL: [KnownSignature; 5] = [
        KnownSignature::Elf,
        KnownSignature::Png,
        KnownSignature::Pdf,
        KnownSignature::Zip,
        KnownSignature::Jpeg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KnownSignature::Elf => "ELF",
            KnownSignature::Png => "PNG",
            KnownSignature::Pdf => "PDF",
            KnownSignature::Zip => "ZIP",
            KnownSignature::Jpeg => "JPEG",
        }
    }

    /// The literal bytes planted for this signature.
    pub fn bytes(&self) -> &'static [u8] {
        match self {
            KnownSignature::Elf => &ELF_MAGIC,
            KnownSignature::Png => &PNG_MAGIC,
            KnownSignature::Pdf => &PDF_MAGIC,
            KnownSignature::Zip => &ZIP_MAGIC,
            KnownSignature::Jpeg => &JPEG_MAGIC,
        }
    }
}

impl fmt::Display for KnownSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownSignature {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        KnownSignature::ALL
            .into_iter()
            .find(|known| known.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownSignature(s.to_string()))
    }
}

/// Default plant layout, in offset order, for a 1 GiB target.
///
/// The marker at `total_size - 1024` is added separately because it depends
/// on the target.
pub(crate) const DEFAULT_LAYOUT: [(u64, KnownSignature); 10] = [
    (0, KnownSignature::Elf),
    (1024, KnownSignature::Png),
    (50 * MIB, KnownSignature::Elf),
    (100 * MIB, KnownSignature::Pdf),
    (200 * MIB, KnownSignature::Zip),
    (333 * MIB, KnownSignature::Jpeg),
    (500 * MIB, KnownSignature::Elf),
    (512 * MIB, KnownSignature::Png),
    (750 * MIB, KnownSignature::Pdf),
    (900 * MIB, KnownSignature::Zip),
];

/// Distance from the end of the output of the trailing default ELF marker.
pub(crate) const TRAILING_MARKER_DISTANCE: u64 = 1024;

/// A literal byte pattern planted at an absolute offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Absolute offset of the first byte
    pub offset: u64,
    /// Display name, e.g. `ELF`
    pub name: String,
    /// Bytes written over the generated content
    pub bytes: Vec<u8>,
}

impl Signature {
    pub fn new(offset: u64, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// A known file-format header at `offset`.
    pub fn known(offset: u64, kind: KnownSignature) -> Self {
        Self::new(offset, kind.name(), kind.bytes())
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset one past the last byte, saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.len())
    }
}

/// Offset-sorted, validated signatures for one run.
///
/// Invariants upheld by [`SignaturePlan::new`]:
///
/// - every signature lies inside `[0, total_size)`
/// - no two signatures overlap
/// - no signature crosses a `chunk_size`-aligned boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignaturePlan {
    signatures: Vec<Signature>,
}

impl SignaturePlan {
    /// Sort and validate `signatures` against the target and chunk size.
    pub fn new<I>(total_size: u64, chunk_size: u64, signatures: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = Signature>,
    {
        if total_size == 0 {
            return Err(PlanError::ZeroTotalSize);
        }
        if chunk_size == 0 {
            return Err(PlanError::ZeroChunkSize);
        }

        let mut signatures: Vec<Signature> = signatures.into_iter().collect();
        signatures.sort_by_key(|signature| signature.offset);

        let mut previous: Option<&Signature> = None;
        for signature in &signatures {
            check_span(signature, total_size, chunk_size)?;

            if let Some(previous) = previous {
                if signature.offset < previous.end() {
                    return Err(PlanError::SignatureOverlap {
                        offset: signature.offset,
                        previous: previous.offset,
                        previous_end: previous.end(),
                    });
                }
            }
            previous = Some(signature);
        }

        Ok(Self { signatures })
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signature> {
        self.signatures.iter()
    }

    /// Signatures whose first byte lies in `[start, end)`.
    pub fn starting_within(&self, start: u64, end: u64) -> &[Signature] {
        let first = self.signatures.partition_point(|s| s.offset < start);
        let last = self.signatures.partition_point(|s| s.offset < end);
        &self.signatures[first..last.max(first)]
    }

    /// Overwrite the parts of `chunk` covered by signatures.
    ///
    /// `chunk` holds the bytes at absolute offsets
    /// `[chunk_start, chunk_start + chunk.len())`. Only signatures lying fully
    /// inside that range are applied. Returns the number of signatures spliced.
    pub fn splice(&self, chunk_start: u64, chunk: &mut [u8]) -> usize {
        let chunk_end = chunk_start + chunk.len() as u64;
        let mut spliced = 0;

        for signature in self.starting_within(chunk_start, chunk_end) {
            if signature.end() > chunk_end {
                continue;
            }
            let relative = (signature.offset - chunk_start) as usize;
            chunk[relative..relative + signature.bytes.len()].copy_from_slice(&signature.bytes);
            spliced += 1;
        }

        spliced
    }
}

impl<'a> IntoIterator for &'a SignaturePlan {
    type Item = &'a Signature;
    type IntoIter = std::slice::Iter<'a, Signature>;

    fn into_iter(self) -> Self::IntoIter {
        self.signatures.iter()
    }
}

/// Range and chunk-alignment checks for a single signature.
pub(crate) fn check_span(
    signature: &Signature,
    total_size: u64,
    chunk_size: u64,
) -> Result<(), PlanError> {
    if signature.is_empty() {
        return Err(PlanError::EmptySignature {
            offset: signature.offset,
            name: signature.name.clone(),
        });
    }

    if signature.offset >= total_size {
        return Err(PlanError::SignatureOutOfRange {
            offset: signature.offset,
            total_size,
        });
    }

    let end = signature
        .offset
        .checked_add(signature.len())
        .filter(|end| *end <= total_size)
        .ok_or(PlanError::SignatureTooLong {
            offset: signature.offset,
            len: signature.len(),
            total_size,
        })?;

    // A boundary past u64::MAX cannot be reached by any end offset.
    let boundary = (signature.offset / chunk_size + 1).checked_mul(chunk_size);
    if let Some(boundary) = boundary {
        if end > boundary {
            return Err(PlanError::CrossesChunkBoundary {
                offset: signature.offset,
                len: signature.len(),
                boundary,
            });
        }
    }

    Ok(())
}
