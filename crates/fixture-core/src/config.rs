//! Plan files: YAML descriptions of a generation request.
//!
//! ```yaml
//! total_size: 64M
//! chunk_size: 4M
//! seed: 42
//! sections:
//!   - profile: log_text
//!     length: 16M
//!   - alternating: [zero, random]
//!     block_size: 1M
//! signatures:
//!   - offset: 0
//!     name: ELF
//! ```
//!
//! Every field is optional in the file; a missing `total_size` must be
//! supplied by the caller before [`PlanConfig::build`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::plan::{default_signatures, GenerationPlan, DEFAULT_CHUNK_SIZE, DEFAULT_SEED};
use crate::profile::EntropyProfile;
use crate::section::{SectionPlan, SectionPlanBuilder, MIXED_BLOCK_SIZE};
use crate::signature::{KnownSignature, Signature};
use crate::size::SizeValue;

/// A generation request as read from a plan file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<SizeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<SizeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Section layout; empty means the default layout
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionConfig>,

    /// Planted signatures; `None` means the default list, an empty list plants none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<SignatureConfig>>,
}

/// One entry of the `sections` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionConfig {
    /// A single section of one profile
    Profile(ProfileSection),
    /// A run of fixed-size blocks cycling through several profiles
    Alternating(AlternatingSection),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSection {
    pub profile: EntropyProfile,

    /// Omitted on the last entry to take the remainder of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<SizeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternatingSection {
    pub alternating: Vec<EntropyProfile>,

    /// Defaults to 1 MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<SizeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<SizeValue>,
}

/// One entry of the `signatures` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureConfig {
    pub offset: SizeValue,
    /// One of `ELF`, `PNG`, `PDF`, `ZIP`, `JPEG`
    pub name: String,
}

impl SignatureConfig {
    pub fn new(offset: u64, kind: KnownSignature) -> Self {
        Self {
            offset: SizeValue::Bytes(offset),
            name: kind.name().to_string(),
        }
    }

    pub fn to_signature(&self) -> Result<Signature, ConfigError> {
        let kind: KnownSignature = self.name.parse()?;
        Ok(Signature::known(self.offset.resolve()?, kind))
    }
}

impl SectionConfig {
    fn length(&self) -> Option<&SizeValue> {
        match self {
            SectionConfig::Profile(section) => section.length.as_ref(),
            SectionConfig::Alternating(section) => section.length.as_ref(),
        }
    }
}

impl PlanConfig {
    /// Load a plan file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a plan from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: PlanConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Resolve sizes, fill in defaults and validate into a [`GenerationPlan`].
    pub fn build(&self) -> Result<GenerationPlan, ConfigError> {
        let total_size = self
            .total_size
            .as_ref()
            .ok_or(ConfigError::MissingTotalSize)?
            .resolve()?;
        let chunk_size = match &self.chunk_size {
            Some(size) => size.resolve()?,
            None => DEFAULT_CHUNK_SIZE,
        };
        let seed = self.seed.unwrap_or(DEFAULT_SEED);

        let sections = if self.sections.is_empty() {
            SectionPlan::default_layout(total_size)?
        } else {
            self.build_sections(total_size)?
        };

        let signatures = match &self.signatures {
            Some(entries) => entries
                .iter()
                .map(SignatureConfig::to_signature)
                .collect::<Result<Vec<_>, _>>()?,
            None => default_signatures(&sections, chunk_size).planted,
        };

        Ok(GenerationPlan::new(chunk_size, seed, sections, signatures)?)
    }

    fn build_sections(&self, total_size: u64) -> Result<SectionPlan, ConfigError> {
        let last = self.sections.len() - 1;
        let mut builder = SectionPlanBuilder::new(total_size);

        for (index, section) in self.sections.iter().enumerate() {
            let available = builder.remaining();
            let length = match section.length() {
                Some(length) => length.resolve()?,
                None if index == last => available,
                None => return Err(ConfigError::OpenSectionNotLast { index }),
            };
            if length > available {
                return Err(ConfigError::SectionExceedsTarget {
                    index,
                    needed: length,
                    available,
                });
            }

            builder = match section {
                SectionConfig::Profile(section) => builder.push(section.profile, length),
                SectionConfig::Alternating(section) => {
                    if section.alternating.is_empty() {
                        return Err(ConfigError::EmptyAlternation { index });
                    }
                    let block_size = match &section.block_size {
                        Some(size) => size.resolve()?,
                        None => MIXED_BLOCK_SIZE,
                    };
                    if block_size == 0 {
                        return Err(ConfigError::ZeroBlockSize { index });
                    }
                    builder.alternating(&section.alternating, block_size, length)
                }
            };
        }

        Ok(builder.build()?)
    }
}

impl From<&GenerationPlan> for PlanConfig {
    /// Fully resolved form of a plan: every section and signature spelled out.
    fn from(plan: &GenerationPlan) -> Self {
        Self {
            total_size: Some(plan.total_size().into()),
            chunk_size: Some(plan.chunk_size().into()),
            seed: Some(plan.seed()),
            sections: plan
                .sections()
                .iter()
                .map(|section| {
                    SectionConfig::Profile(ProfileSection {
                        profile: section.profile,
                        length: Some(section.length.into()),
                    })
                })
                .collect(),
            signatures: Some(
                plan.signatures()
                    .iter()
                    .map(|signature| SignatureConfig {
                        offset: signature.offset.into(),
                        name: signature.name.clone(),
                    })
                    .collect(),
            ),
        }
    }
}
