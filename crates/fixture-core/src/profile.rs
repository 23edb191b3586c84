//! Entropy profiles: the content strategy assigned to each section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Statistical character of the bytes generated for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyProfile {
    /// Synthetic ASCII log lines (low entropy)
    LogText,
    /// Packed 32-byte binary records (medium entropy)
    StructuredRecord,
    /// Pseudo-random payload (high entropy)
    Random,
    /// Zero-filled region; consumes no randomness
    Zero,
}

impl EntropyProfile {
    pub const ALL: [EntropyProfile; 4] = [
        EntropyProfile::LogText,
        EntropyProfile::StructuredRecord,
        EntropyProfile::Random,
        EntropyProfile::Zero,
    ];

    /// Name used in plan files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            EntropyProfile::LogText => "log_text",
            EntropyProfile::StructuredRecord => "structured_record",
            EntropyProfile::Random => "random",
            EntropyProfile::Zero => "zero",
        }
    }
}

impl fmt::Display for EntropyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntropyProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        EntropyProfile::ALL
            .into_iter()
            .find(|profile| profile.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_names_round_trip() {
        for profile in EntropyProfile::ALL {
            assert_eq!(profile.name().parse::<EntropyProfile>().unwrap(), profile);
            assert_eq!(profile.to_string(), profile.name());
        }
    }

    #[test]
    fn test_profile_parse_accepts_dashes_and_case() {
        assert_eq!(
            "Log-Text".parse::<EntropyProfile>().unwrap(),
            EntropyProfile::LogText
        );
        assert_eq!(
            "STRUCTURED_RECORD".parse::<EntropyProfile>().unwrap(),
            EntropyProfile::StructuredRecord
        );
    }

    #[test]
    fn test_profile_parse_unknown() {
        let err = "sparse".parse::<EntropyProfile>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(name) if name == "sparse"));
    }

    #[test]
    fn test_profile_yaml_names() {
        let profile: EntropyProfile = serde_yaml::from_str("structured_record").unwrap();
        assert_eq!(profile, EntropyProfile::StructuredRecord);
        assert!(serde_yaml::from_str::<EntropyProfile>("sparse").is_err());
    }
}
