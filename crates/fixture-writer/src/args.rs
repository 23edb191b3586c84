//! CLI argument definitions shared by the generation commands.

use std::path::PathBuf;

use clap::Args;
use fixture_core::{
    parse_size, ConfigError, EntropyProfile, GenerationPlan, KnownSignature, PlanConfig,
    ProfileSection, SectionConfig, SignatureConfig, SizeValue,
};

/// Arguments that describe a generation plan.
///
/// Flags override the corresponding fields of the plan file given with
/// `--plan`.
#[derive(Args, Clone, Debug, Default)]
pub struct PlanArgs {
    /// Total output size in bytes or as a literal such as 64M or 1GiB
    #[arg(long, short = 's', value_parser = parse_size)]
    pub size: Option<u64>,

    /// Bytes generated and written per step [default: 4M]
    #[arg(long, value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Random seed for deterministic generation (same seed = same bytes) [default: 42]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to a plan YAML file
    #[arg(long, short = 'p')]
    pub plan: Option<PathBuf>,

    /// Fill the whole output with one profile: log_text, structured_record, random or zero
    #[arg(long)]
    pub profile: Option<EntropyProfile>,

    /// Plant a signature, e.g. `0=ELF` or `50M=PNG` (repeatable; replaces the defaults)
    #[arg(long = "signature", value_name = "OFFSET=NAME", value_parser = parse_signature)]
    pub signatures: Vec<SignatureConfig>,

    /// Plant no signatures at all
    #[arg(long, conflicts_with = "signatures")]
    pub no_signatures: bool,
}

impl PlanArgs {
    /// Merge the plan file (if any) with the flags.
    pub fn to_config(&self) -> Result<PlanConfig, ConfigError> {
        let mut config = match &self.plan {
            Some(path) => PlanConfig::from_file(path)?,
            None => PlanConfig::default(),
        };

        if let Some(size) = self.size {
            config.total_size = Some(SizeValue::Bytes(size));
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = Some(SizeValue::Bytes(chunk_size));
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(profile) = self.profile {
            config.sections = vec![SectionConfig::Profile(ProfileSection {
                profile,
                length: None,
            })];
        }
        if self.no_signatures {
            config.signatures = Some(Vec::new());
        } else if !self.signatures.is_empty() {
            config.signatures = Some(self.signatures.clone());
        }

        Ok(config)
    }

    /// Build and validate the plan described by the arguments.
    pub fn resolve(&self) -> Result<GenerationPlan, ConfigError> {
        self.to_config()?.build()
    }
}

/// Arguments for the `generate` command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    #[command(flatten)]
    pub plan: PlanArgs,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,

    /// Dry-run mode: validate and log the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub metrics_output: Option<PathBuf>,
}

/// Parse `OFFSET=NAME` into a signature entry.
pub fn parse_signature(s: &str) -> Result<SignatureConfig, ConfigError> {
    let (offset, name) = s
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidSignatureSpec(s.to_string()))?;
    let offset = parse_size(offset)?;
    let kind: KnownSignature = name.parse()?;
    Ok(SignatureConfig::new(offset, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use fixture_core::MIB;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn parse(args: &[&str]) -> GenerateArgs {
        let mut argv = vec!["fixture-forge"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_parse_signature() {
        let entry = parse_signature("50M=png").unwrap();
        assert_eq!(entry, SignatureConfig::new(50 * MIB, KnownSignature::Png));

        assert!(matches!(
            parse_signature("1024"),
            Err(ConfigError::InvalidSignatureSpec(_))
        ));
        assert!(matches!(
            parse_signature("x=ELF"),
            Err(ConfigError::InvalidSize { .. })
        ));
        assert!(matches!(
            parse_signature("0=GIF"),
            Err(ConfigError::UnknownSignature(_))
        ));
    }

    #[test]
    fn test_generate_args() {
        let args = parse(&[
            "--output",
            "out.bin",
            "--size",
            "1M",
            "--chunk-size",
            "64K",
            "--seed",
            "7",
            "--signature",
            "0=ELF",
            "--signature",
            "4K=ZIP",
            "--dry-run",
        ]);

        assert_eq!(args.output, PathBuf::from("out.bin"));
        assert!(args.dry_run);
        assert!(!args.force);

        let plan = args.plan.resolve().unwrap();
        assert_eq!(plan.total_size(), MIB);
        assert_eq!(plan.chunk_size(), 64 * 1024);
        assert_eq!(plan.seed(), 7);
        let offsets: Vec<u64> = plan.signatures().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 4096]);
    }

    #[test]
    fn test_defaults() {
        let plan = parse(&["-o", "out.bin", "-s", "8M"]).plan.resolve().unwrap();
        assert_eq!(plan.seed(), 42);
        assert_eq!(plan.chunk_size(), 4 * MIB);
        assert_eq!(plan.sections().sections()[0].profile, EntropyProfile::LogText);
        assert!(!plan.signatures().is_empty());
    }

    #[test]
    fn test_no_signatures() {
        let plan = parse(&["-o", "out.bin", "-s", "8M", "--no-signatures"])
            .plan
            .resolve()
            .unwrap();
        assert!(plan.signatures().is_empty());

        let conflict = TestCli::try_parse_from([
            "fixture-forge",
            "-o",
            "x",
            "--no-signatures",
            "--signature",
            "0=ELF",
        ]);
        assert!(conflict.is_err());
    }

    #[test]
    fn test_single_profile() {
        let plan = parse(&[
            "-o",
            "out.bin",
            "-s",
            "1M",
            "--profile",
            "log-text",
            "--signature",
            "0=ELF",
        ])
        .plan
        .resolve()
        .unwrap();
        assert_eq!(plan.sections().len(), 1);
        assert_eq!(plan.sections().sections()[0].profile, EntropyProfile::LogText);
        assert_eq!(plan.sections().sections()[0].length, MIB);
        assert_eq!(plan.signatures().len(), 1);

        let unknown = TestCli::try_parse_from(["fixture-forge", "-o", "x", "--profile", "sparse"]);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_missing_size() {
        let err = parse(&["-o", "out.bin"]).plan.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingTotalSize));
    }

    #[test]
    fn test_flags_override_plan_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "total_size: 1M\nseed: 5\nsections:\n  - profile: zero\nsignatures: []"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let from_file = parse(&["-o", "out.bin", "--plan", path]).plan.resolve().unwrap();
        assert_eq!(from_file.total_size(), MIB);
        assert_eq!(from_file.seed(), 5);

        let overridden = parse(&["-o", "out.bin", "--plan", path, "--size", "2M", "--seed", "9"])
            .plan
            .resolve()
            .unwrap();
        assert_eq!(overridden.total_size(), 2 * MIB);
        assert_eq!(overridden.seed(), 9);
        assert_eq!(
            overridden.sections().sections()[0].length,
            2 * MIB,
            "open last section takes the new size"
        );
    }
}
