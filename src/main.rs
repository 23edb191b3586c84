//! Command-line interface for fixture-forge
//!
//! # Usage Examples
//!
//! ## Streaming fixtures
//! ```bash
//! # Default layout: log text, records, random, then zero/random blocks
//! fixture-forge generate --output test_1gb.bin --size 1G --seed 42
//!
//! # One log-text section with a single ELF header at offset 0
//! fixture-forge generate --output log.bin --size 1M --profile log_text --signature 0=ELF
//!
//! # Explicit signatures instead of the default list
//! fixture-forge generate --output small.bin --size 1M \
//!   --signature 0=ELF --signature 4K=PNG
//!
//! # Validate a plan file and log its layout without writing
//! fixture-forge generate --output mixed.bin --plan mixed.yaml --dry-run
//! ```
//!
//! ## Plans and samples
//! ```bash
//! fixture-forge plan --size 64M > resolved.yaml
//! fixture-forge sample --output sample_file.tvts
//! ```
//!
//! Set `RUST_LOG` to control log output, or pass `-v` for debug logging.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixture_core::{GenerationPlan, PlanConfig};
use fixture_forge::{format_marker, sample};
use fixture_writer::{generate_to_file, GenerateArgs, GenerationReport, PlanArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fixture-forge")]
#[command(about = "Deterministic synthetic binary fixtures for binary inspection tools")]
#[command(long_about = None)]
struct Cli {
    /// Debug logging (when RUST_LOG is not set)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a fixture file of the requested size
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Write the small fixed-layout TVTS sample file
    Sample {
        /// Output file path
        #[arg(long, short = 'o', default_value = "sample_file.tvts")]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },

    /// Print the resolved plan as YAML
    Plan {
        #[command(flatten)]
        plan: PlanArgs,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate { args } => run_generate(args),
        Commands::Sample { output, force } => {
            let size = sample::write_sample_file(&output, force)?;
            tracing::info!("Created {} ({} bytes)", output.display(), size);
            Ok(())
        }
        Commands::Plan { plan } => {
            let plan = resolve_plan(&plan)?;
            let yaml = PlanConfig::from(&plan)
                .to_yaml()
                .context("Failed to render plan as YAML")?;
            print!("{yaml}");
            Ok(())
        }
    }
}

fn resolve_plan(args: &PlanArgs) -> anyhow::Result<GenerationPlan> {
    match &args.plan {
        Some(path) => args
            .resolve()
            .with_context(|| format!("Failed to build plan from {path:?}")),
        None => args.resolve().context("Invalid generation request"),
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let plan = resolve_plan(&args.plan)?;

    tracing::info!(
        "Plan: {} bytes in {} sections (chunk size {}, seed {}), {} signatures",
        plan.total_size(),
        plan.sections().len(),
        plan.chunk_size(),
        plan.seed(),
        plan.signatures().len()
    );

    if args.dry_run {
        tracing::warn!(
            "Dry-run mode: nothing will be written to {}",
            args.output.display()
        );
        for section in plan.sections().iter() {
            tracing::debug!(
                "  0x{:012X} {:>12} bytes {}",
                section.start_offset,
                section.length,
                section.profile
            );
        }
        log_markers(&plan);
        return Ok(());
    }

    let metrics = generate_to_file(plan.clone(), &args.output, args.force)
        .with_context(|| format!("Failed to generate {}", args.output.display()))?;

    tracing::info!(
        "Generated {}: {} bytes in {:?} ({:.2} MB/s)",
        args.output.display(),
        metrics.bytes_written,
        metrics.total_duration,
        metrics.megabytes_per_second()
    );
    log_markers(&plan);

    if let Some(metrics_output) = &args.metrics_output {
        write_report(
            metrics_output,
            &GenerationReport::new(&plan, &metrics, Some(&args.output)),
        )?;
    }

    Ok(())
}

fn log_markers(plan: &GenerationPlan) {
    if plan.signatures().is_empty() {
        return;
    }
    tracing::info!("Signature markers:");
    for signature in plan.signatures() {
        tracing::info!("  {}", format_marker(signature));
    }
}

fn write_report(path: &Path, report: &GenerationReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write metrics to {path:?}"))?;
    tracing::info!("Metrics written to {:?}", path);
    Ok(())
}
