//! Run metrics and the JSON report written by `--metrics-output`.

use std::path::Path;
use std::time::Duration;

use fixture_core::GenerationPlan;
use serde::Serialize;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Metrics from a generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateMetrics {
    /// Bytes handed to the sink.
    pub bytes_written: u64,
    /// Chunks handed to the sink.
    pub chunks_written: u64,
    /// Sections started.
    pub sections_written: u64,
    /// Signatures spliced into the output.
    pub signatures_planted: u64,
    /// Time from the first chunk to the final flush.
    pub total_duration: Duration,
    /// Time spent generating content.
    pub generation_duration: Duration,
    /// Time spent in the sink.
    pub write_duration: Duration,
}

impl GenerateMetrics {
    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn megabytes_per_second(&self) -> f64 {
        self.bytes_per_second() / BYTES_PER_MB
    }
}

/// A signature as reported after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantedSignature {
    pub offset: u64,
    pub name: String,
    pub len: u64,
}

/// Serializable summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Output path, if the run wrote to a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub seed: u64,
    pub total_size: u64,
    pub chunk_size: u64,
    pub bytes_written: u64,
    pub chunks_written: u64,
    pub sections_written: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
    pub generation_ms: u64,
    pub write_ms: u64,
    pub bytes_per_second: f64,
    pub megabytes_per_second: f64,
    pub signatures: Vec<PlantedSignature>,
}

impl GenerationReport {
    pub fn new(plan: &GenerationPlan, metrics: &GenerateMetrics, output: Option<&Path>) -> Self {
        Self {
            output: output.map(|path| path.display().to_string()),
            seed: plan.seed(),
            total_size: plan.total_size(),
            chunk_size: plan.chunk_size(),
            bytes_written: metrics.bytes_written,
            chunks_written: metrics.chunks_written,
            sections_written: metrics.sections_written,
            duration_ms: metrics.total_duration.as_millis() as u64,
            generation_ms: metrics.generation_duration.as_millis() as u64,
            write_ms: metrics.write_duration.as_millis() as u64,
            bytes_per_second: metrics.bytes_per_second(),
            megabytes_per_second: metrics.megabytes_per_second(),
            signatures: plan
                .signatures()
                .iter()
                .map(|signature| PlantedSignature {
                    offset: signature.offset,
                    name: signature.name.clone(),
                    len: signature.len(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_core::{EntropyProfile, KnownSignature, SectionPlan, Signature};

    #[test]
    fn test_throughput() {
        let metrics = GenerateMetrics {
            bytes_written: 4 * 1024 * 1024,
            total_duration: Duration::from_secs(2),
            ..Default::default()
        };
        assert_eq!(metrics.bytes_per_second(), 2.0 * 1024.0 * 1024.0);
        assert_eq!(metrics.megabytes_per_second(), 2.0);
    }

    #[test]
    fn test_throughput_zero_duration() {
        let metrics = GenerateMetrics {
            bytes_written: 10,
            ..Default::default()
        };
        assert_eq!(metrics.bytes_per_second(), 0.0);
    }

    #[test]
    fn test_report_lists_signatures() {
        let sections = SectionPlan::single(4096, EntropyProfile::Random).unwrap();
        let plan = GenerationPlan::new(
            4096,
            9,
            sections,
            vec![
                Signature::known(0, KnownSignature::Elf),
                Signature::known(100, KnownSignature::Pdf),
            ],
        )
        .unwrap();
        let metrics = GenerateMetrics {
            bytes_written: 4096,
            chunks_written: 1,
            sections_written: 1,
            signatures_planted: 2,
            total_duration: Duration::from_millis(1500),
            ..Default::default()
        };

        let report = GenerationReport::new(&plan, &metrics, Some(Path::new("out.bin")));
        assert_eq!(report.output.as_deref(), Some("out.bin"));
        assert_eq!(report.duration_ms, 1500);
        assert_eq!(
            report.signatures,
            vec![
                PlantedSignature {
                    offset: 0,
                    name: "ELF".to_string(),
                    len: 16
                },
                PlantedSignature {
                    offset: 100,
                    name: "PDF".to_string(),
                    len: 15
                },
            ]
        );
    }
}
