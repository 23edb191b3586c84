//! Chunked streaming writer.

use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use fixture_core::{ChunkCursor, ChunkSpec, GenerationPlan};
use fixture_generator::ContentGenerator;
use tracing::{debug, info};

use crate::error::WriterError;
use crate::metrics::GenerateMetrics;

/// Lifecycle of a [`StreamWriter`].
///
/// ```text
/// Idle ──load_plan──▶ Planned ──write──▶ Writing ──last chunk──▶ Complete
///                                           │
///                                           └──sink error──▶ Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Idle,
    Planned,
    Writing,
    Complete,
    Aborted,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::Idle => "idle",
            WriterState::Planned => "planned",
            WriterState::Writing => "writing",
            WriterState::Complete => "complete",
            WriterState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Outcome of one [`StreamWriter::write_next_chunk`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkReport {
    pub chunk: ChunkSpec,
    /// Signatures spliced into this chunk
    pub signatures: usize,
}

/// Streams a [`GenerationPlan`] into a sink one chunk at a time.
///
/// Only one chunk buffer is ever held, sized to the largest chunk of the
/// plan, so memory use is bounded by the chunk size whatever the total size.
/// The caller may stop stepping between chunks; the sink then holds a prefix
/// of the output.
pub struct StreamWriter<W: Write> {
    sink: W,
    state: WriterState,
    plan: Option<GenerationPlan>,
    cursor: ChunkCursor,
    generator: ContentGenerator,
    buffer: Vec<u8>,
    offset: u64,
    metrics: GenerateMetrics,
    started_at: Option<Instant>,
}

impl<W: Write> StreamWriter<W> {
    /// Create an idle writer around `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::Idle,
            plan: None,
            cursor: ChunkCursor::default(),
            generator: ContentGenerator::new(0),
            buffer: Vec::new(),
            offset: 0,
            metrics: GenerateMetrics::default(),
            started_at: None,
        }
    }

    /// Create a writer with `plan` already loaded.
    pub fn with_plan(sink: W, plan: GenerationPlan) -> Self {
        let mut writer = Self::new(sink);
        writer.install(plan);
        writer
    }

    /// Load the plan for this run. Only allowed once, while idle.
    pub fn load_plan(&mut self, plan: GenerationPlan) -> Result<(), WriterError> {
        self.expect_state("load a plan", &[WriterState::Idle])?;
        self.install(plan);
        Ok(())
    }

    fn install(&mut self, plan: GenerationPlan) {
        info!(
            "Loaded plan: {} bytes in {} sections, {} chunks of up to {} bytes, {} signatures, seed {}",
            plan.total_size(),
            plan.sections().len(),
            plan.chunk_count(),
            plan.chunk_size(),
            plan.signatures().len(),
            plan.seed()
        );

        self.generator = ContentGenerator::new(plan.seed());
        self.buffer = vec![0u8; plan.max_chunk_len() as usize];
        self.cursor = ChunkCursor::default();
        self.offset = 0;
        self.metrics = GenerateMetrics::default();
        self.plan = Some(plan);
        self.state = WriterState::Planned;
    }

    /// Generate, splice and write the next chunk.
    ///
    /// The writer moves to `Complete` as soon as the last chunk has been
    /// written and the sink flushed.
    pub fn write_next_chunk(&mut self) -> Result<ChunkReport, WriterError> {
        self.expect_state(
            "write a chunk",
            &[WriterState::Planned, WriterState::Writing],
        )?;
        let Some(plan) = self.plan.as_ref() else {
            return Err(WriterError::InvalidState {
                operation: "write a chunk",
                state: self.state,
            });
        };

        if self.state == WriterState::Planned {
            self.state = WriterState::Writing;
            self.started_at = Some(Instant::now());
            info!("Starting generation of {} bytes", plan.total_size());
        }

        let Some(chunk) = self.cursor.next_chunk(plan) else {
            return Err(WriterError::InvalidState {
                operation: "write a chunk",
                state: self.state,
            });
        };
        let len = usize::try_from(chunk.len)
            .map_err(|_| WriterError::ChunkTooLarge { len: chunk.len })?;

        if chunk.is_section_start() {
            info!(
                "Section {}: {} bytes of {} at offset {}",
                chunk.section_index,
                plan.sections()
                    .get(chunk.section_index)
                    .map_or(0, |section| section.length),
                chunk.profile,
                chunk.offset
            );
            self.metrics.sections_written += 1;
        }

        let buffer = &mut self.buffer[..len];

        let generation_start = Instant::now();
        self.generator.fill_chunk(&chunk, buffer)?;
        let signatures = plan.signatures().splice(chunk.offset, buffer);
        self.metrics.generation_duration += generation_start.elapsed();

        let write_start = Instant::now();
        if let Err(source) = self.sink.write_all(buffer) {
            self.state = WriterState::Aborted;
            return Err(WriterError::Sink {
                offset: chunk.offset,
                len: chunk.len,
                source,
            });
        }
        self.metrics.write_duration += write_start.elapsed();

        self.offset += chunk.len;
        self.metrics.bytes_written += chunk.len;
        self.metrics.chunks_written += 1;
        self.metrics.signatures_planted += signatures as u64;

        debug!(
            "Wrote chunk {} of section {}: {} bytes at offset {} ({} signatures)",
            chunk.chunk_index, chunk.section_index, chunk.len, chunk.offset, signatures
        );

        if self.cursor.is_finished(plan) {
            if let Err(source) = self.sink.flush() {
                self.state = WriterState::Aborted;
                return Err(WriterError::Flush {
                    offset: self.offset,
                    source,
                });
            }
            self.state = WriterState::Complete;
            self.metrics.total_duration = self
                .started_at
                .map_or(Duration::ZERO, |started| started.elapsed());

            info!(
                "Generation complete: {} bytes in {:?} ({:.2} MB/s)",
                self.metrics.bytes_written,
                self.metrics.total_duration,
                self.metrics.megabytes_per_second()
            );
        }

        Ok(ChunkReport { chunk, signatures })
    }

    /// Write every remaining chunk and return the run metrics.
    pub fn run(&mut self) -> Result<GenerateMetrics, WriterError> {
        self.expect_state("run", &[WriterState::Planned, WriterState::Writing])?;
        while self.state != WriterState::Complete {
            self.write_next_chunk()?;
        }
        Ok(self.metrics.clone())
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Bytes written to the sink so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn plan(&self) -> Option<&GenerationPlan> {
        self.plan.as_ref()
    }

    pub fn metrics(&self) -> &GenerateMetrics {
        &self.metrics
    }

    /// Capacity of the chunk buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[WriterState],
    ) -> Result<(), WriterError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(WriterError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}
