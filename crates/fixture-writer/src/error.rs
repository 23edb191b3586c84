//! Error types for the stream writer.

use std::path::PathBuf;

use fixture_generator::GeneratorError;
use thiserror::Error;

use crate::writer::WriterState;

/// Errors that can occur while streaming a plan into a sink.
#[derive(Error, Debug)]
pub enum WriterError {
    /// The sink rejected a chunk; the run is aborted.
    #[error("sink rejected {len} bytes at offset {offset}: {source}")]
    Sink {
        offset: u64,
        len: u64,
        #[source]
        source: std::io::Error,
    },

    /// Flushing the sink after the last chunk failed.
    #[error("failed to flush output after {offset} bytes: {source}")]
    Flush {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// Operation not allowed in the writer's current state.
    #[error("cannot {operation} while writer is {state}")]
    InvalidState {
        operation: &'static str,
        state: WriterState,
    },

    /// Output file exists and overwriting was not requested.
    #[error("output '{}' already exists (use --force to overwrite)", path.display())]
    OutputExists { path: PathBuf },

    /// Output file could not be created.
    #[error("failed to create output '{}': {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chunk does not fit in memory on this platform.
    #[error("chunk of {len} bytes does not fit in memory")]
    ChunkTooLarge { len: u64 },

    /// Generator error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
}
