//! Streaming a plan into a file on disk.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;

use fixture_core::GenerationPlan;
use tracing::info;

use crate::error::WriterError;
use crate::metrics::GenerateMetrics;
use crate::writer::StreamWriter;

/// Default buffer size for file output.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Generate `plan` into the file at `path`.
///
/// Refuses to replace an existing file unless `force` is set. On a sink
/// failure the file is left holding whatever was written before it.
pub fn generate_to_file(
    plan: GenerationPlan,
    path: &Path,
    force: bool,
) -> Result<GenerateMetrics, WriterError> {
    let file = create_output(path, force)?;

    info!(
        "Generating '{}' ({} bytes, seed {})",
        path.display(),
        plan.total_size(),
        plan.seed()
    );

    let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);

    let mut writer = StreamWriter::with_plan(buf_writer, plan);
    writer.run()
}

/// Open `path` for writing.
///
/// Without `force` the file must not exist yet; the check and the creation
/// are one filesystem operation. With `force` an existing file is truncated.
pub fn create_output(path: &Path, force: bool) -> Result<File, WriterError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    options.open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            WriterError::OutputExists {
                path: path.to_path_buf(),
            }
        } else {
            WriterError::CreateOutput {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
