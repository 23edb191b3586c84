//! Synthetic ASCII log lines.

use crate::generators::{copy_pending, ByteGenerator};
use crate::rng::DeterministicSource;

/// Timestamp of the first line before its increment is applied.
pub const BASE_TIMESTAMP: u64 = 1_700_000_000;

/// Largest timestamp increment between two lines.
pub const MAX_INCREMENT: u32 = 5000;

pub const LEVELS: [&str; 5] = ["INFO", "WARN", "ERROR", "DEBUG", "TRACE"];

pub const MODULES: [&str; 8] = [
    "server", "db", "auth", "cache", "net", "io", "parser", "render",
];

pub const MESSAGES: [&str; 10] = [
    "request processed successfully",
    "connection established",
    "cache miss for key",
    "timeout waiting for response",
    "retrying operation",
    "invalid input received",
    "shutting down gracefully",
    "loaded configuration from disk",
    "spawned worker thread",
    "checksum verification passed",
];

/// Emits lines of the form `[<timestamp>] <LEVEL> <module> | <message>\n`.
///
/// A line that does not fit the current chunk is kept and finished in the
/// next one, so output never depends on where chunks are cut.
#[derive(Debug, Clone)]
pub struct LogTextGenerator {
    timestamp: u64,
    line: Vec<u8>,
    cursor: usize,
}

impl LogTextGenerator {
    pub fn new() -> Self {
        Self {
            timestamp: BASE_TIMESTAMP,
            line: Vec::new(),
            cursor: 0,
        }
    }

    /// Timestamp of the most recently generated line.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn next_line(&mut self, rng: &mut DeterministicSource) {
        self.timestamp += u64::from(rng.next_int_in_range(1, MAX_INCREMENT));
        let level = LEVELS[pick(rng, LEVELS.len())];
        let module = MODULES[pick(rng, MODULES.len())];
        let message = MESSAGES[pick(rng, MESSAGES.len())];

        let timestamp = self.timestamp;
        self.line = format!("[{timestamp}] {level:<5} {module:<8} | {message}\n").into_bytes();
        self.cursor = 0;
    }
}

impl Default for LogTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteGenerator for LogTextGenerator {
    fn fill(&mut self, out: &mut [u8], rng: &mut DeterministicSource) {
        let mut written = 0;
        while written < out.len() {
            if self.cursor == self.line.len() {
                self.next_line(rng);
            }
            written += copy_pending(&self.line, &mut self.cursor, &mut out[written..]);
        }
    }
}

fn pick(rng: &mut DeterministicSource, len: usize) -> usize {
    rng.next_int_in_range(0, len as u32 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, len: usize) -> Vec<u8> {
        let mut rng = DeterministicSource::new(seed);
        let mut out = vec![0u8; len];
        LogTextGenerator::new().fill(&mut out, &mut rng);
        out
    }

    #[test]
    fn test_pinned_first_lines() {
        let expected = "[1700001850] WARN  io       | checksum verification passed\n\
                        [1700003475] WARN  io       | spawned worker thread\n\
                        [1700003541] INFO  net      | retrying operation\n";
        let out = generate(42, expected.len());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_final_line_truncated_to_length() {
        let out = generate(42, 20);
        assert_eq!(&out, b"[1700001850] WARN  i");
    }

    #[test]
    fn test_split_fill_matches_single_fill() {
        let whole = generate(5, 4096);

        let mut rng = DeterministicSource::new(5);
        let mut generator = LogTextGenerator::new();
        let mut pieces = Vec::new();
        for len in [1usize, 7, 60, 1000, 3028] {
            let mut chunk = vec![0u8; len];
            generator.fill(&mut chunk, &mut rng);
            pieces.extend_from_slice(&chunk);
        }
        assert_eq!(pieces, whole);
    }

    #[test]
    fn test_lines_are_well_formed() {
        let out = generate(11, 64 * 1024);
        let text = String::from_utf8(out).unwrap();
        let mut previous = BASE_TIMESTAMP;

        // The piece after the last newline may be a truncated line.
        let lines: Vec<&str> = text.split('\n').collect();
        for line in &lines[..lines.len() - 1] {
            let (stamp, rest) = line[1..].split_once("] ").unwrap();
            let stamp: u64 = stamp.parse().unwrap();
            assert!(stamp > previous && stamp - previous <= u64::from(MAX_INCREMENT));
            previous = stamp;

            let (level, rest) = rest.split_at(5);
            assert!(LEVELS.contains(&level.trim_end()));
            let (module, message) = rest[1..].split_at(8);
            assert!(MODULES.contains(&module.trim_end()));
            assert!(MESSAGES.contains(&message.strip_prefix(" | ").unwrap()));
        }
    }

    #[test]
    fn test_timestamp_tracks_last_line() {
        let mut rng = DeterministicSource::new(42);
        let mut generator = LogTextGenerator::new();
        generator.fill(&mut [0u8; 1], &mut rng);
        assert_eq!(generator.timestamp(), 1_700_001_850);
    }
}
