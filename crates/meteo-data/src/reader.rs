//! Streaming per-file processing.
//!
//! Opens one archive, decompresses it if needed and decodes it line by line.
//! The file handle and decoder live only for the duration of
//! [`FileProcessor::process_file`].

use std::fs::File;
use std::io::{BufRead, Read};
use std::path::Path;

use meteo_core::error::{MeteoError, Result};
use meteo_core::models::ObservationRecord;
use tracing::debug;

use crate::decoder::RecordDecoder;
use crate::decompress::open_reader;

/// Longest accepted line, excluding its newline.
pub const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

// ── FileProcessor ─────────────────────────────────────────────────────────────

pub struct FileProcessor {
    decoder: RecordDecoder,
    max_line_bytes: usize,
}

impl FileProcessor {
    pub fn new(decoder: RecordDecoder) -> Self {
        Self {
            decoder,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }

    /// Override the maximum line length.
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    pub fn decoder(&self) -> &RecordDecoder {
        &self.decoder
    }

    /// Decode every record of the archive at `path`, in line order.
    ///
    /// Returns no partial result: the first failing line fails the file.
    pub fn process_file(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        debug!("Processing file {}", path.display());
        let file = File::open(path).map_err(|source| MeteoError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = open_reader(path, file)?;
        self.process_reader(path, reader)
    }

    /// Decode every line of `reader`; `path` is only used for error context.
    pub fn process_reader<R: BufRead>(
        &self,
        path: &Path,
        mut reader: R,
    ) -> Result<Vec<ObservationRecord>> {
        let mut records: Vec<ObservationRecord> = Vec::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut line_no = 0usize;
        let limit = self.max_line_bytes as u64 + 1;

        loop {
            buf.clear();
            let read = (&mut reader)
                .take(limit)
                .read_until(b'\n', &mut buf)
                .map_err(|source| MeteoError::LineRead {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_no += 1;

            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            } else if buf.len() > self.max_line_bytes {
                return Err(MeteoError::LineTooLong {
                    path: path.to_path_buf(),
                    line: line_no,
                    limit: self.max_line_bytes,
                });
            }

            let decoded = self
                .decoder
                .decode_line(&buf)
                .map_err(|e| MeteoError::Decode {
                    path: path.to_path_buf(),
                    line: line_no,
                    source: Box::new(e),
                })?;
            records.extend(decoded);
        }

        debug!(
            "File {}: {} lines, {} records",
            path.display(),
            line_no,
            records.len()
        );
        Ok(records)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
