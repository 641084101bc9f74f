//! Top-level ingestion pipeline.
//!
//! Locates archive files under a data root, feeds them through a
//! [`FileProcessor`] into an [`Accumulator`], and returns the deduplicated
//! store with a report of the run.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use meteo_core::error::Result;
use meteo_core::settings::{DecodeErrorPolicy, IngestLimits};
use meteo_core::time_utils::TimestampParser;
use tracing::info;

use crate::accumulator::{Accumulator, IngestReport, ObservationStore};
use crate::decoder::RecordDecoder;
use crate::locator::FileLocator;
use crate::reader::FileProcessor;

// ── Public types ──────────────────────────────────────────────────────────────

/// Options for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub limits: IngestLimits,
    pub policy: DecodeErrorPolicy,
    /// IANA timezone used to resolve ambiguous abbreviations.
    pub timezone: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            limits: IngestLimits::default(),
            policy: DecodeErrorPolicy::default(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Metadata produced alongside the store.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IngestMetadata {
    /// ISO-8601 timestamp when the run finished.
    pub generated_at: String,
    /// Number of archive files found under the data root.
    pub files_found: usize,
    /// Wall-clock seconds spent processing files.
    pub load_time_seconds: f64,
}

/// The complete output of [`ingest_archives`].
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub store: ObservationStore,
    pub report: IngestReport,
    pub metadata: IngestMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full ingestion pipeline over `root`.
///
/// 1. Locate archive files (a failed walk yields no files).
/// 2. Process them in walk order until the stopping rule fires.
/// 3. Return the store, the run report and metadata.
///
/// Fails only when a decode error occurs under [`DecodeErrorPolicy::Abort`].
pub fn ingest_archives(root: &Path, options: &IngestOptions) -> Result<IngestOutcome> {
    // ── Step 1: Locate files ─────────────────────────────────────────────────
    let files = FileLocator::default().find(root);
    info!("Found {} archive files under {}", files.len(), root.display());

    // ── Step 2: Ingest ───────────────────────────────────────────────────────
    let processor = FileProcessor::new(RecordDecoder::new(TimestampParser::new(
        &options.timezone,
    )));
    let mut accumulator = Accumulator::new(options.limits, options.policy);

    let load_start = Instant::now();
    accumulator.run(&files, &processor)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 3: Build result ─────────────────────────────────────────────────
    let (store, report) = accumulator.into_parts();
    let metadata = IngestMetadata {
        generated_at: Utc::now().to_rfc3339(),
        files_found: files.len(),
        load_time_seconds: load_time,
    };

    Ok(IngestOutcome {
        store,
        report,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
