//! Deduplicating accumulation of observations across archive files.
//!
//! An [`Accumulator`] owns the [`ObservationStore`] for one run. Files are
//! folded in one at a time; records are keyed by [`IngestionKey`] and a later
//! record replaces an earlier one with the same key. After every file the
//! stopping rule decides whether to continue.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use meteo_core::error::Result;
use meteo_core::models::{IngestionKey, ObservationRecord};
use meteo_core::settings::{DecodeErrorPolicy, IngestLimits};
use tracing::{error, info, warn};

use crate::reader::FileProcessor;

// ── ObservationStore ──────────────────────────────────────────────────────────

/// Observations keyed by station and interval start.
#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    records: HashMap<IngestionKey, ObservationRecord>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under its key, returning the record it replaced.
    pub fn insert(&mut self, record: ObservationRecord) -> Option<ObservationRecord> {
        self.records.insert(record.key(), record)
    }

    pub fn get(&self, key: &IngestionKey) -> Option<&ObservationRecord> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &IngestionKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IngestionKey, &ObservationRecord)> {
        self.records.iter()
    }

    /// Number of distinct stations in the store.
    pub fn station_count(&self) -> usize {
        self.records
            .keys()
            .map(|k| k.station_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Earliest interval start and latest interval end, if any.
    pub fn interval_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.records.values().map(|r| r.interval_start).min()?;
        let end = self.records.values().map(|r| r.interval_end).max()?;
        Some((start, end))
    }

    /// All records ordered by key.
    pub fn into_records(self) -> Vec<ObservationRecord> {
        let mut entries: Vec<(IngestionKey, ObservationRecord)> =
            self.records.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, record)| record).collect()
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Why ingestion stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The store grew past `max_records`.
    RecordLimit,
    /// `max_files` files were processed.
    FileLimit,
    /// Every located file was processed.
    Exhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::RecordLimit => "record limit reached",
            StopReason::FileLimit => "file limit reached",
            StopReason::Exhausted => "all files processed",
        };
        f.write_str(text)
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Files attempted, including failed ones.
    pub files_processed: usize,
    /// Files that contributed nothing because they failed.
    pub files_failed: usize,
    /// Records decoded from successful files.
    pub records_decoded: usize,
    /// Records that replaced an existing entry with the same key.
    pub records_replaced: usize,
    pub stop_reason: Option<StopReason>,
}

// ── Accumulator ───────────────────────────────────────────────────────────────

pub struct Accumulator {
    store: ObservationStore,
    limits: IngestLimits,
    policy: DecodeErrorPolicy,
    report: IngestReport,
}

impl Accumulator {
    pub fn new(limits: IngestLimits, policy: DecodeErrorPolicy) -> Self {
        Self {
            store: ObservationStore::new(),
            limits,
            policy,
            report: IngestReport::default(),
        }
    }

    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Fold one file's records into the store, in order.
    pub fn ingest_records(&mut self, records: Vec<ObservationRecord>) {
        self.report.files_processed += 1;
        self.report.records_decoded += records.len();
        for record in records {
            if self.store.insert(record).is_some() {
                self.report.records_replaced += 1;
            }
        }
    }

    /// Process `path` and fold its records into the store.
    ///
    /// Open and decompression failures only drop this file. Decode failures
    /// drop the file under [`DecodeErrorPolicy::Skip`] and are returned under
    /// [`DecodeErrorPolicy::Abort`].
    pub fn ingest_file(&mut self, processor: &FileProcessor, path: &Path) -> Result<()> {
        match processor.process_file(path) {
            Ok(records) => {
                info!(
                    "Processed file {}: {} records",
                    path.display(),
                    records.len()
                );
                self.ingest_records(records);
                Ok(())
            }
            Err(e) => {
                self.report.files_processed += 1;
                self.report.files_failed += 1;
                if e.is_decode_error() && self.policy == DecodeErrorPolicy::Abort {
                    error!("Aborting ingestion: {}", e);
                    return Err(e);
                }
                warn!("Skipping file {}: {}", path.display(), e);
                Ok(())
            }
        }
    }

    /// Evaluate the stopping rule against the current state.
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.store.len() > self.limits.max_records {
            Some(StopReason::RecordLimit)
        } else if self.report.files_processed >= self.limits.max_files {
            Some(StopReason::FileLimit)
        } else {
            None
        }
    }

    pub fn should_stop(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// Ingest `paths` in order until the stopping rule fires or the paths
    /// run out.
    pub fn run<I, P>(&mut self, paths: I, processor: &FileProcessor) -> Result<StopReason>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.ingest_file(processor, path.as_ref())?;
            info!("Count of observations: {}", self.store.len());

            if let Some(reason) = self.stop_reason() {
                info!("Stopping ingestion: {}", reason);
                self.report.stop_reason = Some(reason);
                return Ok(reason);
            }
        }
        self.report.stop_reason = Some(StopReason::Exhausted);
        Ok(StopReason::Exhausted)
    }

    pub fn into_store(self) -> ObservationStore {
        self.store
    }

    pub fn into_parts(self) -> (ObservationStore, IngestReport) {
        (self.store, self.report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
