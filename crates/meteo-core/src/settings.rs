use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{MeteoError, Result};

// ── Library configuration ─────────────────────────────────────────────────────

/// Default collection size above which ingestion stops.
pub const DEFAULT_MAX_RECORDS: usize = 50_000;

/// Default number of files after which ingestion stops.
pub const DEFAULT_MAX_FILES: usize = 3;

/// What to do when a file's contents fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    /// Stop the whole run and return the error.
    #[default]
    Abort,
    /// Log the error, drop the file's records and continue with the next file.
    Skip,
}

/// Thresholds of the stopping rule, checked after every file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestLimits {
    /// Stop once the collection holds more than this many records.
    pub max_records: usize,
    /// Stop once this many files have been processed.
    pub max_files: usize,
}

impl IngestLimits {
    pub fn new(max_records: usize, max_files: usize) -> Result<Self> {
        if max_files == 0 {
            return Err(MeteoError::Config(
                "max_files must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_records,
            max_files,
        })
    }

    /// Limits that never trigger; ingestion runs until files are exhausted.
    pub fn unbounded() -> Self {
        Self {
            max_records: usize::MAX,
            max_files: usize::MAX,
        }
    }
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Ingest archived weather-station observations into a deduplicated collection
#[derive(Parser, Debug, Clone)]
#[command(
    name = "meteo-ingest",
    about = "Ingest archived weather-station observations",
    version
)]
pub struct Settings {
    /// Root directory searched for meteo_data_archive_*.json[.gz] files
    #[arg(long, env = "METEO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Stop after the collection holds more than this many records
    #[arg(long, default_value_t = DEFAULT_MAX_RECORDS)]
    pub max_records: usize,

    /// Stop after this many files were processed
    #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
    pub max_files: usize,

    /// Behaviour when a file fails to decode
    #[arg(long, value_enum, default_value_t = DecodeErrorPolicy::Abort)]
    pub on_decode_error: DecodeErrorPolicy,

    /// Timezone used to resolve abbreviations (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] for an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The data root: the explicit flag, or `~/slo-weather/data`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join("slo-weather").join("data")
    }

    pub fn ingest_limits(&self) -> Result<IngestLimits> {
        IngestLimits::new(self.max_records, self.max_files)
    }

    pub fn decode_error_policy(&self) -> DecodeErrorPolicy {
        self.on_decode_error
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
