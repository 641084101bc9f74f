//! Core types for meteo archive ingestion.
//!
//! Holds the observation model, the shared error type, the archive
//! timestamp parser and the run configuration.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{MeteoError, Result};
pub use models::{IngestionKey, ObservationRecord};
