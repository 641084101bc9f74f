//! Data ingestion layer for meteo archives.
//!
//! Responsible for discovering archive files, decompressing and decoding
//! them line by line, and accumulating the observations into a
//! deduplicated store under a stopping rule.

pub mod accumulator;
pub mod decoder;
pub mod decompress;
pub mod locator;
pub mod pipeline;
pub mod reader;

#[cfg(test)]
mod test_support;

pub use meteo_core as core;
