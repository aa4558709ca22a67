//! Ingestion boundary: turning external payloads into raw rows.
//!
//! The engine itself never initiates ingestion; these sources are the
//! excluded upstream layer's contract. Each source hands over one finite
//! batch of header-named rows. Failures are reported as distinct kinds so
//! callers can tell an unreachable source from an empty or malformed
//! payload.

mod csv;
mod memory;

pub use csv::CsvSource;
pub use memory::MemorySource;

use balewatch_types::RawCycleRow;
use thiserror::Error;

/// Errors that can occur while fetching a batch of rows.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be read at all.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source was readable but contained no rows.
    #[error("empty payload")]
    EmptyPayload,

    /// The payload could not be parsed into rows.
    #[error("parse failure: {0}")]
    Parse(String),
}

/// A one-shot provider of raw telemetry rows.
///
/// Implementations read from files, in-memory batches, or any upstream
/// transport, and hand the engine already-tokenized rows.
pub trait RowSource {
    /// Fetch the batch of rows from this source.
    fn fetch(&mut self) -> Result<Vec<RawCycleRow>, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}

/// Parse a JSON array of header-named objects into raw rows.
///
/// The scalar typing follows the JSON values directly: numbers stay
/// numbers, booleans stay booleans, strings stay text.
pub fn parse_rows_json(payload: &str) -> Result<Vec<RawCycleRow>, SourceError> {
    let rows: Vec<RawCycleRow> =
        serde_json::from_str(payload).map_err(|e| SourceError::Parse(e.to_string()))?;
    if rows.is_empty() {
        return Err(SourceError::EmptyPayload);
    }
    Ok(rows)
}
