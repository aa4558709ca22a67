//! In-memory row source for library consumers and tests.

use balewatch_types::RawCycleRow;

use super::{RowSource, SourceError};

/// A source that hands over a pre-tokenized batch exactly once.
///
/// Useful when an embedding application has already parsed its payload and
/// only needs the engine. A second fetch reports an empty payload.
#[derive(Debug)]
pub struct MemorySource {
    rows: Option<Vec<RawCycleRow>>,
    description: String,
}

impl MemorySource {
    /// Create a source over the given rows.
    pub fn new(rows: Vec<RawCycleRow>, description: &str) -> Self {
        Self {
            rows: Some(rows),
            description: format!("memory: {description}"),
        }
    }
}

impl RowSource for MemorySource {
    fn fetch(&mut self) -> Result<Vec<RawCycleRow>, SourceError> {
        match self.rows.take() {
            Some(rows) if !rows.is_empty() => Ok(rows),
            _ => Err(SourceError::EmptyPayload),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}
