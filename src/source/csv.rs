//! CSV file source with dynamic cell typing.
//!
//! Cells are typed the way a dynamic-typing CSV parser would: clean
//! numeric strings become numbers, exact `true`/`false` become booleans,
//! empty cells become null, everything else stays text. `"True"` and
//! `"False"` are therefore text, which is what the record derivation
//! expects for trigger and feedback columns.

use std::path::{Path, PathBuf};

use balewatch_types::{FieldValue, RawCycleRow};

use super::{RowSource, SourceError};

/// A row source backed by a delimited text file with a header row.
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    description: String,
}

impl CsvSource {
    /// Create a source for the given file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("csv: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for CsvSource {
    fn fetch(&mut self) -> Result<Vec<RawCycleRow>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| SourceError::Parse(e.to_string()))?
            .clone();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| SourceError::Parse(e.to_string()))?;
            let row: RawCycleRow = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| (header.to_string(), type_cell(cell)))
                .collect();
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(SourceError::EmptyPayload);
        }
        Ok(rows)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Type one CSV cell.
fn type_cell(cell: &str) -> FieldValue {
    let cell = cell.trim();
    if cell.is_empty() {
        return FieldValue::Null;
    }
    match cell {
        "true" => return FieldValue::Bool(true),
        "false" => return FieldValue::Bool(false),
        _ => {}
    }
    // Only strings that look numeric are parsed; this keeps "NaN", "inf"
    // and id-like values as text.
    let numeric_shape = cell
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_digit() || b == b'-' || b == b'+' || b == b'.');
    if numeric_shape {
        if let Ok(n) = cell.parse::<f64>() {
            if n.is_finite() {
                return FieldValue::Number(n);
            }
        }
    }
    FieldValue::Text(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use balewatch_types::RowFields;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_csv() -> &'static str {
        "device_id,cycle_started_at,cycle_duration_ms,di_e_stop_triggered,di_overload_trip,note\n\
         BALER-01,2024-03-04T08:00:00Z,120000,True,false,\n\
         BALER-02,2024-03-04T09:00:00Z,90000,False,true,checked\n"
    }

    #[test]
    fn reads_rows_with_dynamic_typing() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();

        let mut source = CsvSource::new(file.path());
        let rows = source.fetch().unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.text("device_id"), Some("BALER-01"));
        assert_eq!(first.num("cycle_duration_ms"), Some(120000.0));
        // "True" stays text and still trips the flag coercion; lowercase
        // "false" became a real boolean.
        assert_eq!(first.text("di_e_stop_triggered"), Some("True"));
        assert!(first.flag("di_e_stop_triggered"));
        assert_eq!(
            first.get("di_overload_trip"),
            Some(&FieldValue::Bool(false))
        );
        assert_eq!(first.get("note"), Some(&FieldValue::Null));

        let second = &rows[1];
        assert!(second.flag("di_overload_trip"));
        assert_eq!(second.text("note"), Some("checked"));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let mut source = CsvSource::new("/nonexistent/telemetry.csv");
        assert!(matches!(
            source.fetch(),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn header_only_file_is_an_empty_payload() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "device_id,cycle_started_at").unwrap();

        let mut source = CsvSource::new(file.path());
        assert!(matches!(source.fetch(), Err(SourceError::EmptyPayload)));
    }

    #[test]
    fn cell_typing_rules() {
        assert_eq!(type_cell("12.5"), FieldValue::Number(12.5));
        assert_eq!(type_cell("-3"), FieldValue::Number(-3.0));
        assert_eq!(type_cell("true"), FieldValue::Bool(true));
        assert_eq!(type_cell("True"), FieldValue::Text("True".into()));
        assert_eq!(type_cell("NaN"), FieldValue::Text("NaN".into()));
        assert_eq!(type_cell("inf"), FieldValue::Text("inf".into()));
        assert_eq!(type_cell(""), FieldValue::Null);
        assert_eq!(
            type_cell("BALER-01"),
            FieldValue::Text("BALER-01".into())
        );
    }

    #[test]
    fn description_names_the_file() {
        let source = CsvSource::new("/tmp/fleet.csv");
        assert_eq!(source.description(), "csv: /tmp/fleet.csv");
        assert_eq!(source.path(), Path::new("/tmp/fleet.csv"));
    }
}
