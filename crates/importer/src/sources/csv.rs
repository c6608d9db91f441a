use csv::{ReaderBuilder, Trim};
use tracing::debug;

use super::ingest;
use crate::Result;
use crate::mapping::FieldMapping;
use crate::row::{FieldValue, ImportOptions, RowRejection};
use crate::summary::ParseOutcome;
use crate::traits::ResultImporter;

/// Comma-delimited exports with a header row.
pub struct CsvImporter;

impl CsvImporter {
    fn reader(input: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input.as_bytes())
    }
}

impl ResultImporter for CsvImporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn headers(&self, input: &str) -> Result<Vec<String>> {
        let mut reader = Self::reader(input);
        Ok(reader.headers()?.iter().map(str::to_string).collect())
    }

    fn import(
        &self,
        input: &str,
        mapping: &FieldMapping,
        options: &ImportOptions,
    ) -> Result<ParseOutcome> {
        let mut reader = Self::reader(input);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let rows = reader.records().map(|record| match record {
            Ok(record) => Ok(record.iter().map(FieldValue::from_cell).collect()),
            Err(e) => {
                debug!("Skipping unreadable CSV record: {}", e);
                Err(RowRejection::Unreadable)
            }
        });

        ingest(self.name(), &headers, rows, mapping, options)
    }
}
