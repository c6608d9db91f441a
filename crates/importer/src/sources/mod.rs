mod csv;
mod scraped;

pub use self::csv::CsvImporter;
pub use self::scraped::ScrapedJsonImporter;

use std::path::Path;
use tracing::info;

use crate::mapping::{FieldMapping, HeaderIndex};
use crate::row::{FieldValue, ImportOptions, RowRejection, RowResolver};
use crate::summary::ParseOutcome;
use crate::traits::ResultImporter;
use crate::validator::ImportValidator;
use crate::{ImporterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    ScrapedJson,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("csv") | Some("txt") => Ok(Self::Csv),
            Some("json") => Ok(Self::ScrapedJson),
            _ => Err(ImporterError::MappingError(format!(
                "Cannot tell the format of '{}'; expected a .csv or .json file",
                path.display()
            ))),
        }
    }

    pub fn importer(&self) -> Box<dyn ResultImporter> {
        match self {
            Self::Csv => Box::new(CsvImporter),
            Self::ScrapedJson => Box::new(ScrapedJsonImporter),
        }
    }
}

/// The one ingestion pipeline: validate the mapping, resolve every row,
/// then review what came out.
pub(crate) fn ingest<I>(
    source: &str,
    headers: &[String],
    rows: I,
    mapping: &FieldMapping,
    options: &ImportOptions,
) -> Result<ParseOutcome>
where
    I: IntoIterator<Item = std::result::Result<Vec<FieldValue>, RowRejection>>,
{
    let index = HeaderIndex::build(mapping, headers);
    let report = ImportValidator::validate_mapping(mapping, &index)?;

    let resolver = RowResolver::new(&index, options);
    let outcome = ParseOutcome::collect(&resolver, rows);
    let review = ImportValidator::review_outcome(&outcome);

    info!(
        "Imported {} of {} {} rows ({} excluded)",
        outcome.summary.imported, outcome.summary.processed, source, outcome.summary.excluded
    );

    Ok(outcome.with_report(report.merge(review)))
}
