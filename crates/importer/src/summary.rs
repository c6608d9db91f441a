use scoring::models::ParsedResult;
use serde::{Deserialize, Serialize};

use crate::row::{FieldValue, RowRejection, RowResolver};
use crate::validator::ValidationReport;

/// Processed-versus-excluded counts for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub processed: usize,
    pub imported: usize,
    pub excluded: usize,
    pub missing_name: usize,
    pub missing_school: usize,
    pub invalid_time: usize,
    pub unreadable: usize,
}

impl ImportSummary {
    pub fn record_import(&mut self) {
        self.processed += 1;
        self.imported += 1;
    }

    pub fn record_rejection(&mut self, rejection: RowRejection) {
        self.processed += 1;
        self.excluded += 1;
        match rejection {
            RowRejection::MissingName => self.missing_name += 1,
            RowRejection::MissingSchool => self.missing_school += 1,
            RowRejection::InvalidTime => self.invalid_time += 1,
            RowRejection::Unreadable => self.unreadable += 1,
        }
    }
}

/// Results of one import, in input order, with the counts and warnings
/// gathered along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    pub results: Vec<ParsedResult>,
    pub summary: ImportSummary,
    pub warnings: Vec<String>,
}

impl ParseOutcome {
    /// Runs every row through the resolver. Rejected rows are counted,
    /// never returned as errors.
    pub fn collect<I>(resolver: &RowResolver<'_>, rows: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<FieldValue>, RowRejection>>,
    {
        let mut outcome = Self::default();
        for row in rows {
            match row.and_then(|cells| resolver.resolve(&cells)) {
                Ok(result) => {
                    outcome.summary.record_import();
                    outcome.results.push(result);
                }
                Err(rejection) => outcome.summary.record_rejection(rejection),
            }
        }
        outcome
    }

    pub fn with_report(mut self, report: ValidationReport) -> Self {
        self.warnings.extend(report.warnings);
        self
    }
}
