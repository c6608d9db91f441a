use scoring::models::Gender;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::mapping::{Field, FieldMapping, HeaderIndex};
use crate::summary::ParseOutcome;
use crate::{ImporterError, Result};

pub struct ImportValidator;

impl ImportValidator {
    /// Checks the mapping against the source's header row before any row is
    /// read. Missing required fields fail the import; missing optional
    /// headers only warn.
    pub fn validate_mapping(mapping: &FieldMapping, index: &HeaderIndex) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        for field in [Field::Time, Field::School] {
            match mapping.header_for(field) {
                None => report
                    .errors
                    .push(format!("No column is mapped to required field '{}'", field)),
                Some(header) if !index.has(field) => report.errors.push(format!(
                    "Column '{}' for required field '{}' is not in the header row",
                    header, field
                )),
                Some(_) => {}
            }
        }

        let name_fields = [Field::FullName, Field::FirstName];
        if !name_fields.iter().any(|field| mapping.header_for(*field).is_some()) {
            report
                .errors
                .push("Either 'full_name' or 'first_name' must be mapped".to_string());
        } else if !name_fields.iter().any(|field| index.has(*field)) {
            report
                .errors
                .push("None of the mapped name columns are in the header row".to_string());
        }

        for (field, header) in index.unresolved() {
            if matches!(field, Field::Time | Field::School | Field::FullName | Field::FirstName) {
                continue;
            }
            report.warnings.push(format!(
                "Column '{}' mapped to '{}' is not in the header row; field will be empty",
                header, field
            ));
        }

        if let (Some(_), true) = (mapping.header_for(Field::FullName), index.has(Field::FirstName)) {
            report.warnings.push(
                "Both 'full_name' and 'first_name' are mapped; split columns are only used when the full name is blank"
                    .to_string(),
            );
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    /// Warnings about the parsed results themselves.
    pub fn review_outcome(outcome: &ParseOutcome) -> ValidationReport {
        let mut report = ValidationReport::default();
        let summary = &outcome.summary;

        if summary.excluded > 0 {
            report.warnings.push(format!(
                "Excluded {} of {} rows ({} missing name, {} missing school, {} invalid time, {} unreadable)",
                summary.excluded,
                summary.processed,
                summary.missing_name,
                summary.missing_school,
                summary.invalid_time,
                summary.unreadable
            ));
        }

        let unknown_gender = outcome
            .results
            .iter()
            .filter(|result| result.gender == Gender::Unknown)
            .count();
        if unknown_gender > 0 {
            report.warnings.push(format!(
                "{} result(s) have an unrecognized gender and are grouped separately",
                unknown_gender
            ));
        }

        let mut bibs: HashMap<&str, usize> = HashMap::new();
        for bib in outcome.results.iter().filter_map(|result| result.bib.as_deref()) {
            *bibs.entry(bib).or_default() += 1;
        }
        let mut duplicated: Vec<&str> = bibs
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(bib, _)| bib)
            .collect();
        duplicated.sort_unstable();
        for bib in duplicated {
            report
                .warnings
                .push(format!("Bib '{}' appears on more than one result", bib));
        }

        report
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}
