use crate::Result;
use crate::mapping::{FieldMapping, HeaderIndex};
use crate::row::ImportOptions;
use crate::summary::ParseOutcome;
use crate::validator::{ImportValidator, ValidationReport};

/// A source format that can be read through a field mapping.
///
/// Every implementation feeds the same row resolver; only the way cells are
/// pulled out of the input differs.
pub trait ResultImporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Header row of the input, as written in the source.
    fn headers(&self, input: &str) -> Result<Vec<String>>;

    fn import(
        &self,
        input: &str,
        mapping: &FieldMapping,
        options: &ImportOptions,
    ) -> Result<ParseOutcome>;

    /// Checks the mapping against the input's headers without reading rows.
    fn validate(&self, input: &str, mapping: &FieldMapping) -> Result<ValidationReport> {
        let headers = self.headers(input)?;
        let index = HeaderIndex::build(mapping, &headers);
        ImportValidator::validate_mapping(mapping, &index)
    }
}
