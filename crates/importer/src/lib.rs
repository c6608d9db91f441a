pub mod config;
pub mod error;
pub mod grouping;
pub mod mapping;
pub mod report;
pub mod row;
pub mod sources;
pub mod summary;
pub mod traits;
pub mod validator;

pub use config::ModelConfig;
pub use error::{ImporterError, Result};
pub use grouping::{RaceCategory, RaceGroup, group_races};
pub use mapping::{Field, FieldMapping, HeaderIndex};
pub use report::{RaceReport, score_groups};
pub use row::{FieldValue, ImportOptions, RowRejection, RowResolver};
pub use sources::{CsvImporter, ScrapedJsonImporter, SourceFormat};
pub use summary::{ImportSummary, ParseOutcome};
pub use traits::ResultImporter;
pub use validator::{ImportValidator, ValidationReport};
