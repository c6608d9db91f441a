use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scoring error: {0}")]
    Scoring(#[from] scoring::ScoringError),

    #[error("Field mapping error: {0}")]
    MappingError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
