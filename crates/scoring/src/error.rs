use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No difficulty rating available for course {course_id}")]
    RatingUnavailable { course_id: Uuid },

    #[error("Not found")]
    NotFound,

    #[error("Invalid course: {0}")]
    InvalidCourse(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ScoringError>;

impl ScoringError {
    /// True when the failure came from the remote store rather than from
    /// the data handed to the core. Callers may retry these.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            ScoringError::Database(_) | ScoringError::RatingUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_failures_are_distinct_from_input_failures() {
        assert!(ScoringError::Database(sqlx::Error::PoolTimedOut).is_external());
        assert!(
            ScoringError::RatingUnavailable {
                course_id: Uuid::nil()
            }
            .is_external()
        );
        assert!(!ScoringError::InvalidTime("1600".to_string()).is_external());
        assert!(!ScoringError::InvalidCourse("zero distance".to_string()).is_external());
    }
}
