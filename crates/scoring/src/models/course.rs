use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, ScoringError};

/// Distance every XC time is expressed at unless configured otherwise.
pub const DEFAULT_REFERENCE_DISTANCE_METERS: u32 = 5000;

/// A course as the normalization model sees it.
///
/// `difficulty_rating` is owned by the calibration reviewer: 1.0 is the
/// reference course, above 1.0 is slower, below 1.0 is faster. The core
/// never changes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Course {
    #[validate(length(min = 1, max = 255, message = "Course name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "Distance must be at least 1 meter"))]
    pub distance_meters: u32,

    #[validate(custom(function = "validate_difficulty_rating"))]
    pub difficulty_rating: Decimal,
}

fn validate_difficulty_rating(rating: &Decimal) -> std::result::Result<(), validator::ValidationError> {
    if rating.is_sign_positive() && !rating.is_zero() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("non_positive_difficulty_rating"))
    }
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        distance_meters: u32,
        difficulty_rating: Decimal,
    ) -> Result<Self> {
        let course = Self {
            name: name.into(),
            distance_meters,
            difficulty_rating,
        };
        course
            .validate()
            .map_err(|e| ScoringError::InvalidCourse(format!("{}: {}", course.name, e)))?;
        Ok(course)
    }

    /// A calibration-neutral course at the given distance.
    pub fn reference(distance_meters: u32) -> Self {
        Self {
            name: "Reference".to_string(),
            distance_meters,
            difficulty_rating: Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    pub reference_distance_meters: u32,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            reference_distance_meters: DEFAULT_REFERENCE_DISTANCE_METERS,
        }
    }
}

impl NormalizationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reference_distance_meters == 0 {
            return Err(ScoringError::InvalidConfig(
                "reference distance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
