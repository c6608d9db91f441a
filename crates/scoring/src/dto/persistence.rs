use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Result, ScoringError};
use crate::models::{Course, RaceTime};
use crate::services::calibration::SharedAthleteTimes;

/// Course row as the store hands it over.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseRatingRow {
    pub course_id: Uuid,
    pub name: String,
    pub distance_meters: i32,
    pub difficulty_rating: Option<Decimal>,
}

impl CourseRatingRow {
    pub fn to_course(&self) -> Result<Course> {
        let rating = self.difficulty_rating.ok_or(ScoringError::RatingUnavailable {
            course_id: self.course_id,
        })?;
        let distance = u32::try_from(self.distance_meters).map_err(|_| {
            ScoringError::InvalidCourse(format!(
                "{} has negative distance {}",
                self.name, self.distance_meters
            ))
        })?;
        Course::new(&self.name, distance, rating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResultTimeRow {
    pub result_id: Uuid,
    pub athlete_id: Uuid,
    pub school_id: Uuid,
    pub time_cs: Option<i32>,
}

impl ResultTimeRow {
    pub fn race_time(&self) -> Option<RaceTime> {
        self.time_cs.and_then(|cs| RaceTime::from_stored(i64::from(cs)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedAthleteRow {
    pub athlete_id: Uuid,
    pub course_time_cs: i32,
    pub reference_time_cs: i32,
}

impl SharedAthleteRow {
    pub fn to_shared_times(&self) -> Option<SharedAthleteTimes> {
        Some(SharedAthleteTimes {
            course_time: RaceTime::from_stored(i64::from(self.course_time_cs))?,
            reference_time: RaceTime::from_stored(i64::from(self.reference_time_cs))?,
        })
    }
}
