use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::outputs::{CalibrationAdvice, XcTimeUpdate};
use crate::error::Result;
use crate::models::{Course, NormalizationConfig, RaceTime};
use crate::repository::RatingSource;
use crate::services::{calibration, normalization};

/// Re-derives the XC time of every stored result on a course.
///
/// The rating is fetched fresh on every call. Results without a usable
/// stored time are skipped and counted in the log.
pub async fn recompute_course_xc_times<S: RatingSource + ?Sized>(
    source: &S,
    course_id: Uuid,
    config: &NormalizationConfig,
) -> Result<Vec<XcTimeUpdate>> {
    let course = source.course_rating(course_id).await?.to_course()?;
    let rows = source.course_results(course_id).await?;

    let timed: Vec<(Uuid, RaceTime)> = rows
        .iter()
        .filter_map(|row| row.race_time().map(|time| (row.result_id, time)))
        .collect();

    if timed.len() < rows.len() {
        warn!(
            "Skipping {} results on '{}' without a valid time",
            rows.len() - timed.len(),
            course.name
        );
    }

    let recomputed = normalization::recompute_xc_times(&course, &timed, config)?;

    info!(
        "Recomputed {} XC times for '{}' (rating {})",
        recomputed.len(),
        course.name,
        course.difficulty_rating
    );

    Ok(recomputed
        .into_iter()
        .map(|(result_id, xc_time)| XcTimeUpdate::new(result_id, xc_time))
        .collect())
}

/// Suggests a difficulty rating for `course_id` from athletes shared with
/// the reference course. The course under review does not need a rating.
pub async fn advise_course_difficulty<S: RatingSource + ?Sized>(
    source: &S,
    course_id: Uuid,
    reference_course_id: Uuid,
) -> Result<Option<CalibrationAdvice>> {
    let course_row = source.course_rating(course_id).await?;
    let reference = source.course_rating(reference_course_id).await?.to_course()?;

    let course = Course::new(
        &course_row.name,
        u32::try_from(course_row.distance_meters).unwrap_or(0),
        course_row.difficulty_rating.unwrap_or(Decimal::ONE),
    )?;

    let shared: Vec<_> = source
        .shared_athletes(course_id, reference_course_id)
        .await?
        .iter()
        .filter_map(|row| row.to_shared_times())
        .collect();

    let advice = calibration::recommend_difficulty(&course, &reference, &shared);
    if let Some(advice) = &advice {
        info!(
            "Recommended difficulty {} for '{}' (confidence {}, {} shared athletes)",
            advice.recommended_difficulty,
            course.name,
            advice.confidence,
            advice.shared_athlete_count
        );
    }

    Ok(advice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::persistence::{CourseRatingRow, ResultTimeRow, SharedAthleteRow};
    use crate::error::ScoringError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemorySource {
        courses: Mutex<HashMap<Uuid, CourseRatingRow>>,
        results: Vec<ResultTimeRow>,
        shared: Vec<SharedAthleteRow>,
        offline: bool,
    }

    impl InMemorySource {
        fn set_rating(&self, course_id: Uuid, rating: Decimal) {
            if let Some(row) = self.courses.lock().unwrap().get_mut(&course_id) {
                row.difficulty_rating = Some(rating);
            }
        }
    }

    #[async_trait::async_trait]
    impl RatingSource for InMemorySource {
        async fn course_rating(&self, course_id: Uuid) -> Result<CourseRatingRow> {
            if self.offline {
                return Err(ScoringError::Database(sqlx::Error::PoolTimedOut));
            }
            self.courses
                .lock()
                .unwrap()
                .get(&course_id)
                .cloned()
                .ok_or(ScoringError::NotFound)
        }

        async fn course_results(&self, _course_id: Uuid) -> Result<Vec<ResultTimeRow>> {
            Ok(self.results.clone())
        }

        async fn shared_athletes(
            &self,
            _course_id: Uuid,
            _reference_course_id: Uuid,
        ) -> Result<Vec<SharedAthleteRow>> {
            Ok(self.shared.clone())
        }
    }

    fn course_row(course_id: Uuid, rating: Option<Decimal>) -> CourseRatingRow {
        CourseRatingRow {
            course_id,
            name: format!("Course {}", course_id.as_u128()),
            distance_meters: 5000,
            difficulty_rating: rating,
        }
    }

    fn result_row(time_cs: Option<i32>) -> ResultTimeRow {
        ResultTimeRow {
            result_id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            school_id: Uuid::nil(),
            time_cs,
        }
    }

    fn source_with(course_id: Uuid, rating: Option<Decimal>) -> InMemorySource {
        let mut courses = HashMap::new();
        courses.insert(course_id, course_row(course_id, rating));
        InMemorySource {
            courses: Mutex::new(courses),
            results: vec![result_row(Some(120_000)), result_row(None), result_row(Some(150_000))],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_recompute_refetches_rating_each_pass() {
        let course_id = Uuid::from_u128(1);
        let source = source_with(course_id, Some(Decimal::ONE));
        let config = NormalizationConfig::default();

        let first = recompute_course_xc_times(&source, course_id, &config).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].xc_time_cs, 120_000);

        source.set_rating(course_id, Decimal::new(125, 2));
        let second = recompute_course_xc_times(&source, course_id, &config).await.unwrap();
        assert_eq!(second[0].xc_time_cs, 96_000);
        assert_eq!(second[0].xc_time, "16:00.00");
        assert_eq!(second[1].xc_time_cs, 120_000);
    }

    #[tokio::test]
    async fn test_store_failure_propagates_as_external() {
        let course_id = Uuid::from_u128(1);
        let mut source = source_with(course_id, Some(Decimal::ONE));
        source.offline = true;

        let err = recompute_course_xc_times(&source, course_id, &NormalizationConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_external());
    }

    #[tokio::test]
    async fn test_unrated_course_cannot_be_normalized() {
        let course_id = Uuid::from_u128(2);
        let source = source_with(course_id, None);

        let err = recompute_course_xc_times(&source, course_id, &NormalizationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::RatingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_advice_for_unrated_course() {
        let course_id = Uuid::from_u128(3);
        let reference_id = Uuid::from_u128(4);
        let mut source = source_with(course_id, None);
        source
            .courses
            .lock()
            .unwrap()
            .insert(reference_id, course_row(reference_id, Some(Decimal::ONE)));
        source.shared = [(105_600, 96_000), (112_200, 102_000), (118_800, 108_000)]
            .into_iter()
            .map(|(course_time_cs, reference_time_cs)| SharedAthleteRow {
                athlete_id: Uuid::new_v4(),
                course_time_cs,
                reference_time_cs,
            })
            .collect();

        let advice = advise_course_difficulty(&source, course_id, reference_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(advice.recommended_difficulty, Decimal::new(1100, 3));
        assert_eq!(advice.shared_athlete_count, 3);
    }
}
