use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::persistence::{CourseRatingRow, ResultTimeRow, SharedAthleteRow};
use crate::error::{Result, ScoringError};

/// Read access to the store that owns courses, ratings and results.
///
/// Every call goes to the store; implementations must not cache ratings,
/// since a reviewer may recalibrate a course between two passes.
#[async_trait::async_trait]
pub trait RatingSource: Send + Sync {
    async fn course_rating(&self, course_id: Uuid) -> Result<CourseRatingRow>;

    async fn course_results(&self, course_id: Uuid) -> Result<Vec<ResultTimeRow>>;

    /// Best time of every athlete who has run both courses.
    async fn shared_athletes(
        &self,
        course_id: Uuid,
        reference_course_id: Uuid,
    ) -> Result<Vec<SharedAthleteRow>>;
}

pub struct CourseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CourseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RatingSource for CourseRepository<'_> {
    async fn course_rating(&self, course_id: Uuid) -> Result<CourseRatingRow> {
        let course = sqlx::query_as::<_, CourseRatingRow>(
            r#"
            SELECT course_id, name, distance_meters, difficulty_rating
            FROM courses
            WHERE course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(ScoringError::NotFound)?;

        Ok(course)
    }

    async fn course_results(&self, course_id: Uuid) -> Result<Vec<ResultTimeRow>> {
        let results = sqlx::query_as::<_, ResultTimeRow>(
            r#"
            SELECT r.result_id, r.athlete_id, r.school_id, r.time_cs
            FROM results r
            INNER JOIN races ra ON ra.race_id = r.race_id
            WHERE ra.course_id = $1
            ORDER BY r.result_id
            "#,
        )
        .bind(course_id)
        .fetch_all(self.pool)
        .await?;

        Ok(results)
    }

    async fn shared_athletes(
        &self,
        course_id: Uuid,
        reference_course_id: Uuid,
    ) -> Result<Vec<SharedAthleteRow>> {
        let shared = sqlx::query_as::<_, SharedAthleteRow>(
            r#"
            WITH course_best AS (
                SELECT r.athlete_id, MIN(r.time_cs) AS time_cs
                FROM results r
                INNER JOIN races ra ON ra.race_id = r.race_id
                WHERE ra.course_id = $1 AND r.time_cs > 0
                GROUP BY r.athlete_id
            ),
            reference_best AS (
                SELECT r.athlete_id, MIN(r.time_cs) AS time_cs
                FROM results r
                INNER JOIN races ra ON ra.race_id = r.race_id
                WHERE ra.course_id = $2 AND r.time_cs > 0
                GROUP BY r.athlete_id
            )
            SELECT c.athlete_id,
                   c.time_cs AS course_time_cs,
                   f.time_cs AS reference_time_cs
            FROM course_best c
            INNER JOIN reference_best f ON f.athlete_id = c.athlete_id
            ORDER BY c.athlete_id
            "#,
        )
        .bind(course_id)
        .bind(reference_course_id)
        .fetch_all(self.pool)
        .await?;

        Ok(shared)
    }
}
