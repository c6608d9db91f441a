use rust_decimal::Decimal;
use scoring::models::{Course, Gender, NormalizationConfig, TeamScore};
use scoring::services::team_scoring::{attach_xc_times, score_race};
use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::grouping::RaceGroup;

/// Team standings for one race of an import.
#[derive(Debug, Clone, Serialize)]
pub struct RaceReport {
    pub name: String,
    pub category: String,
    pub gender: Gender,
    pub results_count: usize,
    /// Results whose XC time could not be computed and were left out.
    pub unscored_results: usize,
    pub teams: Vec<TeamScore>,
}

/// Scores every grouped race, all run on the same course.
///
/// Races are independent of each other; a race with no eligible school
/// still gets a report with an empty team list. A single result with an
/// out-of-range time is counted in `unscored_results`, not raised.
pub fn score_groups(
    groups: &[RaceGroup],
    course: &Course,
    maturation: Option<Decimal>,
    config: &NormalizationConfig,
) -> Result<Vec<RaceReport>> {
    groups
        .iter()
        .map(|group| {
            let entries = attach_xc_times(&group.results, course, maturation, config)?;
            let teams = score_race(&entries);

            info!(
                "{}: {} results, {} scored teams",
                group.name,
                group.results_count(),
                teams.len()
            );

            Ok(RaceReport {
                name: group.name.clone(),
                category: group.category.clone(),
                gender: group.gender,
                results_count: group.results_count(),
                unscored_results: group.results_count() - entries.len(),
                teams,
            })
        })
        .collect()
}
