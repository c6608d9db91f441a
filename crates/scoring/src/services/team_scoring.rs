use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{Result, ScoringError};
use crate::models::{
    COUNTING_RUNNERS, Course, NormalizationConfig, ParsedResult, RaceTime, RunnerStatus,
    TeamRunner, TeamScore,
};
use crate::services::normalization::compute_xc_time;

/// An individual result with its XC time attached, ready for team scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEntry {
    pub athlete_id: Option<String>,
    pub name: String,
    pub grade: Option<i32>,
    pub school_name: String,
    pub raw_time: RaceTime,
    pub xc_time: RaceTime,
}

impl ScoringEntry {
    pub fn from_result(result: &ParsedResult, xc_time: RaceTime) -> Self {
        Self {
            athlete_id: result.athlete_id.clone(),
            name: result.display_name(),
            grade: result.grade,
            school_name: result.school_name.clone(),
            raw_time: result.time,
            xc_time,
        }
    }
}

/// Normalizes every result of one race run on `course`.
///
/// A result whose XC time cannot be represented (an absurd raw time) is
/// left out with a warning; course and config errors still fail the race.
pub fn attach_xc_times(
    results: &[ParsedResult],
    course: &Course,
    maturation: Option<Decimal>,
    config: &NormalizationConfig,
) -> Result<Vec<ScoringEntry>> {
    let mut entries = Vec::with_capacity(results.len());
    for result in results {
        match compute_xc_time(result.time, course, maturation, config) {
            Ok(xc_time) => entries.push(ScoringEntry::from_result(result, xc_time)),
            Err(ScoringError::InvalidTime(reason)) => warn!(
                "Leaving {} ({}) out of scoring: XC time out of range ({})",
                result.display_name(),
                result.time,
                reason
            ),
            Err(e) => return Err(e),
        }
    }
    Ok(entries)
}

/// Scores every team in one race.
///
/// Results are ordered by XC time (stable, so ties keep input order), then
/// grouped by school. Schools with fewer than five finishers are left out.
/// Teams are ranked by score; ties go to the faster sixth runner, then the
/// faster seventh runner (having one beats not having one), then school name.
pub fn score_race(entries: &[ScoringEntry]) -> Vec<TeamScore> {
    let mut ordered: Vec<&ScoringEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.xc_time);

    let mut school_index: HashMap<&str, usize> = HashMap::new();
    let mut schools: Vec<(&str, Vec<(u32, &ScoringEntry)>)> = Vec::new();

    for (idx, entry) in ordered.into_iter().enumerate() {
        let overall_place = (idx + 1) as u32;
        let slot = *school_index
            .entry(entry.school_name.as_str())
            .or_insert_with(|| {
                schools.push((entry.school_name.as_str(), Vec::new()));
                schools.len() - 1
            });
        schools[slot].1.push((overall_place, entry));
    }

    let school_count = schools.len();
    let mut teams: Vec<TeamScore> = schools
        .into_iter()
        .filter(|(_, finishers)| finishers.len() >= COUNTING_RUNNERS)
        .map(|(school_name, finishers)| build_team_score(school_name, &finishers))
        .collect();

    debug!(
        "Scored {} of {} schools ({} below the five-runner floor)",
        teams.len(),
        school_count,
        school_count - teams.len()
    );

    teams.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then_with(|| tiebreak_time(a, 6).cmp(&tiebreak_time(b, 6)))
            .then_with(|| tiebreak_time(a, 7).cmp(&tiebreak_time(b, 7)))
            .then_with(|| a.school_name.cmp(&b.school_name))
    });

    for (idx, team) in teams.iter_mut().enumerate() {
        team.place = (idx + 1) as u32;
    }

    teams
}

fn build_team_score(school_name: &str, finishers: &[(u32, &ScoringEntry)]) -> TeamScore {
    let runners: Vec<TeamRunner> = finishers
        .iter()
        .enumerate()
        .map(|(idx, (overall_place, entry))| TeamRunner {
            athlete_id: entry.athlete_id.clone(),
            name: entry.name.clone(),
            grade: entry.grade,
            raw_time: entry.raw_time,
            xc_time: entry.xc_time,
            overall_place: *overall_place,
            team_place: (idx + 1) as u32,
            status: RunnerStatus::for_team_rank(idx + 1),
        })
        .collect();

    let counting = &runners[..COUNTING_RUNNERS];
    let score: u64 = counting
        .iter()
        .map(|r| u64::from(r.xc_time.centiseconds()))
        .sum();
    let total_time: u64 = counting
        .iter()
        .map(|r| u64::from(r.raw_time.centiseconds()))
        .sum();
    let spread = counting[COUNTING_RUNNERS - 1].xc_time.centiseconds()
        - counting[0].xc_time.centiseconds();

    let runner_count = COUNTING_RUNNERS as u64;
    let average = (score + runner_count / 2) / runner_count;

    TeamScore {
        school_name: school_name.to_string(),
        score,
        total_time,
        spread,
        average_xc_time: RaceTime(average as u32),
        runners,
        place: 0,
    }
}

fn tiebreak_time(team: &TeamScore, team_place: u32) -> u32 {
    team.runner_at(team_place)
        .map_or(u32::MAX, |runner| runner.xc_time.centiseconds())
}
