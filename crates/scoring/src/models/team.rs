use serde::{Deserialize, Serialize};

use super::RaceTime;

/// Number of runners whose times make up a team score.
pub const COUNTING_RUNNERS: usize = 5;
/// Runners 6 and 7 displace but do not score.
pub const DISPLACING_RUNNERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunnerStatus {
    Counting,
    Displacer,
    NonScoring,
}

impl RunnerStatus {
    /// Status for a 1-based rank within the team.
    pub fn for_team_rank(team_place: usize) -> Self {
        if team_place <= COUNTING_RUNNERS {
            Self::Counting
        } else if team_place <= COUNTING_RUNNERS + DISPLACING_RUNNERS {
            Self::Displacer
        } else {
            Self::NonScoring
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRunner {
    pub athlete_id: Option<String>,
    pub name: String,
    pub grade: Option<i32>,
    pub raw_time: RaceTime,
    pub xc_time: RaceTime,
    /// Position in the whole race, ordered by XC time.
    pub overall_place: u32,
    /// Position within the team.
    pub team_place: u32,
    pub status: RunnerStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub school_name: String,
    /// Sum of the counting runners' XC times, in centiseconds.
    pub score: u64,
    /// Sum of the counting runners' raw times, in centiseconds.
    pub total_time: u64,
    /// Gap between the fifth and first counting runner.
    pub spread: u32,
    pub average_xc_time: RaceTime,
    pub runners: Vec<TeamRunner>,
    pub place: u32,
}

impl TeamScore {
    pub fn counting_runners(&self) -> impl Iterator<Item = &TeamRunner> {
        self.runners
            .iter()
            .filter(|r| r.status == RunnerStatus::Counting)
    }

    pub fn runner_at(&self, team_place: u32) -> Option<&TeamRunner> {
        self.runners.iter().find(|r| r.team_place == team_place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_by_team_rank() {
        assert_eq!(RunnerStatus::for_team_rank(1), RunnerStatus::Counting);
        assert_eq!(RunnerStatus::for_team_rank(5), RunnerStatus::Counting);
        assert_eq!(RunnerStatus::for_team_rank(6), RunnerStatus::Displacer);
        assert_eq!(RunnerStatus::for_team_rank(7), RunnerStatus::Displacer);
        assert_eq!(RunnerStatus::for_team_rank(8), RunnerStatus::NonScoring);
        assert_eq!(RunnerStatus::for_team_rank(30), RunnerStatus::NonScoring);
    }
}
