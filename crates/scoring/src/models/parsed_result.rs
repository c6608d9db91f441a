use serde::{Deserialize, Serialize};

use super::{AthleteName, Gender, RaceTime};

/// One competitor's row after ingestion.
///
/// Only rows with a first name, a school and a parseable time become a
/// `ParsedResult`, so those fields are not optional here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub first_name: String,
    pub last_name: String,
    pub school_name: String,
    pub time: RaceTime,
    pub place: Option<u32>,
    pub gender: Gender,
    pub grade: Option<i32>,
    pub athlete_id: Option<String>,
    pub bib: Option<String>,
    pub race_category: Option<String>,
}

impl ParsedResult {
    pub fn name(&self) -> AthleteName {
        AthleteName::new(&self.first_name, &self.last_name)
    }

    pub fn display_name(&self) -> String {
        self.name().display_name()
    }
}
