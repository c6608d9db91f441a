use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// School year a date belongs to, named by the calendar year it starts in.
/// The school year runs July 1 through June 30.
pub fn academic_year(date: NaiveDate) -> i32 {
    if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Grade level of a competitor at the time of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    MiddleSchool,
    Level(u8),
    PostGraduate,
}

impl Grade {
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=8 => Self::MiddleSchool,
            9..=12 => Self::Level(level as u8),
            _ => Self::PostGraduate,
        }
    }

    /// Grade number for 9-12, `None` for the out-of-range labels.
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Level(level) => Some(*level),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MiddleSchool => write!(f, "MS"),
            Self::Level(level) => write!(f, "{}", level),
            Self::PostGraduate => write!(f, "PG"),
        }
    }
}

fn raw_level(graduation_year: i32, race_date: NaiveDate) -> i64 {
    12 - (i64::from(graduation_year) - (i64::from(academic_year(race_date)) + 1))
}

/// Unclamped grade level, e.g. 13 for a graduate or 7 for a middle schooler.
/// `None` when the graduation year is too far off to give an `i32` level.
pub fn grade_level(graduation_year: i32, race_date: NaiveDate) -> Option<i32> {
    i32::try_from(raw_level(graduation_year, race_date)).ok()
}

pub fn grade_from_graduation_year(graduation_year: i32, race_date: NaiveDate) -> Grade {
    let level = raw_level(graduation_year, race_date).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    Grade::from_level(level as i32)
}
