use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoringError;

/// Display string for a missing or non-positive time.
pub const TIME_PLACEHOLDER: &str = "--:--";

const CENTIS_PER_SECOND: u32 = 100;
const CENTIS_PER_MINUTE: u32 = 6000;

/// A race time in centiseconds.
///
/// Every time the system stores, compares or adds up goes through this type.
/// Zero is not a valid race time, so "no time" is `Option<RaceTime>` and
/// formats as [`TIME_PLACEHOLDER`] through [`format_time`].
///
/// Accepted text forms are `M:SS`, `M:SS.C` and `M:SS.CC`:
///
/// ```
/// use scoring::models::RaceTime;
///
/// let time = RaceTime::parse("17:51.2").unwrap();
/// assert_eq!(time.centiseconds(), 107_120);
/// assert_eq!(time.to_string(), "17:51.20");
/// assert_eq!(time.format_short(), "17:51");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RaceTime(pub(crate) u32);

impl RaceTime {
    /// Returns `None` for zero, which cannot be a race result.
    pub fn from_centiseconds(centiseconds: u32) -> Option<Self> {
        (centiseconds > 0).then_some(Self(centiseconds))
    }

    /// Accepts store values that may be null, negative or zero.
    pub fn from_stored(centiseconds: i64) -> Option<Self> {
        u32::try_from(centiseconds)
            .ok()
            .and_then(Self::from_centiseconds)
    }

    pub fn centiseconds(self) -> u32 {
        self.0
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (minutes, rest) = text.split_once(':')?;
        if rest.contains(':') {
            return None;
        }

        let (seconds, fraction) = match rest.split_once('.') {
            Some((seconds, fraction)) => (seconds, Some(fraction)),
            None => (rest, None),
        };

        let minutes = parse_digits(minutes)?;
        let seconds = parse_digits(seconds)?;
        if seconds >= 60 {
            return None;
        }

        let centis = match fraction {
            None => 0,
            Some(f) if f.len() == 1 => parse_digits(f)? * 10,
            Some(f) if f.len() == 2 => parse_digits(f)?,
            Some(_) => return None,
        };

        let total = minutes
            .checked_mul(CENTIS_PER_MINUTE)?
            .checked_add(seconds * CENTIS_PER_SECOND)?
            .checked_add(centis)?;

        Self::from_centiseconds(total)
    }

    /// `M:SS` without the fractional part.
    pub fn format_short(self) -> String {
        let (minutes, seconds, _) = self.components();
        format!("{}:{:02}", minutes, seconds)
    }

    fn components(self) -> (u32, u32, u32) {
        (
            self.0 / CENTIS_PER_MINUTE,
            (self.0 % CENTIS_PER_MINUTE) / CENTIS_PER_SECOND,
            self.0 % CENTIS_PER_SECOND,
        )
    }
}

fn parse_digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (minutes, seconds, centis) = self.components();
        write!(f, "{}:{:02}.{:02}", minutes, seconds, centis)
    }
}

impl FromStr for RaceTime {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ScoringError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<u32> for RaceTime {
    type Error = ScoringError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_centiseconds(value)
            .ok_or_else(|| ScoringError::InvalidTime("zero centiseconds".to_string()))
    }
}

impl From<RaceTime> for u32 {
    fn from(time: RaceTime) -> u32 {
        time.0
    }
}

pub fn format_time(time: Option<RaceTime>) -> String {
    time.map_or_else(|| TIME_PLACEHOLDER.to_string(), |t| t.to_string())
}

pub fn format_time_short(time: Option<RaceTime>) -> String {
    time.map_or_else(|| TIME_PLACEHOLDER.to_string(), RaceTime::format_short)
}

/// Formats a raw centisecond count as read from the store.
pub fn format_centiseconds(centiseconds: i64) -> String {
    format_time(RaceTime::from_stored(centiseconds))
}
