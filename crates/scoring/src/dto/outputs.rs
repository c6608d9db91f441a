use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RaceTime, format_time};

/// Recomputed XC time for one stored result. The core never writes this
/// back; the caller hands it to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XcTimeUpdate {
    pub result_id: Uuid,
    pub xc_time_cs: u32,
    pub xc_time: String,
}

impl XcTimeUpdate {
    pub fn new(result_id: Uuid, xc_time: RaceTime) -> Self {
        Self {
            result_id,
            xc_time_cs: xc_time.centiseconds(),
            xc_time: format_time(Some(xc_time)),
        }
    }
}

/// Advisory difficulty for a human reviewer to apply, or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationAdvice {
    pub recommended_difficulty: Decimal,
    /// 0 (no trust) to 1.
    pub confidence: Decimal,
    pub shared_athlete_count: usize,
}
