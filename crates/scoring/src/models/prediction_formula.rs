use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RaceTime;
use crate::error::{Result, ScoringError};

/// Constants for the diminishing-returns correction applied to predictions.
///
/// penalty = floor + ceiling · s³, where
/// s = clamp((span · B − ability) / ((span − 1) · B), 0, 1)
/// and B is the elite benchmark. s reaches 1 at the benchmark and 0 at
/// `span` times the benchmark.
///
/// These values are empirically tuned and have not been validated against
/// outcome data, so they are configuration rather than derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionFormula {
    pub elite_benchmark: RaceTime,
    pub benchmark_span: Decimal,
    pub penalty_floor: Decimal,
    pub penalty_ceiling: Decimal,
}

impl Default for PredictionFormula {
    fn default() -> Self {
        Self {
            // 15:00.00 over 5K
            elite_benchmark: RaceTime(90_000),
            benchmark_span: Decimal::new(15, 1),
            penalty_floor: Decimal::new(5, 3),
            penalty_ceiling: Decimal::new(35, 3),
        }
    }
}

impl PredictionFormula {
    pub fn validate(&self) -> Result<()> {
        if self.benchmark_span <= Decimal::ONE {
            return Err(ScoringError::InvalidConfig(format!(
                "benchmark span must be greater than 1, got {}",
                self.benchmark_span
            )));
        }
        if self.penalty_floor.is_sign_negative() || self.penalty_ceiling.is_sign_negative() {
            return Err(ScoringError::InvalidConfig(
                "penalties must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Upper end of the curve, in centiseconds.
    pub fn span_limit(&self) -> Decimal {
        Decimal::from(self.elite_benchmark.centiseconds()) * self.benchmark_span
    }
}
