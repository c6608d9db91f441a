use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Course, NormalizationConfig, PredictionFormula, RaceTime};
use crate::services::normalization::{project_onto_course, to_race_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Ability projected onto the target course before the correction.
    pub base: RaceTime,
    /// Fractional slowdown applied to `base`.
    pub penalty: Decimal,
    pub predicted: RaceTime,
}

/// Diminishing-returns penalty for an athlete of the given ability.
///
/// Grows with the cube of how close `ability` is to the elite benchmark.
pub fn diminishing_returns_penalty(
    ability: RaceTime,
    formula: &PredictionFormula,
) -> Result<Decimal> {
    formula.validate()?;
    let benchmark = Decimal::from(formula.elite_benchmark.centiseconds());
    let window = benchmark * (formula.benchmark_span - Decimal::ONE);
    let closeness = ((formula.span_limit() - Decimal::from(ability.centiseconds())) / window)
        .clamp(Decimal::ZERO, Decimal::ONE);

    Ok(formula.penalty_floor + formula.penalty_ceiling * closeness * closeness * closeness)
}

/// Applies the correction to an externally supplied base prediction.
pub fn apply_diminishing_returns(
    base: RaceTime,
    ability: RaceTime,
    formula: &PredictionFormula,
) -> Result<Prediction> {
    let penalty = diminishing_returns_penalty(ability, formula)?;
    let predicted = to_race_time(Decimal::from(base.centiseconds()) * (Decimal::ONE + penalty))?;

    Ok(Prediction {
        base,
        penalty,
        predicted,
    })
}

/// Forecasts a time on `course` from a universal-ability (XC) time.
pub fn predict_time(
    ability: RaceTime,
    course: &Course,
    maturation: Option<Decimal>,
    formula: &PredictionFormula,
    config: &NormalizationConfig,
) -> Result<Prediction> {
    let base = project_onto_course(ability, course, maturation, config)?;
    apply_diminishing_returns(base, ability, formula)
}
