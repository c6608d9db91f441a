use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::{Result, ScoringError};
use crate::models::{Course, NormalizationConfig, RaceTime};

/// Converts a raw time on `course` into an XC time: the equivalent time on
/// a neutral course at the reference distance.
///
/// xc = raw × (reference distance / course distance) / difficulty × maturation
///
/// Distance is scaled linearly (constant pace). `maturation` defaults to 1.
pub fn compute_xc_time(
    raw: RaceTime,
    course: &Course,
    maturation: Option<Decimal>,
    config: &NormalizationConfig,
) -> Result<RaceTime> {
    let maturation = checked_multiplier(maturation)?;
    let numerator = Decimal::from(raw.centiseconds())
        .checked_mul(Decimal::from(config.reference_distance_meters))
        .and_then(|v| v.checked_mul(maturation));
    let denominator = Decimal::from(course.distance_meters).checked_mul(course.difficulty_rating);

    let xc = match (numerator, denominator) {
        (Some(n), Some(d)) if !d.is_zero() => n.checked_div(d),
        _ => None,
    }
    .ok_or_else(|| {
        ScoringError::InvalidCourse(format!(
            "cannot normalize {} on '{}' ({} m, rating {})",
            raw, course.name, course.distance_meters, course.difficulty_rating
        ))
    })?;

    to_race_time(xc)
}

/// Inverse of [`compute_xc_time`]: projects an XC time onto `course`.
pub fn project_onto_course(
    xc_time: RaceTime,
    course: &Course,
    maturation: Option<Decimal>,
    config: &NormalizationConfig,
) -> Result<RaceTime> {
    let maturation = checked_multiplier(maturation)?;
    let numerator = Decimal::from(xc_time.centiseconds())
        .checked_mul(Decimal::from(course.distance_meters))
        .and_then(|v| v.checked_mul(course.difficulty_rating));
    let denominator = Decimal::from(config.reference_distance_meters).checked_mul(maturation);

    let raw = match (numerator, denominator) {
        (Some(n), Some(d)) if !d.is_zero() => n.checked_div(d),
        _ => None,
    }
    .ok_or_else(|| {
        ScoringError::InvalidCourse(format!(
            "cannot project {} onto '{}'",
            xc_time, course.name
        ))
    })?;

    to_race_time(raw)
}

/// Re-derives the XC time of every result on a course from its raw time.
///
/// Always a full recomputation against the rating passed in; nothing is
/// patched incrementally, so a changed rating cannot leave stale values.
pub fn recompute_xc_times<K: Clone>(
    course: &Course,
    results: &[(K, RaceTime)],
    config: &NormalizationConfig,
) -> Result<Vec<(K, RaceTime)>> {
    config.validate()?;
    debug!(
        "Recomputing {} XC times for '{}' at rating {}",
        results.len(),
        course.name,
        course.difficulty_rating
    );

    results
        .iter()
        .map(|(key, raw)| Ok((key.clone(), compute_xc_time(*raw, course, None, config)?)))
        .collect()
}

fn checked_multiplier(maturation: Option<Decimal>) -> Result<Decimal> {
    let maturation = maturation.unwrap_or(Decimal::ONE);
    if maturation <= Decimal::ZERO {
        return Err(ScoringError::InvalidConfig(format!(
            "maturation multiplier must be positive, got {}",
            maturation
        )));
    }
    Ok(maturation)
}

/// Rounds half away from zero to whole centiseconds.
pub(crate) fn to_race_time(centiseconds: Decimal) -> Result<RaceTime> {
    centiseconds
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .and_then(RaceTime::from_centiseconds)
        .ok_or_else(|| ScoringError::InvalidTime(format!("{} centiseconds", centiseconds)))
}
