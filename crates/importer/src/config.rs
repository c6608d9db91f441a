use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use scoring::models::{NormalizationConfig, PredictionFormula, RaceTime};
use std::str::FromStr;

/// Model constants, with environment overrides for each.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub normalization: NormalizationConfig,
    pub prediction: PredictionFormula,
}

impl ModelConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(distance) = parse_var::<u32>(&lookup, "XC_REFERENCE_DISTANCE_M")? {
            config.normalization.reference_distance_meters = distance;
        }
        if let Some(benchmark) = parse_var::<u32>(&lookup, "XC_ELITE_BENCHMARK_CS")? {
            config.prediction.elite_benchmark = RaceTime::from_centiseconds(benchmark)
                .ok_or_else(|| anyhow!("XC_ELITE_BENCHMARK_CS must be positive"))?;
        }
        if let Some(span) = parse_var::<Decimal>(&lookup, "XC_BENCHMARK_SPAN")? {
            config.prediction.benchmark_span = span;
        }
        if let Some(floor) = parse_var::<Decimal>(&lookup, "XC_PENALTY_FLOOR")? {
            config.prediction.penalty_floor = floor;
        }
        if let Some(ceiling) = parse_var::<Decimal>(&lookup, "XC_PENALTY_CEILING")? {
            config.prediction.penalty_ceiling = ceiling;
        }

        config
            .normalization
            .validate()
            .context("Invalid normalization config")?;
        config
            .prediction
            .validate()
            .context("Invalid prediction formula")?;

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a number, got '{}'", key, value)),
        _ => Ok(None),
    }
}
