pub mod athlete_name;
pub mod course;
pub mod gender;
pub mod grade;
pub mod parsed_result;
pub mod prediction_formula;
pub mod race_time;
pub mod team;

pub use athlete_name::{AthleteName, split_full_name};
pub use course::{Course, DEFAULT_REFERENCE_DISTANCE_METERS, NormalizationConfig};
pub use gender::Gender;
pub use grade::{Grade, academic_year, grade_from_graduation_year, grade_level};
pub use parsed_result::ParsedResult;
pub use prediction_formula::PredictionFormula;
pub use race_time::{
    RaceTime, TIME_PLACEHOLDER, format_centiseconds, format_time, format_time_short,
};
pub use team::{COUNTING_RUNNERS, DISPLACING_RUNNERS, RunnerStatus, TeamRunner, TeamScore};
