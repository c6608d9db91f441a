pub mod calibration;
pub mod normalization;
pub mod prediction;
pub mod recompute;
pub mod team_scoring;
