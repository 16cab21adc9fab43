//! Grant selection core: eligibility matching, criterion weighting, and marking scores.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
