//! Sponsor/sponsee compatibility scoring and match lifecycle service.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
