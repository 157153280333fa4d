#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod engine;
mod pattern;
mod seeding;
mod stats;

pub use config::{ACTIVITY_HISTORY_LEN, EngineConfig, SeedingConfig};
pub use engine::LifeEngine;
pub use pattern::{MAX_PATTERN_CELLS, Pattern, PatternCells};
pub use stats::{GridStats, TrendLabel, TrendSmoother, YOUNG_AGE_MAX};
pub use world_grid::{GridSize, Random};
