// Export our modules for use in binaries and tests
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod domain;
pub mod event;
pub mod logging;
pub mod route;
pub mod terminal;
pub mod ui;

pub use coverage::{
    aggregate, calculate_percentage, color_for_percentage, cumulative_spray_count,
    daily_spray_counts, reason_tally, spray_rate, DailyProgress, Percentage, TargetAreaStats,
    ThresholdTable,
};
pub use domain::{HexColor, SprayStatus, ThresholdScheme};
