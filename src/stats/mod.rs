//! Season statistics
//!
//! Validation of scraped rows and the descriptive statistics computed over
//! one team's season.

pub mod dates;
pub mod report;
pub mod season;
pub mod streaks;

pub use report::{GameSummary, PointDiff, SeasonReport, WinLossGrid};
pub use season::SeasonStats;
pub use streaks::Streaks;
