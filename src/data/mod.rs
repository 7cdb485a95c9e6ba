//! Data acquisition
//!
//! Scrapers that turn a league schedule page into raw match rows.

pub mod scrapers;

pub use scrapers::schedule::{FetchedSchedule, ScheduleScraper};
