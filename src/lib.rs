//! Basketball season analysis
//!
//! Scrapes a league schedule/results page for one team and computes
//! descriptive statistics over that team's season.

pub mod data;
pub mod stats;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result of a single game from the tracked team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Basketball has no draws: anything other than a strictly higher score is a loss
    pub fn from_points(points_for: u16, points_against: u16) -> Self {
        if points_for > points_against {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "Win"),
            Outcome::Loss => write!(f, "Loss"),
        }
    }
}

/// Where the game was played, relative to the tracked team
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Home => write!(f, "Home"),
            Venue::Away => write!(f, "Away"),
        }
    }
}

/// Points as they arrive from a source: a number, text still to be
/// coerced, or anything else a saved snapshot happens to hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPoints {
    Int(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for RawPoints {
    fn default() -> Self {
        RawPoints::Other(serde_json::Value::Null)
    }
}

impl RawPoints {
    /// Coerce to a non-negative score, or None if the value is unusable
    pub fn coerce(&self) -> Option<u16> {
        match self {
            RawPoints::Int(n) => u16::try_from(*n).ok(),
            RawPoints::Text(s) => s.trim().parse().ok(),
            RawPoints::Other(_) => None,
        }
    }
}

impl From<u16> for RawPoints {
    fn from(n: u16) -> Self {
        RawPoints::Int(n as i64)
    }
}

impl fmt::Display for RawPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPoints::Int(n) => write!(f, "{}", n),
            RawPoints::Text(s) => write!(f, "{}", s),
            RawPoints::Other(v) => write!(f, "{}", v),
        }
    }
}

/// A match row as extracted from the schedule page, before validation.
///
/// The date is kept as the page's text; numeric fields may still be
/// unparsed when the row was loaded from a saved snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub opponent: String,
    #[serde(default)]
    pub points_for: RawPoints,
    #[serde(default)]
    pub points_against: RawPoints,
    pub venue: Venue,
}

/// Accept any JSON value for a text field; non-strings become empty and
/// fail validation later instead of rejecting the whole file
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

impl RawMatch {
    /// Outcome implied by the points, if both sides coerce
    pub fn outcome(&self) -> Option<Outcome> {
        let points_for = self.points_for.coerce()?;
        let points_against = self.points_against.coerce()?;
        Some(Outcome::from_points(points_for, points_against))
    }
}

/// A validated game in the tracked team's season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub timestamp: NaiveDateTime,
    pub opponent: String,
    pub points_for: u16,
    pub points_against: u16,
    pub venue: Venue,
}

impl MatchRecord {
    /// Win iff the tracked team outscored the opponent
    pub fn outcome(&self) -> Outcome {
        Outcome::from_points(self.points_for, self.points_against)
    }

    /// Signed point margin (positive = win)
    pub fn margin(&self) -> i32 {
        self.points_for as i32 - self.points_against as i32
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("Scraper failed for {url}: {message}")]
    Scraper { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HoopsError>;

/// Application configuration loaded from hoops.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Schedule/results page of the tracked team
    pub url: String,
    /// Matched case-insensitively as a substring of the listed team names
    pub team: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of best and worst games listed in a report
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig {
                url: "https://rozgrywki.pzkosz.pl/liga/4/druzyny/d/4119/basket-hills-bielsko-biala/terminarz.html"
                    .to_string(),
                team: "Basket Hills Bielsko-Biała".to_string(),
                timeout_secs: 15,
                user_agent: "Mozilla/5.0".to_string(),
            },
            report: ReportConfig { top_n: 5 },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HoopsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HoopsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HoopsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
