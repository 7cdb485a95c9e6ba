//! League schedule scraper
//!
//! Downloads a team's schedule/results page and extracts the completed
//! games involving that team. The page is expected to hold a table whose
//! body rows read `[#, left team, "a:b", right team, date]`.
//! Downloaded pages can be saved to a cache directory for offline runs.

use super::timed;
use crate::{HoopsError, RawMatch, Result, SourceConfig, Venue};
use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Minimum number of cells in a row that can describe a game
const MIN_CELLS: usize = 5;

/// Rows extracted by one fetch, plus how long the retrieval took
#[derive(Debug, Clone)]
pub struct FetchedSchedule {
    pub rows: Vec<RawMatch>,
    pub elapsed: Duration,
}

/// Scraper for a single team's schedule page
pub struct ScheduleScraper {
    client: reqwest::blocking::Client,
    url: String,
    team: String,
    /// Optional cache directory for offline HTML files
    cache_dir: Option<PathBuf>,
    /// If true, only use cache (no network requests)
    offline_only: bool,
}

impl ScheduleScraper {
    pub fn new(source: &SourceConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(source.user_agent.as_str())
            .timeout(Duration::from_secs(source.timeout_secs))
            .build()?;

        Ok(ScheduleScraper {
            client,
            url: source.url.clone(),
            team: source.team.clone(),
            cache_dir: None,
            offline_only: false,
        })
    }

    /// Create scraper with a cache directory
    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    /// Set offline-only mode (no network requests, cache must exist)
    pub fn offline_only(mut self, offline: bool) -> Self {
        self.offline_only = offline;
        self
    }

    /// Get the cache file path for the configured URL
    fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| {
            let filename = self
                .url
                .replace("https://", "")
                .replace("http://", "")
                .replace(['/', '?', ':'], "_")
                + ".html";
            dir.join(filename)
        })
    }

    /// Load HTML from cache (offline mode only)
    fn load_from_cache(&self) -> Result<String> {
        match self.cache_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading from cache: {}", path.display());
                Ok(std::fs::read_to_string(&path)?)
            }
            _ => Err(HoopsError::Scraper {
                url: self.url.clone(),
                message: "no cached page (offline mode)".to_string(),
            }),
        }
    }

    /// Save HTML to cache
    fn save_to_cache(&self, html: &str) -> Result<()> {
        if let Some(path) = self.cache_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, html)?;
            log::debug!("Saved to cache: {}", path.display());
        }
        Ok(())
    }

    /// Fetch the page and extract this team's completed games.
    ///
    /// Network failures, timeouts and non-2xx responses are returned as
    /// errors and never retried. Rows that do not parse are skipped.
    /// Online runs always download; the cache is only read in offline mode.
    pub fn fetch(&self) -> Result<FetchedSchedule> {
        log::info!("Fetching schedule for {} from {}", self.team, self.url);

        let (html, elapsed) = if self.offline_only {
            timed(|| self.load_from_cache())
        } else {
            timed(|| self.download())
        };
        let html = html?;

        if !self.offline_only {
            if let Err(e) = self.save_to_cache(&html) {
                log::warn!("Failed to cache {}: {}", self.url, e);
            }
        }

        let rows = self.parse_page(&html);
        log::info!(
            "Extracted {} matches in {:.3}s",
            rows.len(),
            elapsed.as_secs_f64()
        );

        Ok(FetchedSchedule { rows, elapsed })
    }

    /// Download the page markup
    fn download(&self) -> Result<String> {
        log::debug!("GET {}", self.url);

        let response = self.client.get(&self.url).send()?;

        if !response.status().is_success() {
            return Err(HoopsError::Scraper {
                url: self.url.clone(),
                message: format!("HTTP {}", response.status()),
            });
        }

        Ok(response.text()?)
    }

    /// Parse a saved HTML file directly
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawMatch>> {
        let html = std::fs::read_to_string(path.as_ref())?;
        Ok(self.parse_page(&html))
    }

    /// Extract the tracked team's games from the results table
    pub fn parse_page(&self, html: &str) -> Vec<RawMatch> {
        let document = Html::parse_document(html);
        let mut matches = Vec::new();

        let row_selector = Selector::parse("table tbody tr").ok();
        let cell_selector = Selector::parse("td").ok();

        if let (Some(row_sel), Some(cell_sel)) = (row_selector, cell_selector) {
            for row in document.select(&row_sel) {
                let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
                if let Some(m) = self.parse_row(&cells) {
                    matches.push(m);
                }
            }
        }

        matches
    }

    /// Turn one row's cell texts into a match, or None if the row is not
    /// a completed game of the tracked team
    pub fn parse_row(&self, cells: &[String]) -> Option<RawMatch> {
        if cells.len() < MIN_CELLS {
            return None;
        }

        let left_team = &cells[1];
        let score = &cells[2];
        let right_team = &cells[3];
        let date = &cells[4];

        let Some((left_pts, right_pts)) = parse_score(score) else {
            log::debug!("Skipping row with score {:?}", score);
            return None;
        };

        // The score keeps the page's left:right order, so swap for away games
        let team = self.team.to_lowercase();
        let (opponent, points_for, points_against, venue) =
            if left_team.to_lowercase().contains(&team) {
                (right_team, left_pts, right_pts, Venue::Home)
            } else if right_team.to_lowercase().contains(&team) {
                (left_team, right_pts, left_pts, Venue::Away)
            } else {
                return None;
            };

        Some(RawMatch {
            date: date.clone(),
            opponent: opponent.clone(),
            points_for: points_for.into(),
            points_against: points_against.into(),
            venue,
        })
    }
}

/// Whitespace-normalized text of a table cell
fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a completed `"<int>:<int>"` score.
///
/// Dashes mark unplayed or cancelled fixtures and are rejected even when a
/// colon is present.
fn parse_score(score: &str) -> Option<(u16, u16)> {
    if !score.contains(':') || score.contains('-') || score.contains('–') {
        return None;
    }

    let mut parts = score.split(':');
    let left = parts.next()?.trim().parse().ok()?;
    let right = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some((left, right))
}
