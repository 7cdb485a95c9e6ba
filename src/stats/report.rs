//! Statistic result types and the aggregate season report

use crate::{MatchRecord, Outcome, Venue};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use super::streaks::Streaks;

/// Signed margin of one game, in season order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointDiff {
    pub timestamp: NaiveDateTime,
    pub difference: i32,
}

/// A game listed among the best or worst scoring performances
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub timestamp: NaiveDateTime,
    pub opponent: String,
    pub points_for: u16,
}

impl From<&MatchRecord> for GameSummary {
    fn from(record: &MatchRecord) -> Self {
        GameSummary {
            timestamp: record.timestamp,
            opponent: record.opponent.clone(),
            points_for: record.points_for,
        }
    }
}

/// Venue x outcome counts with every cell present
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WinLossGrid(BTreeMap<Venue, BTreeMap<Outcome, usize>>);

impl Default for WinLossGrid {
    fn default() -> Self {
        let row = || BTreeMap::from([(Outcome::Win, 0), (Outcome::Loss, 0)]);
        WinLossGrid(BTreeMap::from([(Venue::Home, row()), (Venue::Away, row())]))
    }
}

impl WinLossGrid {
    pub fn add(&mut self, venue: Venue, outcome: Outcome) {
        *self
            .0
            .entry(venue)
            .or_default()
            .entry(outcome)
            .or_insert(0) += 1;
    }

    pub fn get(&self, venue: Venue, outcome: Outcome) -> usize {
        self.0
            .get(&venue)
            .and_then(|row| row.get(&outcome))
            .copied()
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &BTreeMap<Venue, BTreeMap<Outcome, usize>> {
        &self.0
    }
}

/// Every season statistic, computed once.
///
/// Averages are rounded to two decimals for display; everything else is
/// exactly what the individual queries return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    pub matches: Vec<MatchRecord>,
    pub win_loss: BTreeMap<Outcome, usize>,
    pub avg_scored: Option<f64>,
    pub avg_conceded: Option<f64>,
    pub home_away: BTreeMap<Venue, BTreeMap<Outcome, usize>>,
    pub avg_home_away: BTreeMap<Venue, f64>,
    pub win_loss_home_away: WinLossGrid,
    pub point_diff: Vec<PointDiff>,
    pub top_games: Vec<GameSummary>,
    pub bottom_games: Vec<GameSummary>,
    pub streaks: Streaks,
}

/// Round to two decimal places, exact halves to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(235.0 / 3.0), 78.33);
        assert_eq!(round2(76.666_666), 76.67);
        assert_eq!(round2(85.0), 85.0);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(625.0 / 8.0), 78.12);
        assert_eq!(round2(627.0 / 8.0), 78.38);
        assert_eq!(round2(0.125), 0.12);
    }

    #[test]
    fn test_grid_is_zero_filled() {
        let mut grid = WinLossGrid::default();
        grid.add(Venue::Home, Outcome::Win);

        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.get(Venue::Home, Outcome::Win), 1);
        assert_eq!(grid.get(Venue::Home, Outcome::Loss), 0);
        assert_eq!(grid.get(Venue::Away, Outcome::Win), 0);
        assert_eq!(grid.get(Venue::Away, Outcome::Loss), 0);
    }

    #[test]
    fn test_grid_serializes_as_nested_map() {
        let mut grid = WinLossGrid::default();
        grid.add(Venue::Away, Outcome::Loss);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(
            json,
            r#"{"Home":{"Win":0,"Loss":0},"Away":{"Win":0,"Loss":1}}"#
        );
    }
}
