//! Season statistics engine
//!
//! Validates scraped rows into a time-ordered set of [`MatchRecord`]s and
//! answers the descriptive queries over it. Queries never mutate the
//! stored records.

use super::dates::DateParser;
use super::report::{round2, GameSummary, PointDiff, SeasonReport, WinLossGrid};
use super::streaks::{self, Streaks};
use crate::{MatchRecord, Outcome, RawMatch, Venue};
use std::collections::BTreeMap;

/// Statistics over one team's validated season
#[derive(Debug, Clone, Default)]
pub struct SeasonStats {
    /// Sorted ascending by timestamp
    records: Vec<MatchRecord>,
}

impl SeasonStats {
    /// Validate raw rows and sort them into season order.
    ///
    /// Rows with an unparseable date or score are dropped silently.
    /// The sort is stable, so games sharing a timestamp keep input order.
    pub fn new(rows: Vec<RawMatch>) -> Self {
        let parser = DateParser::new();
        let total = rows.len();

        let mut records: Vec<MatchRecord> = rows
            .into_iter()
            .filter_map(|row| validate(row, &parser))
            .collect();
        records.sort_by_key(|r| r.timestamp);

        if records.len() < total {
            log::debug!("Dropped {} invalid rows", total - records.len());
        }

        SeasonStats { records }
    }

    /// Validated records in season order
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of games per outcome; outcomes that never occurred are absent
    pub fn win_loss_ratio(&self) -> BTreeMap<Outcome, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.outcome()).or_insert(0) += 1;
        }
        counts
    }

    /// Mean points scored, None for an empty season
    pub fn avg_points_scored(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.points_for))
    }

    /// Mean points conceded, None for an empty season
    pub fn avg_points_conceded(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.points_against))
    }

    /// Outcome counts per venue; venues without games are absent
    pub fn home_away_results(&self) -> BTreeMap<Venue, BTreeMap<Outcome, usize>> {
        let mut results: BTreeMap<Venue, BTreeMap<Outcome, usize>> = BTreeMap::new();
        for record in &self.records {
            *results
                .entry(record.venue)
                .or_default()
                .entry(record.outcome())
                .or_insert(0) += 1;
        }
        results
    }

    /// Mean points scored per venue; venues without games are absent
    pub fn avg_points_home_away(&self) -> BTreeMap<Venue, f64> {
        let mut totals: BTreeMap<Venue, (u32, u32)> = BTreeMap::new();
        for record in &self.records {
            let (sum, games) = totals.entry(record.venue).or_insert((0, 0));
            *sum += record.points_for as u32;
            *games += 1;
        }

        totals
            .into_iter()
            .map(|(venue, (sum, games))| (venue, sum as f64 / games as f64))
            .collect()
    }

    /// Full Home/Away x Win/Loss grid, zero where no games fall
    pub fn win_loss_home_away(&self) -> WinLossGrid {
        let mut grid = WinLossGrid::default();
        for record in &self.records {
            grid.add(record.venue, record.outcome());
        }
        grid
    }

    /// Margin of every game, in season order
    pub fn point_difference(&self) -> Vec<PointDiff> {
        self.records
            .iter()
            .map(|r| PointDiff {
                timestamp: r.timestamp,
                difference: r.margin(),
            })
            .collect()
    }

    /// The `n` highest and `n` lowest scoring games.
    ///
    /// Ties keep season order. Fewer than `n` games returns all of them.
    pub fn top_bottom_games(&self, n: usize) -> (Vec<GameSummary>, Vec<GameSummary>) {
        let mut by_points: Vec<&MatchRecord> = self.records.iter().collect();

        by_points.sort_by(|a, b| b.points_for.cmp(&a.points_for));
        let top: Vec<GameSummary> =
            by_points.iter().take(n).map(|&r| GameSummary::from(r)).collect();

        by_points.sort_by_key(|r| r.points_for);
        let bottom: Vec<GameSummary> =
            by_points.iter().take(n).map(|&r| GameSummary::from(r)).collect();

        (top, bottom)
    }

    /// Longest winning and losing runs in season order
    pub fn longest_streak(&self) -> Streaks {
        let outcomes: Vec<Outcome> = self.records.iter().map(|r| r.outcome()).collect();
        streaks::longest(&outcomes)
    }

    /// Compute every statistic into one report
    pub fn run(&self, top_n: usize) -> SeasonReport {
        let (top_games, bottom_games) = self.top_bottom_games(top_n);

        SeasonReport {
            matches: self.records.clone(),
            win_loss: self.win_loss_ratio(),
            avg_scored: self.avg_points_scored().map(round2),
            avg_conceded: self.avg_points_conceded().map(round2),
            home_away: self.home_away_results(),
            avg_home_away: self.avg_points_home_away(),
            win_loss_home_away: self.win_loss_home_away(),
            point_diff: self.point_difference(),
            top_games,
            bottom_games,
            streaks: self.longest_streak(),
        }
    }
}

/// Coerce one raw row, or None if any required field is unusable
fn validate(row: RawMatch, parser: &DateParser) -> Option<MatchRecord> {
    let timestamp = parser.parse(&row.date)?;
    let points_for = row.points_for.coerce()?;
    let points_against = row.points_against.coerce()?;

    Some(MatchRecord {
        timestamp,
        opponent: row.opponent,
        points_for,
        points_against,
        venue: row.venue,
    })
}

fn mean(values: impl Iterator<Item = u16>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + v as u64, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawPoints;
    use chrono::NaiveDate;

    fn raw(date: &str, opponent: &str, points_for: u16, points_against: u16, venue: Venue) -> RawMatch {
        RawMatch {
            date: date.to_string(),
            opponent: opponent.to_string(),
            points_for: points_for.into(),
            points_against: points_against.into(),
            venue,
        }
    }

    /// Three-game reference season: home win, away loss, home win
    fn season() -> SeasonStats {
        SeasonStats::new(vec![
            raw("01.01.2024", "Team A", 80, 70, Venue::Home),
            raw("05.01.2024", "Team B", 65, 75, Venue::Away),
            raw("10.01.2024", "Team C", 90, 85, Venue::Home),
        ])
    }

    fn with_outcomes(outcomes: &[Outcome]) -> SeasonStats {
        let rows = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| {
                let (pf, pa) = match outcome {
                    Outcome::Win => (80, 70),
                    Outcome::Loss => (70, 80),
                };
                raw(&format!("{:02}.02.2024", i + 1), "Opp", pf, pa, Venue::Home)
            })
            .collect();
        SeasonStats::new(rows)
    }

    #[test]
    fn test_win_loss_ratio() {
        let counts = season().win_loss_ratio();
        assert_eq!(counts[&Outcome::Win], 2);
        assert_eq!(counts[&Outcome::Loss], 1);
    }

    #[test]
    fn test_avg_points() {
        let stats = season();
        assert_eq!(stats.avg_points_scored(), Some((80.0 + 65.0 + 90.0) / 3.0));
        assert_eq!(stats.avg_points_conceded(), Some((70.0 + 75.0 + 85.0) / 3.0));
    }

    #[test]
    fn test_home_away_results() {
        let results = season().home_away_results();
        assert_eq!(results[&Venue::Home][&Outcome::Win], 2);
        assert_eq!(results[&Venue::Away][&Outcome::Loss], 1);
        // No zero-fill here
        assert!(!results[&Venue::Home].contains_key(&Outcome::Loss));
    }

    #[test]
    fn test_avg_points_home_away() {
        let avg = season().avg_points_home_away();
        assert_eq!(avg[&Venue::Home], 85.0);
        assert_eq!(avg[&Venue::Away], 65.0);
    }

    #[test]
    fn test_home_only_season_has_no_away_entries() {
        let stats = SeasonStats::new(vec![raw("01.01.2024", "Team A", 80, 70, Venue::Home)]);
        assert!(!stats.home_away_results().contains_key(&Venue::Away));
        assert!(!stats.avg_points_home_away().contains_key(&Venue::Away));
    }

    #[test]
    fn test_win_loss_home_away_grid() {
        let grid = season().win_loss_home_away();
        assert_eq!(grid.get(Venue::Home, Outcome::Win), 2);
        assert_eq!(grid.get(Venue::Home, Outcome::Loss), 0);
        assert_eq!(grid.get(Venue::Away, Outcome::Win), 0);
        assert_eq!(grid.get(Venue::Away, Outcome::Loss), 1);
    }

    #[test]
    fn test_point_difference() {
        let diffs: Vec<i32> = season()
            .point_difference()
            .iter()
            .map(|d| d.difference)
            .collect();
        assert_eq!(diffs, vec![10, -10, 5]);
    }

    #[test]
    fn test_point_difference_matches_records() {
        let stats = season();
        for (diff, record) in stats.point_difference().iter().zip(stats.records()) {
            assert_eq!(diff.timestamp, record.timestamp);
            assert_eq!(
                diff.difference,
                record.points_for as i32 - record.points_against as i32
            );
        }
    }

    #[test]
    fn test_top_bottom_games() {
        let (top, bottom) = season().top_bottom_games(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].opponent, "Team C");
        assert_eq!(top[0].points_for, 90);
        assert_eq!(bottom[0].opponent, "Team B");
        assert_eq!(bottom[0].points_for, 65);
    }

    #[test]
    fn test_top_bottom_fewer_than_n() {
        let (top, bottom) = season().top_bottom_games(5);
        assert_eq!(top.len(), 3);
        assert_eq!(bottom.len(), 3);
        let top_points: Vec<u16> = top.iter().map(|g| g.points_for).collect();
        assert_eq!(top_points, vec![90, 80, 65]);
    }

    #[test]
    fn test_top_bottom_ties_keep_season_order() {
        let stats = SeasonStats::new(vec![
            raw("01.03.2024", "First", 70, 60, Venue::Home),
            raw("02.03.2024", "Second", 70, 60, Venue::Away),
            raw("03.03.2024", "Third", 70, 60, Venue::Home),
        ]);
        let (top, bottom) = stats.top_bottom_games(2);
        assert_eq!(top[0].opponent, "First");
        assert_eq!(top[1].opponent, "Second");
        assert_eq!(bottom[0].opponent, "First");
        assert_eq!(bottom[1].opponent, "Second");
    }

    #[test]
    fn test_longest_streak() {
        use Outcome::{Loss, Win};
        let stats = with_outcomes(&[Win, Win, Loss, Win, Win, Win, Loss]);
        assert_eq!(
            stats.longest_streak(),
            Streaks {
                win: Some(3),
                loss: Some(1)
            }
        );
    }

    #[test]
    fn test_sorts_into_season_order() {
        let stats = SeasonStats::new(vec![
            raw("10.01.2024", "Team C", 90, 85, Venue::Home),
            raw("01.01.2024", "Team A", 80, 70, Venue::Home),
            raw("05.01.2024", "Team B", 65, 75, Venue::Away),
        ]);
        let opponents: Vec<&str> = stats.records().iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["Team A", "Team B", "Team C"]);
        assert_eq!(
            stats.records()[0].timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_duplicate_timestamps_are_kept_in_input_order() {
        let stats = SeasonStats::new(vec![
            raw("01.01.2024", "Early", 80, 70, Venue::Home),
            raw("01.01.2024", "Late", 60, 70, Venue::Away),
        ]);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.records()[0].opponent, "Early");
        assert_eq!(stats.records()[1].opponent, "Late");
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let mut bad_points = raw("03.01.2024", "Bad points", 0, 70, Venue::Home);
        bad_points.points_for = RawPoints::Text("??".to_string());
        let mut negative = raw("04.01.2024", "Negative", 0, 70, Venue::Home);
        negative.points_against = RawPoints::Int(-1);

        let stats = SeasonStats::new(vec![
            raw("01.01.2024", "Good", 80, 70, Venue::Home),
            raw("przełożony", "Bad date", 80, 70, Venue::Home),
            raw("30.02.2024", "Impossible date", 80, 70, Venue::Home),
            bad_points,
            negative,
        ]);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats.records()[0].opponent, "Good");
    }

    #[test]
    fn test_text_points_are_coerced() {
        let mut row = raw("01.01.2024", "Team A", 0, 0, Venue::Away);
        row.points_for = RawPoints::Text("72".to_string());
        row.points_against = RawPoints::Text(" 68".to_string());

        let stats = SeasonStats::new(vec![row]);
        assert_eq!(stats.records()[0].points_for, 72);
        assert_eq!(stats.records()[0].outcome(), Outcome::Win);
    }

    #[test]
    fn test_empty_season() {
        let stats = SeasonStats::new(vec![]);
        assert!(stats.is_empty());
        assert!(stats.win_loss_ratio().is_empty());
        assert_eq!(stats.avg_points_scored(), None);
        assert_eq!(stats.avg_points_conceded(), None);
        assert!(stats.home_away_results().is_empty());
        assert!(stats.avg_points_home_away().is_empty());
        assert_eq!(stats.win_loss_home_away(), WinLossGrid::default());
        assert!(stats.point_difference().is_empty());
        assert_eq!(stats.top_bottom_games(5), (vec![], vec![]));
        assert_eq!(stats.longest_streak(), Streaks { win: None, loss: None });

        let report = stats.run(5);
        assert_eq!(report.avg_scored, None);
        assert_eq!(report.streaks, Streaks::default());
    }

    #[test]
    fn test_run_is_consistent_with_queries() {
        let stats = season();
        let report = stats.run(5);

        assert_eq!(report.avg_scored, Some(78.33));
        assert_eq!(report.avg_scored, stats.avg_points_scored().map(round2));
        assert_eq!(report.avg_conceded, stats.avg_points_conceded().map(round2));
        assert_eq!(report.win_loss, stats.win_loss_ratio());
        assert_eq!(report.home_away, stats.home_away_results());
        assert_eq!(report.avg_home_away, stats.avg_points_home_away());
        assert_eq!(report.win_loss_home_away, stats.win_loss_home_away());
        assert_eq!(report.point_diff, stats.point_difference());
        assert_eq!(report.streaks, stats.longest_streak());
        assert_eq!(report.matches.len(), 3);
        assert_eq!(report.top_games.len(), 3);
    }

    #[test]
    fn test_run_rounds_exact_halves_to_even() {
        let mut rows = vec![raw("01.01.2024", "Opp", 79, 70, Venue::Home)];
        for day in 2..=8 {
            rows.push(raw(&format!("{:02}.01.2024", day), "Opp", 78, 70, Venue::Home));
        }
        let stats = SeasonStats::new(rows);

        assert_eq!(stats.avg_points_scored(), Some(78.125));
        assert_eq!(stats.run(5).avg_scored, Some(78.12));
    }

    #[test]
    fn test_snapshot_rows_with_bad_values_are_dropped() {
        let json = r#"[
            {"date":"01.01.2024","opponent":"Team A","points_for":80,"points_against":70,"venue":"Home"},
            {"date":"02.01.2024","opponent":"Null points","points_for":null,"points_against":70,"venue":"Home"},
            {"date":"03.01.2024","opponent":"Float points","points_for":81.0,"points_against":70,"venue":"Away"},
            {"date":"04.01.2024","opponent":"Missing points","points_for":80,"venue":"Away"},
            {"date":null,"opponent":"Null date","points_for":80,"points_against":70,"venue":"Home"},
            {"date":"05.01.2024","opponent":"Team B","points_for":"65","points_against":"75","venue":"Away"}
        ]"#;
        let rows: Vec<RawMatch> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 6);

        let stats = SeasonStats::new(rows);
        let opponents: Vec<&str> = stats.records().iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(opponents, vec!["Team A", "Team B"]);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let rows = vec![
            raw("05.01.2024", "Team B", 65, 75, Venue::Away),
            raw("01.01.2024", "Team A", 80, 70, Venue::Home),
        ];
        let a = SeasonStats::new(rows.clone()).run(5);
        let b = SeasonStats::new(rows).run(5);
        assert_eq!(a, b);
    }
}
