//! Win/loss streaks
//!
//! A streak is a maximal run of identical consecutive outcomes in season
//! order. `W L W` is two separate winning runs of length 1.

use crate::Outcome;
use serde::Serialize;

/// One maximal run of identical outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub outcome: Outcome,
    pub length: usize,
}

/// Longest run of each outcome; None when the season has no such outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub win: Option<usize>,
    pub loss: Option<usize>,
}

/// Split an outcome sequence into maximal runs
pub fn runs(outcomes: &[Outcome]) -> Vec<Run> {
    let mut result: Vec<Run> = Vec::new();

    for &outcome in outcomes {
        match result.last_mut() {
            Some(run) if run.outcome == outcome => run.length += 1,
            _ => result.push(Run { outcome, length: 1 }),
        }
    }

    result
}

/// Longest winning and losing runs
pub fn longest(outcomes: &[Outcome]) -> Streaks {
    let runs = runs(outcomes);
    let longest_of = |outcome: Outcome| {
        runs.iter()
            .filter(|r| r.outcome == outcome)
            .map(|r| r.length)
            .max()
    };

    Streaks {
        win: longest_of(Outcome::Win),
        loss: longest_of(Outcome::Loss),
    }
}
