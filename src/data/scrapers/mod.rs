//! Web scrapers for basketball match data

pub mod schedule;

use std::time::{Duration, Instant};

/// Run `operation` once and report how long it took.
///
/// Wraps a single call site (the page retrieval), so the measurement never
/// includes parsing.
pub fn timed<T, F>(operation: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = operation();
    (result, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_returns_result_and_duration() {
        let (value, elapsed) = timed(|| {
            std::thread::sleep(Duration::from_millis(5));
            42
        });
        assert_eq!(value, 42);
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_timed_passes_errors_through() {
        let (result, _) = timed(|| "x".parse::<u8>());
        assert!(result.is_err());
    }
}
