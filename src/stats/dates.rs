//! Day-first date parsing for schedule pages
//!
//! League pages print dates as `DD.MM.YYYY`, often followed by a kick-off
//! time (`01.02.2024, 18:00`). ISO dates are accepted as well.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Compiled date patterns, built once per validation pass
pub struct DateParser {
    day_first: Option<Regex>,
    iso: Option<Regex>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateParser {
    pub fn new() -> Self {
        DateParser {
            day_first: Regex::new(
                r"^\s*(\d{1,2})[./-](\d{1,2})[./-](\d{4})(?:[,\s]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?\s*$",
            )
            .ok(),
            iso: Regex::new(
                r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})(?:[T\s]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?\s*$",
            )
            .ok(),
        }
    }

    /// Parse a date with optional time; missing time means midnight.
    /// Returns None for unrecognised text or impossible calendar dates.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        if let Some(caps) = self.day_first.as_ref().and_then(|re| re.captures(s)) {
            let day: u32 = caps.get(1)?.as_str().parse().ok()?;
            let month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let year: i32 = caps.get(3)?.as_str().parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            return Some(date.and_time(time_of(&caps)?));
        }

        if let Some(caps) = self.iso.as_ref().and_then(|re| re.captures(s)) {
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            let month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let day: u32 = caps.get(3)?.as_str().parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            return Some(date.and_time(time_of(&caps)?));
        }

        None
    }
}

/// Time from capture groups 4-6, midnight when absent
fn time_of(caps: &regex::Captures) -> Option<NaiveTime> {
    let Some(hour) = caps.get(4) else {
        return NaiveTime::from_hms_opt(0, 0, 0);
    };
    let hour: u32 = hour.as_str().parse().ok()?;
    let minute: u32 = caps.get(5)?.as_str().parse().ok()?;
    let second: u32 = match caps.get(6) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(h, min, 0)
    }

    #[test]
    fn test_day_first() {
        let parser = DateParser::new();
        assert_eq!(parser.parse("05.01.2024"), at(2024, 1, 5, 0, 0));
        assert_eq!(parser.parse("5/1/2024"), at(2024, 1, 5, 0, 0));
        assert_eq!(parser.parse("13-01-2024"), at(2024, 1, 13, 0, 0));
    }

    #[test]
    fn test_with_time() {
        let parser = DateParser::new();
        assert_eq!(parser.parse("20.01.2024, 18:00"), at(2024, 1, 20, 18, 0));
        assert_eq!(parser.parse("20.01.2024 19:30"), at(2024, 1, 20, 19, 30));
        assert_eq!(parser.parse("2024-03-15 17:45"), at(2024, 3, 15, 17, 45));
        assert_eq!(parser.parse("2024-03-15"), at(2024, 3, 15, 0, 0));
    }

    #[test]
    fn test_rejects_invalid() {
        let parser = DateParser::new();
        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("jutro"), None);
        assert_eq!(parser.parse("31.02.2024"), None);
        assert_eq!(parser.parse("01.13.2024"), None);
        assert_eq!(parser.parse("01.01.2024, 25:00"), None);
    }
}
