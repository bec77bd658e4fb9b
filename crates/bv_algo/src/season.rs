//! Season classification.
//!
//! A season spans the calendar-year boundary and is named by its ending year.
//! Months from `SEASON_START_MONTH` onwards belong to next year's season; every
//! earlier month (including July/August, which the league never plays) keeps
//! the same-year label.

use bv_core::Season;
use chrono::{Datelike, NaiveDate};

/// First calendar month (1-based) of a new season.
pub const SEASON_START_MONTH: u32 = 9;

#[inline]
pub fn classify_season(date: NaiveDate) -> Season {
    if date.month() >= SEASON_START_MONTH {
        Season::from_ending_year(date.year() + 1)
    } else {
        Season::from_ending_year(date.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn autumn_rolls_into_next_season() {
        assert_eq!(classify_season(d(2023, 10, 15)).ending_year(), 2024);
        assert_eq!(classify_season(d(2023, 9, 1)).ending_year(), 2024);
        assert_eq!(classify_season(d(2023, 12, 31)).ending_year(), 2024);
    }

    #[test]
    fn spring_keeps_calendar_year() {
        assert_eq!(classify_season(d(2024, 3, 1)).ending_year(), 2024);
        assert_eq!(classify_season(d(2024, 1, 1)).ending_year(), 2024);
        assert_eq!(classify_season(d(2024, 6, 30)).ending_year(), 2024);
    }

    #[test]
    fn off_season_months_take_the_else_branch() {
        assert_eq!(classify_season(d(2024, 7, 4)).ending_year(), 2024);
        assert_eq!(classify_season(d(2024, 8, 31)).ending_year(), 2024);
    }
}
