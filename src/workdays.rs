use chrono::{Datelike, NaiveDate, Weekday};

use crate::period::Period;

/// Length of a billable workday in hours
pub const HOURS_PER_DAY: u32 = 8;

/// Returns true for Monday–Friday. Holidays are not consulted.
pub fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn count_weekdays(period: &Period) -> u32 {
    period.dates().filter(|date| is_workday(*date)).count() as u32
}

/// Billable hours for a month: every weekday counts as a full workday.
pub fn count_billable_hours(period: &Period) -> u32 {
    count_weekdays(period) * HOURS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_weekend_is_not_workday() {
        // 2025-01-11 is a Saturday
        let saturday = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        assert!(!is_workday(saturday));
        assert!(!is_workday(saturday.succ_opt().unwrap()));
        assert!(is_workday(saturday.pred_opt().unwrap()));
    }

    #[test]
    fn test_march_2024() {
        // Starts on a Friday, 31 days: 21 weekdays
        let period = Period::new(2, 2024).unwrap();
        assert_eq!(count_weekdays(&period), 21);
        assert_eq!(count_billable_hours(&period), 168);
    }

    #[test]
    fn test_leap_february() {
        // 2024-02-29 is a Thursday and counts
        let period = Period::new(1, 2024).unwrap();
        assert_eq!(count_weekdays(&period), 21);

        let period = Period::new(1, 2023).unwrap();
        assert_eq!(count_weekdays(&period), 20);
    }

    #[test]
    fn test_hours_are_eight_per_weekday() {
        for year in [2023, 2024] {
            for month in 0..12 {
                let period = Period::new(month, year).unwrap();
                let weekend_days = period.dates().filter(|d| !is_workday(*d)).count() as u32;
                assert_eq!(count_weekdays(&period) + weekend_days, period.days_in_month());
                assert_eq!(count_billable_hours(&period), 8 * count_weekdays(&period));
            }
        }
    }
}
