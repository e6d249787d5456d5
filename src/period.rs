use chrono::{Datelike, Duration, Month, NaiveDate};
use std::fmt;

use crate::error::{InvoiceError, Result};

/// A calendar month an invoice is billed for.
///
/// `month` is zero-based (January is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if month > 11 {
            return Err(InvoiceError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    /// Zero-based month index
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Human-readable label, e.g. "March 2024"
    pub fn label(&self) -> String {
        let name = Month::try_from((self.month + 1) as u8)
            .map(|month| month.name())
            .unwrap_or_default();
        format!("{} {}", name, self.year)
    }

    /// Sortable key, e.g. "2024-03"
    pub fn key(&self) -> String {
        format!("{}-{:02}", self.year, self.month + 1)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    /// Day of the month before the first of the next month; 0 outside chrono's date range.
    pub fn days_in_month(&self) -> u32 {
        let next_first = if self.month == 11 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 2, 1)
        };
        next_first
            .map(|first| first - Duration::days(1))
            .map(|last| last.day())
            .unwrap_or(0)
    }

    /// Every date of the month, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month())
            .filter_map(move |day| NaiveDate::from_ymd_opt(self.year, self.month + 1, day))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The calendar month before `now`, rolling back into December of the prior year in January.
pub fn resolve_previous_month(now: NaiveDate) -> Period {
    let (month, year) = match now.month0() {
        0 => (11, now.year() - 1),
        m => (m - 1, now.year()),
    };
    Period { month, year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_month_within_year() {
        let period = resolve_previous_month(date(2024, 4, 15));
        assert_eq!(period.month(), 2);
        assert_eq!(period.year(), 2024);
        assert_eq!(period.label(), "March 2024");
    }

    #[test]
    fn test_previous_month_rolls_over_year() {
        let period = resolve_previous_month(date(2025, 1, 1));
        assert_eq!(period.month(), 11);
        assert_eq!(period.year(), 2024);
        assert_eq!(period.label(), "December 2024");
    }

    #[test]
    fn test_previous_month_for_every_month() {
        for m in 1..=12 {
            let now = date(2023, m, 28);
            let period = resolve_previous_month(now);
            assert!(period.month() <= 11);
            assert_eq!(period.month(), (now.month0() + 11) % 12);
            let expected_year = if now.month0() == 0 { 2022 } else { 2023 };
            assert_eq!(period.year(), expected_year);
        }
    }

    #[test]
    fn test_days_in_month() {
        let lengths: Vec<u32> = (0..12)
            .map(|m| Period::new(m, 2023).unwrap().days_in_month())
            .collect();
        assert_eq!(lengths, vec![31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);
        assert_eq!(Period::new(11, 2023).unwrap().first_day(), Some(date(2023, 12, 1)));
    }

    #[test]
    fn test_days_in_february() {
        assert_eq!(Period::new(1, 2024).unwrap().days_in_month(), 29);
        assert_eq!(Period::new(1, 2023).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(1, 1900).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(1, 2000).unwrap().days_in_month(), 29);
    }

    #[test]
    fn test_dates_cover_whole_month() {
        let period = Period::new(1, 2024).unwrap();
        let dates: Vec<_> = period.dates().collect();
        assert_eq!(dates.len(), 29);
        assert_eq!(dates[0], date(2024, 2, 1));
        assert_eq!(dates[28], date(2024, 2, 29));
    }

    #[test]
    fn test_key_is_one_based() {
        assert_eq!(Period::new(0, 2024).unwrap().key(), "2024-01");
        assert_eq!(Period::new(11, 2024).unwrap().key(), "2024-12");
    }

    #[test]
    fn test_rejects_month_out_of_range() {
        assert!(matches!(
            Period::new(12, 2024),
            Err(InvoiceError::InvalidMonth(12))
        ));
    }
}
