use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar month, ordered chronologically (year first, then month number).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }

    /// Builds a month from raw year/month numbers, rejecting month numbers outside 1..=12.
    pub fn checked(year: i64, month: i64) -> Option<Self> {
        let year = i32::try_from(year).ok()?;
        let month = u32::try_from(month).ok()?;
        (1..=12).contains(&month).then_some(Self(year, month))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year(), date.month())
    }

    /// Months elapsed since year 0, used as the time axis when interpolating monthly series.
    pub fn index(self) -> i64 {
        i64::from(self.0) * 12 + i64::from(self.1) - 1
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_order_chronologically_across_years() {
        let mut months = vec![Month::new(1, 2025), Month::new(12, 2024), Month::new(3, 2024)];
        months.sort();
        assert_eq!(
            months,
            vec![Month::new(3, 2024), Month::new(12, 2024), Month::new(1, 2025)]
        );
    }

    #[test]
    fn index_is_contiguous_over_year_boundary() {
        assert_eq!(
            Month::new(1, 2025).index() - Month::new(12, 2024).index(),
            1
        );
    }

    #[test]
    fn checked_rejects_invalid_month_numbers() {
        assert_eq!(Month::checked(2024, 13), None);
        assert_eq!(Month::checked(2024, 0), None);
        assert_eq!(Month::checked(2024, 7), Some(Month::new(7, 2024)));
    }

    #[test]
    fn displays_as_year_dash_month() {
        assert_eq!(Month::new(4, 2024).to_string(), "2024-04");
    }
}
