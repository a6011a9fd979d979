//! Monthly timeline shared by every portfolio in a run

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::simulation::{MonthlyRecord, Portfolio};

/// Calendar horizon from January of `start_year` through December of `end_year`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    start_year: i32,
    end_year: i32,
}

impl Timeline {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, ConfigError> {
        if end_year < start_year {
            return Err(ConfigError::InvalidHorizon {
                start: start_year,
                end: end_year,
            });
        }
        // Both ends must be representable before any month is generated
        for year in [start_year, end_year] {
            NaiveDate::from_ymd_opt(year, 12, 1).ok_or(ConfigError::InvalidDate { year, month: 12 })?;
        }
        Ok(Self { start_year, end_year })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of months in the horizon
    pub fn len(&self) -> usize {
        ((self.end_year - self.start_year + 1) as usize) * 12
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// First-of-month dates, one per month index
    pub fn dates(&self) -> Result<Vec<NaiveDate>, ConfigError> {
        let first = NaiveDate::from_ymd_opt(self.start_year, 1, 1).ok_or(ConfigError::InvalidDate {
            year: self.start_year,
            month: 1,
        })?;

        (0..self.len() as u32)
            .map(|m| {
                first.checked_add_months(Months::new(m)).ok_or(ConfigError::InvalidDate {
                    year: self.start_year + (m / 12) as i32,
                    month: first.month() + m % 12,
                })
            })
            .collect()
    }

    /// One portfolio per id, each with identical dates and month indices starting at 0
    pub fn portfolios<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Portfolio>, ConfigError> {
        let dates = self.dates()?;
        let records: Vec<MonthlyRecord> = dates
            .iter()
            .enumerate()
            .map(|(month, &date)| MonthlyRecord::new(date, month as u32))
            .collect();

        Ok(ids
            .iter()
            .map(|id| Portfolio::new(id.as_ref(), records.clone()))
            .collect())
    }
}

impl Default for Timeline {
    /// 1950 through 2050, long enough for a saver starting at 18 to reach 100
    fn default() -> Self {
        Self {
            start_year: 1950,
            end_year: 2050,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_horizon_length() {
        let timeline = Timeline::default();
        assert_eq!(timeline.len(), 1212);
        let dates = timeline.dates().unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(1950, 1, 1).unwrap());
        assert_eq!(dates[1211], NaiveDate::from_ymd_opt(2050, 12, 1).unwrap());
    }

    #[test]
    fn test_dates_advance_one_month() {
        let dates = Timeline::new(2020, 2021).unwrap().dates().unwrap();
        assert_eq!(dates[11], NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
        assert_eq!(dates[12], NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_portfolios_are_aligned() {
        let timeline = Timeline::new(2000, 2004).unwrap();
        let portfolios = timeline.portfolios(&["A", "B", "C"]).unwrap();

        assert_eq!(portfolios.len(), 3);
        for p in &portfolios {
            assert_eq!(p.len(), 60);
            for (i, r) in p.records.iter().enumerate() {
                assert_eq!(r.month, i as u32);
                assert_eq!(r.date, portfolios[0].records[i].date);
            }
        }
        assert_eq!(portfolios[1].id, "B");
    }

    #[test]
    fn test_reversed_horizon_rejected() {
        assert_eq!(
            Timeline::new(2050, 1950),
            Err(ConfigError::InvalidHorizon { start: 2050, end: 1950 })
        );
    }
}
