//! Periodic return feed and its validation

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// One return observation for one portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEntry {
    #[serde(rename = "portfolio")]
    pub portfolio_id: String,
    pub month: u32,
    #[serde(rename = "ret")]
    pub rate: f64,
}

/// Externally supplied returns, one per portfolio per month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnFeed {
    entries: Vec<ReturnEntry>,
}

/// A feed that passed validation: portfolios in first-appearance order,
/// each with one return per month index 0..len
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFeed {
    series: Vec<(String, Vec<f64>)>,
}

impl ReturnFeed {
    pub fn new(entries: Vec<ReturnEntry>) -> Self {
        Self { entries }
    }

    /// The same constant return for every portfolio and month
    pub fn flat<S: AsRef<str>>(portfolio_ids: &[S], months: usize, rate: f64) -> Self {
        let entries = portfolio_ids
            .iter()
            .flat_map(|id| {
                (0..months as u32).map(move |month| ReturnEntry {
                    portfolio_id: id.as_ref().to_string(),
                    month,
                    rate,
                })
            })
            .collect();
        Self { entries }
    }

    /// Build a feed from per-portfolio return series
    pub fn from_series<S: AsRef<str>>(series: &[(S, Vec<f64>)]) -> Self {
        let entries = series
            .iter()
            .flat_map(|(id, rates)| {
                rates.iter().enumerate().map(move |(month, &rate)| ReturnEntry {
                    portfolio_id: id.as_ref().to_string(),
                    month: month as u32,
                    rate,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn push(&mut self, entry: ReturnEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReturnEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group by portfolio and check coverage.
    ///
    /// Each portfolio's months must run 0, 1, 2, ... in feed order with no gaps,
    /// every portfolio must cover the same number of months, and every rate must
    /// be finite and greater than -1.
    pub fn validate(&self) -> Result<ValidatedFeed, FeedError> {
        if self.entries.is_empty() {
            return Err(FeedError::Empty);
        }

        let mut series: Vec<(String, Vec<f64>)> = Vec::new();
        for entry in &self.entries {
            if !entry.rate.is_finite() || entry.rate <= -1.0 {
                return Err(FeedError::InvalidReturn {
                    portfolio: entry.portfolio_id.clone(),
                    month: entry.month,
                    rate: entry.rate,
                });
            }

            // Portfolio counts are small; a linear scan keeps declaration order for free
            let position = match series.iter().position(|(id, _)| *id == entry.portfolio_id) {
                Some(position) => position,
                None => {
                    series.push((entry.portfolio_id.clone(), Vec::new()));
                    series.len() - 1
                }
            };
            let (id, rates) = &mut series[position];

            let expected = rates.len() as u32;
            if entry.month != expected {
                return Err(FeedError::MonthGap {
                    portfolio: id.clone(),
                    expected,
                    found: entry.month,
                });
            }
            rates.push(entry.rate);
        }

        let (reference, expected) = (&series[0].0, series[0].1.len());
        if let Some((id, rates)) = series.iter().find(|(_, rates)| rates.len() != expected) {
            return Err(FeedError::LengthMismatch {
                portfolio: id.clone(),
                reference: reference.clone(),
                expected,
                found: rates.len(),
            });
        }

        Ok(ValidatedFeed { series })
    }
}

impl ValidatedFeed {
    /// Portfolio ids in first-declared order
    pub fn portfolio_ids(&self) -> Vec<&str> {
        self.series.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Number of months every portfolio covers
    pub fn months(&self) -> usize {
        self.series.first().map(|(_, rates)| rates.len()).unwrap_or(0)
    }

    pub fn returns(&self, portfolio_id: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|(id, _)| id == portfolio_id)
            .map(|(_, rates)| rates.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(id, rates)| (id.as_str(), rates.as_slice()))
    }

    /// Reject a feed that does not span the timeline exactly
    pub fn check_horizon(&self, timeline_months: usize) -> Result<(), FeedError> {
        if self.months() != timeline_months {
            return Err(FeedError::HorizonMismatch {
                feed: self.months(),
                timeline: timeline_months,
            });
        }
        Ok(())
    }
}
