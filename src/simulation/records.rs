//! Per-month records, portfolios and run results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::Regime;
use crate::selector::{select_optimal, FinalUtilityMap};

/// A single month of one portfolio's trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    // Timing
    pub date: NaiveDate,
    pub month: u32,

    // Inputs
    pub ret: f64,
    pub income: f64,

    // Simulator outputs
    pub consumption: f64,
    pub savings: f64,
    pub utility: f64,
    pub regime: Regime,
}

impl MonthlyRecord {
    /// Create a record with only timing set; everything else is filled in later
    pub fn new(date: NaiveDate, month: u32) -> Self {
        Self {
            date,
            month,
            ret: 0.0,
            income: 0.0,
            consumption: 0.0,
            savings: 0.0,
            utility: 0.0,
            regime: Regime::Accumulating,
        }
    }
}

/// A labeled return series and the trajectory simulated over it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub records: Vec<MonthlyRecord>,
}

impl Portfolio {
    pub fn new(id: impl Into<String>, records: Vec<MonthlyRecord>) -> Self {
        Self {
            id: id.into(),
            records,
        }
    }

    /// Number of months in the horizon
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a month index, if the horizon covers it
    pub fn record(&self, month: u32) -> Option<&MonthlyRecord> {
        self.records.get(month as usize)
    }

    /// Records from the start-saving month through the death month inclusive
    pub fn lifetime_records(&self, start_month: u32, death_month: u32) -> &[MonthlyRecord] {
        let start = (start_month as usize).min(self.records.len());
        let end = (death_month as usize + 1).min(self.records.len()).max(start);
        &self.records[start..end]
    }

    /// First month that was scored as ruined
    pub fn ruined_at(&self) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.regime == Regime::Ruined)
            .map(|r| r.month)
    }
}

/// Complete output of a scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub portfolios: Vec<Portfolio>,
    pub final_utilities: FinalUtilityMap,
    pub optimal: Option<String>,
    pub start_saving_month: u32,
    pub retirement_month: u32,
    pub death_month: u32,
}

impl SimulationResult {
    pub fn new(
        portfolios: Vec<Portfolio>,
        final_utilities: FinalUtilityMap,
        start_saving_month: u32,
        retirement_month: u32,
        death_month: u32,
    ) -> Self {
        let optimal = select_optimal(&final_utilities).map(str::to_owned);
        Self {
            portfolios,
            final_utilities,
            optimal,
            start_saving_month,
            retirement_month,
            death_month,
        }
    }

    pub fn portfolio(&self, id: &str) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| p.id == id)
    }

    /// Plotting window of one portfolio: start-saving month through death
    pub fn lifetime_records(&self, id: &str) -> Option<&[MonthlyRecord]> {
        self.portfolio(id)
            .map(|p| p.lifetime_records(self.start_saving_month, self.death_month))
    }

    /// Headline figures for one portfolio
    pub fn summary(&self, id: &str) -> Option<PortfolioSummary> {
        let portfolio = self.portfolio(id)?;
        let retirement = portfolio.record(self.retirement_month)?;
        let death = portfolio.record(self.death_month)?;

        Some(PortfolioSummary {
            portfolio_id: portfolio.id.clone(),
            final_utility: self.final_utilities.get(id)?,
            savings_at_retirement: retirement.savings,
            bequest: death.savings,
            initial_monthly_consumption: retirement.consumption,
            ruined_at: portfolio.ruined_at(),
        })
    }

    /// Summary of the selected portfolio
    pub fn optimal_summary(&self) -> Option<PortfolioSummary> {
        self.optimal.as_deref().and_then(|id| self.summary(id))
    }
}

/// Headline figures for annotating a trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub portfolio_id: String,
    pub final_utility: f64,
    /// Savings after the retirement-entry month
    pub savings_at_retirement: f64,
    /// Savings carried into the death month
    pub bequest: f64,
    pub initial_monthly_consumption: f64,
    pub ruined_at: Option<u32>,
}
