//! Per-portfolio simulation state and lifecycle regimes

use serde::{Deserialize, Serialize};

/// Cumulative utility recorded once savings can no longer cover consumption.
/// Finite so that scores stay totally ordered, and large enough to lose to any
/// portfolio that was never ruined.
pub const RUIN_UTILITY: f64 = -10_000_000_000_000.0;

/// Calendar phase of a month, decided purely by month-index comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Accumulation,
    RetirementEntry,
    Decumulation,
    Death,
    PostMortem,
}

impl Phase {
    pub fn classify(month: u32, retirement_month: u32, death_month: u32) -> Self {
        if month < retirement_month {
            Phase::Accumulation
        } else if month == retirement_month {
            Phase::RetirementEntry
        } else if month < death_month {
            Phase::Decumulation
        } else if month == death_month {
            Phase::Death
        } else {
            Phase::PostMortem
        }
    }
}

/// Regime applied to a month, recorded on each output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Saving out of wage income
    Accumulating,
    /// First retirement month, fixes the consumption baseline
    EnteringRetirement,
    /// Drawing down savings for inflation-indexed consumption
    Decumulating,
    /// Savings exhausted; scored with `RUIN_UTILITY`
    Ruined,
    /// Death month; bequest scored and final utility fixed
    Deceased,
    /// After death; savings frozen, no accrual
    PostMortem,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Accumulating => "Accumulating",
            Regime::EnteringRetirement => "EnteringRetirement",
            Regime::Decumulating => "Decumulating",
            Regime::Ruined => "Ruined",
            Regime::Deceased => "Deceased",
            Regime::PostMortem => "PostMortem",
        }
    }

    /// Whether the portfolio's final utility is already fixed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Regime::Deceased | Regime::PostMortem)
    }
}

/// Values computed for one month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub regime: Regime,
    pub consumption: f64,
    pub savings: f64,
    pub utility: f64,
}

/// Accumulators carried from one month to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Savings at the end of the previous month
    pub previous_savings: f64,

    /// Cumulative utility at the end of the previous month
    pub previous_utility: f64,

    /// Monthly consumption fixed at retirement entry
    pub initial_consumption: Option<f64>,

    /// Set on the first ruined month and never cleared
    pub ruined: bool,
}

impl SimulationState {
    pub fn new() -> Self {
        Self {
            previous_savings: 0.0,
            previous_utility: 0.0,
            initial_consumption: None,
            ruined: false,
        }
    }

    /// State for the following month after applying an outcome
    pub fn advance(self, outcome: &StepOutcome, initial_consumption: Option<f64>) -> Self {
        Self {
            previous_savings: outcome.savings,
            previous_utility: outcome.utility,
            initial_consumption: initial_consumption.or(self.initial_consumption),
            ruined: self.ruined || outcome.regime == Regime::Ruined,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}
