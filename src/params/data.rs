//! Personal financial parameters driving a lifecycle simulation

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Annual inflation assumed when none is supplied
pub const DEFAULT_ANNUAL_INFLATION: f64 = 0.02;

/// Bequest level at which inheritance is treated as a luxury good
pub const DEFAULT_INHERITANCE_LUXURY: f64 = 490_000.0;

/// Oldest age accepted for any lifecycle milestone
pub const MAX_AGE: u32 = 150;

fn default_annual_income() -> f64 {
    65_000.0
}

fn default_income_growth_rate() -> f64 {
    0.03
}

fn default_start_saving_age() -> u32 {
    25
}

fn default_retirement_age() -> u32 {
    65
}

fn default_death_age() -> u32 {
    90
}

fn default_household_size() -> u32 {
    1
}

fn default_save_rate() -> f64 {
    0.10
}

fn default_consumption_rate() -> f64 {
    0.04
}

fn default_risk_aversion() -> f64 {
    RiskAversionLevel::Medium.gamma()
}

fn default_inheritance_luxury() -> f64 {
    DEFAULT_INHERITANCE_LUXURY
}

fn default_monthly_inflation_rate() -> f64 {
    DEFAULT_ANNUAL_INFLATION / 12.0
}

/// Self-described tolerance for risk, mapped onto a CRRA coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskAversionLevel {
    Low,
    Medium,
    High,
}

impl RiskAversionLevel {
    /// Relative risk aversion coefficient (gamma)
    pub fn gamma(&self) -> f64 {
        match self {
            RiskAversionLevel::Low => 3.74,
            RiskAversionLevel::Medium => 3.84,
            RiskAversionLevel::High => 3.94,
        }
    }
}

/// How strongly leaving a bequest matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InheritanceLevel {
    None,
    Low,
    Medium,
    High,
}

impl InheritanceLevel {
    /// Inheritance utility intensity (theta), before the 12^gamma monthly adjustment
    pub fn intensity(&self) -> f64 {
        match self {
            InheritanceLevel::None | InheritanceLevel::Low => 0.0,
            InheritanceLevel::Medium => 2360.0,
            InheritanceLevel::High => 2460.0,
        }
    }
}

/// Immutable inputs for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Base annual wage income at the start-saving age
    #[serde(default = "default_annual_income")]
    pub annual_income: f64,

    /// Annual wage growth, compounded monthly at rate/12
    #[serde(default = "default_income_growth_rate")]
    pub income_growth_rate: f64,

    #[serde(default = "default_start_saving_age")]
    pub start_saving_age: u32,

    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,

    #[serde(default = "default_death_age")]
    pub death_age: u32,

    /// People in the household at retirement
    #[serde(default = "default_household_size")]
    pub household_size: u32,

    /// Fraction of income saved each month
    #[serde(default = "default_save_rate")]
    pub save_rate: f64,

    /// Annual share of retirement savings consumed (4% rule = 0.04)
    #[serde(default = "default_consumption_rate")]
    pub consumption_rate: f64,

    /// CRRA coefficient (gamma)
    #[serde(default = "default_risk_aversion")]
    pub risk_aversion: f64,

    /// Inheritance utility intensity (theta)
    #[serde(default)]
    pub inheritance_intensity: f64,

    /// Luxury threshold (k) for the bequest utility
    #[serde(default = "default_inheritance_luxury")]
    pub inheritance_luxury: f64,

    #[serde(default = "default_monthly_inflation_rate")]
    pub monthly_inflation_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            annual_income: default_annual_income(),
            income_growth_rate: default_income_growth_rate(),
            start_saving_age: default_start_saving_age(),
            retirement_age: default_retirement_age(),
            death_age: default_death_age(),
            household_size: default_household_size(),
            save_rate: default_save_rate(),
            consumption_rate: default_consumption_rate(),
            risk_aversion: default_risk_aversion(),
            inheritance_intensity: 0.0,
            inheritance_luxury: default_inheritance_luxury(),
            monthly_inflation_rate: default_monthly_inflation_rate(),
        }
    }
}

impl SimulationParameters {
    /// Replace gamma with a preset level
    pub fn with_risk_aversion(mut self, level: RiskAversionLevel) -> Self {
        self.risk_aversion = level.gamma();
        self
    }

    /// Replace theta with a preset level
    pub fn with_inheritance(mut self, level: InheritanceLevel) -> Self {
        self.inheritance_intensity = level.intensity();
        self
    }

    /// Set monthly inflation from an annual rate
    pub fn with_annual_inflation(mut self, annual_rate: f64) -> Self {
        self.monthly_inflation_rate = annual_rate / 12.0;
        self
    }

    pub fn start_saving_month(&self) -> u32 {
        self.start_saving_age.saturating_mul(12)
    }

    pub fn retirement_month(&self) -> u32 {
        self.retirement_age.saturating_mul(12)
    }

    pub fn death_month(&self) -> u32 {
        self.death_age.saturating_mul(12)
    }

    /// Check everything that does not depend on gamma or the utility shape.
    /// Utility-specific checks live in `UtilityModel::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ages = [
            ("start_saving_age", self.start_saving_age),
            ("retirement_age", self.retirement_age),
            ("death_age", self.death_age),
        ];
        for (name, age) in ages {
            if age > MAX_AGE {
                return Err(ConfigError::AgeOutOfRange { name, age, max: MAX_AGE });
            }
        }

        if self.start_saving_age > self.retirement_age || self.retirement_age >= self.death_age {
            return Err(ConfigError::InvalidAgeOrdering {
                start: self.start_saving_age,
                retirement: self.retirement_age,
                death: self.death_age,
            });
        }

        let rates = [
            ("annual_income", self.annual_income),
            ("income_growth_rate", self.income_growth_rate),
            ("save_rate", self.save_rate),
            ("consumption_rate", self.consumption_rate),
            ("inheritance_intensity", self.inheritance_intensity),
            ("monthly_inflation_rate", self.monthly_inflation_rate),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }

        Ok(())
    }
}
