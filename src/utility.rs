//! CRRA utility of retirement consumption and of a bequest
//!
//! Lifetime utility follows
//! `U(C, B) = sum_t (C_t / sqrt(H))^(1-g) / (1-g) + theta * 12^g * (B / k)^(1-g) / (1-g)`
//! where the `12^g` factor rescales the annual bequest intensity to monthly consumption.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::SimulationParameters;

fn check_risk_aversion(risk_aversion: f64) -> Result<(), ConfigError> {
    if !risk_aversion.is_finite() {
        return Err(ConfigError::NonFiniteRiskAversion(risk_aversion));
    }
    if (risk_aversion - 1.0).abs() < f64::EPSILON {
        return Err(ConfigError::RiskAversionIsOne);
    }
    Ok(())
}

/// Household-size-adjusted CRRA utility of one month's consumption
pub fn utility_consumption(
    consumption: f64,
    household_size: u32,
    risk_aversion: f64,
) -> Result<f64, ConfigError> {
    check_risk_aversion(risk_aversion)?;
    if household_size == 0 {
        return Err(ConfigError::InvalidHouseholdSize(household_size));
    }
    Ok(crra(consumption / (household_size as f64).sqrt(), risk_aversion))
}

/// CRRA utility of a bequest, scaled by the inheritance intensity
pub fn utility_inheritance(
    intensity: f64,
    bequest: f64,
    luxury_threshold: f64,
    risk_aversion: f64,
) -> Result<f64, ConfigError> {
    check_risk_aversion(risk_aversion)?;
    if !(luxury_threshold > 0.0) {
        return Err(ConfigError::InvalidLuxuryThreshold(luxury_threshold));
    }
    // No bequest motive: skip the power so an empty bequest cannot produce 0 * inf
    if intensity == 0.0 {
        return Ok(0.0);
    }
    Ok(intensity * 12f64.powf(risk_aversion) * crra(bequest / luxury_threshold, risk_aversion))
}

fn crra(x: f64, risk_aversion: f64) -> f64 {
    let factor = 1.0 - risk_aversion;
    x.powf(factor) / factor
}

/// Utility parameters validated once and shared by every month of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityModel {
    risk_aversion: f64,
    household_size: u32,
    inheritance_intensity: f64,
    inheritance_luxury: f64,
}

impl UtilityModel {
    pub fn new(
        risk_aversion: f64,
        household_size: u32,
        inheritance_intensity: f64,
        inheritance_luxury: f64,
    ) -> Result<Self, ConfigError> {
        check_risk_aversion(risk_aversion)?;
        if household_size == 0 {
            return Err(ConfigError::InvalidHouseholdSize(household_size));
        }
        if !(inheritance_luxury > 0.0) || !inheritance_luxury.is_finite() {
            return Err(ConfigError::InvalidLuxuryThreshold(inheritance_luxury));
        }
        Ok(Self {
            risk_aversion,
            household_size,
            inheritance_intensity,
            inheritance_luxury,
        })
    }

    pub fn from_params(params: &SimulationParameters) -> Result<Self, ConfigError> {
        Self::new(
            params.risk_aversion,
            params.household_size,
            params.inheritance_intensity,
            params.inheritance_luxury,
        )
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Utility of one month's consumption
    pub fn consumption(&self, consumption: f64) -> f64 {
        crra(consumption / (self.household_size as f64).sqrt(), self.risk_aversion)
    }

    /// Utility of the bequest left at death
    pub fn inheritance(&self, bequest: f64) -> f64 {
        if self.inheritance_intensity == 0.0 {
            return 0.0;
        }
        self.inheritance_intensity
            * 12f64.powf(self.risk_aversion)
            * crra(bequest / self.inheritance_luxury, self.risk_aversion)
    }
}
