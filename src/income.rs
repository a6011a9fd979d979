//! Wage income during the accumulation phase

use crate::params::SimulationParameters;

/// Monthly wage income for a month index.
///
/// Income starts at `annual_income / 12` in the start-saving month and grows at
/// `income_growth_rate / 12` per month until retirement. Every other month earns 0.
pub fn income(month: u32, params: &SimulationParameters) -> f64 {
    IncomeProjector::new(params).income(month)
}

/// Income schedule with the accumulation window resolved once per run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeProjector {
    monthly_income: f64,
    monthly_growth: f64,
    start_month: u32,
    retirement_month: u32,
}

impl IncomeProjector {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            monthly_income: params.annual_income / 12.0,
            monthly_growth: 1.0 + params.income_growth_rate / 12.0,
            start_month: params.start_saving_month(),
            retirement_month: params.retirement_month(),
        }
    }

    pub fn income(&self, month: u32) -> f64 {
        if !self.is_earning(month) {
            return 0.0;
        }
        let months_worked = (month - self.start_month) as i32;
        self.monthly_income * self.monthly_growth.powi(months_worked)
    }

    /// Whether a month falls inside the accumulation window
    pub fn is_earning(&self, month: u32) -> bool {
        (self.start_month..self.retirement_month).contains(&month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> SimulationParameters {
        SimulationParameters {
            annual_income: 60_000.0,
            income_growth_rate: 0.03,
            start_saving_age: 25,
            retirement_age: 65,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_month_is_base_income() {
        assert_relative_eq!(income(300, &params()), 5_000.0);
    }

    #[test]
    fn test_growth_compounds_monthly() {
        let p = params();
        let expected = 5_000.0 * (1.0025f64).powi(12);
        assert_relative_eq!(income(312, &p), expected, max_relative = 1e-12);
        assert!(income(779, &p) > income(778, &p));
    }

    #[test]
    fn test_zero_outside_window() {
        let p = params();
        assert_eq!(income(0, &p), 0.0);
        assert_eq!(income(299, &p), 0.0);
        assert_eq!(income(780, &p), 0.0);
        assert_eq!(income(1100, &p), 0.0);
    }

    #[test]
    fn test_projector_window() {
        let projector = IncomeProjector::new(&params());
        assert!(!projector.is_earning(299));
        assert!(projector.is_earning(300));
        assert!(projector.is_earning(779));
        assert!(!projector.is_earning(780));
    }
}
