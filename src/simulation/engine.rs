//! Lifecycle simulator: steps one portfolio through its monthly timeline

use log::{debug, warn};

use super::records::Portfolio;
use super::state::{Phase, Regime, SimulationState, StepOutcome, RUIN_UTILITY};
use crate::error::{ConfigError, SimulationError};
use crate::income::IncomeProjector;
use crate::params::SimulationParameters;
use crate::selector::FinalUtilityMap;
use crate::utility::UtilityModel;

/// Validated run configuration shared by every portfolio
#[derive(Debug, Clone)]
pub struct LifecycleSimulator {
    params: SimulationParameters,
    utility: UtilityModel,
    income: IncomeProjector,
    retirement_month: u32,
    death_month: u32,
}

impl LifecycleSimulator {
    /// Validate parameters and fix the utility model for the run
    pub fn new(params: SimulationParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        let utility = UtilityModel::from_params(&params)?;
        let income = IncomeProjector::new(&params);

        Ok(Self {
            retirement_month: params.retirement_month(),
            death_month: params.death_month(),
            params,
            utility,
            income,
        })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn utility(&self) -> &UtilityModel {
        &self.utility
    }

    pub fn retirement_month(&self) -> u32 {
        self.retirement_month
    }

    pub fn death_month(&self) -> u32 {
        self.death_month
    }

    /// Fill in wage income and the period return on every record.
    /// `returns` must hold exactly one value per record.
    pub fn enrich(&self, portfolio: &mut Portfolio, returns: &[f64]) -> Result<(), SimulationError> {
        if returns.len() != portfolio.len() {
            return Err(SimulationError::ReturnLengthMismatch {
                portfolio: portfolio.id.clone(),
                months: portfolio.len(),
                returns: returns.len(),
            });
        }
        for (record, &ret) in portfolio.records.iter_mut().zip(returns) {
            record.ret = ret;
            record.income = self.income.income(record.month);
        }
        Ok(())
    }

    /// Run one portfolio through its whole horizon, writing consumption,
    /// savings, utility and regime onto each record.
    ///
    /// Returns the cumulative utility fixed at the death month.
    pub fn run_portfolio(&self, portfolio: &mut Portfolio) -> Result<f64, SimulationError> {
        if portfolio.len() <= self.death_month as usize {
            return Err(SimulationError::HorizonTooShort {
                portfolio: portfolio.id.clone(),
                months: portfolio.len(),
                death_month: self.death_month,
            });
        }

        let mut state = SimulationState::new();
        let mut final_utility = RUIN_UTILITY;

        for record in portfolio.records.iter_mut() {
            let (next, outcome) = self.step(state, record.month, record.ret, record.income);

            if outcome.regime == Regime::Ruined && !state.ruined {
                warn!(
                    "portfolio '{}' ruined at month {}: savings {:.2} cannot cover consumption {:.2}",
                    portfolio.id, record.month, state.previous_savings, outcome.consumption
                );
            }
            // Post-mortem months carry the death-month utility forward
            if outcome.regime.is_terminal() {
                final_utility = outcome.utility;
            }

            record.consumption = outcome.consumption;
            record.savings = outcome.savings;
            record.utility = outcome.utility;
            record.regime = outcome.regime;
            state = next;
        }

        debug!("portfolio '{}' final utility {:e}", portfolio.id, final_utility);
        Ok(final_utility)
    }

    /// Run every portfolio in order and collect their final utilities
    pub fn run_all(&self, portfolios: &mut [Portfolio]) -> Result<FinalUtilityMap, SimulationError> {
        let mut final_utilities = FinalUtilityMap::new();
        for portfolio in portfolios.iter_mut() {
            let utility = self.run_portfolio(portfolio)?;
            final_utilities.insert(portfolio.id.clone(), utility);
        }
        Ok(final_utilities)
    }

    /// Advance one month. Pure: the same state and inputs always give the same result.
    pub fn step(
        &self,
        state: SimulationState,
        month: u32,
        ret: f64,
        income: f64,
    ) -> (SimulationState, StepOutcome) {
        let prev = state.previous_savings;

        let (outcome, baseline) = match Phase::classify(month, self.retirement_month, self.death_month) {
            Phase::Accumulation => (
                StepOutcome {
                    regime: Regime::Accumulating,
                    consumption: 0.0,
                    savings: self.params.save_rate * income + prev * (1.0 + ret),
                    utility: 0.0,
                },
                None,
            ),

            Phase::RetirementEntry => {
                let initial = prev * self.params.consumption_rate / 12.0;
                let outcome = if initial > 0.0 {
                    StepOutcome {
                        regime: Regime::EnteringRetirement,
                        consumption: initial,
                        savings: (prev - initial) * (1.0 + ret),
                        utility: self.utility.consumption(initial),
                    }
                } else {
                    // Nothing saved: no consumption can be scored
                    self.ruin(prev, initial, ret)
                };
                (outcome, Some(initial))
            }

            Phase::Decumulation => {
                let consumption = self.scheduled_consumption(&state, month);
                let outcome = if state.ruined || !(consumption > 0.0) || prev <= consumption {
                    self.ruin(prev, consumption, ret)
                } else {
                    StepOutcome {
                        regime: Regime::Decumulating,
                        consumption,
                        savings: (prev - consumption) * (1.0 + ret),
                        utility: self.utility.consumption(consumption) + state.previous_utility,
                    }
                };
                (outcome, None)
            }

            Phase::Death => {
                let outcome = if state.ruined {
                    StepOutcome {
                        regime: Regime::Deceased,
                        consumption: 0.0,
                        savings: prev,
                        utility: RUIN_UTILITY,
                    }
                } else {
                    let consumption = self.scheduled_consumption(&state, month);
                    StepOutcome {
                        regime: Regime::Deceased,
                        consumption,
                        savings: prev,
                        utility: self.utility.consumption(consumption)
                            + self.utility.inheritance(prev)
                            + state.previous_utility,
                    }
                };
                (outcome, None)
            }

            Phase::PostMortem => (
                StepOutcome {
                    regime: Regime::PostMortem,
                    consumption: 0.0,
                    savings: prev,
                    utility: state.previous_utility,
                },
                None,
            ),
        };

        (state.advance(&outcome, baseline), outcome)
    }

    /// Retirement consumption for a month, indexed to inflation from retirement entry
    fn scheduled_consumption(&self, state: &SimulationState, month: u32) -> f64 {
        let initial = state.initial_consumption.unwrap_or(0.0);
        let months_retired = month.saturating_sub(self.retirement_month) as i32;
        initial * (1.0 + self.params.monthly_inflation_rate).powi(months_retired)
    }

    /// Consume whatever is left and score the month with the sentinel
    fn ruin(&self, prev: f64, consumption: f64, ret: f64) -> StepOutcome {
        let clipped = consumption.min(prev).max(0.0);
        StepOutcome {
            regime: Regime::Ruined,
            consumption: clipped,
            savings: ((prev - clipped) * (1.0 + ret)).max(0.0),
            utility: RUIN_UTILITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::income;
    use crate::timeline::Timeline;
    use crate::utility::{utility_consumption, utility_inheritance};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Saving from age 1, retiring at 3, dying at 5, on a six-year horizon
    fn short_params() -> SimulationParameters {
        SimulationParameters {
            annual_income: 60_000.0,
            income_growth_rate: 0.03,
            start_saving_age: 1,
            retirement_age: 3,
            death_age: 5,
            household_size: 1,
            save_rate: 0.10,
            consumption_rate: 0.04,
            risk_aversion: 3.84,
            inheritance_intensity: 0.0,
            inheritance_luxury: 490_000.0,
            monthly_inflation_rate: 0.02 / 12.0,
        }
    }

    fn portfolio(simulator: &LifecycleSimulator, rate: f64) -> Portfolio {
        let timeline = Timeline::new(2000, 2005).unwrap();
        let mut portfolio = timeline.portfolios(&["P"]).unwrap().remove(0);
        let returns = vec![rate; portfolio.len()];
        simulator.enrich(&mut portfolio, &returns).unwrap();
        portfolio
    }

    #[test]
    fn test_accumulation_matches_cumulative_savings_at_zero_return() {
        let params = short_params();
        let simulator = LifecycleSimulator::new(params.clone()).unwrap();
        let mut p = portfolio(&simulator, 0.0);
        simulator.run_portfolio(&mut p).unwrap();

        let mut expected = 0.0;
        for month in 0..params.retirement_month() {
            expected += params.save_rate * income(month, &params);
            assert_relative_eq!(p.records[month as usize].savings, expected, max_relative = 1e-12);
            assert_eq!(p.records[month as usize].utility, 0.0);
        }
        // Nothing saved before the start-saving month
        assert_eq!(p.records[11].savings, 0.0);
    }

    #[test]
    fn test_retirement_entry_sets_consumption_baseline() {
        let params = short_params();
        let simulator = LifecycleSimulator::new(params.clone()).unwrap();
        let mut p = portfolio(&simulator, 0.005);
        simulator.run_portfolio(&mut p).unwrap();

        let before = p.records[35].savings;
        let entry = &p.records[36];
        let initial = before * 0.04 / 12.0;

        assert_eq!(entry.regime, Regime::EnteringRetirement);
        assert_relative_eq!(entry.consumption, initial);
        assert_relative_eq!(entry.savings, (before - initial) * 1.005);
        assert_relative_eq!(entry.utility, utility_consumption(initial, 1, 3.84).unwrap());
    }

    #[test]
    fn test_decumulation_indexes_consumption_and_accrues_utility() {
        let simulator = LifecycleSimulator::new(short_params()).unwrap();
        let mut p = portfolio(&simulator, 0.005);
        simulator.run_portfolio(&mut p).unwrap();

        let initial = p.records[36].consumption;
        let month = &p.records[40];
        assert_eq!(month.regime, Regime::Decumulating);
        assert_relative_eq!(month.consumption, initial * (1.0 + 0.02 / 12.0f64).powi(4));
        assert_relative_eq!(
            month.utility,
            p.records[39].utility + utility_consumption(month.consumption, 1, 3.84).unwrap()
        );
    }

    #[test]
    fn test_death_scores_bequest_and_freezes_afterwards() {
        let params = SimulationParameters {
            inheritance_intensity: 2360.0,
            ..short_params()
        };
        let simulator = LifecycleSimulator::new(params).unwrap();
        let mut p = portfolio(&simulator, 0.005);
        let final_utility = simulator.run_portfolio(&mut p).unwrap();

        let death = &p.records[60];
        let bequest = p.records[59].savings;
        let consumption = p.records[36].consumption * (1.0 + 0.02 / 12.0f64).powi(24);
        let expected = p.records[59].utility
            + utility_consumption(consumption, 1, 3.84).unwrap()
            + utility_inheritance(2360.0, bequest, 490_000.0, 3.84).unwrap();

        assert_eq!(death.regime, Regime::Deceased);
        assert_eq!(death.savings, bequest);
        assert_relative_eq!(death.utility, expected, max_relative = 1e-12);
        assert_eq!(final_utility, death.utility);

        for record in &p.records[61..] {
            assert_eq!(record.regime, Regime::PostMortem);
            assert_eq!(record.savings, bequest);
            assert_eq!(record.utility, final_utility);
        }
    }

    #[test]
    fn test_ruin_records_sentinel_and_zero_savings() {
        // Half the savings consumed at entry, then inflation pushes the
        // target above what is left
        let params = SimulationParameters {
            consumption_rate: 6.0,
            monthly_inflation_rate: 0.01,
            ..short_params()
        };
        let simulator = LifecycleSimulator::new(params).unwrap();
        let mut p = portfolio(&simulator, 0.0);
        let final_utility = simulator.run_portfolio(&mut p).unwrap();

        let entry = &p.records[36];
        assert_relative_eq!(entry.savings, entry.consumption, max_relative = 1e-12);

        let ruined = &p.records[37];
        assert_eq!(ruined.regime, Regime::Ruined);
        assert_abs_diff_eq!(ruined.savings, 0.0);
        assert_eq!(ruined.utility, RUIN_UTILITY);
        assert_relative_eq!(ruined.consumption, entry.savings);

        assert_eq!(p.ruined_at(), Some(37));
        assert!(p.records[38..60].iter().all(|r| r.regime == Regime::Ruined));
        assert_eq!(final_utility, RUIN_UTILITY);
    }

    #[test]
    fn test_ruin_is_absorbing() {
        let simulator = LifecycleSimulator::new(short_params()).unwrap();
        let state = SimulationState {
            previous_savings: 1e9,
            previous_utility: RUIN_UTILITY,
            initial_consumption: Some(100.0),
            ruined: true,
        };

        let (next, outcome) = simulator.step(state, 40, 0.5, 0.0);
        assert_eq!(outcome.regime, Regime::Ruined);
        assert_eq!(outcome.utility, RUIN_UTILITY);
        assert!(next.ruined);

        let (_, death) = simulator.step(next, 60, 0.0, 0.0);
        assert_eq!(death.regime, Regime::Deceased);
        assert_eq!(death.utility, RUIN_UTILITY);
    }

    #[test]
    fn test_nothing_saved_at_retirement_is_ruin() {
        let simulator = LifecycleSimulator::new(short_params()).unwrap();
        let (next, outcome) = simulator.step(SimulationState::new(), 36, 0.01, 0.0);
        assert_eq!(outcome.regime, Regime::Ruined);
        assert_eq!(outcome.utility, RUIN_UTILITY);
        assert!(next.ruined);
    }

    #[test]
    fn test_horizon_must_reach_death() {
        let params = SimulationParameters {
            death_age: 10,
            ..short_params()
        };
        let simulator = LifecycleSimulator::new(params).unwrap();
        let mut p = portfolio(&simulator, 0.0);
        assert_eq!(
            simulator.run_portfolio(&mut p),
            Err(SimulationError::HorizonTooShort {
                portfolio: "P".into(),
                months: 72,
                death_month: 120,
            })
        );
    }

    #[test]
    fn test_enrich_rejects_short_return_series() {
        let simulator = LifecycleSimulator::new(short_params()).unwrap();
        let mut p = Timeline::new(2000, 2005).unwrap().portfolios(&["P"]).unwrap().remove(0);

        assert_eq!(
            simulator.enrich(&mut p, &[0.01; 70]),
            Err(SimulationError::ReturnLengthMismatch {
                portfolio: "P".into(),
                months: 72,
                returns: 70,
            })
        );
        // Nothing written when lengths disagree
        assert!(p.records.iter().all(|r| r.ret == 0.0 && r.income == 0.0));
    }

    #[test]
    fn test_degenerate_gamma_rejected_before_simulation() {
        let params = SimulationParameters {
            risk_aversion: 1.0,
            ..short_params()
        };
        assert_eq!(LifecycleSimulator::new(params).unwrap_err(), ConfigError::RiskAversionIsOne);
    }
}
