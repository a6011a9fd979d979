//! Scenario runner: wires timeline, return feed, simulator and selector
//!
//! Parameters are validated once when the runner is built; each `run` then
//! validates the return feed, simulates every portfolio and picks the optimum.

use log::info;
use rayon::prelude::*;

use crate::error::{ConfigError, Result};
use crate::params::SimulationParameters;
use crate::returns::{ReturnFeed, ValidatedFeed};
use crate::selector::FinalUtilityMap;
use crate::simulation::{LifecycleSimulator, Portfolio, SimulationResult};
use crate::timeline::Timeline;

/// Pre-validated runner for one set of personal parameters
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(SimulationParameters::default())?;
/// let timeline = Timeline::default();
/// let feed = ReturnFeed::flat(&["First", "Second"], timeline.len(), 0.005);
/// let result = runner.run(&timeline, &feed)?;
/// println!("optimal: {:?}", result.optimal);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    simulator: LifecycleSimulator,
}

impl ScenarioRunner {
    pub fn new(params: SimulationParameters) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            simulator: LifecycleSimulator::new(params)?,
        })
    }

    pub fn simulator(&self) -> &LifecycleSimulator {
        &self.simulator
    }

    pub fn params(&self) -> &SimulationParameters {
        self.simulator.params()
    }

    /// Simulate all portfolios in parallel.
    ///
    /// Portfolios share no state, so each one is stepped on its own thread;
    /// final utilities are merged afterwards in declaration order, which keeps
    /// results identical to `run_sequential`.
    pub fn run(&self, timeline: &Timeline, feed: &ReturnFeed) -> Result<SimulationResult> {
        let mut portfolios = self.prepare(timeline, feed)?;

        let utilities: Vec<f64> = portfolios
            .par_iter_mut()
            .map(|portfolio| self.simulator.run_portfolio(portfolio))
            .collect::<std::result::Result<_, _>>()?;

        let final_utilities: FinalUtilityMap = portfolios
            .iter()
            .map(|p| p.id.clone())
            .zip(utilities)
            .collect();

        Ok(self.finish(portfolios, final_utilities))
    }

    /// Simulate all portfolios one after another on the calling thread
    pub fn run_sequential(&self, timeline: &Timeline, feed: &ReturnFeed) -> Result<SimulationResult> {
        let mut portfolios = self.prepare(timeline, feed)?;
        let final_utilities = self.simulator.run_all(&mut portfolios)?;
        Ok(self.finish(portfolios, final_utilities))
    }

    /// Validate inputs and build income/return-enriched portfolios
    fn prepare(&self, timeline: &Timeline, feed: &ReturnFeed) -> Result<Vec<Portfolio>> {
        let validated: ValidatedFeed = feed.validate()?;
        validated.check_horizon(timeline.len())?;

        info!(
            "simulating {} portfolios over {} months ({}-{}), retirement month {}, death month {}",
            validated.portfolio_ids().len(),
            timeline.len(),
            timeline.start_year(),
            timeline.end_year(),
            self.simulator.retirement_month(),
            self.simulator.death_month(),
        );

        let mut portfolios = timeline.portfolios(&validated.portfolio_ids())?;
        for (portfolio, (_, returns)) in portfolios.iter_mut().zip(validated.iter()) {
            self.simulator.enrich(portfolio, returns)?;
        }
        Ok(portfolios)
    }

    fn finish(&self, portfolios: Vec<Portfolio>, final_utilities: FinalUtilityMap) -> SimulationResult {
        let result = SimulationResult::new(
            portfolios,
            final_utilities,
            self.simulator.params().start_saving_month(),
            self.simulator.retirement_month(),
            self.simulator.death_month(),
        );
        match &result.optimal {
            Some(id) => info!(
                "optimal portfolio '{}' with final utility {:e}",
                id,
                result.final_utilities.get(id).unwrap_or_default()
            ),
            None => info!("no portfolio reached its death month"),
        }
        result
    }
}
