//! Lifecycle Optimizer CLI
//!
//! Runs every candidate portfolio through the lifecycle simulation, prints the
//! optimal choice and writes the monthly trajectories for plotting.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lifecycle_optimizer::{
    params::load_parameters,
    returns::load_return_feed,
    InheritanceLevel, ReturnFeed, RiskAversionLevel, ScenarioRunner, SimulationParameters,
    SimulationResult, Timeline,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RiskArg {
    Low,
    Medium,
    High,
}

impl From<RiskArg> for RiskAversionLevel {
    fn from(arg: RiskArg) -> Self {
        match arg {
            RiskArg::Low => RiskAversionLevel::Low,
            RiskArg::Medium => RiskAversionLevel::Medium,
            RiskArg::High => RiskAversionLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InheritanceArg {
    None,
    Low,
    Medium,
    High,
}

impl From<InheritanceArg> for InheritanceLevel {
    fn from(arg: InheritanceArg) -> Self {
        match arg {
            InheritanceArg::None => InheritanceLevel::None,
            InheritanceArg::Low => InheritanceLevel::Low,
            InheritanceArg::Medium => InheritanceLevel::Medium,
            InheritanceArg::High => InheritanceLevel::High,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lifecycle_optimizer", version, about = "Find the retirement portfolio with the highest lifetime utility")]
struct Args {
    /// JSON file with simulation parameters (defaults used for omitted fields)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Risk aversion preset, overrides the parameter file
    #[arg(long, value_enum)]
    risk_aversion: Option<RiskArg>,

    /// Inheritance preset, overrides the parameter file
    #[arg(long, value_enum)]
    inheritance: Option<InheritanceArg>,

    /// CSV return feed with columns portfolio,month,ret
    #[arg(long, conflicts_with = "flat_return")]
    returns: Option<PathBuf>,

    /// Constant monthly return applied to every generated portfolio
    #[arg(long, default_value_t = 0.005)]
    flat_return: f64,

    /// Portfolio ids used with --flat-return
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "First,Second,Third,Fourth,Fifth",
        conflicts_with = "returns"
    )]
    portfolios: Vec<String>,

    #[arg(long, default_value_t = 1950)]
    start_year: i32,

    #[arg(long, default_value_t = 2050)]
    end_year: i32,

    /// Where to write the monthly records (start-saving month through death)
    #[arg(long, default_value = "lifecycle_output.csv")]
    output: PathBuf,

    /// Write every month of the timeline instead of the lifetime window
    #[arg(long)]
    full_horizon: bool,

    /// Print the full result as JSON instead of writing CSV
    #[arg(long)]
    json: bool,
}

/// One output line per portfolio per month
#[derive(Serialize)]
struct OutputRow<'a> {
    portfolio: &'a str,
    date: String,
    month: u32,
    ret: f64,
    income: f64,
    consumption: f64,
    savings: f64,
    utility: f64,
    regime: &'static str,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = match &args.params {
        Some(path) => load_parameters(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => SimulationParameters::default(),
    };
    if let Some(level) = args.risk_aversion {
        params = params.with_risk_aversion(level.into());
    }
    if let Some(level) = args.inheritance {
        params = params.with_inheritance(level.into());
    }

    let timeline = Timeline::new(args.start_year, args.end_year)?;
    let feed = match &args.returns {
        Some(path) => load_return_feed(path)
            .with_context(|| format!("loading returns from {}", path.display()))?,
        None => ReturnFeed::flat(&args.portfolios, timeline.len(), args.flat_return),
    };

    let runner = ScenarioRunner::new(params).context("invalid simulation parameters")?;
    let result = runner.run(&timeline, &feed).context("simulation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_summary(&result);
    write_records(&args.output, &result, args.full_horizon)
        .with_context(|| format!("writing records to {}", args.output.display()))?;
    println!("\nFull results written to: {}", args.output.display());

    Ok(())
}

fn print_summary(result: &SimulationResult) {
    println!("Lifecycle Optimizer v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");

    println!("{:<12} {:>22} {:>16} {:>16}", "Portfolio", "Final Utility", "At Retirement", "Bequest");
    println!("{}", "-".repeat(70));
    for (id, utility) in result.final_utilities.iter() {
        let (retirement, bequest) = result
            .summary(id)
            .map(|s| (s.savings_at_retirement, s.bequest))
            .unwrap_or_default();
        println!("{:<12} {:>22.6e} {:>16.2} {:>16.2}", id, utility, retirement, bequest);
    }

    match result.optimal_summary() {
        Some(summary) => {
            println!("\n{} is the optimal portfolio", summary.portfolio_id);
            println!("  Savings at Retirement Start: ${:.2}", summary.savings_at_retirement);
            println!("  Savings at Retirement End (Inheritance): ${:.2}", summary.bequest);
            println!("  Initial Monthly Consumption: ${:.2}", summary.initial_monthly_consumption);
            if let Some(month) = summary.ruined_at {
                println!("  Ruined at month {}", month);
            }
        }
        None => println!("\nNo portfolio could be scored"),
    }
}

fn write_records(path: &Path, result: &SimulationResult, full_horizon: bool) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for portfolio in &result.portfolios {
        let records = if full_horizon {
            &portfolio.records[..]
        } else {
            portfolio.lifetime_records(result.start_saving_month, result.death_month)
        };
        for record in records {
            writer.serialize(OutputRow {
                portfolio: &portfolio.id,
                date: record.date.format("%Y-%m-%d").to_string(),
                month: record.month,
                ret: record.ret,
                income: record.income,
                consumption: record.consumption,
                savings: record.savings,
                utility: record.utility,
                regime: record.regime.as_str(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
