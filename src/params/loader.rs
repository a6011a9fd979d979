//! Load simulation parameters from JSON
//!
//! Omitted fields fall back to the same defaults as `SimulationParameters::default()`.

use super::SimulationParameters;
use crate::error::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load parameters from a JSON file
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<SimulationParameters> {
    let file = File::open(path)?;
    load_parameters_from_reader(BufReader::new(file))
}

/// Load parameters from any reader (e.g., string buffer, request body)
pub fn load_parameters_from_reader<R: std::io::Read>(reader: R) -> Result<SimulationParameters> {
    let params: SimulationParameters = serde_json::from_reader(reader)?;
    params.validate()?;
    Ok(params)
}
