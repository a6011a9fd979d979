//! Load a return feed from CSV
//!
//! Expected header: `portfolio,month,ret` (one row per portfolio per month).

use super::{ReturnEntry, ReturnFeed};
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Load a return feed from a CSV file
pub fn load_return_feed<P: AsRef<Path>>(path: P) -> Result<ReturnFeed> {
    let reader = Reader::from_path(path)?;
    read_entries(reader)
}

/// Load a return feed from any reader (e.g., string buffer, network stream)
pub fn load_return_feed_from_reader<R: std::io::Read>(reader: R) -> Result<ReturnFeed> {
    read_entries(Reader::from_reader(reader))
}

fn read_entries<R: std::io::Read>(mut reader: Reader<R>) -> Result<ReturnFeed> {
    let mut feed = ReturnFeed::default();
    for result in reader.deserialize() {
        let entry: ReturnEntry = result?;
        feed.push(entry);
    }
    Ok(feed)
}
