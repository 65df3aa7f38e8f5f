//! Entity source: registration arrivals loaded from a CSV file
//!
//! The file needs an `arrival_time` column formatted `DD-MM-YYYY H.MM`
//! (for example `14-02-2024 9.05`). Other columns are ignored. Rows whose
//! arrival time does not parse are dropped.
//!
//! Student ids are assigned in file order after dropping bad rows, as
//! `s220` followed by `10000 + i` zero-padded to five digits. Service times
//! are drawn from the configured distribution in the same order, so a file
//! plus a seed always yields the same entity set.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use regsim_core::dists::ServiceTimeModel;
use regsim_core::{Entity, SimError, SimTime};
use thiserror::Error;
use tracing::{debug, info};

pub const ARRIVAL_COLUMN: &str = "arrival_time";
pub const ARRIVAL_FORMAT: &str = "%d-%m-%Y %H.%M";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("No row with a parseable arrival time")]
    Empty,

    #[error(transparent)]
    Sim(#[from] SimError),
}

/// How entities are built from the raw rows.
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    /// Keep only the first `max_entities` parseable rows.
    pub max_entities: usize,
    pub service: ServiceTimeModel,
    pub seed: u64,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            max_entities: 198,
            service: ServiceTimeModel::default(),
            seed: 42,
        }
    }
}

pub fn student_id(index: usize) -> String {
    format!("s220{:05}", 10000 + index)
}

/// Parse one arrival timestamp, `None` when it does not match [`ARRIVAL_FORMAT`].
pub fn parse_arrival_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), ARRIVAL_FORMAT).ok()
}

/// Load entities from a CSV file.
pub fn load_entities(path: impl AsRef<Path>, options: &DatasetOptions) -> Result<Vec<Entity>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Loading dataset");

    parse_entities(file, options)
}

/// Build entities from CSV text.
///
/// Arrival offsets are measured from the earliest kept arrival and the
/// result is sorted by offset; rows with equal offsets keep file order.
pub fn parse_entities(reader: impl Read, options: &DatasetOptions) -> Result<Vec<Entity>, DatasetError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let column = reader
        .headers()?
        .iter()
        .position(|name| name.trim() == ARRIVAL_COLUMN)
        .ok_or_else(|| DatasetError::MissingColumn(ARRIVAL_COLUMN.to_string()))?;

    let mut arrivals = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        match record.get(column).and_then(parse_arrival_time) {
            Some(arrival) => arrivals.push(arrival),
            None => {
                dropped += 1;
                debug!(
                    line = record.position().map(|p| p.line()),
                    "Dropping row with unparseable arrival time"
                );
            }
        }
    }

    arrivals.truncate(options.max_entities);
    let base = *arrivals.iter().min().ok_or(DatasetError::Empty)?;

    let mut service = options.service.build(options.seed)?;
    let mut entities = arrivals
        .iter()
        .enumerate()
        .map(|(i, arrival)| {
            // minute resolution, never negative after subtracting the minimum
            let offset_secs = (*arrival - base).num_seconds().max(0) as u64;
            let service_time = SimTime::from_duration(service.sample());
            Entity::from_times(student_id(i), SimTime::from_secs(offset_secs), service_time)
        })
        .collect::<Result<Vec<_>, SimError>>()?;
    entities.sort_by_key(Entity::arrival);

    info!(entities = entities.len(), dropped, "Dataset loaded");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id() {
        assert_eq!(student_id(0), "s22010000");
        assert_eq!(student_id(197), "s22010197");
    }

    #[test]
    fn test_parse_arrival_time() {
        let t = parse_arrival_time("14-02-2024 9.05").unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M").to_string(), "2024-02-14 09:05");
        assert!(parse_arrival_time(" 01-03-2024 14.30 ").is_some());
        assert!(parse_arrival_time("2024-02-14 09:05").is_none());
        assert!(parse_arrival_time("").is_none());
    }
}
