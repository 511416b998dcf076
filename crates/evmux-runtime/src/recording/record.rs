//! On-disk record format.

use super::RecordingError;
use evmux_event::{Event, EventCategory, EventPath, Payload};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One line of a recording log.
///
/// ```text
/// {"id":"a.1","address":"ccd.0","category":"Data","payload":{"n":1}}
/// {"id":"b.1","address":null,"category":"Control","payload":null}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: EventPath,
    pub address: Option<EventPath>,
    pub category: EventCategory,
    pub payload: Option<Payload>,
}

impl Record {
    /// Rebuilds the event this record was taken from.
    #[must_use]
    pub fn into_event(self) -> Event {
        Event {
            id: self.id,
            payload: self.payload,
            category: self.category,
            address: self.address,
        }
    }
}

impl From<&Event> for Record {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            address: event.address.clone(),
            category: event.category.clone(),
            payload: event.payload.clone(),
        }
    }
}

/// Reads every record of a finished log, in write order.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns [`RecordingError::Read`] on I/O failure and
/// [`RecordingError::Decode`] (with a 1-based line number) on a
/// malformed line.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>, RecordingError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RecordingError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| RecordingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| RecordingError::Decode {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
