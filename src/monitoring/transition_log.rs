use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::control_system::signal::{LightState, SignalId};
use crate::error::MonitoringError;

/// Why a signal changed its light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionCause {
    /// The controller won arbitration.
    Arbitration,
    /// The listener saw a RED peer while itself RED.
    PeerRed,
    /// The green dwell ran out.
    DwellExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub elapsed_ms: u64,
    pub signal_id: SignalId,
    pub from: LightState,
    pub to: LightState,
    pub cause: TransitionCause,
}

/// Append-only record of every light transition in a network, timed on the
/// tokio clock relative to when the log was created.
#[derive(Debug)]
pub struct TransitionLog {
    origin: Instant,
    records: Mutex<Vec<TransitionRecord>>,
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn record(
        &self,
        signal_id: SignalId,
        from: LightState,
        to: LightState,
        cause: TransitionCause,
    ) {
        let record = TransitionRecord {
            elapsed_ms: u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX),
            signal_id,
            from,
            to,
            cause,
        };
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn for_signal(&self, signal_id: SignalId) -> Vec<TransitionRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.signal_id == signal_id)
            .collect()
    }

    /// Number of green phases started per signal.
    pub fn summary(&self) -> BTreeMap<SignalId, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records() {
            if record.to == LightState::Green {
                *counts.entry(record.signal_id).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Writes every record to `path` as CSV with a header row.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), MonitoringError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        for record in self.records() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Reads records previously written by [`TransitionLog::write_csv`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<TransitionRecord>, MonitoringError> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: TransitionRecord = result?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_green_phases() {
        let log = TransitionLog::new();
        log.record(SignalId(1), LightState::Red, LightState::Green, TransitionCause::Arbitration);
        log.record(SignalId(1), LightState::Green, LightState::Red, TransitionCause::DwellExpired);
        log.record(SignalId(2), LightState::Red, LightState::Green, TransitionCause::PeerRed);
        log.record(SignalId(1), LightState::Red, LightState::Green, TransitionCause::Arbitration);

        let summary = log.summary();
        assert_eq!(summary.get(&SignalId(1)), Some(&2));
        assert_eq!(summary.get(&SignalId(2)), Some(&1));
        assert_eq!(log.for_signal(SignalId(1)).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_are_timed_from_creation() {
        let log = TransitionLog::new();
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        log.record(SignalId(3), LightState::Red, LightState::Green, TransitionCause::Arbitration);
        assert_eq!(log.records()[0].elapsed_ms, 1500);
    }

    #[test]
    fn test_csv_export_can_be_read_back() {
        let log = TransitionLog::new();
        log.record(SignalId(1), LightState::Red, LightState::Green, TransitionCause::PeerRed);
        log.record(SignalId(1), LightState::Green, LightState::Red, TransitionCause::DwellExpired);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transitions.csv");
        log.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("elapsed_ms,signal_id,from,to,cause"));
        assert_eq!(read_csv(&path).unwrap(), log.records());
    }

    #[test]
    fn test_read_missing_csv_fails() {
        assert!(read_csv("/definitely/not/here.csv").is_err());
    }
}
