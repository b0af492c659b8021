use std::path::PathBuf;

use thiserror::Error;

use crate::control_system::signal::SignalId;

/// Failures while wiring up or starting a signal network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Signal {0} cannot be paired with itself")]
    SelfPairing(SignalId),

    #[error("Signal {id} is already paired with signal {partner}")]
    AlreadyPaired { id: SignalId, partner: SignalId },

    #[error("Unknown signal: {0}")]
    UnknownSignal(SignalId),

    #[error("Signal {0} is already registered")]
    DuplicateSignal(SignalId),

    #[error("Listener for signal {0} is already running")]
    ListenerAlreadyRunning(SignalId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum MonitoringError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error for the simulation driver.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Monitoring(#[from] MonitoringError),
}
