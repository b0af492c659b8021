//! Demand-weighted arbitration between coordinated traffic signals.
//!
//! Each [`Signal`] runs a listener and a controller task. Controllers compare
//! effective weights across the [`Network`] and take the green when they hold
//! the maximum; listeners react to events sent by peers.

pub mod communication;
pub mod config;
pub mod control_system;
pub mod error;
pub mod global_variables;
pub mod monitoring;
pub mod network;
pub mod shared_data;
pub mod simulation_engine;

pub use communication::messages::SignalEvent;
pub use config::{RandomArrivals, SimulationConfig};
pub use control_system::arbiter::{eligible, should_switch, WeightPolicy, WeightTable};
pub use control_system::signal::{LightState, Signal, SignalId};
pub use control_system::traffic_light_controller::{start_network, NetworkHandle};
pub use error::{ConfigError, MonitoringError, NetworkError, SimulationError};
pub use network::{Network, Pairing};
