use std::sync::Arc;

use crate::config::SimulationConfig;
use crate::control_system::signal::SignalId;
use crate::error::NetworkError;
use crate::network::signal_network::Network;
use crate::simulation_engine::arrivals::{Car, Pedestrian};

/// Three signals, 1 and 2 paired, with a car and a pedestrian each at
/// signals 1 and 3.
pub fn demo_network(config: SimulationConfig) -> Result<Network, NetworkError> {
    let mut network = Network::new(config);
    let signal_1 = network.add_signal(SignalId(1))?;
    network.add_signal(SignalId(2))?;
    let signal_3 = network.add_signal(SignalId(3))?;
    network.pair(SignalId(1), SignalId(2))?;

    Car::new(1, Arc::clone(&signal_1)).approach_light();
    Car::new(2, Arc::clone(&signal_3)).approach_light();
    Pedestrian::new(1, signal_1).approach_light();
    Pedestrian::new(2, signal_3).approach_light();

    Ok(network)
}
