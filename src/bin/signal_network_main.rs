// signal_network_main.rs
use signal_network::control_system::traffic_light_controller::start_network;
use signal_network::simulation_engine::arrivals::spawn_random_arrivals;
use signal_network::simulation_engine::scenario::demo_network;
use signal_network::{SimulationConfig, SimulationError};
use std::sync::Arc;
use tokio::time::sleep;

async fn run(config: SimulationConfig) -> Result<(), SimulationError> {
    let network = Arc::new(demo_network(config.clone())?);
    for (a, b) in network.pairing().pairs() {
        println!("Signals {} and {} are paired.", a, b);
    }
    let mut handle = start_network(Arc::clone(&network))?;
    if let Some(arrivals) = config.random_arrivals.clone() {
        handle.attach(spawn_random_arrivals(Arc::clone(&network), arrivals));
    }

    sleep(config.run_window()).await;
    handle.shutdown().await;

    println!("Green phases per signal:");
    for (id, phases) in network.transition_log().summary() {
        println!("  Signal {}: {}", id, phases);
    }
    if let Some(path) = &config.transition_csv {
        network.transition_log().write_csv(path)?;
        println!("Transitions written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load config: {}", e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    println!(
        "Starting signal network simulation for {} time units...",
        config.run_units
    );
    if let Err(e) = run(config).await {
        log::error!("Simulation error: {}", e);
        std::process::exit(1);
    }
}
