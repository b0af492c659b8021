use std::sync::Arc;

use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::config::RandomArrivals;
use crate::control_system::signal::Signal;
use crate::network::signal_network::Network;

/// A car heading for one signal.
#[derive(Debug, Clone)]
pub struct Car {
    pub id: u64,
    signal: Arc<Signal>,
}

impl Car {
    pub fn new(id: u64, signal: Arc<Signal>) -> Self {
        Self { id, signal }
    }

    pub fn approach_light(&self) {
        info!("Car {} is approaching Signal {}", self.id, self.signal.id());
        self.signal.add_car();
    }
}

/// A pedestrian waiting at one signal.
#[derive(Debug, Clone)]
pub struct Pedestrian {
    pub id: u64,
    signal: Arc<Signal>,
}

impl Pedestrian {
    pub fn new(id: u64, signal: Arc<Signal>) -> Self {
        Self { id, signal }
    }

    pub fn approach_light(&self) {
        info!("Pedestrian {} is approaching Signal {}", self.id, self.signal.id());
        self.signal.add_pedestrian();
    }
}

// `random_bool` panics outside [0, 1]; anything unusable means "never".
fn probability(p: f64) -> f64 {
    if (0.0..=1.0).contains(&p) {
        p
    } else {
        0.0
    }
}

/// Spawns a producer that, once per period, may send a car and may send a
/// pedestrian to uniformly chosen signals.
pub fn spawn_random_arrivals(network: Arc<Network>, arrivals: RandomArrivals) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = SmallRng::seed_from_u64(arrivals.seed);
        let period = network.config().units(arrivals.period_units.max(1));
        let car_p = probability(arrivals.car_probability);
        let pedestrian_p = probability(arrivals.pedestrian_probability);
        let mut next_car_id = 1;
        let mut next_pedestrian_id = 1;

        loop {
            let signals = network.signals();
            if signals.is_empty() {
                return;
            }
            if rng.random_bool(car_p) {
                let target = &signals[rng.random_range(0..signals.len())];
                Car::new(next_car_id, Arc::clone(target)).approach_light();
                next_car_id += 1;
            }
            if rng.random_bool(pedestrian_p) {
                let target = &signals[rng.random_range(0..signals.len())];
                Pedestrian::new(next_pedestrian_id, Arc::clone(target)).approach_light();
                next_pedestrian_id += 1;
            }
            sleep(period).await;
        }
    })
}
