use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control_system::arbiter::WeightPolicy;
use crate::error::ConfigError;
use crate::global_variables::{
    ARRIVAL_PERIOD_UNITS, ARRIVAL_SEED, CAR_ARRIVAL_PROBABILITY, CAR_WEIGHT, CONTROL_PERIOD_UNITS,
    GREEN_DWELL_UNITS, PEDESTRIAN_ARRIVAL_PROBABILITY, PEDESTRIAN_WEIGHT, RUN_UNITS, TIME_UNIT_MS,
};

/// Settings for the random demand generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomArrivals {
    pub period_units: u64,
    pub car_probability: f64,
    pub pedestrian_probability: f64,
    pub seed: u64,
}

impl Default for RandomArrivals {
    fn default() -> Self {
        Self {
            period_units: ARRIVAL_PERIOD_UNITS,
            car_probability: CAR_ARRIVAL_PROBABILITY,
            pedestrian_probability: PEDESTRIAN_ARRIVAL_PROBABILITY,
            seed: ARRIVAL_SEED,
        }
    }
}

/// Simulation settings. Every period and duration is counted in time units
/// of `time_unit_ms` milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_unit_ms: u64,
    pub control_period_units: u64,
    pub green_dwell_units: u64,
    pub car_weight: u64,
    pub pedestrian_weight: u64,
    pub run_units: u64,
    /// Reset a signal's counters when its green dwell ends. Both halves of a
    /// pair keep their demand for the whole phase.
    pub clear_demand_on_green: bool,
    /// Send a RED event to every signal outside the pair when a green dwell
    /// expires.
    pub announce_red_on_dwell_expiry: bool,
    pub random_arrivals: Option<RandomArrivals>,
    pub transition_csv: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_unit_ms: TIME_UNIT_MS,
            control_period_units: CONTROL_PERIOD_UNITS,
            green_dwell_units: GREEN_DWELL_UNITS,
            car_weight: CAR_WEIGHT,
            pedestrian_weight: PEDESTRIAN_WEIGHT,
            run_units: RUN_UNITS,
            clear_demand_on_green: false,
            announce_red_on_dwell_expiry: false,
            random_arrivals: None,
            transition_csv: None,
        }
    }
}

impl SimulationConfig {
    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_unit_ms == 0 {
            return Err(ConfigError::Invalid("time_unit_ms must be positive".to_string()));
        }
        if self.control_period_units == 0 {
            return Err(ConfigError::Invalid(
                "control_period_units must be positive".to_string(),
            ));
        }
        if self.green_dwell_units == 0 {
            return Err(ConfigError::Invalid("green_dwell_units must be positive".to_string()));
        }
        if let Some(arrivals) = &self.random_arrivals {
            if arrivals.period_units == 0 {
                return Err(ConfigError::Invalid(
                    "random_arrivals.period_units must be positive".to_string(),
                ));
            }
            for (name, p) in [
                ("car_probability", arrivals.car_probability),
                ("pedestrian_probability", arrivals.pedestrian_probability),
            ] {
                if !(0.0..=1.0).contains(&p) {
                    return Err(ConfigError::Invalid(format!(
                        "random_arrivals.{} must be within [0, 1], got {}",
                        name, p
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn units(&self, units: u64) -> Duration {
        Duration::from_millis(self.time_unit_ms.saturating_mul(units))
    }

    pub fn control_period(&self) -> Duration {
        self.units(self.control_period_units)
    }

    pub fn green_dwell(&self) -> Duration {
        self.units(self.green_dwell_units)
    }

    pub fn run_window(&self) -> Duration {
        self.units(self.run_units)
    }

    pub fn weight_policy(&self) -> WeightPolicy {
        WeightPolicy::new(self.car_weight, self.pedestrian_weight)
    }
}
