// Arbitration weights
pub const CAR_WEIGHT: u64 = 4;
pub const PEDESTRIAN_WEIGHT: u64 = 1;

// Timing, all expressed in time units
pub const TIME_UNIT_MS: u64 = 1000;
pub const CONTROL_PERIOD_UNITS: u64 = 1;
pub const GREEN_DWELL_UNITS: u64 = 5;
pub const RUN_UNITS: u64 = 20;

// Random arrival defaults
pub const ARRIVAL_PERIOD_UNITS: u64 = 1;
pub const CAR_ARRIVAL_PROBABILITY: f64 = 0.5;
pub const PEDESTRIAN_ARRIVAL_PROBABILITY: f64 = 0.3;
pub const ARRIVAL_SEED: u64 = 1;
