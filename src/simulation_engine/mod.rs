// simulation_engine/mod.rs
pub mod arrivals;
pub mod scenario;
