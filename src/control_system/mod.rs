pub mod arbiter;
pub mod signal;
pub mod traffic_light_controller;
