// src/shared_data.rs

use crate::control_system::signal::{LightState, SignalId};

/// Point-in-time view of a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSnapshot {
    pub id: SignalId,
    pub state: LightState,
    pub cars_waiting: u64,
    pub pedestrians_waiting: u64,
}

impl SignalSnapshot {
    pub fn new(id: SignalId, state: LightState, cars_waiting: u64, pedestrians_waiting: u64) -> Self {
        Self {
            id,
            state,
            cars_waiting,
            pedestrians_waiting,
        }
    }
}
