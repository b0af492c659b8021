use crate::control_system::signal::{LightState, SignalId};
use crate::shared_data::SignalSnapshot;
use serde::{Deserialize, Serialize};

/// Message passed between signals. Carries the sender's state and demand
/// exactly as they were when the event was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub sender_id: SignalId,
    pub sender_state: LightState,
    pub cars_waiting: u64,
    pub pedestrians_waiting: u64,
}

impl SignalEvent {
    pub fn from_snapshot(snapshot: &SignalSnapshot) -> Self {
        Self {
            sender_id: snapshot.id,
            sender_state: snapshot.state,
            cars_waiting: snapshot.cars_waiting,
            pedestrians_waiting: snapshot.pedestrians_waiting,
        }
    }
}
