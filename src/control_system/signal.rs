use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::communication::messages::SignalEvent;
use crate::shared_data::SignalSnapshot;

/// Unique identifier for a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalId(pub u32);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightState {
    Red,
    Green,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightState::Red => write!(f, "RED"),
            LightState::Green => write!(f, "GREEN"),
        }
    }
}

/// What a listener does with an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// The sender is green and holds priority, so stay red.
    Yield,
    /// Both sides are red, so this signal may take the green.
    EnterGreen,
    /// Already green; only the dwell timer ends the phase.
    Ignore,
}

/// Listener policy for an event arriving at a signal in state `own`.
pub fn react(own: LightState, event: &SignalEvent) -> Reaction {
    match (own, event.sender_state) {
        (LightState::Red, LightState::Green) => Reaction::Yield,
        (LightState::Red, LightState::Red) => Reaction::EnterGreen,
        (LightState::Green, _) => Reaction::Ignore,
    }
}

#[derive(Debug)]
struct SignalState {
    light: LightState,
    cars_waiting: u64,
    pedestrians_waiting: u64,
}

/// A traffic signal: light state, demand counters and an inbound event queue.
///
/// All mutable fields sit behind one mutex so that the signal's own loops,
/// demand producers and peers reading snapshots never race. The lock is never
/// held across an await point.
#[derive(Debug)]
pub struct Signal {
    id: SignalId,
    state: Mutex<SignalState>,
    inbox: UnboundedSender<SignalEvent>,
    mailbox: Mutex<Option<UnboundedReceiver<SignalEvent>>>,
}

impl Signal {
    /// Creates a red signal with no demand.
    pub fn new(id: SignalId) -> Self {
        let (inbox, mailbox) = mpsc::unbounded_channel();
        Self {
            id,
            state: Mutex::new(SignalState {
                light: LightState::Red,
                cars_waiting: 0,
                pedestrians_waiting: 0,
            }),
            inbox,
            mailbox: Mutex::new(Some(mailbox)),
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }

    // Counters and the light stay consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_car(&self) {
        self.lock().cars_waiting += 1;
    }

    pub fn add_pedestrian(&self) {
        self.lock().pedestrians_waiting += 1;
    }

    pub fn light_state(&self) -> LightState {
        self.lock().light
    }

    pub fn cars_waiting(&self) -> u64 {
        self.lock().cars_waiting
    }

    pub fn pedestrians_waiting(&self) -> u64 {
        self.lock().pedestrians_waiting
    }

    pub fn snapshot(&self) -> SignalSnapshot {
        let state = self.lock();
        SignalSnapshot::new(self.id, state.light, state.cars_waiting, state.pedestrians_waiting)
    }

    /// Snapshots this signal and queues the snapshot on `receiver`.
    pub fn send_event(&self, receiver: &Signal) {
        let event = SignalEvent::from_snapshot(&self.snapshot());
        receiver.deliver(event);
        info!("Signal {} sent event to Signal {}", self.id, receiver.id);
    }

    /// Enqueues an event on this signal's inbox. Events are processed in
    /// delivery order. If the listener is gone the event is dropped.
    pub fn deliver(&self, event: SignalEvent) {
        if self.inbox.send(event).is_err() {
            debug!(
                "Signal {} dropped event from Signal {}: listener closed",
                self.id, event.sender_id
            );
        }
    }

    /// Hands out the receiving end of the inbox. Only the first caller gets it.
    pub fn take_mailbox(&self) -> Option<UnboundedReceiver<SignalEvent>> {
        self.mailbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Switches RED to GREEN. Returns false without touching anything if the
    /// signal is already green, so a running dwell is never restarted.
    pub fn try_enter_green(&self) -> bool {
        let mut state = self.lock();
        if state.light == LightState::Green {
            return false;
        }
        state.light = LightState::Green;
        true
    }

    /// Returns the signal to RED, optionally clearing the demand it served.
    /// Returns false, leaving the counters alone, if it was already red.
    ///
    /// Demand is only cleared here, at the end of a green phase: a pair
    /// partner arbitrating in the same tick as this signal's win must still
    /// see the combined weight.
    pub fn enter_red(&self, clear_demand: bool) -> bool {
        let mut state = self.lock();
        if state.light == LightState::Red {
            return false;
        }
        state.light = LightState::Red;
        if clear_demand {
            state.cars_waiting = 0;
            state.pedestrians_waiting = 0;
        }
        true
    }
}
