use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::config::SimulationConfig;
use crate::control_system::arbiter::{self, WeightTable};
use crate::control_system::signal::{Signal, SignalId};
use crate::error::NetworkError;
use crate::monitoring::transition_log::TransitionLog;
use crate::network::pairing::Pairing;
use crate::shared_data::SignalSnapshot;

/// Registry of every signal plus the pairing relation between them.
///
/// Membership and pairing are fixed once the network is wrapped in an `Arc`
/// and started; after that only signal state changes.
#[derive(Debug)]
pub struct Network {
    signals: Vec<Arc<Signal>>,
    index: HashMap<SignalId, usize>,
    pairing: Pairing,
    config: SimulationConfig,
    log: TransitionLog,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Network {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            signals: Vec::new(),
            index: HashMap::new(),
            pairing: Pairing::new(),
            config,
            log: TransitionLog::new(),
        }
    }

    /// Creates and registers a red signal with no demand.
    pub fn add_signal(&mut self, id: SignalId) -> Result<Arc<Signal>, NetworkError> {
        if self.index.contains_key(&id) {
            return Err(NetworkError::DuplicateSignal(id));
        }
        let signal = Arc::new(Signal::new(id));
        self.index.insert(id, self.signals.len());
        self.signals.push(Arc::clone(&signal));
        Ok(signal)
    }

    /// Pairs two registered signals. Fails on self-pairing, unknown ids, or
    /// if either side already has a partner.
    pub fn pair(&mut self, a: SignalId, b: SignalId) -> Result<(), NetworkError> {
        self.require(a)?;
        self.require(b)?;
        self.pairing.link(a, b)?;
        info!("Signal {} paired with Signal {}", a, b);
        Ok(())
    }

    pub fn signal(&self, id: SignalId) -> Option<&Arc<Signal>> {
        self.index.get(&id).map(|&i| &self.signals[i])
    }

    pub fn require(&self, id: SignalId) -> Result<&Arc<Signal>, NetworkError> {
        self.signal(id).ok_or(NetworkError::UnknownSignal(id))
    }

    pub fn signals(&self) -> &[Arc<Signal>] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn partner_of(&self, id: SignalId) -> Option<SignalId> {
        self.pairing.partner_of(id)
    }

    pub fn pairing(&self) -> &Pairing {
        &self.pairing
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn transition_log(&self) -> &TransitionLog {
        &self.log
    }

    /// Snapshots every signal in registration order. Each signal is read under
    /// its own lock, so the whole view is only eventually consistent.
    pub fn snapshot(&self) -> Vec<SignalSnapshot> {
        self.signals.iter().map(|signal| signal.snapshot()).collect()
    }

    pub fn weight_table(&self) -> WeightTable {
        WeightTable::build(&self.snapshot(), &self.pairing, &self.config.weight_policy())
    }

    pub fn effective_weight(&self, id: SignalId) -> Option<u64> {
        self.weight_table().get(id)
    }

    pub fn should_switch(&self, id: SignalId) -> bool {
        arbiter::should_switch(id, &self.weight_table())
    }

    pub fn eligible(&self) -> Vec<SignalId> {
        arbiter::eligible(&self.weight_table())
    }

    /// Sends a snapshot of `from` to the inbox of `to`.
    pub fn send_event(&self, from: SignalId, to: SignalId) -> Result<(), NetworkError> {
        let sender = self.require(from)?;
        let receiver = self.require(to)?;
        sender.send_event(receiver);
        Ok(())
    }

    /// Sends a snapshot of `from` to every signal outside its pair. The
    /// partner switches with `from` and is never told to go green alone.
    pub fn broadcast_from(&self, from: SignalId) -> Result<(), NetworkError> {
        let sender = self.require(from)?;
        let partner = self.partner_of(from);
        for receiver in self
            .signals
            .iter()
            .filter(|s| s.id() != from && Some(s.id()) != partner)
        {
            sender.send_event(receiver);
        }
        Ok(())
    }
}
