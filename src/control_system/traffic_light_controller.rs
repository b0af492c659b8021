use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::communication::messages::SignalEvent;
use crate::control_system::arbiter;
use crate::control_system::signal::{react, LightState, Reaction, Signal, SignalId};
use crate::error::NetworkError;
use crate::monitoring::transition_log::TransitionCause;
use crate::network::signal_network::Network;

/// Holds a signal green for the configured dwell, then returns it to red.
///
/// Returns false if the signal was already green; the running dwell is left
/// untouched in that case.
pub async fn run_green_phase(network: &Network, signal: &Signal, cause: TransitionCause) -> bool {
    let config = network.config();
    if !signal.try_enter_green() {
        return false;
    }
    info!("Signal {} switching to GREEN.", signal.id());
    network
        .transition_log()
        .record(signal.id(), LightState::Red, LightState::Green, cause);

    sleep(config.green_dwell()).await;

    if signal.enter_red(config.clear_demand_on_green) {
        info!("Signal {} switching to RED.", signal.id());
        network.transition_log().record(
            signal.id(),
            LightState::Green,
            LightState::Red,
            TransitionCause::DwellExpired,
        );
        if config.announce_red_on_dwell_expiry {
            if let Err(e) = network.broadcast_from(signal.id()) {
                warn!("Signal {} could not announce RED: {}", signal.id(), e);
            }
        }
    }
    true
}

/// Controller loop: re-runs arbitration every control period and takes the
/// green whenever this signal (or its pair) holds the maximum weight.
pub async fn control_light(network: Arc<Network>, signal: Arc<Signal>) {
    let id = signal.id();
    let period = network.config().control_period();
    loop {
        let table = network.weight_table();
        if arbiter::should_switch(id, &table) && signal.light_state() == LightState::Red {
            debug!(
                "Signal {} wins arbitration with weight {:?} (max {:?})",
                id,
                table.get(id),
                table.max_weight()
            );
            run_green_phase(&network, &signal, TransitionCause::Arbitration).await;
        }
        sleep(period).await;
    }
}

/// Listener loop: applies the reaction policy to each inbound event in
/// arrival order. A green dwell started here blocks further dequeues until
/// it ends.
pub async fn listen(
    network: Arc<Network>,
    signal: Arc<Signal>,
    mut mailbox: UnboundedReceiver<SignalEvent>,
) {
    let id = signal.id();
    while let Some(event) = mailbox.recv().await {
        info!(
            "Signal {} received event from {} - State: {}",
            id, event.sender_id, event.sender_state
        );
        match react(signal.light_state(), &event) {
            Reaction::Yield => {
                info!(
                    "Signal {} stays RED because Signal {} is GREEN.",
                    id, event.sender_id
                );
            }
            Reaction::EnterGreen => {
                info!(
                    "Signal {} can turn GREEN now because Signal {} is RED.",
                    id, event.sender_id
                );
                run_green_phase(&network, &signal, TransitionCause::PeerRed).await;
            }
            Reaction::Ignore => {
                debug!("Signal {} is already GREEN, ignoring event", id);
            }
        }
    }
    debug!("Signal {} listener stopped: inbox closed", id);
}

pub fn spawn_listener(network: &Arc<Network>, id: SignalId) -> Result<JoinHandle<()>, NetworkError> {
    let signal = Arc::clone(network.require(id)?);
    let mailbox = signal
        .take_mailbox()
        .ok_or(NetworkError::ListenerAlreadyRunning(id))?;
    Ok(tokio::spawn(listen(Arc::clone(network), signal, mailbox)))
}

pub fn spawn_controller(
    network: &Arc<Network>,
    id: SignalId,
) -> Result<JoinHandle<()>, NetworkError> {
    let signal = Arc::clone(network.require(id)?);
    Ok(tokio::spawn(control_light(Arc::clone(network), signal)))
}

/// Handle to the tasks of a running network.
pub struct NetworkHandle {
    network: Arc<Network>,
    tasks: Vec<JoinHandle<()>>,
}

impl NetworkHandle {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Ties an extra task (e.g. a demand producer) to this network's lifetime.
    pub fn attach(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    /// Aborts every task and waits for them to wind down.
    pub async fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        for task in self.tasks {
            let _ = task.await;
        }
        info!("Signal network stopped");
    }
}

/// Launches a listener and a controller for every signal in the network.
pub fn start_network(network: Arc<Network>) -> Result<NetworkHandle, NetworkError> {
    let mut tasks = Vec::with_capacity(network.len() * 2);
    let spawned = network
        .signals()
        .iter()
        .try_for_each(|signal| -> Result<(), NetworkError> {
            tasks.push(spawn_listener(&network, signal.id())?);
            tasks.push(spawn_controller(&network, signal.id())?);
            Ok(())
        });
    if let Err(e) = spawned {
        for task in &tasks {
            task.abort();
        }
        return Err(e);
    }
    info!("Started signal network with {} signals", network.len());
    Ok(NetworkHandle { network, tasks })
}
