use anyhow::Result;
use citizen_portal::simulation;
use citizen_portal::state::{Scheduled, State, StateError};
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type TimerSender = std::sync::mpsc::Sender<Scheduled>;
pub type TimerReceiver = std::sync::mpsc::Receiver<Scheduled>;

/// Waits out scheduled delays and resolves their tickets against the state.
///
#[derive(Clone)]
pub struct Handler {
    state: Arc<Mutex<State>>,
    payment_success_rate: f64,
}

impl Handler {
    pub fn new(state: &Arc<Mutex<State>>, payment_success_rate: f64) -> Self {
        Handler {
            state: Arc::clone(state),
            payment_success_rate,
        }
    }

    /// Sleep for the scheduled delay, draw the simulated outcome and apply it.
    /// Results whose owner went away in the meantime are dropped quietly.
    ///
    pub async fn handle(&self, scheduled: Scheduled) -> Result<()> {
        let delay = scheduled.delay.sample(&mut rand::thread_rng());
        debug!(
            "Waiting {}ms for {:?}...",
            delay.as_millis(),
            scheduled.ticket.task
        );
        tokio::time::sleep(delay).await;

        let completion = simulation::complete(
            &scheduled.ticket.task,
            &mut rand::thread_rng(),
            self.payment_success_rate,
        );
        let mut state = self.state.lock().await;
        match state.resolve(&scheduled.ticket, completion) {
            Ok(()) => Ok(()),
            Err(StateError::StaleCallback) => {
                debug!("Dropped stale result for {:?}", scheduled.ticket.task);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
