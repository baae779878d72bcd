use super::timer::TimerSender;
use anyhow::Result;
use citizen_portal::catalog::PaymentMethod;
use citizen_portal::roles::Role;
use citizen_portal::state::{
    BiometricKind, Overlay, OverlayKind, PaymentOutcome, Scheduled, Screen, ServiceRef,
    SimulationStatus, State, StateError, Tab, TrackingLookup,
};
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Whether the application keeps running after a key.
///
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
    timer_sender: TimerSender,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new(timer_sender: TimerSender) -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => {
                    if let Ok(CrosstermEvent::Key(key)) = event::read() {
                        if key.kind == KeyEventKind::Press
                            && tx_clone.send(Event::Input(key)).is_err()
                        {
                            break;
                        }
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler {
            rx,
            _tx: tx,
            timer_sender,
        }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    debug!("Processing exit terminal event '{:?}'...", key);
                    return Ok(false);
                }
                let outcome = match state.screen() {
                    Screen::Splash => Ok(on_splash(key)),
                    Screen::Login => on_login(key, state),
                    Screen::SignUp => on_sign_up(key, state),
                    Screen::Main => self.on_main(key, state),
                };
                match outcome {
                    Ok(flow) => Ok(flow == Flow::Continue),
                    Err(e) => {
                        debug!("Rejected key '{:?}': {}", key.code, e);
                        state.set_status(e.to_string());
                        Ok(true)
                    }
                }
            }
            Event::Tick => Ok(true),
        }
    }

    fn schedule(&self, scheduled: Scheduled) {
        if let Err(e) = self.timer_sender.send(scheduled) {
            error!("Failed to schedule deferred task: {}", e);
        }
    }

    fn on_main(&self, key: KeyEvent, state: &mut State) -> Result<Flow, StateError> {
        if state.is_search_mode() {
            return on_search(key, state).map(|_| Flow::Continue);
        }
        match state.overlays().top().map(|entry| entry.overlay.kind()) {
            Some(kind) => self.on_overlay(kind, key, state).map(|_| Flow::Continue),
            None => self.on_main_view(key, state),
        }
    }

    fn on_main_view(&self, key: KeyEvent, state: &mut State) -> Result<Flow, StateError> {
        state.clear_status();
        match key.code {
            KeyCode::Char('q') => return Ok(Flow::Exit),
            KeyCode::Char('/') => state.enter_search_mode()?,
            KeyCode::Char('1') => state.select_tab(Tab::Home)?,
            KeyCode::Char('2') => state.select_tab(Tab::Files)?,
            KeyCode::Char('3') => state.select_tab(Tab::Profile)?,
            KeyCode::Tab => {
                let index = Tab::ALL
                    .iter()
                    .position(|tab| *tab == state.active_tab())
                    .unwrap_or(0);
                state.select_tab(Tab::ALL[(index + 1) % Tab::ALL.len()])?;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = main_list_len(state);
                state.next_item(len);
            }
            KeyCode::Char('k') | KeyCode::Up => state.previous_item(),
            KeyCode::Enter => select_main_item(state)?,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => state.back()?,
            KeyCode::Char('n') => state.open_kind(OverlayKind::Notifications)?,
            KeyCode::Char('o') => state.open_kind(OverlayKind::LocationSearch)?,
            KeyCode::Char('t') => state.open_kind(OverlayKind::DocumentTemplates)?,
            KeyCode::Char('c') => state.open_kind(OverlayKind::LegalConsultationBox)?,
            KeyCode::Char('a') => state.open_kind(OverlayKind::AdministrativeConsultation)?,
            KeyCode::Char('s') => state.open_kind(OverlayKind::Settings)?,
            KeyCode::Char('p') => state.open(Overlay::BiometricTracking(TrackingLookup::new(
                BiometricKind::Passport,
            )))?,
            KeyCode::Char('i') => state.open(Overlay::BiometricTracking(TrackingLookup::new(
                BiometricKind::Id,
            )))?,
            KeyCode::Char('d') => self.schedule(state.request_download()?),
            KeyCode::Char('x') => state.request_logout()?,
            KeyCode::Char('L') => state.toggle_log(),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn on_overlay(
        &self,
        kind: OverlayKind,
        key: KeyEvent,
        state: &mut State,
    ) -> Result<(), StateError> {
        if key.code == KeyCode::Esc {
            state.close(kind);
            return Ok(());
        }
        match kind {
            OverlayKind::LocationSearch => match key.code {
                KeyCode::Char(c) => state.push_location_char(c)?,
                KeyCode::Backspace => state.pop_location_char()?,
                KeyCode::Down => {
                    let len = state.location_matches().len();
                    state.next_item(len);
                }
                KeyCode::Up => state.previous_item(),
                _ => {}
            },
            OverlayKind::BiometricTracking => match key.code {
                KeyCode::Char(c) => state.push_tracking_char(c)?,
                KeyCode::Backspace => state.pop_tracking_char()?,
                KeyCode::Enter => self.schedule(state.submit_tracking()?),
                _ => {}
            },
            OverlayKind::Notifications => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    let len = state.notifications().len();
                    state.next_item(len);
                }
                KeyCode::Char('k') | KeyCode::Up => state.previous_item(),
                KeyCode::Enter => {
                    if let Some(id) = state
                        .notifications()
                        .get(state.cursor())
                        .map(|n| n.id.clone())
                    {
                        state.select_notification(&id)?;
                    }
                }
                _ => {}
            },
            OverlayKind::DocumentTemplates => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    let len = state.catalog().templates().len();
                    state.next_item(len);
                }
                KeyCode::Char('k') | KeyCode::Up => state.previous_item(),
                KeyCode::Enter => {
                    let selected = state
                        .catalog()
                        .templates()
                        .get(state.cursor())
                        .map(|(_, service)| service.id.clone());
                    if let Some(id) = selected {
                        state.select_template(&id)?;
                    }
                }
                _ => {}
            },
            OverlayKind::DocumentViewer => {
                if matches!(key.code, KeyCode::Char('d') | KeyCode::Enter) {
                    self.schedule(state.request_download()?);
                }
            }
            OverlayKind::LegalConsultationBox => {
                if key.code == KeyCode::Enter {
                    state.open_consultation_payment()?;
                }
            }
            OverlayKind::LegalConsultationPayment => match key.code {
                KeyCode::Char('j') | KeyCode::Down => state.next_item(PaymentMethod::ALL.len()),
                KeyCode::Char('k') | KeyCode::Up => state.previous_item(),
                KeyCode::Enter => {
                    let paid = matches!(
                        state.overlays().get(kind).map(|entry| &entry.overlay),
                        Some(Overlay::LegalConsultationPayment(form))
                            if form.status == SimulationStatus::Done(PaymentOutcome::Succeeded)
                    );
                    if paid {
                        state.start_consultation()?;
                    } else {
                        let method = PaymentMethod::ALL
                            .get(state.cursor())
                            .copied()
                            .unwrap_or(PaymentMethod::Card);
                        state.choose_payment_method(method)?;
                        self.schedule(state.submit_payment()?);
                    }
                }
                _ => {}
            },
            OverlayKind::AdministrativeConsultation => {
                if key.code == KeyCode::Enter {
                    state.start_administrative_consultation()?;
                }
            }
            OverlayKind::Settings => match key.code {
                KeyCode::Char('l') => state.request_logout()?,
                KeyCode::Char('L') => state.toggle_log(),
                _ => {}
            },
            OverlayKind::LogoutConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => state.confirm_logout()?,
                KeyCode::Char('n') => state.close(kind),
                _ => {}
            },
            OverlayKind::ConsultationInterface => {}
        }
        Ok(())
    }
}

fn on_splash(key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Char('q') => Flow::Exit,
        _ => Flow::Continue,
    }
}

fn on_login(key: KeyEvent, state: &mut State) -> Result<Flow, StateError> {
    match key.code {
        KeyCode::Char('q') => return Ok(Flow::Exit),
        KeyCode::Enter => state.login()?,
        KeyCode::Char('s') => state.request_sign_up()?,
        _ => {}
    }
    Ok(Flow::Continue)
}

fn on_sign_up(key: KeyEvent, state: &mut State) -> Result<Flow, StateError> {
    match key.code {
        KeyCode::Char('q') => return Ok(Flow::Exit),
        KeyCode::Char('j') | KeyCode::Down => state.next_item(Role::ALL.len()),
        KeyCode::Char('k') | KeyCode::Up => state.previous_item(),
        KeyCode::Enter => {
            let role = Role::ALL.get(state.cursor()).map(|role| role.id()).unwrap_or("");
            state.complete_sign_up(role)?;
        }
        KeyCode::Esc => state.cancel_sign_up()?,
        _ => {}
    }
    Ok(Flow::Continue)
}

fn on_search(key: KeyEvent, state: &mut State) -> Result<(), StateError> {
    match key.code {
        KeyCode::Esc => state.exit_search_mode(),
        KeyCode::Enter => {
            let index = state.cursor();
            state.select_result(index)?;
        }
        KeyCode::Down => {
            let len = state.search_results().len();
            state.next_item(len);
        }
        KeyCode::Up => state.previous_item(),
        KeyCode::Backspace => state.pop_search_char(),
        KeyCode::Char(c) => state.push_search_char(c),
        _ => {}
    }
    Ok(())
}

/// Returns the length of the list the cursor moves through on the main view.
///
fn main_list_len(state: &State) -> usize {
    match state.active_tab() {
        Tab::Home => match (state.active_sector(), state.active_service()) {
            (None, _) => state.catalog().sectors.len(),
            (Some(sector), None) => sector.services.len(),
            (Some(_), Some(_)) => 0,
        },
        Tab::Files => state.downloads().len(),
        Tab::Profile => 0,
    }
}

fn select_main_item(state: &mut State) -> Result<(), StateError> {
    let cursor = state.cursor();
    match state.active_tab() {
        Tab::Home => match (state.active_sector(), state.active_service()) {
            (None, _) => {
                if let Some(id) = state.catalog().sectors.get(cursor).map(|s| s.id.clone()) {
                    state.open_sector(&id)?;
                }
            }
            (Some(sector), None) => {
                if let Some(id) = sector.services.get(cursor).map(|s| s.id.clone()) {
                    state.open_service(&id)?;
                }
            }
            (Some(_), Some(service)) => {
                if let Some(kind) = BiometricKind::from_service_id(&service.id) {
                    state.open(Overlay::BiometricTracking(TrackingLookup::new(kind)))?;
                }
            }
        },
        Tab::Files => {
            if let Some(document) = state.downloads().get(cursor) {
                let service = ServiceRef {
                    service_id: document.service_id.clone(),
                    sector_id: document.sector_id.clone(),
                };
                state.open(Overlay::DocumentViewer(service))?;
            }
        }
        Tab::Profile => {}
    }
    Ok(())
}
