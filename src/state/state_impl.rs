use crate::catalog::{Catalog, Notification, PaymentMethod, Sector, Service};
use crate::config::Timing;
use crate::roles::Role;
use crate::session::{MemorySessionStore, Session, SessionStore};
use crate::utils::text_processing::normalize;
use chrono::{DateTime, Local};
use log::*;
use std::collections::HashSet;

use super::error::StateError;
use super::navigation::{MainView, Screen, Tab};
use super::overlay::{
    ConsultationKind, Overlay, OverlayEntry, OverlayKind, OverlaySet, PaymentForm,
    PaymentOutcome, ServiceRef, SimulationStatus, TrackingLookup,
};
use super::search::{self, Route, SearchResult};
use super::timers::{Completion, Delay, Generations, Scheduled, Task, Ticket};

const MAX_LOG_ENTRIES: usize = 500;
const MAX_REQUEST_NUMBER_LEN: usize = 20;

/// A document fetched through the download flow, listed on the files tab.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DownloadedDocument {
    pub service_id: String,
    pub sector_id: String,
    pub title: String,
    pub downloaded_at: DateTime<Local>,
}

/// Houses data representative of application state.
///
/// The screen, main view and overlays only change through the command
/// methods below; each command checks the screen it is valid from and leaves
/// the state untouched when it returns an error.
pub struct State {
    catalog: Catalog,
    timing: Timing,
    store: Box<dyn SessionStore>,
    session: Session,
    generations: Generations,
    screen: Screen,
    screen_generation: u64,
    started: bool,
    splash_completed: bool,
    main_view: MainView,
    overlays: OverlaySet,
    search_mode: bool,
    search_query: String,
    search_results: Vec<SearchResult>,
    downloads: Vec<DownloadedDocument>,
    pending_downloads: Vec<ServiceRef>,
    read_notifications: HashSet<String>,
    cursor: usize,
    status_message: Option<String>,
    log_entries: Vec<String>,
    log_visible: bool,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            catalog: Catalog::default(),
            timing: Timing::default(),
            store: Box::new(MemorySessionStore::new()),
            session: Session::default(),
            generations: Generations::default(),
            screen: Screen::Splash,
            screen_generation: 0,
            started: false,
            splash_completed: false,
            main_view: MainView::default(),
            overlays: OverlaySet::default(),
            search_mode: false,
            search_query: String::new(),
            search_results: vec![],
            downloads: vec![],
            pending_downloads: vec![],
            read_notifications: HashSet::new(),
            cursor: 0,
            status_message: None,
            log_entries: vec![],
            log_visible: false,
        }
    }
}

impl State {
    pub fn new(catalog: Catalog, timing: Timing, store: Box<dyn SessionStore>) -> Self {
        State {
            catalog,
            timing,
            store,
            ..State::default()
        }
    }

    fn require_screen(&self, expected: Screen, command: &'static str) -> Result<(), StateError> {
        if self.screen == expected {
            Ok(())
        } else {
            debug!("Rejected {} from the {} screen", command, self.screen);
            Err(StateError::InvalidTransition {
                command,
                screen: self.screen,
            })
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        debug!("Switching screen from {} to {}", self.screen, screen);
        self.screen = screen;
        self.screen_generation = self.generations.next();
        self.cursor = 0;
    }

    fn reset_main(&mut self) {
        self.main_view = MainView::default();
        self.overlays.clear();
        self.search_mode = false;
        self.clear_search();
        self.status_message = None;
    }

    fn enter_main(&mut self) {
        self.reset_main();
        self.set_screen(Screen::Main);
    }

    // ---------------------------------------------------------------------
    // Screen transitions
    // ---------------------------------------------------------------------

    /// Show the splash screen and read the stored session. Returns the ticket
    /// completing the splash: the restore delay when the stored session can
    /// skip the login screen, the regular splash delay otherwise.
    ///
    pub fn start(&mut self) -> Result<Scheduled, StateError> {
        if self.started {
            return Err(StateError::InvalidTransition {
                command: "start",
                screen: self.screen,
            });
        }
        self.started = true;
        self.session = Session::read(self.store.as_ref());
        self.set_screen(Screen::Splash);

        let delay = match self.session.trusted_role() {
            Some(role) => {
                info!("Found stored {} session, skipping login...", role);
                self.timing.restore_splash()
            }
            None => self.timing.splash(),
        };
        Ok(Scheduled {
            ticket: Ticket {
                task: Task::Splash,
                generation: self.screen_generation,
            },
            delay: Delay::Fixed(delay),
        })
    }

    /// Leave the splash screen for Main when the store holds a restorable
    /// session, or Login otherwise. Only the first call succeeds.
    ///
    pub fn complete_splash(&mut self) -> Result<Screen, StateError> {
        if self.splash_completed {
            return Err(StateError::InvalidTransition {
                command: "complete_splash",
                screen: self.screen,
            });
        }
        self.require_screen(Screen::Splash, "complete_splash")?;
        self.splash_completed = true;
        self.session = Session::read(self.store.as_ref());
        if self.session.can_restore() {
            self.enter_main();
        } else {
            self.set_screen(Screen::Login);
        }
        Ok(self.screen)
    }

    /// Log in, keeping whatever role is stored.
    ///
    pub fn login(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::Login, "login")?;
        if let Err(e) = Session::write_login(self.store.as_mut()) {
            warn!("Failed to persist login: {}", e);
        }
        self.session = Session {
            is_logged_in: true,
            user_type: Session::read(self.store.as_ref()).user_type,
        };
        info!("Logged in");
        self.enter_main();
        Ok(())
    }

    pub fn request_sign_up(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::Login, "request_sign_up")?;
        self.set_screen(Screen::SignUp);
        Ok(())
    }

    /// Finish sign-up with a role from the registry.
    ///
    pub fn complete_sign_up(&mut self, role_id: &str) -> Result<(), StateError> {
        self.require_screen(Screen::SignUp, "complete_sign_up")?;
        let role =
            Role::from_id(role_id).ok_or_else(|| StateError::MissingRole(role_id.to_string()))?;
        if let Err(e) = Session::write_sign_up(self.store.as_mut(), role) {
            warn!("Failed to persist sign-up: {}", e);
        }
        self.session = Session {
            is_logged_in: true,
            user_type: Some(role),
        };
        info!("Signed up as {}", role);
        self.enter_main();
        Ok(())
    }

    pub fn cancel_sign_up(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::SignUp, "cancel_sign_up")?;
        self.set_screen(Screen::Login);
        Ok(())
    }

    /// Clear the stored session and return to Login. The main view, overlays,
    /// search and downloads are all reset.
    ///
    pub fn logout(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "logout")?;
        if let Err(e) = Session::clear(self.store.as_mut()) {
            warn!("Failed to clear stored session: {}", e);
        }
        self.session = Session::default();
        self.downloads.clear();
        self.pending_downloads.clear();
        self.read_notifications.clear();
        self.reset_main();
        info!("Logged out");
        self.set_screen(Screen::Login);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Main view navigation
    // ---------------------------------------------------------------------

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "select_tab")?;
        self.main_view.select_tab(tab);
        self.cursor = 0;
        Ok(())
    }

    pub fn open_sector(&mut self, sector_id: &str) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "open_sector")?;
        if self.catalog.sector(sector_id).is_none() {
            return Err(StateError::UnknownSectorId(sector_id.to_string()));
        }
        debug!("Opening sector {}", sector_id);
        self.main_view.open_sector(sector_id);
        self.cursor = 0;
        Ok(())
    }

    /// Open a service of the active sector.
    ///
    pub fn open_service(&mut self, service_id: &str) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "open_service")?;
        let in_sector = self
            .active_sector()
            .map(|sector| sector.services.iter().any(|s| s.id == service_id))
            .unwrap_or(false);
        if !in_sector {
            return Err(StateError::UnknownServiceId(service_id.to_string()));
        }
        self.main_view.open_service(service_id);
        self.cursor = 0;
        Ok(())
    }

    /// Pop the service detail, then the sector.
    ///
    pub fn back(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "back")?;
        if self.main_view.back() {
            self.cursor = 0;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Overlays
    // ---------------------------------------------------------------------

    /// Open an overlay with its payload. See `OverlaySet::open` for how it
    /// combines with overlays already open.
    ///
    pub fn open(&mut self, overlay: Overlay) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "open")?;
        if let Overlay::DocumentViewer(service) = &overlay {
            if self.catalog.service(&service.service_id).is_none() {
                return Err(StateError::UnknownServiceId(service.service_id.clone()));
            }
        }
        let generation = self.generations.next();
        debug!("Opening overlay {}", overlay.kind());
        self.overlays.open(overlay, generation);
        self.cursor = 0;
        Ok(())
    }

    /// Open an overlay kind that needs no payload.
    ///
    pub fn open_kind(&mut self, kind: OverlayKind) -> Result<(), StateError> {
        let overlay = Overlay::without_payload(kind)
            .ok_or_else(|| StateError::InvalidInput(format!("{} needs a payload", kind)))?;
        self.open(overlay)
    }

    /// Close an overlay. Closing one that is not open does nothing.
    ///
    pub fn close(&mut self, kind: OverlayKind) {
        if self.overlays.close(kind) {
            debug!("Closed overlay {}", kind);
            self.cursor = 0;
        }
    }

    /// Close the overlay receiving input. Returns false if none was open.
    ///
    pub fn close_top(&mut self) -> bool {
        match self.overlays.top().map(|entry| entry.overlay.kind()) {
            Some(kind) => {
                self.close(kind);
                true
            }
            None => false,
        }
    }

    pub fn request_logout(&mut self) -> Result<(), StateError> {
        self.open(Overlay::LogoutConfirm)
    }

    /// Log out after the confirmation overlay was accepted.
    ///
    pub fn confirm_logout(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "confirm_logout")?;
        if !self.overlays.is_open(OverlayKind::LogoutConfirm) {
            return Err(StateError::OverlayNotOpen(OverlayKind::LogoutConfirm));
        }
        self.logout()?;
        self.close(OverlayKind::LogoutConfirm);
        Ok(())
    }

    fn follow_route(&mut self, route: Route) -> Result<(), StateError> {
        match route {
            Route::Tracking(kind) => {
                self.open(Overlay::BiometricTracking(TrackingLookup::new(kind)))
            }
            Route::Sector(sector_id) => self.open_sector(&sector_id),
        }
    }

    /// Mark a notification read, close the notifications overlay and follow
    /// the service it points at, if any.
    ///
    pub fn select_notification(&mut self, notification_id: &str) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "select_notification")?;
        let notification = self
            .catalog
            .notification(notification_id)
            .ok_or_else(|| StateError::UnknownNotificationId(notification_id.to_string()))?;
        let route = match &notification.service_id {
            Some(service_id) => {
                let (sector, _) = self
                    .catalog
                    .service(service_id)
                    .ok_or_else(|| StateError::UnknownServiceId(service_id.clone()))?;
                Some(search::route(service_id, &sector.id))
            }
            None => None,
        };

        self.read_notifications.insert(notification_id.to_string());
        self.close(OverlayKind::Notifications);
        match route {
            Some(route) => self.follow_route(route),
            None => Ok(()),
        }
    }

    /// Open the document viewer for a template listed in the templates overlay.
    ///
    pub fn select_template(&mut self, service_id: &str) -> Result<(), StateError> {
        if !self.overlays.is_open(OverlayKind::DocumentTemplates) {
            return Err(StateError::OverlayNotOpen(OverlayKind::DocumentTemplates));
        }
        let (sector, service) = self
            .catalog
            .service(service_id)
            .ok_or_else(|| StateError::UnknownServiceId(service_id.to_string()))?;
        if !service.has_download {
            return Err(StateError::ServiceCapability {
                service_id: service_id.to_string(),
                capability: "download",
            });
        }
        let service = ServiceRef {
            service_id: service.id.clone(),
            sector_id: sector.id.clone(),
        };
        self.open(Overlay::DocumentViewer(service))
    }

    /// Append a character to the location search query.
    ///
    pub fn push_location_char(&mut self, c: char) -> Result<(), StateError> {
        match self.overlays.get_mut(OverlayKind::LocationSearch) {
            Some(OverlayEntry {
                overlay: Overlay::LocationSearch { query },
                ..
            }) => {
                query.push(c);
                self.cursor = 0;
                Ok(())
            }
            _ => Err(StateError::OverlayNotOpen(OverlayKind::LocationSearch)),
        }
    }

    pub fn pop_location_char(&mut self) -> Result<(), StateError> {
        match self.overlays.get_mut(OverlayKind::LocationSearch) {
            Some(OverlayEntry {
                overlay: Overlay::LocationSearch { query },
                ..
            }) => {
                query.pop();
                self.cursor = 0;
                Ok(())
            }
            _ => Err(StateError::OverlayNotOpen(OverlayKind::LocationSearch)),
        }
    }

    /// Returns the catalog locations matching the location search query.
    ///
    pub fn location_matches(&self) -> Vec<&str> {
        let query = match self.overlays.get(OverlayKind::LocationSearch) {
            Some(OverlayEntry {
                overlay: Overlay::LocationSearch { query },
                ..
            }) => normalize(query),
            _ => return vec![],
        };
        self.catalog
            .locations()
            .into_iter()
            .filter(|location| normalize(location).contains(&query))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Consultation and payment
    // ---------------------------------------------------------------------

    /// Open the payment step over the legal consultation box.
    ///
    pub fn open_consultation_payment(&mut self) -> Result<(), StateError> {
        if !self.overlays.is_open(OverlayKind::LegalConsultationBox) {
            return Err(StateError::OverlayNotOpen(OverlayKind::LegalConsultationBox));
        }
        self.open(Overlay::LegalConsultationPayment(PaymentForm::default()))
    }

    fn payment_entry(&mut self) -> Result<(&mut PaymentForm, &mut u64), StateError> {
        match self.overlays.get_mut(OverlayKind::LegalConsultationPayment) {
            Some(OverlayEntry {
                overlay: Overlay::LegalConsultationPayment(form),
                generation,
            }) => Ok((form, generation)),
            _ => Err(StateError::OverlayNotOpen(
                OverlayKind::LegalConsultationPayment,
            )),
        }
    }

    pub fn choose_payment_method(&mut self, method: PaymentMethod) -> Result<(), StateError> {
        let (form, _) = self.payment_entry()?;
        match form.status {
            SimulationStatus::Processing => Err(StateError::InvalidInput(
                "payment is already processing".to_string(),
            )),
            SimulationStatus::Done(PaymentOutcome::Succeeded) => Err(StateError::InvalidInput(
                "payment already completed".to_string(),
            )),
            _ => {
                form.method = Some(method);
                form.status = SimulationStatus::Idle;
                Ok(())
            }
        }
    }

    /// Submit the consultation payment with the chosen method.
    ///
    pub fn submit_payment(&mut self) -> Result<Scheduled, StateError> {
        let next = self.generations.next();
        let delay = Delay::from(self.timing.payment_delay);
        let (form, generation) = self.payment_entry()?;
        match form.status {
            SimulationStatus::Processing => {
                return Err(StateError::InvalidInput(
                    "payment is already processing".to_string(),
                ))
            }
            SimulationStatus::Done(PaymentOutcome::Succeeded) => {
                return Err(StateError::InvalidInput(
                    "payment already completed".to_string(),
                ))
            }
            _ => {}
        }
        let method = form
            .method
            .ok_or_else(|| StateError::InvalidInput("no payment method selected".to_string()))?;
        form.status = SimulationStatus::Processing;
        *generation = next;
        info!("Submitting consultation payment by {}...", method.label());
        Ok(Scheduled {
            ticket: Ticket {
                task: Task::Payment,
                generation: next,
            },
            delay,
        })
    }

    /// Open the legal consultation once its payment went through.
    ///
    pub fn start_consultation(&mut self) -> Result<(), StateError> {
        let (form, _) = self.payment_entry()?;
        if form.status != SimulationStatus::Done(PaymentOutcome::Succeeded) {
            return Err(StateError::InvalidInput(
                "payment has not succeeded".to_string(),
            ));
        }
        self.open(Overlay::ConsultationInterface(ConsultationKind::Legal))
    }

    /// Open the consultation interface from the administrative consultation
    /// overlay. Administrative consultations are free.
    ///
    pub fn start_administrative_consultation(&mut self) -> Result<(), StateError> {
        if !self.overlays.is_open(OverlayKind::AdministrativeConsultation) {
            return Err(StateError::OverlayNotOpen(
                OverlayKind::AdministrativeConsultation,
            ));
        }
        self.open(Overlay::ConsultationInterface(
            ConsultationKind::Administrative,
        ))
    }

    // ---------------------------------------------------------------------
    // Tracking
    // ---------------------------------------------------------------------

    fn tracking_entry(&mut self) -> Result<(&mut TrackingLookup, &mut u64), StateError> {
        match self.overlays.get_mut(OverlayKind::BiometricTracking) {
            Some(OverlayEntry {
                overlay: Overlay::BiometricTracking(lookup),
                generation,
            }) => Ok((lookup, generation)),
            _ => Err(StateError::OverlayNotOpen(OverlayKind::BiometricTracking)),
        }
    }

    pub fn push_tracking_char(&mut self, c: char) -> Result<(), StateError> {
        let (lookup, _) = self.tracking_entry()?;
        if lookup.status == SimulationStatus::Processing {
            return Err(StateError::InvalidInput(
                "tracking lookup is already processing".to_string(),
            ));
        }
        if !c.is_ascii_alphanumeric() {
            return Err(StateError::InvalidInput(format!(
                "'{}' is not allowed in a request number",
                c
            )));
        }
        if lookup.request_number.len() < MAX_REQUEST_NUMBER_LEN {
            lookup.request_number.push(c.to_ascii_uppercase());
        }
        Ok(())
    }

    pub fn pop_tracking_char(&mut self) -> Result<(), StateError> {
        let (lookup, _) = self.tracking_entry()?;
        if lookup.status != SimulationStatus::Processing {
            lookup.request_number.pop();
        }
        Ok(())
    }

    /// Look up the typed request number.
    ///
    pub fn submit_tracking(&mut self) -> Result<Scheduled, StateError> {
        let next = self.generations.next();
        let delay = Delay::from(self.timing.tracking_delay);
        let (lookup, generation) = self.tracking_entry()?;
        if lookup.status == SimulationStatus::Processing {
            return Err(StateError::InvalidInput(
                "tracking lookup is already processing".to_string(),
            ));
        }
        if lookup.request_number.trim().is_empty() {
            return Err(StateError::InvalidInput(
                "request number is empty".to_string(),
            ));
        }
        lookup.status = SimulationStatus::Processing;
        *generation = next;
        info!(
            "Looking up {} request {}...",
            lookup.kind.label(),
            lookup.request_number
        );
        Ok(Scheduled {
            ticket: Ticket {
                task: Task::Tracking,
                generation: next,
            },
            delay,
        })
    }

    // ---------------------------------------------------------------------
    // Downloads
    // ---------------------------------------------------------------------

    /// Download the document of the service shown in the document viewer, or
    /// of the open service detail.
    ///
    pub fn request_download(&mut self) -> Result<Scheduled, StateError> {
        self.require_screen(Screen::Main, "request_download")?;
        let service_ref = match self.overlays.get(OverlayKind::DocumentViewer) {
            Some(OverlayEntry {
                overlay: Overlay::DocumentViewer(service),
                ..
            }) => service.clone(),
            _ => match (&self.main_view.active_sector, &self.main_view.active_service) {
                (Some(sector_id), Some(service_id)) => ServiceRef {
                    service_id: service_id.clone(),
                    sector_id: sector_id.clone(),
                },
                _ => {
                    return Err(StateError::InvalidInput(
                        "no service selected".to_string(),
                    ))
                }
            },
        };

        let (_, service) = self
            .catalog
            .service(&service_ref.service_id)
            .ok_or_else(|| StateError::UnknownServiceId(service_ref.service_id.clone()))?;
        if !service.has_download {
            return Err(StateError::ServiceCapability {
                service_id: service_ref.service_id,
                capability: "download",
            });
        }
        if self.pending_downloads.contains(&service_ref) {
            return Err(StateError::InvalidInput(format!(
                "{} is already downloading",
                service.name
            )));
        }

        info!("Downloading {}...", service.name);
        self.pending_downloads.push(service_ref.clone());
        Ok(Scheduled {
            ticket: Ticket {
                task: Task::Download {
                    service: service_ref,
                },
                generation: self.screen_generation,
            },
            delay: Delay::from(self.timing.download_delay),
        })
    }

    // ---------------------------------------------------------------------
    // Deferred results
    // ---------------------------------------------------------------------

    /// Apply a fired ticket. Returns `StaleCallback` when the screen or
    /// overlay instance that requested it is gone, in which case nothing
    /// changes.
    ///
    pub fn resolve(&mut self, ticket: &Ticket, completion: Completion) -> Result<(), StateError> {
        match (&ticket.task, completion) {
            (Task::Splash, Completion::Splash) => {
                if self.screen != Screen::Splash
                    || self.splash_completed
                    || ticket.generation != self.screen_generation
                {
                    return Err(StateError::StaleCallback);
                }
                self.complete_splash().map(|_| ())
            }
            (Task::Payment, Completion::Payment(outcome)) => {
                let (form, generation) =
                    self.payment_entry().map_err(|_| StateError::StaleCallback)?;
                if *generation != ticket.generation || form.status != SimulationStatus::Processing
                {
                    return Err(StateError::StaleCallback);
                }
                form.status = SimulationStatus::Done(outcome);
                info!("Consultation payment finished: {:?}", outcome);
                Ok(())
            }
            (Task::Tracking, Completion::Tracking(status)) => {
                let (lookup, generation) =
                    self.tracking_entry().map_err(|_| StateError::StaleCallback)?;
                if *generation != ticket.generation
                    || lookup.status != SimulationStatus::Processing
                {
                    return Err(StateError::StaleCallback);
                }
                lookup.status = SimulationStatus::Done(status);
                info!(
                    "Request {} status: {}",
                    lookup.request_number,
                    status.label()
                );
                Ok(())
            }
            (Task::Download { service }, Completion::Download) => {
                if self.screen != Screen::Main || ticket.generation != self.screen_generation {
                    return Err(StateError::StaleCallback);
                }
                let position = self
                    .pending_downloads
                    .iter()
                    .position(|pending| pending == service)
                    .ok_or(StateError::StaleCallback)?;
                self.pending_downloads.remove(position);

                let title = self
                    .catalog
                    .service(&service.service_id)
                    .map(|(_, s)| s.name.clone())
                    .unwrap_or_else(|| service.service_id.clone());
                info!("Downloaded {}", title);
                self.status_message = Some(format!("Downloaded {}", title));
                self.downloads.push(DownloadedDocument {
                    service_id: service.service_id.clone(),
                    sector_id: service.sector_id.clone(),
                    title,
                    downloaded_at: Local::now(),
                });
                Ok(())
            }
            (task, completion) => Err(StateError::InvalidInput(format!(
                "completion {:?} does not match task {:?}",
                completion, task
            ))),
        }
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    pub fn enter_search_mode(&mut self) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "enter_search_mode")?;
        self.search_mode = true;
        self.cursor = 0;
        Ok(())
    }

    /// Leave search mode, discarding the query.
    ///
    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
        self.clear_search();
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    /// Replace the query and recompute the results.
    ///
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.search_results = search::search(&self.catalog, &self.search_query);
        self.cursor = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut query = self.search_query.clone();
        query.push(c);
        self.set_search_query(&query);
    }

    pub fn pop_search_char(&mut self) {
        let mut query = self.search_query.clone();
        query.pop();
        self.set_search_query(&query);
    }

    fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }

    /// The results panel is hidden while the query is blank.
    ///
    pub fn is_results_panel_visible(&self) -> bool {
        !normalize(&self.search_query).is_empty()
    }

    /// Follow a search result, then clear the query and results.
    ///
    pub fn select_result(&mut self, index: usize) -> Result<(), StateError> {
        self.require_screen(Screen::Main, "select_result")?;
        let result = self
            .search_results
            .get(index)
            .cloned()
            .ok_or(StateError::NoSearchResult(index))?;
        if self.catalog.service(&result.service_id).is_none() {
            return Err(StateError::UnknownServiceId(result.service_id));
        }
        debug!("Selected search result {}", result.service_id);
        self.follow_route(search::route(&result.service_id, &result.sector_id))?;
        self.search_mode = false;
        self.clear_search();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn main_view(&self) -> &MainView {
        &self.main_view
    }

    pub fn active_tab(&self) -> Tab {
        self.main_view.active_tab
    }

    pub fn active_sector(&self) -> Option<&Sector> {
        self.main_view
            .active_sector
            .as_deref()
            .and_then(|id| self.catalog.sector(id))
    }

    pub fn active_service(&self) -> Option<&Service> {
        let service_id = self.main_view.active_service.as_deref()?;
        self.active_sector()?
            .services
            .iter()
            .find(|service| service.id == service_id)
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Returns the role of the logged-in user.
    ///
    pub fn current_role(&self) -> Option<Role> {
        self.session.trusted_role()
    }

    /// Returns the sectors featured for the logged-in user's role.
    ///
    pub fn featured_sectors(&self) -> Vec<&Sector> {
        match self.current_role() {
            Some(role) => self.catalog.featured_for(role),
            None => vec![],
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.catalog.notifications
    }

    pub fn is_notification_read(&self, notification_id: &str) -> bool {
        self.read_notifications.contains(notification_id)
    }

    pub fn unread_notification_count(&self) -> usize {
        self.catalog
            .notifications
            .iter()
            .filter(|n| !self.read_notifications.contains(&n.id))
            .count()
    }

    pub fn downloads(&self) -> &[DownloadedDocument] {
        &self.downloads
    }

    pub fn pending_downloads(&self) -> &[ServiceRef] {
        &self.pending_downloads
    }

    // ---------------------------------------------------------------------
    // List cursor, status line and log panel
    // ---------------------------------------------------------------------

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the list cursor down within a list of `len` items.
    ///
    pub fn next_item(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn previous_item(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn add_log_entry(&mut self, entry: String) {
        self.log_entries.push(entry);
        if self.log_entries.len() > MAX_LOG_ENTRIES {
            let excess = self.log_entries.len() - MAX_LOG_ENTRIES;
            self.log_entries.drain(..excess);
        }
    }

    pub fn log_entries(&self) -> &[String] {
        &self.log_entries
    }

    pub fn toggle_log(&mut self) {
        self.log_visible = !self.log_visible;
    }

    pub fn is_log_visible(&self) -> bool {
        self.log_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{LOGGED_IN_KEY, USER_TYPE_KEY};
    use crate::state::BiometricKind;
    use crate::state::TrackingStatus;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::time::Duration;

    fn state_with(store: &MemorySessionStore) -> State {
        State::new(Catalog::default(), Timing::default(), Box::new(store.clone()))
    }

    fn at_login(store: &MemorySessionStore) -> State {
        let mut state = state_with(store);
        state.start().unwrap();
        assert_eq!(state.complete_splash().unwrap(), Screen::Login);
        state
    }

    fn signed_up(role: &str) -> (State, MemorySessionStore) {
        let store = MemorySessionStore::new();
        let mut state = at_login(&store);
        state.request_sign_up().unwrap();
        state.complete_sign_up(role).unwrap();
        (state, store)
    }

    fn index_of(state: &State, service_id: &str) -> usize {
        state
            .search_results()
            .iter()
            .position(|r| r.service_id == service_id)
            .unwrap()
    }

    #[test]
    fn start_schedules_regular_splash_without_session() {
        let store = MemorySessionStore::new();
        let mut state = state_with(&store);
        let scheduled = state.start().unwrap();
        assert_eq!(state.screen(), Screen::Splash);
        assert_eq!(scheduled.ticket.task, Task::Splash);
        assert_eq!(scheduled.delay, Delay::Fixed(Duration::from_millis(3000)));
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut state = State::default();
        state.start().unwrap();
        assert!(matches!(
            state.start(),
            Err(StateError::InvalidTransition { command: "start", .. })
        ));
    }

    #[test]
    fn complete_splash_is_one_shot() {
        let store = MemorySessionStore::new();
        let mut state = at_login(&store);
        assert!(matches!(
            state.complete_splash(),
            Err(StateError::InvalidTransition { .. })
        ));
        assert_eq!(state.screen(), Screen::Login);
    }

    #[test]
    fn restored_session_skips_login_with_default_view() {
        let mut store = MemorySessionStore::new();
        store.set(LOGGED_IN_KEY, "true").unwrap();
        store.set(USER_TYPE_KEY, "lawyer").unwrap();

        let mut state = state_with(&store);
        let scheduled = state.start().unwrap();
        assert_eq!(scheduled.delay, Delay::Fixed(Duration::from_millis(2500)));

        state.resolve(&scheduled.ticket, Completion::Splash).unwrap();
        assert_eq!(state.screen(), Screen::Main);
        assert_eq!(state.main_view(), &MainView::default());
        assert!(state.overlays().is_empty());
        assert_eq!(state.current_role(), Some(Role::Lawyer));
    }

    #[test]
    fn logged_in_flag_without_role_goes_to_login() {
        let mut store = MemorySessionStore::new();
        store.set(LOGGED_IN_KEY, "true").unwrap();
        let mut state = state_with(&store);
        let scheduled = state.start().unwrap();
        assert_eq!(scheduled.delay, Delay::Fixed(Duration::from_millis(3000)));
        assert_eq!(state.complete_splash().unwrap(), Screen::Login);
    }

    #[test]
    fn stale_splash_ticket_is_dropped() {
        let store = MemorySessionStore::new();
        let mut state = state_with(&store);
        let scheduled = state.start().unwrap();
        state.complete_splash().unwrap();
        state.login().unwrap();

        assert_eq!(
            state.resolve(&scheduled.ticket, Completion::Splash),
            Err(StateError::StaleCallback)
        );
        assert_eq!(state.screen(), Screen::Main);
    }

    #[test]
    fn commands_from_wrong_screen_are_rejected() {
        let store = MemorySessionStore::new();
        let mut state = state_with(&store);
        state.start().unwrap();

        assert!(state.login().is_err());
        assert!(state.request_sign_up().is_err());
        assert!(state.complete_sign_up("citizen").is_err());
        assert!(state.logout().is_err());
        assert!(state.select_tab(Tab::Files).is_err());
        assert!(state.open(Overlay::Settings).is_err());
        assert_eq!(state.screen(), Screen::Splash);
        assert_eq!(Session::read(state.session_store()), Session::default());
    }

    #[test]
    fn sign_up_persists_role() {
        let (state, store) = signed_up("citizen");
        assert_eq!(state.screen(), Screen::Main);
        assert_eq!(
            Session::read(&store),
            Session {
                is_logged_in: true,
                user_type: Some(Role::Citizen)
            }
        );
    }

    #[test]
    fn sign_up_with_unknown_role_keeps_state() {
        let store = MemorySessionStore::new();
        let mut state = at_login(&store);
        state.request_sign_up().unwrap();

        assert_eq!(
            state.complete_sign_up("admin"),
            Err(StateError::MissingRole("admin".to_string()))
        );
        assert_eq!(
            state.complete_sign_up(""),
            Err(StateError::MissingRole(String::new()))
        );
        assert_eq!(state.screen(), Screen::SignUp);
        assert_eq!(Session::read(&store), Session::default());
    }

    #[test]
    fn cancel_sign_up_returns_to_login() {
        let store = MemorySessionStore::new();
        let mut state = at_login(&store);
        state.request_sign_up().unwrap();
        state.cancel_sign_up().unwrap();
        assert_eq!(state.screen(), Screen::Login);
        assert_eq!(Session::read(&store), Session::default());
    }

    #[test]
    fn login_keeps_stored_role() {
        let mut store = MemorySessionStore::new();
        store.set(USER_TYPE_KEY, "business").unwrap();
        let mut state = at_login(&store);
        state.login().unwrap();
        assert_eq!(state.current_role(), Some(Role::Business));
        assert!(Session::read(&store).is_logged_in);
    }

    #[test]
    fn logout_then_cold_start_lands_on_login() {
        let (mut state, store) = signed_up("lawyer");
        state.logout().unwrap();
        assert_eq!(store.get(LOGGED_IN_KEY), None);
        assert_eq!(store.get(USER_TYPE_KEY), None);

        let mut reloaded = state_with(&store);
        let scheduled = reloaded.start().unwrap();
        reloaded.resolve(&scheduled.ticket, Completion::Splash).unwrap();
        assert_eq!(reloaded.screen(), Screen::Login);
    }

    #[test]
    fn role_is_not_trusted_after_login_without_role() {
        let (mut state, _store) = signed_up("officer");
        state.logout().unwrap();
        state.login().unwrap();
        assert_eq!(state.current_role(), None);
        assert!(state.featured_sectors().is_empty());
    }

    #[test]
    fn featured_sectors_follow_role() {
        let (state, _store) = signed_up("business");
        let featured = state.featured_sectors();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, "commerce");
    }

    #[test]
    fn switching_tab_clears_sector() {
        let (mut state, _store) = signed_up("citizen");
        state.open_sector("justice").unwrap();
        state.open_service("criminal_record").unwrap();
        state.select_tab(Tab::Profile).unwrap();
        assert_eq!(state.active_tab(), Tab::Profile);
        assert!(state.active_sector().is_none());
        assert!(state.active_service().is_none());
    }

    #[test]
    fn unknown_sector_and_service_are_rejected() {
        let (mut state, _store) = signed_up("citizen");
        assert_eq!(
            state.open_sector("space"),
            Err(StateError::UnknownSectorId("space".to_string()))
        );
        assert_eq!(
            state.open_service("criminal_record"),
            Err(StateError::UnknownServiceId("criminal_record".to_string()))
        );
        state.open_sector("health").unwrap();
        assert!(state.open_service("criminal_record").is_err());
        assert!(state.active_service().is_none());
    }

    #[test]
    fn back_pops_service_then_sector() {
        let (mut state, _store) = signed_up("citizen");
        state.open_sector("health").unwrap();
        state.open_service("health_card").unwrap();
        state.back().unwrap();
        assert_eq!(state.active_sector().unwrap().id, "health");
        assert!(state.active_service().is_none());
        state.back().unwrap();
        assert!(state.active_sector().is_none());
        state.back().unwrap();
    }

    #[test]
    fn closing_twice_is_noop_and_clears_payload() {
        let (mut state, _store) = signed_up("citizen");
        for kind in [
            OverlayKind::Settings,
            OverlayKind::Notifications,
            OverlayKind::LocationSearch,
            OverlayKind::DocumentTemplates,
            OverlayKind::LegalConsultationBox,
        ] {
            state.open_kind(kind).unwrap();
            assert!(state.overlays().is_open(kind));
            state.close(kind);
            state.close(kind);
            assert!(state.overlays().get(kind).is_none());
        }
    }

    #[test]
    fn open_kind_rejects_payload_kinds() {
        let (mut state, _store) = signed_up("citizen");
        assert!(matches!(
            state.open_kind(OverlayKind::BiometricTracking),
            Err(StateError::InvalidInput(_))
        ));
        assert!(state.overlays().is_empty());
    }

    #[test]
    fn reopen_does_not_leak_previous_payload() {
        let (mut state, _store) = signed_up("citizen");
        state.open_kind(OverlayKind::LocationSearch).unwrap();
        state.push_location_char('c').unwrap();
        state.close(OverlayKind::LocationSearch);
        state.open_kind(OverlayKind::LocationSearch).unwrap();
        assert_eq!(
            state.overlays().get(OverlayKind::LocationSearch).unwrap().overlay,
            Overlay::LocationSearch {
                query: String::new()
            }
        );
    }

    #[test]
    fn confirm_logout_requires_confirmation_overlay() {
        let (mut state, _store) = signed_up("citizen");
        assert_eq!(
            state.confirm_logout(),
            Err(StateError::OverlayNotOpen(OverlayKind::LogoutConfirm))
        );
        assert_eq!(state.screen(), Screen::Main);
    }

    #[test]
    fn opening_logout_confirm_does_not_log_out() {
        let (mut state, store) = signed_up("citizen");
        state.open_kind(OverlayKind::Settings).unwrap();
        state.request_logout().unwrap();
        assert_eq!(
            state.overlays().open_kinds(),
            vec![OverlayKind::Settings, OverlayKind::LogoutConfirm]
        );
        assert_eq!(state.screen(), Screen::Main);
        assert!(Session::read(&store).is_logged_in);

        state.close(OverlayKind::LogoutConfirm);
        assert_eq!(state.overlays().open_kinds(), vec![OverlayKind::Settings]);
    }

    #[test]
    fn confirm_logout_resets_everything() {
        let (mut state, store) = signed_up("citizen");
        state.open_sector("interior").unwrap();
        state.open_kind(OverlayKind::Settings).unwrap();
        state.request_logout().unwrap();
        state.confirm_logout().unwrap();

        assert_eq!(state.screen(), Screen::Login);
        assert!(state.overlays().is_empty());
        assert_eq!(state.main_view(), &MainView::default());
        assert_eq!(Session::read(&store), Session::default());
    }

    #[test]
    fn selecting_passport_result_opens_tracking() {
        let (mut state, _store) = signed_up("citizen");
        state.enter_search_mode().unwrap();
        state.set_search_query("passport");
        let index = index_of(&state, "biometric_passport");
        state.select_result(index).unwrap();

        let entry = state.overlays().get(OverlayKind::BiometricTracking).unwrap();
        assert_eq!(
            entry.overlay,
            Overlay::BiometricTracking(TrackingLookup::new(BiometricKind::Passport))
        );
        assert!(state.main_view().active_sector.is_none());
        assert!(state.search_query().is_empty());
        assert!(state.search_results().is_empty());
        assert!(!state.is_search_mode());
    }

    #[test]
    fn selecting_identity_result_opens_id_tracking() {
        let (mut state, _store) = signed_up("citizen");
        state.set_search_query("identity");
        let index = index_of(&state, "biometric_id");
        state.select_result(index).unwrap();
        assert!(matches!(
            state.overlays().get(OverlayKind::BiometricTracking).unwrap().overlay,
            Overlay::BiometricTracking(TrackingLookup {
                kind: BiometricKind::Id,
                ..
            })
        ));
        assert!(state.main_view().active_sector.is_none());
    }

    #[test]
    fn selecting_other_result_opens_sector() {
        let (mut state, _store) = signed_up("citizen");
        state.set_search_query("birth");
        let index = index_of(&state, "birth_certificate");
        state.select_result(index).unwrap();
        assert_eq!(state.main_view().active_sector.as_deref(), Some("interior"));
        assert!(state.overlays().is_empty());
        assert!(!state.is_results_panel_visible());
    }

    #[test]
    fn select_result_out_of_range() {
        let (mut state, _store) = signed_up("citizen");
        state.set_search_query("zzzz");
        assert!(state.is_results_panel_visible());
        assert!(state.search_results().is_empty());
        assert_eq!(state.select_result(0), Err(StateError::NoSearchResult(0)));
        assert_eq!(state.search_query(), "zzzz");
    }

    #[test]
    fn blank_query_hides_results_panel() {
        let (mut state, _store) = signed_up("citizen");
        state.push_search_char(' ');
        assert!(!state.is_results_panel_visible());
        state.push_search_char('b');
        assert!(state.is_results_panel_visible());
        state.pop_search_char();
        state.pop_search_char();
        assert!(!state.is_results_panel_visible());
        assert!(state.search_results().is_empty());
    }

    #[test]
    fn result_selected_from_other_tab_shows_sector_on_home() {
        for tab in [Tab::Files, Tab::Profile] {
            let (mut state, _store) = signed_up("citizen");
            state.select_tab(tab).unwrap();
            state.set_search_query("birth");
            let index = index_of(&state, "birth_certificate");
            state.select_result(index).unwrap();
            assert_eq!(state.active_tab(), Tab::Home);
            assert_eq!(state.main_view().active_sector.as_deref(), Some("interior"));
        }
    }

    #[test]
    fn notification_from_files_tab_shows_sector_on_home() {
        let (mut state, _store) = signed_up("citizen");
        state.select_tab(Tab::Files).unwrap();
        state.open_kind(OverlayKind::Notifications).unwrap();
        state.select_notification("record_available").unwrap();
        assert_eq!(state.active_tab(), Tab::Home);
        assert_eq!(state.main_view().active_sector.as_deref(), Some("justice"));
    }

    #[test]
    fn notification_routes_like_search() {
        let (mut state, _store) = signed_up("citizen");
        assert_eq!(state.unread_notification_count(), 3);

        state.open_kind(OverlayKind::Notifications).unwrap();
        state.select_notification("passport_ready").unwrap();
        assert!(!state.overlays().is_open(OverlayKind::Notifications));
        assert!(state.overlays().is_open(OverlayKind::BiometricTracking));
        assert!(state.main_view().active_sector.is_none());

        state.open_kind(OverlayKind::Notifications).unwrap();
        state.select_notification("record_available").unwrap();
        assert!(state.overlays().is_empty());
        assert_eq!(state.main_view().active_sector.as_deref(), Some("justice"));
        assert_eq!(state.unread_notification_count(), 1);
    }

    #[test]
    fn unknown_notification_is_noop() {
        let (mut state, _store) = signed_up("citizen");
        state.open_kind(OverlayKind::Notifications).unwrap();
        assert_eq!(
            state.select_notification("nope"),
            Err(StateError::UnknownNotificationId("nope".to_string()))
        );
        assert!(state.overlays().is_open(OverlayKind::Notifications));
    }

    #[test]
    fn template_opens_viewer_and_downloads() {
        let (mut state, _store) = signed_up("citizen");
        assert!(state.select_template("birth_certificate").is_err());

        state.open_kind(OverlayKind::DocumentTemplates).unwrap();
        assert!(matches!(
            state.select_template("health_card"),
            Err(StateError::ServiceCapability { .. })
        ));
        state.select_template("birth_certificate").unwrap();
        assert_eq!(
            state.overlays().open_kinds(),
            vec![OverlayKind::DocumentTemplates, OverlayKind::DocumentViewer]
        );

        let scheduled = state.request_download().unwrap();
        assert_eq!(state.pending_downloads().len(), 1);
        state.resolve(&scheduled.ticket, Completion::Download).unwrap();
        assert!(state.pending_downloads().is_empty());
        assert_eq!(state.downloads()[0].service_id, "birth_certificate");
        assert!(state.status_message().is_some());
    }

    #[test]
    fn download_from_service_detail() {
        let (mut state, _store) = signed_up("citizen");
        assert!(matches!(
            state.request_download(),
            Err(StateError::InvalidInput(_))
        ));

        state.open_sector("health").unwrap();
        state.open_service("health_card").unwrap();
        assert_eq!(
            state.request_download(),
            Err(StateError::ServiceCapability {
                service_id: "health_card".to_string(),
                capability: "download",
            })
        );

        state.open_service("vaccination_record").unwrap();
        let scheduled = state.request_download().unwrap();
        assert!(matches!(
            state.request_download(),
            Err(StateError::InvalidInput(_))
        ));
        state.resolve(&scheduled.ticket, Completion::Download).unwrap();
        assert_eq!(state.downloads().len(), 1);
    }

    #[test]
    fn download_after_logout_is_stale() {
        let (mut state, _store) = signed_up("citizen");
        state.open_sector("interior").unwrap();
        state.open_service("birth_certificate").unwrap();
        let scheduled = state.request_download().unwrap();
        state.logout().unwrap();
        state.login().unwrap();

        assert_eq!(
            state.resolve(&scheduled.ticket, Completion::Download),
            Err(StateError::StaleCallback)
        );
        assert!(state.downloads().is_empty());
    }

    #[test]
    fn payment_flow_leads_to_consultation() {
        let (mut state, _store) = signed_up("lawyer");
        assert!(state.open_consultation_payment().is_err());

        state.open_kind(OverlayKind::LegalConsultationBox).unwrap();
        state.open_consultation_payment().unwrap();
        assert!(matches!(
            state.submit_payment(),
            Err(StateError::InvalidInput(_))
        ));

        state.choose_payment_method(PaymentMethod::Card).unwrap();
        let scheduled = state.submit_payment().unwrap();
        assert!(state.submit_payment().is_err());
        assert!(state.start_consultation().is_err());

        state
            .resolve(&scheduled.ticket, Completion::Payment(PaymentOutcome::Succeeded))
            .unwrap();
        state.start_consultation().unwrap();
        assert_eq!(
            state.overlays().open_kinds(),
            vec![OverlayKind::ConsultationInterface]
        );
    }

    #[test]
    fn failed_payment_can_be_retried() {
        let (mut state, _store) = signed_up("lawyer");
        state.open_kind(OverlayKind::LegalConsultationBox).unwrap();
        state.open_consultation_payment().unwrap();
        state.choose_payment_method(PaymentMethod::MobileWallet).unwrap();
        let first = state.submit_payment().unwrap();
        state
            .resolve(&first.ticket, Completion::Payment(PaymentOutcome::Failed))
            .unwrap();
        assert!(state.start_consultation().is_err());

        let second = state.submit_payment().unwrap();
        assert_ne!(first.ticket, second.ticket);
        assert_eq!(
            state.resolve(&first.ticket, Completion::Payment(PaymentOutcome::Succeeded)),
            Err(StateError::StaleCallback)
        );
        state
            .resolve(&second.ticket, Completion::Payment(PaymentOutcome::Succeeded))
            .unwrap();
        state.start_consultation().unwrap();
    }

    #[test]
    fn payment_result_after_close_is_dropped() {
        let (mut state, _store) = signed_up("lawyer");
        state.open_kind(OverlayKind::LegalConsultationBox).unwrap();
        state.open_consultation_payment().unwrap();
        state.choose_payment_method(PaymentMethod::Card).unwrap();
        let scheduled = state.submit_payment().unwrap();
        state.close(OverlayKind::LegalConsultationBox);

        assert_eq!(
            state.resolve(&scheduled.ticket, Completion::Payment(PaymentOutcome::Succeeded)),
            Err(StateError::StaleCallback)
        );

        // A fresh payment overlay does not inherit the old result.
        state.open_kind(OverlayKind::LegalConsultationBox).unwrap();
        state.open_consultation_payment().unwrap();
        assert_eq!(
            state.resolve(&scheduled.ticket, Completion::Payment(PaymentOutcome::Succeeded)),
            Err(StateError::StaleCallback)
        );
        assert_eq!(
            state
                .overlays()
                .get(OverlayKind::LegalConsultationPayment)
                .unwrap()
                .overlay,
            Overlay::LegalConsultationPayment(PaymentForm::default())
        );
    }

    #[test]
    fn administrative_consultation_is_free() {
        let (mut state, _store) = signed_up("officer");
        assert!(state.start_administrative_consultation().is_err());
        state
            .open_kind(OverlayKind::AdministrativeConsultation)
            .unwrap();
        state.start_administrative_consultation().unwrap();
        assert_eq!(
            state
                .overlays()
                .get(OverlayKind::ConsultationInterface)
                .unwrap()
                .overlay,
            Overlay::ConsultationInterface(ConsultationKind::Administrative)
        );
        assert!(!state
            .overlays()
            .is_open(OverlayKind::AdministrativeConsultation));
    }

    #[test]
    fn tracking_lookup_flow() {
        let (mut state, _store) = signed_up("citizen");
        state
            .open(Overlay::BiometricTracking(TrackingLookup::new(
                BiometricKind::Passport,
            )))
            .unwrap();
        assert!(state.submit_tracking().is_err());
        assert!(state.push_tracking_char('-').is_err());
        for c in "ab12".chars() {
            state.push_tracking_char(c).unwrap();
        }
        state.pop_tracking_char().unwrap();

        let scheduled = state.submit_tracking().unwrap();
        state
            .resolve(&scheduled.ticket, Completion::Tracking(TrackingStatus::ReadyForPickup))
            .unwrap();
        assert_eq!(
            state.overlays().get(OverlayKind::BiometricTracking).unwrap().overlay,
            Overlay::BiometricTracking(TrackingLookup {
                kind: BiometricKind::Passport,
                request_number: "AB1".to_string(),
                status: SimulationStatus::Done(TrackingStatus::ReadyForPickup),
            })
        );
    }

    #[test]
    fn reopened_tracking_drops_old_result() {
        let (mut state, _store) = signed_up("citizen");
        state
            .open(Overlay::BiometricTracking(TrackingLookup::new(BiometricKind::Id)))
            .unwrap();
        state.push_tracking_char('7').unwrap();
        let scheduled = state.submit_tracking().unwrap();

        state
            .open(Overlay::BiometricTracking(TrackingLookup::new(
                BiometricKind::Passport,
            )))
            .unwrap();
        assert_eq!(
            state.resolve(&scheduled.ticket, Completion::Tracking(TrackingStatus::Delivered)),
            Err(StateError::StaleCallback)
        );
    }

    #[test]
    fn mismatched_completion_is_rejected() {
        let store = MemorySessionStore::new();
        let mut state = state_with(&store);
        let scheduled = state.start().unwrap();
        assert!(matches!(
            state.resolve(&scheduled.ticket, Completion::Download),
            Err(StateError::InvalidInput(_))
        ));
        assert_eq!(state.screen(), Screen::Splash);
    }

    #[test]
    fn location_search_filters_catalog_locations() {
        let (mut state, _store) = signed_up("citizen");
        assert!(state.location_matches().is_empty());
        state.open_kind(OverlayKind::LocationSearch).unwrap();
        let all = state.location_matches().len();
        assert_eq!(all, state.catalog().locations().len());

        for c in "COURT".chars() {
            state.push_location_char(c).unwrap();
        }
        let matches = state.location_matches();
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|l| l.to_lowercase().contains("court")));
        state.pop_location_char().unwrap();
    }

    #[test]
    fn log_entries_are_capped() {
        let mut state = State::default();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            state.add_log_entry(format!("entry {}", i));
        }
        assert_eq!(state.log_entries().len(), MAX_LOG_ENTRIES);
        assert_eq!(state.log_entries()[0], "entry 10");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut state = State::default();
        state.previous_item();
        assert_eq!(state.cursor(), 0);
        state.next_item(2);
        state.next_item(2);
        assert_eq!(state.cursor(), 1);
        state.next_item(0);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn end_to_end_sign_up_and_logout() {
        let store = MemorySessionStore::new();
        let mut state = state_with(&store);
        let scheduled = state.start().unwrap();
        state.resolve(&scheduled.ticket, Completion::Splash).unwrap();
        assert_eq!(state.screen(), Screen::Login);

        state.request_sign_up().unwrap();
        assert_eq!(state.screen(), Screen::SignUp);

        state.complete_sign_up("citizen").unwrap();
        assert_eq!(state.screen(), Screen::Main);
        assert_eq!(
            Session::read(&store),
            Session {
                is_logged_in: true,
                user_type: Some(Role::Citizen)
            }
        );

        state.open_kind(OverlayKind::LocationSearch).unwrap();
        assert!(state.overlays().is_open(OverlayKind::LocationSearch));

        state.logout().unwrap();
        assert_eq!(state.screen(), Screen::Login);
        assert_eq!(Session::read(&store), Session::default());
        assert!(OverlayKind::ALL
            .iter()
            .all(|kind| !state.overlays().is_open(*kind)));
    }

    #[test]
    fn random_command_sequences_keep_one_screen() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let store = MemorySessionStore::new();
            let mut state = state_with(&store);
            let splash = state.start().unwrap();
            for _ in 0..200 {
                let before = state.screen();
                let result = match rng.gen_range(0..12) {
                    0 => state.resolve(&splash.ticket, Completion::Splash),
                    1 => state.complete_splash().map(|_| ()),
                    2 => state.login(),
                    3 => state.request_sign_up(),
                    4 => state.complete_sign_up(Role::ALL[rng.gen_range(0..4)].id()),
                    5 => state.cancel_sign_up(),
                    6 => state.logout(),
                    7 => state.select_tab(Tab::ALL[rng.gen_range(0..3)]),
                    8 => state.open_kind(OverlayKind::Settings),
                    9 => state.request_logout(),
                    10 => state.confirm_logout(),
                    _ => state.open_sector("health"),
                };
                if let Err(StateError::InvalidTransition { screen, .. }) = result {
                    assert_eq!(screen, before);
                    assert_eq!(state.screen(), before);
                }
                if state.screen() != Screen::Main {
                    assert!(state.overlays().is_empty());
                    assert_eq!(state.main_view(), &MainView::default());
                }
                let session = Session::read(&store);
                if !session.is_logged_in {
                    assert_eq!(session.user_type, None);
                }
            }
        }
    }
}
