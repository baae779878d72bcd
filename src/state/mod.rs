//! Application state management module.
//!
//! This module contains the core state machine of the application, including:
//! - Main `State` struct holding the screen, main view, overlays and search
//! - Navigation types (Screen, Tab, MainView)
//! - Overlay types and the overlay set
//! - Search and result routing
//! - Deferred task tickets
//! - State error handling

mod error;
mod navigation;
mod overlay;
mod search;
mod timers;

pub use error::StateError;
pub use navigation::{MainView, Screen, Tab};
pub use overlay::{
    may_stack, BiometricKind, ConsultationKind, Overlay, OverlayEntry, OverlayKind, OverlaySet,
    PaymentForm, PaymentOutcome, ServiceRef, SimulationStatus, TrackingLookup, TrackingStatus,
};
pub use search::{route, search, Route, SearchResult};
pub use timers::{Completion, Delay, Scheduled, Task, Ticket};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{DownloadedDocument, State};
