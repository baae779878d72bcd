//! Core of the citizen portal: the navigation state machine, the service
//! catalog, session persistence and the simulated request flows. The terminal
//! front end in `main.rs` drives it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logger;
pub mod roles;
pub mod session;
pub mod simulation;
pub mod state;
pub mod utils;
