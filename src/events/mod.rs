//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Terminal events: User input and terminal interactions
//! - Timer events: Deferred results of the simulated request flows

pub mod terminal;
pub mod timer;
