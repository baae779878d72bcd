//! Deferred task types.
//!
//! Commands that simulate latency hand back a `Scheduled` value. The runtime
//! waits for the delay and resolves the ticket against the state, which drops
//! it if its owner has been replaced in the meantime.

use super::overlay::{PaymentOutcome, ServiceRef, TrackingStatus};
use crate::config::DelayRange;
use rand::Rng;
use std::time::Duration;

/// Specifying the different deferred tasks.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Task {
    Splash,
    Payment,
    Tracking,
    Download { service: ServiceRef },
}

/// Identifies a deferred task and the owner generation it was issued for.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Ticket {
    pub task: Task,
    pub generation: u64,
}

/// Result delivered when a ticket fires.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Completion {
    Splash,
    Payment(PaymentOutcome),
    Tracking(TrackingStatus),
    Download,
}

/// How long to wait before firing a ticket.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Delay {
    Fixed(Duration),
    Between(Duration, Duration),
}

impl Delay {
    /// Pick a concrete wait.
    ///
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            Delay::Fixed(duration) => duration,
            Delay::Between(min, max) if min >= max => min,
            Delay::Between(min, max) => rng.gen_range(min..=max),
        }
    }
}

impl From<DelayRange> for Delay {
    fn from(range: DelayRange) -> Self {
        if range.min_ms == range.max_ms {
            Delay::Fixed(range.min())
        } else {
            Delay::Between(range.min(), range.max())
        }
    }
}

/// A ticket paired with its delay.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Scheduled {
    pub ticket: Ticket,
    pub delay: Delay,
}

/// Monotonic generation source.
///
#[derive(Debug, Default)]
pub struct Generations {
    last: u64,
}

impl Generations {
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}
