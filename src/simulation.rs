//! Fabricated outcomes for the mocked payment, tracking and download flows.
//!
//! Nothing here talks to a backend: outcomes are drawn from the given random
//! source when a ticket fires.

use crate::state::{Completion, PaymentOutcome, Task, TrackingStatus};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draw a payment outcome succeeding with the given probability.
///
pub fn payment_outcome<R: Rng + ?Sized>(rng: &mut R, success_rate: f64) -> PaymentOutcome {
    if rng.gen_bool(success_rate.clamp(0.0, 1.0)) {
        PaymentOutcome::Succeeded
    } else {
        PaymentOutcome::Failed
    }
}

/// Draw a tracking status uniformly.
///
pub fn tracking_status<R: Rng + ?Sized>(rng: &mut R) -> TrackingStatus {
    *TrackingStatus::ALL
        .choose(rng)
        .unwrap_or(&TrackingStatus::Received)
}

/// Produce the completion delivered for a fired task.
///
pub fn complete<R: Rng + ?Sized>(task: &Task, rng: &mut R, success_rate: f64) -> Completion {
    match task {
        Task::Splash => Completion::Splash,
        Task::Payment => Completion::Payment(payment_outcome(rng, success_rate)),
        Task::Tracking => Completion::Tracking(tracking_status(rng)),
        Task::Download { .. } => Completion::Download,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ServiceRef;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn certain_rates_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(payment_outcome(&mut rng, 1.0), PaymentOutcome::Succeeded);
            assert_eq!(payment_outcome(&mut rng, 0.0), PaymentOutcome::Failed);
        }
    }

    #[test]
    fn out_of_range_rate_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(payment_outcome(&mut rng, 4.0), PaymentOutcome::Succeeded);
    }

    #[test]
    fn completion_matches_task() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(complete(&Task::Splash, &mut rng, 0.5), Completion::Splash);
        assert!(matches!(
            complete(&Task::Payment, &mut rng, 0.5),
            Completion::Payment(_)
        ));
        assert!(matches!(
            complete(&Task::Tracking, &mut rng, 0.5),
            Completion::Tracking(_)
        ));
        let download = Task::Download {
            service: ServiceRef {
                service_id: "birth_certificate".to_string(),
                sector_id: "interior".to_string(),
            },
        };
        assert_eq!(complete(&download, &mut rng, 0.5), Completion::Download);
    }
}
