//! State management-specific error types.

use super::navigation::Screen;
use super::overlay::OverlayKind;

/// Errors that can occur during state operations.
///
/// Every variant is recoverable: the command that produced it left the state
/// unchanged.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Command is not valid from the current screen
    #[error("Invalid transition: {command} is not allowed from {screen}")]
    InvalidTransition {
        command: &'static str,
        screen: Screen,
    },

    /// Sign-up attempted without a registered role
    #[error("Missing role: '{0}' is not a registered role")]
    MissingRole(String),

    /// Deferred callback arrived after its owner went away
    #[error("Stale callback dropped")]
    StaleCallback,

    /// Overlay identifier does not name an overlay
    #[error("Unknown overlay kind: {0}")]
    UnknownOverlayKind(String),

    /// Service identifier is not in the catalog
    #[error("Unknown service id: {0}")]
    UnknownServiceId(String),

    /// Sector identifier is not in the catalog
    #[error("Unknown sector id: {0}")]
    UnknownSectorId(String),

    /// Notification identifier is not in the catalog
    #[error("Unknown notification id: {0}")]
    UnknownNotificationId(String),

    /// Command needs an overlay that is not open
    #[error("Overlay not open: {0}")]
    OverlayNotOpen(OverlayKind),

    /// Service does not offer the requested capability
    #[error("Service {service_id} does not support {capability}")]
    ServiceCapability {
        service_id: String,
        capability: &'static str,
    },

    /// Search result index out of range
    #[error("No search result at index {0}")]
    NoSearchResult(usize),

    /// Command arguments or preconditions are not met
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::InvalidTransition {
            command: "login",
            screen: Screen::Main,
        };
        assert!(error.to_string().contains("login"));
        assert!(error.to_string().contains("main"));

        let error = StateError::MissingRole("admin".to_string());
        assert!(error.to_string().contains("admin"));

        let error = StateError::StaleCallback;
        assert!(error.to_string().contains("Stale callback"));

        let error = StateError::UnknownServiceId("nope".to_string());
        assert!(error.to_string().contains("Unknown service id"));
        assert!(error.to_string().contains("nope"));

        let error = StateError::OverlayNotOpen(OverlayKind::LogoutConfirm);
        assert!(error.to_string().contains("logout-confirm"));

        let error = StateError::ServiceCapability {
            service_id: "health_card".to_string(),
            capability: "download",
        };
        assert!(error.to_string().contains("health_card"));
        assert!(error.to_string().contains("download"));
    }
}
