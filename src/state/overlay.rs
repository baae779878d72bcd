//! Overlay state types.
//!
//! Overlays are modal surfaces drawn above the main screen. At most one base
//! overlay is open at a time; a small allow-list of overlays may be stacked
//! on top of a specific host (for example the logout confirmation over the
//! settings panel). Each overlay carries its own typed payload.

use super::error::StateError;
use crate::catalog::PaymentMethod;
use std::{fmt, str::FromStr};

/// Specifying the different overlay kinds.
///
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OverlayKind {
    Settings,
    Notifications,
    LocationSearch,
    DocumentTemplates,
    DocumentViewer,
    AdministrativeConsultation,
    LegalConsultationPayment,
    LegalConsultationBox,
    ConsultationInterface,
    BiometricTracking,
    LogoutConfirm,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 11] = [
        OverlayKind::Settings,
        OverlayKind::Notifications,
        OverlayKind::LocationSearch,
        OverlayKind::DocumentTemplates,
        OverlayKind::DocumentViewer,
        OverlayKind::AdministrativeConsultation,
        OverlayKind::LegalConsultationPayment,
        OverlayKind::LegalConsultationBox,
        OverlayKind::ConsultationInterface,
        OverlayKind::BiometricTracking,
        OverlayKind::LogoutConfirm,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            OverlayKind::Settings => "settings",
            OverlayKind::Notifications => "notifications",
            OverlayKind::LocationSearch => "location-search",
            OverlayKind::DocumentTemplates => "document-templates",
            OverlayKind::DocumentViewer => "document-viewer",
            OverlayKind::AdministrativeConsultation => "administrative-consultation",
            OverlayKind::LegalConsultationPayment => "legal-consultation-payment",
            OverlayKind::LegalConsultationBox => "legal-consultation-box",
            OverlayKind::ConsultationInterface => "consultation-interface",
            OverlayKind::BiometricTracking => "biometric-tracking",
            OverlayKind::LogoutConfirm => "logout-confirm",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            OverlayKind::Settings => "Settings",
            OverlayKind::Notifications => "Notifications",
            OverlayKind::LocationSearch => "Find an office",
            OverlayKind::DocumentTemplates => "Document templates",
            OverlayKind::DocumentViewer => "Document",
            OverlayKind::AdministrativeConsultation => "Administrative consultation",
            OverlayKind::LegalConsultationPayment => "Consultation payment",
            OverlayKind::LegalConsultationBox => "Legal consultation",
            OverlayKind::ConsultationInterface => "Consultation",
            OverlayKind::BiometricTracking => "Application tracking",
            OverlayKind::LogoutConfirm => "Log out",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for OverlayKind {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OverlayKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| StateError::UnknownOverlayKind(s.to_string()))
    }
}

/// Returns true when `child` may be stacked over an open `host`.
///
pub fn may_stack(host: OverlayKind, child: OverlayKind) -> bool {
    matches!(
        (host, child),
        (OverlayKind::Settings, OverlayKind::LogoutConfirm)
            | (OverlayKind::DocumentTemplates, OverlayKind::DocumentViewer)
            | (OverlayKind::LegalConsultationBox, OverlayKind::LegalConsultationPayment)
    )
}

/// Reference to a catalog service.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ServiceRef {
    pub service_id: String,
    pub sector_id: String,
}

/// Biometric documents with a dedicated tracking flow.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BiometricKind {
    Passport,
    Id,
}

impl BiometricKind {
    /// Returns the catalog service id routed to the tracking overlay.
    ///
    pub fn service_id(&self) -> &'static str {
        match self {
            BiometricKind::Passport => "biometric_passport",
            BiometricKind::Id => "biometric_id",
        }
    }

    /// Resolve by exact service id.
    ///
    pub fn from_service_id(service_id: &str) -> Option<BiometricKind> {
        match service_id {
            "biometric_passport" => Some(BiometricKind::Passport),
            "biometric_id" => Some(BiometricKind::Id),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BiometricKind::Passport => "passport",
            BiometricKind::Id => "identity card",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConsultationKind {
    Administrative,
    Legal,
}

/// Progress of a simulated request.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SimulationStatus<T> {
    Idle,
    Processing,
    Done(T),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TrackingStatus {
    Received,
    InProduction,
    ReadyForPickup,
    Delivered,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 4] = [
        TrackingStatus::Received,
        TrackingStatus::InProduction,
        TrackingStatus::ReadyForPickup,
        TrackingStatus::Delivered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackingStatus::Received => "Application received",
            TrackingStatus::InProduction => "Document in production",
            TrackingStatus::ReadyForPickup => "Ready for pickup",
            TrackingStatus::Delivered => "Delivered",
        }
    }
}

/// Payload of the legal consultation payment overlay.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PaymentForm {
    pub method: Option<PaymentMethod>,
    pub status: SimulationStatus<PaymentOutcome>,
}

impl Default for PaymentForm {
    fn default() -> Self {
        PaymentForm {
            method: None,
            status: SimulationStatus::Idle,
        }
    }
}

/// Payload of the biometric tracking overlay.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TrackingLookup {
    pub kind: BiometricKind,
    pub request_number: String,
    pub status: SimulationStatus<TrackingStatus>,
}

impl TrackingLookup {
    pub fn new(kind: BiometricKind) -> Self {
        TrackingLookup {
            kind,
            request_number: String::new(),
            status: SimulationStatus::Idle,
        }
    }
}

/// An overlay together with its payload.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Overlay {
    Settings,
    Notifications,
    LocationSearch { query: String },
    DocumentTemplates,
    DocumentViewer(ServiceRef),
    AdministrativeConsultation,
    LegalConsultationPayment(PaymentForm),
    LegalConsultationBox,
    ConsultationInterface(ConsultationKind),
    BiometricTracking(TrackingLookup),
    LogoutConfirm,
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Settings => OverlayKind::Settings,
            Overlay::Notifications => OverlayKind::Notifications,
            Overlay::LocationSearch { .. } => OverlayKind::LocationSearch,
            Overlay::DocumentTemplates => OverlayKind::DocumentTemplates,
            Overlay::DocumentViewer(_) => OverlayKind::DocumentViewer,
            Overlay::AdministrativeConsultation => OverlayKind::AdministrativeConsultation,
            Overlay::LegalConsultationPayment(_) => OverlayKind::LegalConsultationPayment,
            Overlay::LegalConsultationBox => OverlayKind::LegalConsultationBox,
            Overlay::ConsultationInterface(_) => OverlayKind::ConsultationInterface,
            Overlay::BiometricTracking(_) => OverlayKind::BiometricTracking,
            Overlay::LogoutConfirm => OverlayKind::LogoutConfirm,
        }
    }

    /// Returns the overlay a kind opens with when no payload is supplied, or
    /// None for kinds that need one.
    ///
    pub fn without_payload(kind: OverlayKind) -> Option<Overlay> {
        match kind {
            OverlayKind::Settings => Some(Overlay::Settings),
            OverlayKind::Notifications => Some(Overlay::Notifications),
            OverlayKind::LocationSearch => Some(Overlay::LocationSearch {
                query: String::new(),
            }),
            OverlayKind::DocumentTemplates => Some(Overlay::DocumentTemplates),
            OverlayKind::AdministrativeConsultation => Some(Overlay::AdministrativeConsultation),
            OverlayKind::LegalConsultationPayment => {
                Some(Overlay::LegalConsultationPayment(PaymentForm::default()))
            }
            OverlayKind::LegalConsultationBox => Some(Overlay::LegalConsultationBox),
            OverlayKind::LogoutConfirm => Some(Overlay::LogoutConfirm),
            OverlayKind::DocumentViewer
            | OverlayKind::ConsultationInterface
            | OverlayKind::BiometricTracking => None,
        }
    }
}

/// An open overlay instance. The generation identifies the instance so that
/// deferred results can tell whether it is still the one they belong to.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OverlayEntry {
    pub overlay: Overlay,
    pub generation: u64,
}

/// Open overlays: one base plus at most one overlay stacked over it.
///
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct OverlaySet {
    base: Option<OverlayEntry>,
    stacked: Option<OverlayEntry>,
}

impl OverlaySet {
    /// Open an overlay. Re-opening an open kind replaces its payload; a kind
    /// allowed over the current base is stacked, anything else replaces the
    /// base and whatever was stacked on it.
    ///
    pub fn open(&mut self, overlay: Overlay, generation: u64) {
        let kind = overlay.kind();
        let entry = OverlayEntry {
            overlay,
            generation,
        };
        let base_kind = self.base.as_ref().map(|base| base.overlay.kind());
        match base_kind {
            Some(base_kind) if base_kind == kind => {
                self.base = Some(entry);
                self.stacked = None;
            }
            Some(base_kind) if may_stack(base_kind, kind) => {
                self.stacked = Some(entry);
            }
            _ => {
                self.base = Some(entry);
                self.stacked = None;
            }
        }
    }

    /// Close an overlay. Closing a base also closes the overlay stacked over
    /// it. Returns false when nothing of that kind was open.
    ///
    pub fn close(&mut self, kind: OverlayKind) -> bool {
        if self.stacked.as_ref().map(|e| e.overlay.kind()) == Some(kind) {
            self.stacked = None;
            return true;
        }
        if self.base.as_ref().map(|e| e.overlay.kind()) == Some(kind) {
            self.base = None;
            self.stacked = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.base = None;
        self.stacked = None;
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none()
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        self.get(kind).is_some()
    }

    /// Returns the open instance of a kind, payload included.
    ///
    pub fn get(&self, kind: OverlayKind) -> Option<&OverlayEntry> {
        self.iter().find(|entry| entry.overlay.kind() == kind)
    }

    pub fn get_mut(&mut self, kind: OverlayKind) -> Option<&mut OverlayEntry> {
        self.base
            .iter_mut()
            .chain(self.stacked.iter_mut())
            .find(|entry| entry.overlay.kind() == kind)
    }

    /// Returns the overlay drawn last, which receives input.
    ///
    pub fn top(&self) -> Option<&OverlayEntry> {
        self.stacked.as_ref().or(self.base.as_ref())
    }

    /// Iterate open overlays from bottom to top.
    ///
    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.base.iter().chain(self.stacked.iter())
    }

    pub fn open_kinds(&self) -> Vec<OverlayKind> {
        self.iter().map(|entry| entry.overlay.kind()).collect()
    }
}
