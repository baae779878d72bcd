//! Service catalog module.
//!
//! The catalog is static configuration read by the state: sectors and their
//! services, header notifications and the keyword aliases used by search.
//! A built-in catalog ships with the binary and can be replaced by a YAML
//! file.

mod default;
mod error;

pub use error::CatalogError;

use crate::roles::Role;
use fake::Dummy;
use log::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// Payment channels accepted for paid services.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    MobileWallet,
    PostOffice,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::MobileWallet,
        PaymentMethod::PostOffice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Bank card",
            PaymentMethod::MobileWallet => "Mobile wallet",
            PaymentMethod::PostOffice => "Post office",
        }
    }
}

/// Defines a single administrative procedure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub deadline: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub has_download: bool,
    #[serde(default)]
    pub has_tracking: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}

/// Defines a government sector grouping services.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Roles for which this sector is featured on the home tab.
    #[serde(default)]
    pub featured_for: Vec<Role>,
    pub services: Vec<Service>,
}

/// Defines a header notification, optionally pointing at a service.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub service_id: Option<String>,
}

/// Keywords that always match a given service in search.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub keywords: Vec<String>,
    pub service_id: String,
}

/// Read-only catalog of sectors, notifications and search aliases.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub sectors: Vec<Sector>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

impl Default for Catalog {
    fn default() -> Self {
        default::catalog()
    }
}

impl Catalog {
    /// Load and validate a catalog from a YAML file.
    ///
    pub fn from_yaml_file(path: &Path) -> Result<Catalog, CatalogError> {
        debug!("Loading catalog from {}...", path.display());
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::LoadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Catalog::from_yaml_str(&contents)
    }

    /// Parse and validate a catalog from YAML text.
    ///
    pub fn from_yaml_str(contents: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(contents)
            .map_err(|e| CatalogError::DeserializationFailed(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ensure identifiers are unique and every reference resolves.
    ///
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut sector_ids = HashSet::new();
        let mut service_ids = HashSet::new();
        for sector in &self.sectors {
            if !sector_ids.insert(sector.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "sector",
                    id: sector.id.clone(),
                });
            }
            for service in &sector.services {
                if !service_ids.insert(service.id.as_str()) {
                    return Err(CatalogError::DuplicateId {
                        kind: "service",
                        id: service.id.clone(),
                    });
                }
            }
        }

        let mut notification_ids = HashSet::new();
        for notification in &self.notifications {
            if !notification_ids.insert(notification.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "notification",
                    id: notification.id.clone(),
                });
            }
            if let Some(service_id) = &notification.service_id {
                if !service_ids.contains(service_id.as_str()) {
                    return Err(CatalogError::DanglingReference {
                        origin: format!("notification '{}'", notification.id),
                        service_id: service_id.clone(),
                    });
                }
            }
        }

        for alias in &self.aliases {
            if !service_ids.contains(alias.service_id.as_str()) {
                return Err(CatalogError::DanglingReference {
                    origin: format!("alias {:?}", alias.keywords),
                    service_id: alias.service_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the sector with the given id.
    ///
    pub fn sector(&self, sector_id: &str) -> Option<&Sector> {
        self.sectors.iter().find(|sector| sector.id == sector_id)
    }

    /// Returns the service with the given id and the sector that holds it.
    ///
    pub fn service(&self, service_id: &str) -> Option<(&Sector, &Service)> {
        self.sectors.iter().find_map(|sector| {
            sector
                .services
                .iter()
                .find(|service| service.id == service_id)
                .map(|service| (sector, service))
        })
    }

    /// Returns the notification with the given id.
    ///
    pub fn notification(&self, notification_id: &str) -> Option<&Notification> {
        self.notifications
            .iter()
            .find(|notification| notification.id == notification_id)
    }

    /// Returns the sectors featured for a role, in catalog order.
    ///
    pub fn featured_for(&self, role: Role) -> Vec<&Sector> {
        self.sectors
            .iter()
            .filter(|sector| sector.featured_for.contains(&role))
            .collect()
    }

    /// Returns every service offering a downloadable document, in catalog order.
    ///
    pub fn templates(&self) -> Vec<(&Sector, &Service)> {
        self.sectors
            .iter()
            .flat_map(|sector| sector.services.iter().map(move |service| (sector, service)))
            .filter(|(_, service)| service.has_download)
            .collect()
    }

    /// Returns the distinct service locations, in first-seen order.
    ///
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sectors
            .iter()
            .flat_map(|sector| sector.services.iter())
            .map(|service| service.location.as_str())
            .filter(|location| seen.insert(*location))
            .collect()
    }
}
