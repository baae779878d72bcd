//! Role registry.
//!
//! This module defines the closed set of user roles selectable at sign-up
//! together with the display metadata shown for each of them.

use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Specifying the different user roles.
///
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Dummy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Lawyer,
    Officer,
    Business,
}

/// Display metadata for a role.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RoleInfo {
    pub role: Role,
    pub title: &'static str,
    pub description: &'static str,
}

const REGISTRY: [RoleInfo; 4] = [
    RoleInfo {
        role: Role::Citizen,
        title: "Citizen",
        description: "Personal documents, civil status and everyday procedures",
    },
    RoleInfo {
        role: Role::Lawyer,
        title: "Lawyer",
        description: "Court filings, case tracking and legal consultations",
    },
    RoleInfo {
        role: Role::Officer,
        title: "Public officer",
        description: "Administrative circulars and inter-agency procedures",
    },
    RoleInfo {
        role: Role::Business,
        title: "Business",
        description: "Company registration, licences and tax procedures",
    },
];

impl Role {
    /// Every role in registry order.
    ///
    pub const ALL: [Role; 4] = [Role::Citizen, Role::Lawyer, Role::Officer, Role::Business];

    /// Returns the stable identifier used in the session store.
    ///
    pub fn id(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Lawyer => "lawyer",
            Role::Officer => "officer",
            Role::Business => "business",
        }
    }

    /// Resolve a role from its identifier, or None if it is not registered.
    ///
    pub fn from_id(id: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.id() == id.trim())
    }

    /// Returns the display metadata for this role.
    ///
    pub fn info(&self) -> &'static RoleInfo {
        match self {
            Role::Citizen => &REGISTRY[0],
            Role::Lawyer => &REGISTRY[1],
            Role::Officer => &REGISTRY[2],
            Role::Business => &REGISTRY[3],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Returns the full registry in display order.
///
pub fn registry() -> &'static [RoleInfo] {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_resolves_every_registered_role() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
    }

    #[test]
    fn from_id_rejects_unknown_identifiers() {
        assert_eq!(Role::from_id("admin"), None);
        assert_eq!(Role::from_id(""), None);
        assert_eq!(Role::from_id("Citizen"), None);
    }

    #[test]
    fn info_matches_registry_entry() {
        for info in registry() {
            assert_eq!(info.role.info(), info);
        }
    }

    #[test]
    fn display_uses_identifier() {
        assert_eq!(Role::Lawyer.to_string(), "lawyer");
    }
}
