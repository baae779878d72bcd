//! Service search and result routing.
//!
//! A service matches when the normalized query is a substring of its name or
//! description, or when the query contains one of the catalog's alias
//! keywords for that service. Results keep catalog order.

use super::overlay::BiometricKind;
use crate::catalog::Catalog;
use crate::utils::text_processing::normalize;
use std::collections::HashSet;

/// A matched service, flattened with its sector.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SearchResult {
    pub service_id: String,
    pub sector_id: String,
    pub name: String,
    pub description: String,
    pub sector_title: String,
    pub location: String,
    pub deadline: String,
}

/// Where selecting a service leads.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Route {
    Tracking(BiometricKind),
    Sector(String),
}

/// Decide the destination of a selected service. Only the exact biometric
/// service ids go to the tracking overlay.
///
pub fn route(service_id: &str, sector_id: &str) -> Route {
    match BiometricKind::from_service_id(service_id) {
        Some(kind) => Route::Tracking(kind),
        None => Route::Sector(sector_id.to_string()),
    }
}

/// Returns the ids of services whose alias keywords occur in the query.
///
fn alias_matches<'a>(catalog: &'a Catalog, normalized_query: &str) -> HashSet<&'a str> {
    catalog
        .aliases
        .iter()
        .filter(|alias| {
            alias.keywords.iter().any(|keyword| {
                let keyword = normalize(keyword);
                !keyword.is_empty() && normalized_query.contains(&keyword)
            })
        })
        .map(|alias| alias.service_id.as_str())
        .collect()
}

/// Search the catalog. A blank query yields no results.
///
pub fn search(catalog: &Catalog, query: &str) -> Vec<SearchResult> {
    let query = normalize(query);
    if query.is_empty() {
        return vec![];
    }
    let aliased = alias_matches(catalog, &query);

    catalog
        .sectors
        .iter()
        .flat_map(|sector| sector.services.iter().map(move |service| (sector, service)))
        .filter(|(_, service)| {
            aliased.contains(service.id.as_str())
                || normalize(&service.name).contains(&query)
                || normalize(&service.description).contains(&query)
        })
        .map(|(sector, service)| SearchResult {
            service_id: service.id.clone(),
            sector_id: sector.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            sector_title: sector.title.clone(),
            location: service.location.clone(),
            deadline: service.deadline.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Alias, Sector, Service};
    use fake::{Fake, Faker};

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.service_id.as_str()).collect()
    }

    fn service(id: &str, name: &str, description: &str) -> Service {
        Service {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            ..Faker.fake()
        }
    }

    fn small_catalog() -> Catalog {
        Catalog {
            sectors: vec![
                Sector {
                    id: "b_sector".to_string(),
                    title: "B".to_string(),
                    description: String::new(),
                    featured_for: vec![],
                    services: vec![
                        service("zeta", "Zeta permit", "Permit for zeta"),
                        service("alpha", "Alpha permit", "Permit for alpha"),
                    ],
                },
                Sector {
                    id: "a_sector".to_string(),
                    title: "A".to_string(),
                    description: String::new(),
                    featured_for: vec![],
                    services: vec![service("beta", "Beta licence", "Mentions permit")],
                },
            ],
            notifications: vec![],
            aliases: vec![Alias {
                keywords: vec!["pass".to_string()],
                service_id: "beta".to_string(),
            }],
        }
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let catalog = Catalog::default();
        assert!(search(&catalog, "").is_empty());
        assert!(search(&catalog, "   ").is_empty());
    }

    #[test]
    fn test_results_follow_catalog_order() {
        let results = search(&small_catalog(), "permit");
        assert_eq!(ids(&results), vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_case_is_normalized() {
        let results = search(&small_catalog(), "ALPHA");
        assert_eq!(ids(&results), vec!["alpha"]);
    }

    #[test]
    fn test_alias_and_substring_form_a_union() {
        // "alpha" aliases beta and is also a substring of the alpha service
        let mut catalog = small_catalog();
        catalog.aliases[0].keywords = vec!["alpha".to_string()];
        let results = search(&catalog, "alpha");
        assert_eq!(ids(&results), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_alias_matches_when_query_contains_keyword() {
        let results = search(&small_catalog(), "lost pass");
        assert_eq!(ids(&results), vec!["beta"]);
    }

    #[test]
    fn test_passport_alias_in_default_catalog() {
        let catalog = Catalog::default();
        let results = search(&catalog, "renew my passport");
        assert_eq!(ids(&results), vec!["biometric_passport"]);

        let results = search(&catalog, "جواز السفر");
        assert_eq!(ids(&results), vec!["biometric_passport"]);
    }

    #[test]
    fn test_result_carries_sector_fields() {
        let catalog = Catalog::default();
        let results = search(&catalog, "criminal");
        let result = &results[0];
        assert_eq!(result.service_id, "criminal_record");
        assert_eq!(result.sector_id, "justice");
        assert_eq!(result.sector_title, "Justice");
        assert!(!result.location.is_empty());
    }

    #[test]
    fn test_route_branches_on_exact_id() {
        assert_eq!(
            route("biometric_passport", "interior"),
            Route::Tracking(BiometricKind::Passport)
        );
        assert_eq!(route("biometric_id", "interior"), Route::Tracking(BiometricKind::Id));
        assert_eq!(
            route("birth_certificate", "interior"),
            Route::Sector("interior".to_string())
        );
    }
}
