//! Built-in catalog shipped with the binary.

use super::{Alias, Catalog, Notification, PaymentMethod, Sector, Service};
use crate::roles::Role;

struct Entry<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    location: &'a str,
    deadline: &'a str,
    requirements: &'a [&'a str],
    has_download: bool,
    has_tracking: bool,
    payment_methods: &'a [PaymentMethod],
}

fn service(entry: Entry) -> Service {
    Service {
        id: entry.id.to_string(),
        name: entry.name.to_string(),
        description: entry.description.to_string(),
        location: entry.location.to_string(),
        deadline: entry.deadline.to_string(),
        requirements: entry.requirements.iter().map(|r| r.to_string()).collect(),
        has_download: entry.has_download,
        has_tracking: entry.has_tracking,
        is_paid: !entry.payment_methods.is_empty(),
        payment_methods: entry.payment_methods.to_vec(),
    }
}

fn sector(id: &str, title: &str, description: &str, featured_for: &[Role], services: Vec<Service>) -> Sector {
    Sector {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        featured_for: featured_for.to_vec(),
        services,
    }
}

fn interior() -> Sector {
    sector(
        "interior",
        "Interior & Civil Status",
        "Identity documents and civil status records",
        &[Role::Citizen],
        vec![
            service(Entry {
                id: "biometric_passport",
                name: "Biometric passport",
                description: "Apply for or renew a biometric passport",
                location: "Municipal civil status office",
                deadline: "15 days",
                requirements: &[
                    "Birth certificate",
                    "Two recent photographs",
                    "Fiscal stamp",
                    "Previous passport if renewing",
                ],
                has_download: false,
                has_tracking: true,
                payment_methods: &[PaymentMethod::Card, PaymentMethod::PostOffice],
            }),
            service(Entry {
                id: "biometric_id",
                name: "Biometric identity card",
                description: "Apply for a national biometric identity card",
                location: "Municipal civil status office",
                deadline: "10 days",
                requirements: &["Birth certificate", "Proof of residence", "Blood group card"],
                has_download: false,
                has_tracking: true,
                payment_methods: &[],
            }),
            service(Entry {
                id: "birth_certificate",
                name: "Birth certificate",
                description: "Full copy of a birth record from the civil registry",
                location: "Any civil status office",
                deadline: "Immediate",
                requirements: &["National identity number"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[],
            }),
            service(Entry {
                id: "residence_certificate",
                name: "Residence certificate",
                description: "Certificate proving the applicant's place of residence",
                location: "District administration",
                deadline: "2 days",
                requirements: &["Identity card", "Utility bill", "Two witnesses"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[],
            }),
        ],
    )
}

fn justice() -> Sector {
    sector(
        "justice",
        "Justice",
        "Courts, criminal records and legal assistance",
        &[Role::Lawyer, Role::Citizen],
        vec![
            service(Entry {
                id: "criminal_record",
                name: "Criminal record extract",
                description: "Extract number 3 of the criminal record",
                location: "Court of first instance",
                deadline: "Immediate",
                requirements: &["Identity card"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[PaymentMethod::Card, PaymentMethod::MobileWallet],
            }),
            service(Entry {
                id: "court_filing",
                name: "Court filing",
                description: "File a claim or an appeal with the competent court",
                location: "Court registry",
                deadline: "Depends on the procedure",
                requirements: &["Written claim", "Identity card", "Lawyer mandate"],
                has_download: false,
                has_tracking: true,
                payment_methods: &[PaymentMethod::Card, PaymentMethod::PostOffice],
            }),
            service(Entry {
                id: "nationality_certificate",
                name: "Nationality certificate",
                description: "Certificate of nationality issued by the court clerk",
                location: "Court of first instance",
                deadline: "1 day",
                requirements: &["Birth certificate", "Father's nationality certificate"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[],
            }),
        ],
    )
}

fn health() -> Sector {
    sector(
        "health",
        "Health",
        "Health insurance and medical records",
        &[Role::Citizen],
        vec![
            service(Entry {
                id: "health_card",
                name: "Health insurance card",
                description: "Issue or renew the electronic health insurance card",
                location: "Social security agency",
                deadline: "7 days",
                requirements: &["Identity card", "Employer certificate", "Photograph"],
                has_download: false,
                has_tracking: true,
                payment_methods: &[],
            }),
            service(Entry {
                id: "vaccination_record",
                name: "Vaccination record",
                description: "Printable vaccination history",
                location: "Local health center",
                deadline: "Immediate",
                requirements: &["Health insurance card"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[],
            }),
        ],
    )
}

fn commerce() -> Sector {
    sector(
        "commerce",
        "Commerce & Investment",
        "Company registration and trade licences",
        &[Role::Business],
        vec![
            service(Entry {
                id: "company_registration",
                name: "Company registration",
                description: "Register a new company with the trade registry",
                location: "Trade registry center",
                deadline: "3 days",
                requirements: &["Articles of association", "Lease contract", "Identity card"],
                has_download: false,
                has_tracking: true,
                payment_methods: &[PaymentMethod::Card, PaymentMethod::MobileWallet],
            }),
            service(Entry {
                id: "trade_register_extract",
                name: "Trade register extract",
                description: "Certified extract of a company's registry entry",
                location: "Trade registry center",
                deadline: "Immediate",
                requirements: &["Registry number"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[PaymentMethod::Card],
            }),
        ],
    )
}

fn public_service() -> Sector {
    sector(
        "public_service",
        "Public Administration",
        "Circulars, recruitment and administrative procedures",
        &[Role::Officer],
        vec![
            service(Entry {
                id: "administrative_circulars",
                name: "Administrative circulars",
                description: "Official circulars and instructions for public agents",
                location: "Ministry of public service",
                deadline: "Immediate",
                requirements: &["Agent number"],
                has_download: true,
                has_tracking: false,
                payment_methods: &[],
            }),
            service(Entry {
                id: "recruitment_exam",
                name: "Recruitment exam registration",
                description: "Register for a public service recruitment exam",
                location: "Recruitment directorate",
                deadline: "Until the closing date",
                requirements: &["Diploma", "Identity card", "Curriculum vitae"],
                has_download: false,
                has_tracking: true,
                payment_methods: &[],
            }),
        ],
    )
}

fn notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "passport_ready".to_string(),
            title: "Passport update".to_string(),
            body: "Your passport application moved to a new stage.".to_string(),
            service_id: Some("biometric_passport".to_string()),
        },
        Notification {
            id: "record_available".to_string(),
            title: "Criminal record".to_string(),
            body: "Criminal record extracts can now be requested online.".to_string(),
            service_id: Some("criminal_record".to_string()),
        },
        Notification {
            id: "maintenance".to_string(),
            title: "Scheduled maintenance".to_string(),
            body: "Some services will be unavailable on Saturday night.".to_string(),
            service_id: None,
        },
    ]
}

fn aliases() -> Vec<Alias> {
    let alias = |keywords: &[&str], service_id: &str| Alias {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        service_id: service_id.to_string(),
    };
    vec![
        alias(&["passport", "passeport", "جواز"], "biometric_passport"),
        alias(&["identity", "carte d'identité", "بطاقة التعريف"], "biometric_id"),
        alias(&["casier", "سوابق"], "criminal_record"),
        alias(&["tribunal", "محكمة"], "court_filing"),
    ]
}

/// Returns the built-in catalog.
///
pub fn catalog() -> Catalog {
    Catalog {
        sectors: vec![interior(), justice(), health(), commerce(), public_service()],
        notifications: notifications(),
        aliases: aliases(),
    }
}
