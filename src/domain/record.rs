//! Certificate record shapes.
//!
//! `CertificateDraft` carries untrusted caller input (form fields or a CSV
//! row), `ValidCertificate` is the normalized form produced by
//! `domain::validate`, and `CertificateRecord` is what the store hands back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored certificate.
///
/// `id` is assigned by the store, never reused, and immutable after
/// creation. `certificate_number` is the caller-meaningful business key
/// used by verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub certificate_number: String,
    pub issued_date: NaiveDate,
}

/// Raw field values as submitted by a form or read from a CSV row.
/// Everything is a string until validation says otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateDraft {
    pub name: String,
    pub email: String,
    pub certificate_number: String,
    pub issued_date: String,
}

impl CertificateDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        certificate_number: impl Into<String>,
        issued_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            certificate_number: certificate_number.into(),
            issued_date: issued_date.into(),
        }
    }
}

/// Normalized, validated field values. The only shape the store accepts
/// for writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCertificate {
    pub name: String,
    pub email: String,
    pub certificate_number: String,
    pub issued_date: NaiveDate,
}
