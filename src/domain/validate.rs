//! Field validation and normalization.
//!
//! Pure functions: raw untrusted strings in, normalized values or a typed
//! rejection out. Nothing here touches the store or performs I/O, so the
//! rules are unit-testable without any harness.

use chrono::NaiveDate;

use crate::domain::error::RegistryError;
use crate::domain::record::{CertificateDraft, ValidCertificate};

const MAX_TEXT_LEN: usize = 255;
const MAX_CERTIFICATE_NUMBER_LEN: usize = 100;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates and normalizes a draft into the shape the store accepts.
/// Reports the first offending field.
pub fn validate(draft: &CertificateDraft) -> Result<ValidCertificate, RegistryError> {
    Ok(ValidCertificate {
        name: normalize_name(&draft.name)?,
        email: normalize_email(&draft.email)?,
        certificate_number: normalize_certificate_number(&draft.certificate_number)?,
        issued_date: parse_issued_date(&draft.issued_date)?,
    })
}

pub fn normalize_name(raw: &str) -> Result<String, RegistryError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RegistryError::validation("name", "cannot be empty"));
    }
    if name.chars().count() > MAX_TEXT_LEN {
        return Err(RegistryError::validation(
            "name",
            format!("must be {MAX_TEXT_LEN} characters or less"),
        ));
    }
    Ok(name.to_string())
}

pub fn normalize_email(raw: &str) -> Result<String, RegistryError> {
    let email = raw.trim();
    if email.chars().count() > MAX_TEXT_LEN {
        return Err(RegistryError::validation(
            "email",
            format!("must be {MAX_TEXT_LEN} characters or less"),
        ));
    }
    if !is_email_syntax(email) {
        return Err(RegistryError::validation(
            "email",
            "is not a valid email address",
        ));
    }
    Ok(email.to_string())
}

pub fn normalize_certificate_number(raw: &str) -> Result<String, RegistryError> {
    let number = raw.trim();
    if number.is_empty() {
        return Err(RegistryError::validation(
            "certificate_number",
            "cannot be empty",
        ));
    }
    if number.chars().count() > MAX_CERTIFICATE_NUMBER_LEN {
        return Err(RegistryError::validation(
            "certificate_number",
            format!("must be {MAX_CERTIFICATE_NUMBER_LEN} characters or less"),
        ));
    }
    Ok(number.to_string())
}

pub fn parse_issued_date(raw: &str) -> Result<NaiveDate, RegistryError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        RegistryError::validation("issued_date", "must be a date in YYYY-MM-DD form")
    })
}

/// Syntax-only email check: a single `@`, non-empty local part, and a domain
/// with at least one dot and no empty labels. No DNS or deliverability
/// checks.
fn is_email_syntax(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.split('.').any(str::is_empty)
}
