//! The certificate registry service.
//!
//! This module is the boundary the presentation layer calls into. It is
//! responsible for:
//! 1.  Normalizing and validating raw field values before they reach the
//!     store.
//! 2.  The CRUD operations over certificate records.
//! 3.  Bulk CSV import with partial-success semantics, and bulk CSV export.
//! 4.  The public verification lookup by certificate number.
//!
//! Callers are expected to expose `verify` to untrusted users and
//! everything else to trusted operators only.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::csv as codec;
use crate::domain::error::RegistryError;
use crate::domain::record::{CertificateDraft, CertificateRecord};
use crate::domain::validate;
use crate::storage::certificates::CertificateStore;

/// Outcome of a bulk CSV import. Row numbers are 1-based over data rows;
/// the discarded header row is not counted.
#[derive(Debug, Clone, Serialize)]
pub struct CsvImportReport {
    pub inserted: usize,
    pub rejected: Vec<RejectedRow>,
}

/// A data row that was skipped during import, with a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

/// The main service orchestrating validation, storage, and the CSV codec.
pub struct RegistryService {
    store: CertificateStore,
}

impl RegistryService {
    /// The store is injected so callers decide where records live; there is
    /// no process-wide database handle.
    pub fn new(store: CertificateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CertificateStore {
        &self.store
    }

    /// Validates the draft and inserts a new record.
    pub async fn add_certificate(
        &self,
        draft: &CertificateDraft,
    ) -> Result<CertificateRecord, RegistryError> {
        let valid = validate::validate(draft)?;
        let record = self.store.create(&valid).await?;
        debug!(
            id = record.id,
            certificate_number = %record.certificate_number,
            "certificate added"
        );
        Ok(record)
    }

    /// Full replacement of the four business fields of an existing record.
    pub async fn edit_certificate(
        &self,
        id: i64,
        draft: &CertificateDraft,
    ) -> Result<CertificateRecord, RegistryError> {
        let valid = validate::validate(draft)?;
        let record = self.store.update(id, &valid).await?;
        debug!(id, "certificate updated");
        Ok(record)
    }

    pub async fn remove_certificate(&self, id: i64) -> Result<(), RegistryError> {
        self.store.delete(id).await?;
        debug!(id, "certificate deleted");
        Ok(())
    }

    /// All records in the store's stable order (id ascending).
    pub async fn list_all(&self) -> Result<Vec<CertificateRecord>, RegistryError> {
        self.store.list_all().await
    }

    /// Public verification lookup.
    ///
    /// The input is trimmed but never case-folded; certificate numbers are
    /// exact identifiers. This is the only operation meant for
    /// unauthenticated callers, and a `Storage` error from it must be
    /// generalized by the presentation layer instead of shown verbatim.
    pub async fn verify(
        &self,
        raw_number: &str,
    ) -> Result<Option<CertificateRecord>, RegistryError> {
        let number = raw_number.trim();
        if number.is_empty() {
            return Ok(None);
        }
        self.store.get_by_certificate_number(number).await
    }

    /// Imports certificates from CSV bytes with partial-success semantics.
    ///
    /// The first row is always discarded as a header, even when the file
    /// has none. Each data row is decoded, validated, and inserted
    /// independently; rows that fail to decode, fail validation, or collide
    /// on certificate_number are collected in the report and never abort
    /// the batch. Rows inserted before a later rejection stay inserted.
    ///
    /// A storage failure is not a row-level rejection: it aborts the import
    /// with `Storage`, leaving prior rows in place.
    pub async fn import_csv(&self, bytes: &[u8]) -> Result<CsvImportReport, RegistryError> {
        let mut report = CsvImportReport {
            inserted: 0,
            rejected: Vec::new(),
        };

        for (row, decoded) in codec::decode(bytes) {
            let draft = match decoded {
                Ok(draft) => draft,
                Err(reason) => {
                    warn!(row, %reason, "rejected CSV row");
                    report.rejected.push(RejectedRow { row, reason });
                    continue;
                }
            };
            match self.insert_row(&draft).await {
                Ok(()) => report.inserted += 1,
                Err(err @ RegistryError::Validation { .. })
                | Err(err @ RegistryError::Duplicate { .. }) => {
                    let reason = err.to_string();
                    warn!(row, %reason, "rejected CSV row");
                    report.rejected.push(RejectedRow { row, reason });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            inserted = report.inserted,
            rejected = report.rejected.len(),
            "CSV import finished"
        );
        Ok(report)
    }

    async fn insert_row(&self, draft: &CertificateDraft) -> Result<(), RegistryError> {
        let valid = validate::validate(draft)?;
        self.store.create(&valid).await?;
        Ok(())
    }

    /// Serializes every record, header first, in `list_all` order. An empty
    /// registry exports the header line alone.
    pub async fn export_csv(&self) -> Result<Vec<u8>, RegistryError> {
        let records = self.store.list_all().await?;
        info!(count = records.len(), "exporting certificates to CSV");
        codec::encode(&records)
    }
}
