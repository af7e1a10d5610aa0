pub mod app;
pub mod codec;
pub mod domain;
pub mod infra;
pub mod storage;

// Convenience re-exports (keeps call-sites clean)
pub use app::registry_service::{CsvImportReport, RegistryService, RejectedRow};
pub use domain::error::RegistryError;
pub use domain::record::{CertificateDraft, CertificateRecord, ValidCertificate};
pub use storage::certificates::CertificateStore;
