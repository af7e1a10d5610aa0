pub mod certificates;

pub use certificates::CertificateStore;
