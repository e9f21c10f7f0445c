//! `certledger-registry` — the external-collaborator boundary.
//!
//! The ledger does not own students, courses or certificate records; it only
//! reads display fields from them and writes issuance results back. This
//! crate defines that boundary: the denormalized [`Certificate`] record and
//! the traits the ledger services are injected with.

pub mod certificate;
pub mod directory;

pub use certificate::{Certificate, CertificateRepository, CertificateStatus};
pub use directory::{CourseCatalog, StudentDirectory};

use thiserror::Error;

/// Registry operation error.
///
/// Infrastructure failures only; "record missing" is expressed as `None`
/// on the lookup methods, not as an error.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("storage unavailable: {0}")]
    Storage(String),
}
