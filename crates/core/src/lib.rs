//! `certledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod fingerprint;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use fingerprint::Fingerprint;
pub use id::{CertificateId, CourseId, StudentId};
