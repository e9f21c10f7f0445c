//! `certledger-ledger` — the certificate integrity ledger.
//!
//! The one subsystem with real invariants: deterministic fingerprinting of a
//! certificate's display fields, monotonic block-number assignment, permanent
//! append-only storage, and tamper-detection checks between the certificate's
//! denormalized hash and the ledger's copy.

pub mod block;
pub mod fingerprint;
pub mod issuance;
pub mod stats;
pub mod store;
pub mod verification;

pub use block::BlockRecord;
pub use fingerprint::CertificateFacts;
pub use issuance::{IssuanceError, IssuanceReceipt, IssuanceService};
pub use stats::{LedgerOverview, StatsAggregator};
pub use store::{LedgerError, LedgerStats, LedgerStore};
pub use verification::{VerificationError, VerificationResult, VerificationService};
