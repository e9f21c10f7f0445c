//! The immutable ledger record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use certledger_core::{CertificateId, Fingerprint};

/// One entry in the append-only ledger.
///
/// Created exactly once per certificate, then never mutated or deleted.
/// Block numbers form the gapless sequence 1, 2, 3, … in append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub certificate_id: CertificateId,
    pub hash: Fingerprint,
    /// Monotonically increasing position in the ledger (1-based).
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
    /// Always true at creation; there is no revocation path.
    pub verified: bool,
}
