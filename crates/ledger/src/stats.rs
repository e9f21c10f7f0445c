//! Read-only rollup over the ledger.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::store::{LedgerError, LedgerStore};

/// Dashboard-facing rollup. `last_block_time` is the ISO-8601 rendering of
/// the newest record's timestamp, absent when the ledger is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerOverview {
    pub total_certificates: u64,
    pub total_blocks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_block_time: Option<String>,
}

/// Read-only aggregator; holds nothing but a store handle.
#[derive(Debug, Clone)]
pub struct StatsAggregator<L> {
    ledger: L,
}

impl<L> StatsAggregator<L>
where
    L: LedgerStore,
{
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub async fn overview(&self) -> Result<LedgerOverview, LedgerError> {
        let stats = self.ledger.stats().await?;
        Ok(LedgerOverview {
            total_certificates: stats.count,
            total_blocks: stats.max_block_number,
            last_block_time: stats
                .last_timestamp
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        })
    }
}
