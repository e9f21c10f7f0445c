//! Service wiring: which ledger store backs the process, and the domain
//! services constructed over it.

use std::sync::Arc;

use sqlx::PgPool;

use certledger_infra::{InMemoryLedgerStore, InMemoryRegistry, PostgresLedgerStore};
use certledger_ledger::{IssuanceService, LedgerStore, StatsAggregator, VerificationService};

/// Store handle shared by every service; picked once at startup.
pub type SharedLedgerStore = Arc<dyn LedgerStore>;

pub type ApiIssuanceService = IssuanceService<
    SharedLedgerStore,
    Arc<InMemoryRegistry>,
    Arc<InMemoryRegistry>,
    Arc<InMemoryRegistry>,
>;
pub type ApiVerificationService = VerificationService<SharedLedgerStore, Arc<InMemoryRegistry>>;

/// Everything the handlers need, behind one `Extension<Arc<AppServices>>`.
pub struct AppServices {
    pub registry: Arc<InMemoryRegistry>,
    pub ledger: SharedLedgerStore,
    pub issuance: ApiIssuanceService,
    pub verification: ApiVerificationService,
    pub stats: StatsAggregator<SharedLedgerStore>,
}

impl AppServices {
    /// Wire all services over one ledger store and one registry.
    pub fn new(ledger: SharedLedgerStore, registry: Arc<InMemoryRegistry>) -> Self {
        let issuance = IssuanceService::new(
            ledger.clone(),
            registry.clone(),
            registry.clone(),
            registry.clone(),
        );
        let verification = VerificationService::new(ledger.clone(), registry.clone());
        let stats = StatsAggregator::new(ledger.clone());

        Self {
            registry,
            ledger,
            issuance,
            verification,
            stats,
        }
    }

    /// In-memory stores (dev/test default).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryRegistry::new()),
        )
    }
}

/// Pick the ledger store from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects the Postgres-backed ledger store
/// (requires `DATABASE_URL`); anything else runs fully in memory. The
/// registry stays in-memory either way: it stands in for the external system
/// that owns student/course/certificate records.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if !use_persistent {
        tracing::info!("ledger store: in-memory");
        return AppServices::in_memory();
    }

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    tracing::info!("ledger store: postgres");
    AppServices::new(
        Arc::new(PostgresLedgerStore::new(pool)),
        Arc::new(InMemoryRegistry::new()),
    )
}
