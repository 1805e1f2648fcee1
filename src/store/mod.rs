mod economy_cache;
mod leaderboard_store;

use std::time::Duration;

use async_trait::async_trait;

use crate::leaderboard::{Metric, RankEntry};

pub use economy_cache::EconomyCache;
pub use leaderboard_store::{LeaderboardStore, POINTS_DECIMALS};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transient failure talking to the backing store.
    #[error("store I/O failure: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The ranking source for a metric is not installed at all.
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("store query timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn io(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Io(error.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::Io(Box::new(error))
    }
}

/// Asynchronous player-keyed store supporting additive increments and
/// top-N queries per metric.
#[async_trait]
pub trait RankedStore: Send + Sync {
    async fn increment(&self, subject: &str, amount: f64) -> Result<(), StoreError>;

    /// Entries ordered by [`RankEntry::rank_cmp`], at most `n` of them.
    async fn top_n(&self, metric: Metric, n: usize) -> Result<Vec<RankEntry>, StoreError>;
}

/// Read-only view over balances kept by an external economy provider.
#[async_trait]
pub trait CurrencySource: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<RankEntry>, StoreError>;
}
