use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{CurrencySource, RankedStore, StoreError};
use crate::database::{points_db, Database};
use crate::leaderboard::rank_entry::sort_ranked;
use crate::leaderboard::{Metric, RankEntry};

/// Display precision for point totals.
pub const POINTS_DECIMALS: u8 = 2;

/// Points come from the SQLite ledger, currency from an optional external
/// economy source.
pub struct LeaderboardStore {
    database: Database,
    currency: Option<Arc<dyn CurrencySource>>,
}

impl LeaderboardStore {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            currency: None,
        }
    }

    pub fn with_currency_source(mut self, source: Arc<dyn CurrencySource>) -> Self {
        self.currency = Some(source);
        self
    }

    async fn top_points(&self, n: usize) -> Result<Vec<RankEntry>, StoreError> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let mut conn = self.database.get_new_connection().await?;
        let rows = points_db::query_top_players(&mut conn, limit).await?;

        debug!(count = rows.len(), "Fetched top players by points");
        Ok(rows
            .into_iter()
            .map(|row| RankEntry::new(row.player, row.points, POINTS_DECIMALS))
            .collect())
    }

    async fn top_currency(&self, n: usize) -> Result<Vec<RankEntry>, StoreError> {
        let source = self.currency.as_ref().ok_or_else(|| {
            StoreError::Unavailable("no economy provider is installed".to_string())
        })?;

        let mut entries: Vec<RankEntry> = source
            .snapshot()
            .await?
            .into_iter()
            .filter(|entry| {
                let valid = entry.value.is_finite() && entry.value >= 0.0;
                if !valid {
                    warn!(subject = %entry.subject, value = entry.value, "Skipping invalid balance");
                }
                valid
            })
            .collect();

        sort_ranked(&mut entries);
        entries.truncate(n);
        Ok(entries)
    }
}

#[async_trait]
impl RankedStore for LeaderboardStore {
    async fn increment(&self, subject: &str, amount: f64) -> Result<(), StoreError> {
        let mut conn = self.database.get_new_connection().await?;
        points_db::increment_points(&mut conn, subject, amount).await?;
        Ok(())
    }

    async fn top_n(&self, metric: Metric, n: usize) -> Result<Vec<RankEntry>, StoreError> {
        match metric {
            Metric::Points => self.top_points(n).await,
            Metric::Currency => self.top_currency(n).await,
        }
    }
}
