mod block_points;
mod events;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::store::RankedStore;

pub use block_points::BlockPoints;
pub use events::ScoredEvent;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerError {
    #[error("point amount {0} is not a finite, non-negative number")]
    InvalidAmount(f64),
}

/// Entry point for scored events. Writes are fire-and-forget: the caller
/// gets a handle it may ignore, and a failed write is logged and dropped.
pub struct PointsLedger {
    store: Arc<dyn RankedStore>,
    block_points: BlockPoints,
}

impl PointsLedger {
    pub fn new(store: Arc<dyn RankedStore>, block_points: BlockPoints) -> Self {
        Self {
            store,
            block_points,
        }
    }

    pub fn add_points(&self, player: &str, amount: f64) -> Result<JoinHandle<()>, LedgerError> {
        if !amount.is_finite() || amount < 0.0 {
            warn!(player, amount, "Rejected point award");
            return Err(LedgerError::InvalidAmount(amount));
        }

        let store = Arc::clone(&self.store);
        let player = player.to_string();
        Ok(tokio::spawn(async move {
            match store.increment(&player, amount).await {
                Ok(()) => debug!(player = %player, amount, "Points recorded"),
                Err(e) => error!(player = %player, amount, error = ?e, "Failed to record points"),
            }
        }))
    }

    /// Awards the configured points for a placed block. `None` when the
    /// block is worth nothing.
    pub fn record_block_placed(&self, player: &str, block: &str) -> Option<JoinHandle<()>> {
        let points = self.block_points.points_for(block);
        if points <= 0.0 {
            return None;
        }
        self.add_points(player, points).ok()
    }

    pub fn handle(&self, event: &ScoredEvent) -> Option<JoinHandle<()>> {
        match event {
            ScoredEvent::Points { player, amount } => self.add_points(player, *amount).ok(),
            ScoredEvent::BlockPlaced { player, block } => self.record_block_placed(player, block),
        }
    }
}
