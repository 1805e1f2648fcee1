use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{CurrencySource, StoreError};
use crate::leaderboard::RankEntry;

#[derive(Debug, Clone, Copy)]
struct Balance {
    amount: f64,
    decimals: u8,
}

/// In-process balance cache an economy integration keeps current. Boards on
/// the currency metric read from it.
#[derive(Debug, Default)]
pub struct EconomyCache {
    balances: RwLock<HashMap<String, Balance>>,
}

impl EconomyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, player: &str, amount: f64, decimals: u8) -> Result<(), StoreError> {
        let mut balances = self
            .balances
            .write()
            .map_err(|_| StoreError::io("economy cache lock poisoned"))?;
        balances.insert(player.to_string(), Balance { amount, decimals });
        Ok(())
    }

    pub fn remove(&self, player: &str) -> Result<bool, StoreError> {
        let mut balances = self
            .balances
            .write()
            .map_err(|_| StoreError::io("economy cache lock poisoned"))?;
        Ok(balances.remove(player).is_some())
    }
}

#[async_trait]
impl CurrencySource for EconomyCache {
    async fn snapshot(&self) -> Result<Vec<RankEntry>, StoreError> {
        let balances = self
            .balances
            .read()
            .map_err(|_| StoreError::io("economy cache lock poisoned"))?;
        Ok(balances
            .iter()
            .map(|(player, balance)| RankEntry::new(player.clone(), balance.amount, balance.decimals))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_reflects_latest_balances() {
        let cache = EconomyCache::new();
        cache.set_balance("alice", 10.0, 2).unwrap();
        cache.set_balance("bob", 5.0, 2).unwrap();
        cache.set_balance("alice", 12.5, 2).unwrap();
        assert!(cache.remove("bob").unwrap());
        assert!(!cache.remove("bob").unwrap());

        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(snapshot, vec![RankEntry::new("alice", 12.5, 2)]);
    }
}
