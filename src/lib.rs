pub mod config;
pub mod database;
pub mod display;
pub mod leaderboard;
pub mod ledger;
pub mod logging;
pub mod scheduler;
pub mod store;
pub mod util;

#[cfg(test)]
mod testing;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
