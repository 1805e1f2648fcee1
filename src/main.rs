use std::sync::Arc;

use omniboard::config;
use omniboard::database::Database;
use omniboard::display::LogDisplay;
use omniboard::ledger::{BlockPoints, PointsLedger, ScoredEvent};
use omniboard::logging;
use omniboard::scheduler::{self, RefreshScheduler};
use omniboard::store::{LeaderboardStore, RankedStore};
use omniboard::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    if std::env::var("RUST_BACKTRACE").is_err() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let cfg = config::load_config()?;

    logging::init(&cfg.log)?;
    info!("Logging Initialised. Initialising Omniboard");

    let database = Database::open(&cfg.database_path).await?;
    let store: Arc<dyn RankedStore> = Arc::new(LeaderboardStore::new(database));
    let display = Arc::new(LogDisplay::new(cfg.loaded_worlds.clone()));

    let ledger = Arc::new(PointsLedger::new(
        store.clone(),
        BlockPoints::new(cfg.block_points.clone()),
    ));

    let refresher = Arc::new(RefreshScheduler::from_config(&cfg, store, display));
    let scheduler_task = scheduler::spawn_scheduler(refresher.clone(), cfg.refresh_interval);
    tokio::spawn(read_host_events(ledger));

    info!("Setup complete. Waiting for shutdown signal");
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received");
    refresher.shutdown();
    scheduler_task.await?;
    Ok(())
}

/// Scored events arrive one per line on stdin.
async fn read_host_events(ledger: Arc<PointsLedger>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match ScoredEvent::parse(&line) {
                Some(event) => {
                    ledger.handle(&event);
                }
                None => warn!(line = %line, "Ignoring malformed event"),
            },
            Ok(None) => {
                info!("Event feed closed");
                break;
            }
            Err(e) => {
                warn!(error = ?e, "Event feed read failed");
                break;
            }
        }
    }
}
