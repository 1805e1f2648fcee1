mod errors;
mod refresh_task;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::display::DisplayBackend;
use crate::leaderboard::Board;
use crate::store::RankedStore;

pub use errors::RefreshError;
pub use refresh_task::refresh_one;

/// What every board refresh needs, shared by all spawned refresh tasks.
pub struct SchedulerContext {
    pub store: Arc<dyn RankedStore>,
    pub display: Arc<dyn DisplayBackend>,
    pub top_n: usize,
    pub query_timeout: Option<Duration>,
}

/// Fans one refresh per board out on every tick.
///
/// A board whose previous refresh has not finished is skipped for the tick
/// rather than queued, so a slow store never builds a backlog.
pub struct RefreshScheduler {
    ctx: Arc<SchedulerContext>,
    boards: Mutex<Vec<Arc<Board>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl RefreshScheduler {
    pub fn new(ctx: SchedulerContext) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            ctx: Arc::new(ctx),
            boards: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn RankedStore>,
        display: Arc<dyn DisplayBackend>,
    ) -> Self {
        let scheduler = Self::new(SchedulerContext {
            store,
            display,
            top_n: config.top_n,
            query_timeout: config.query_timeout,
        });

        for (id, board_config) in &config.boards {
            let board = Board::from_config(id, board_config, &config.currency_symbol);
            scheduler.add_board(Arc::new(board));
        }

        scheduler
    }

    fn lock_boards(&self) -> MutexGuard<'_, Vec<Arc<Board>>> {
        self.boards.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a board. A board with the same id is closed and replaced.
    pub fn add_board(&self, board: Arc<Board>) {
        let mut boards = self.lock_boards();
        if let Some(existing) = boards.iter_mut().find(|b| b.id() == board.id()) {
            existing.close();
            *existing = board;
        } else {
            info!(board_id = board.id(), metric = %board.metric(), "Board registered");
            boards.push(board);
        }
    }

    pub fn board(&self, id: &str) -> Option<Arc<Board>> {
        self.lock_boards().iter().find(|b| b.id() == id).cloned()
    }

    pub fn boards(&self) -> Vec<Arc<Board>> {
        self.lock_boards().clone()
    }

    /// Closes the board's handle and stops refreshing it. A refresh already
    /// in flight finishes but its result is discarded.
    pub fn remove_board(&self, id: &str) -> bool {
        let removed = {
            let mut boards = self.lock_boards();
            let index = boards.iter().position(|b| b.id() == id);
            index.map(|i| boards.remove(i))
        };

        match removed {
            Some(board) => {
                board.close();
                info!(board_id = id, "Board removed");
                true
            }
            None => false,
        }
    }

    /// Launches a refresh for every idle board and returns without waiting
    /// for any of them. Must be called from within a tokio runtime.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn tick(&self) -> Vec<JoinHandle<()>> {
        let mut launched = Vec::new();

        for board in self.boards() {
            let Some(guard) = board.try_begin_refresh() else {
                debug!(board_id = board.id(), "Board busy or closed, skipping this tick");
                continue;
            };
            let ctx = Arc::clone(&self.ctx);
            launched.push(tokio::spawn(refresh_task::refresh_board(ctx, guard)));
        }

        debug!(launched = launched.len(), "Tick dispatched");
        launched
    }

    /// Ticks every `period` until [`shutdown`](Self::shutdown). The first
    /// tick fires immediately.
    pub async fn run(self: Arc<Self>, period: Duration) {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown = self.shutdown_rx.clone();

        info!(period_secs = period.as_secs(), "Starting refresh scheduler");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    self.tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Refresh scheduler stopped");
    }

    /// Stops the tick loop and closes every board exactly once, whatever
    /// their in-flight state.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);

        let mut closed = 0;
        for board in self.boards() {
            if board.close() {
                closed += 1;
            }
        }
        info!(closed, "Scheduler shut down");
    }
}

pub fn spawn_scheduler(scheduler: Arc<RefreshScheduler>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(scheduler.run(period))
}
