use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::formatter::Formatter;
use super::rank_entry::{Metric, RankEntry};
use crate::config::BoardConfig;
use crate::display::{DisplayBackend, DisplayHandle, Position};
use crate::scheduler::RefreshError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Unplaced,
    Placed,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Updated,
    Unchanged,
    /// The board was closed while the refresh was in flight.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub position: Option<Position>,
    pub world: String,
}

#[derive(Debug)]
struct BoardInner {
    placement: Placement,
    relocated: bool,
    state: BoardState,
    handle: Option<Box<dyn DisplayHandle>>,
    last_snapshot: Option<Vec<RankEntry>>,
    last_text: Option<String>,
}

/// One configured leaderboard surface.
///
/// `in_flight` is claimed by the scheduler before a refresh is spawned and
/// released by [`InFlightGuard`]. Everything else sits behind one mutex that
/// is never held across an await.
#[derive(Debug)]
pub struct Board {
    id: String,
    title: String,
    metric: Metric,
    formatter: Formatter,
    in_flight: AtomicBool,
    inner: Mutex<BoardInner>,
}

impl Board {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        metric: Metric,
        formatter: Formatter,
        placement: Placement,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            metric,
            formatter,
            in_flight: AtomicBool::new(false),
            inner: Mutex::new(BoardInner {
                placement,
                relocated: false,
                state: BoardState::Unplaced,
                handle: None,
                last_snapshot: None,
                last_text: None,
            }),
        }
    }

    pub fn from_config(id: &str, config: &BoardConfig, currency_symbol: &str) -> Self {
        Self::new(
            id,
            config.title.clone(),
            config.metric,
            Formatter::for_metric(config.metric, currency_symbol),
            Placement {
                position: config.position,
                world: config.world.clone(),
            },
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    fn lock(&self) -> MutexGuard<'_, BoardInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> BoardState {
        self.lock().state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn placement(&self) -> Placement {
        self.lock().placement.clone()
    }

    pub fn last_snapshot(&self) -> Option<Vec<RankEntry>> {
        self.lock().last_snapshot.clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.lock().last_text.clone()
    }

    /// Claims the board for one refresh. `None` if a refresh is already
    /// outstanding or the board is closed.
    pub fn try_begin_refresh(self: &Arc<Self>) -> Option<InFlightGuard> {
        if self.state() == BoardState::Closed {
            return None;
        }
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(InFlightGuard {
            board: Arc::clone(self),
        })
    }

    /// Operator surface: move the board. The existing handle is replaced on
    /// the next successful apply, not here.
    pub fn set_position(&self, position: Option<Position>, world: impl Into<String>) {
        let mut inner = self.lock();
        let placement = Placement {
            position,
            world: world.into(),
        };
        if inner.placement == placement {
            return;
        }
        info!(board_id = %self.id, position = ?placement.position, world = %placement.world, "Board placement changed");
        inner.placement = placement;
        inner.relocated = inner.handle.is_some();
    }

    /// Host signal that the handle was despawned outside of this board.
    pub fn handle_despawned(&self) {
        let mut inner = self.lock();
        if inner.state != BoardState::Placed {
            return;
        }
        warn!(board_id = %self.id, "Display handle despawned by host, will recreate");
        if let Some(mut handle) = inner.handle.take() {
            handle.close();
        }
        inner.state = BoardState::Unplaced;
        inner.last_text = None;
    }

    /// Writes `text` to the board's handle, creating it first if needed.
    /// A `snapshot` is recorded only for successful queries.
    pub fn apply(
        &self,
        backend: &dyn DisplayBackend,
        text: &str,
        snapshot: Option<Vec<RankEntry>>,
    ) -> Result<ApplyOutcome, RefreshError> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if inner.state == BoardState::Closed {
            debug!(board_id = %self.id, "Board closed during refresh, discarding result");
            return Ok(ApplyOutcome::Discarded);
        }

        if inner.relocated {
            if let Some(mut handle) = inner.handle.take() {
                handle.close();
            }
            inner.relocated = false;
            inner.state = BoardState::Unplaced;
            inner.last_text = None;
        }

        if inner.handle.as_ref().is_some_and(|h| h.is_closed()) {
            warn!(board_id = %self.id, "Display handle was invalidated, recreating");
            inner.handle = None;
            inner.state = BoardState::Unplaced;
            inner.last_text = None;
        }

        let mut outcome = ApplyOutcome::Updated;
        if inner.handle.is_none() {
            let position = inner
                .placement
                .position
                .ok_or_else(|| RefreshError::MissingPosition {
                    board_id: self.id.clone(),
                })?;
            let handle = backend
                .create(position, &inner.placement.world, &self.title)
                .map_err(|source| RefreshError::Display {
                    board_id: self.id.clone(),
                    source,
                })?;
            info!(board_id = %self.id, %position, world = %inner.placement.world, "Placed board display");
            inner.handle = Some(handle);
            inner.state = BoardState::Placed;
            outcome = ApplyOutcome::Created;
        }

        if inner.last_text.as_deref() == Some(text) {
            outcome = ApplyOutcome::Unchanged;
        } else if let Some(handle) = inner.handle.as_mut() {
            handle.set_text(text);
            inner.last_text = Some(text.to_string());
        }

        if let Some(snapshot) = snapshot {
            inner.last_snapshot = Some(snapshot);
        }

        Ok(outcome)
    }

    /// Closes the board for good. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let mut inner = self.lock();
        if inner.state == BoardState::Closed {
            return false;
        }
        inner.state = BoardState::Closed;
        if let Some(mut handle) = inner.handle.take() {
            handle.close();
        }
        info!(board_id = %self.id, "Board closed");
        true
    }
}

/// Holds a board's in-flight claim; dropping it releases the claim, even if
/// the refresh task panics.
#[derive(Debug)]
pub struct InFlightGuard {
    board: Arc<Board>,
}

impl InFlightGuard {
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.board.in_flight.store(false, Ordering::Release);
    }
}
