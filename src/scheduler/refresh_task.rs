use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::leaderboard::board::{ApplyOutcome, InFlightGuard};
use crate::leaderboard::{Board, Formatter, Metric, RankEntry};
use crate::scheduler::{RefreshError, SchedulerContext};
use crate::store::StoreError;

/// Task body for one board. Every error stops here; the guard releases the
/// board's in-flight claim when the task ends.
pub(crate) async fn refresh_board(ctx: Arc<SchedulerContext>, guard: InFlightGuard) {
    let board = Arc::clone(guard.board());

    match refresh_one(&ctx, &board).await {
        Ok(outcome) => {
            debug!(board_id = board.id(), outcome = ?outcome, "Board refresh finished");
        }
        Err(e) if e.is_configuration() => {
            warn!(board_id = board.id(), error = %e, "Board is not placeable, skipping this tick");
        }
        Err(e) => {
            error!(board_id = board.id(), error = ?e, "Board refresh failed, keeping last display");
        }
    }

    drop(guard);
}

#[tracing::instrument(level = "debug", skip_all, fields(board_id = board.id(), metric = %board.metric()))]
pub async fn refresh_one(
    ctx: &SchedulerContext,
    board: &Board,
) -> Result<ApplyOutcome, RefreshError> {
    let placement = board.placement();
    if placement.position.is_none() {
        return Err(RefreshError::MissingPosition {
            board_id: board.id().to_string(),
        });
    }
    if !ctx.display.is_world_loaded(&placement.world) {
        return Err(RefreshError::WorldNotLoaded {
            board_id: board.id().to_string(),
            world: placement.world,
        });
    }

    match query_top(ctx, board.metric()).await {
        Ok(entries) => {
            let text = board.formatter().render(board.title(), &entries);
            board.apply(ctx.display.as_ref(), &text, Some(entries))
        }
        Err(StoreError::Unavailable(reason)) => {
            warn!(board_id = board.id(), reason = %reason, "Ranking source unavailable, showing fallback");
            let text = Formatter::render_unavailable(board.title());
            board.apply(ctx.display.as_ref(), &text, None)
        }
        Err(source) => Err(RefreshError::Query {
            board_id: board.id().to_string(),
            source,
        }),
    }
}

async fn query_top(ctx: &SchedulerContext, metric: Metric) -> Result<Vec<RankEntry>, StoreError> {
    let query = ctx.store.top_n(metric, ctx.top_n);
    match ctx.query_timeout {
        Some(limit) => tokio::time::timeout(limit, query)
            .await
            .map_err(|_| StoreError::Timeout(limit))?,
        None => query.await,
    }
}
