use crate::display::DisplayError;
use crate::store::StoreError;

/// Why a single board refresh did not update its display. Always contained
/// at the board boundary.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("board '{board_id}' has no position configured")]
    MissingPosition { board_id: String },

    #[error("world '{world}' for board '{board_id}' is not loaded")]
    WorldNotLoaded { board_id: String, world: String },

    #[error("query for board '{board_id}' failed: {source}")]
    Query {
        board_id: String,
        #[source]
        source: StoreError,
    },

    #[error("display for board '{board_id}' could not be placed: {source}")]
    Display {
        board_id: String,
        #[source]
        source: DisplayError,
    },
}

impl RefreshError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingPosition { .. } | Self::WorldNotLoaded { .. }
        )
    }
}
