use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::Connection;
use tracing::{debug, info};

use crate::database::points_db;
use crate::store::StoreError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the points database. Each operation opens its own
/// connection, so concurrent board refreshes never share one.
#[derive(Debug, Clone)]
pub struct Database {
    options: SqliteConnectOptions,
}

impl Database {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let database = Self { options };
        let mut conn = database.get_new_connection().await?;
        points_db::create_schema(&mut conn).await?;

        info!(path = %path.display(), "Points database ready");
        Ok(database)
    }

    pub async fn get_new_connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!("Getting new database connection");
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::from)
    }
}
