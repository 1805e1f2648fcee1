use sqlx::{Error, FromRow, SqliteConnection};

#[derive(Debug, Clone, FromRow)]
pub struct PlayerPoints {
    pub player: String,
    pub points: f64,
}

pub async fn create_schema(conn: &mut SqliteConnection) -> Result<(), Error> {
    sqlx::query(
        r#"
            CREATE TABLE IF NOT EXISTS island_points (
                player TEXT PRIMARY KEY NOT NULL,
                points REAL NOT NULL DEFAULT 0
            )
        "#,
    )
    .execute(conn)
    .await?;
    Ok(())
}

/// Adds `points` to the player's total, creating the row on first use.
pub async fn increment_points(
    conn: &mut SqliteConnection,
    player: &str,
    points: f64,
) -> Result<(), Error> {
    sqlx::query(
        r#"
            INSERT INTO island_points (player, points)
            VALUES (?, ?)
            ON CONFLICT(player) DO UPDATE SET points = points + excluded.points
        "#,
    )
    .bind(player)
    .bind(points)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn query_top_players(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<PlayerPoints>, Error> {
    let rows = sqlx::query_as::<_, PlayerPoints>(
        r#"
            SELECT player, points
            FROM island_points
            ORDER BY points DESC, player ASC
            LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

pub async fn query_player_points(
    conn: &mut SqliteConnection,
    player: &str,
) -> Result<Option<PlayerPoints>, Error> {
    let row = sqlx::query_as::<_, PlayerPoints>(
        r#"
            SELECT player, points
            FROM island_points
            WHERE player = ?
        "#,
    )
    .bind(player)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}
