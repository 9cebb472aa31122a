use crate::models::{self, ActivityAction, Origin};
use sqlx::{PgConnection, PgPool};
use tracing::Instrument;

/// Number of entries returned by the activity feed.
pub const RECENT_LIMIT: i64 = 10;

/// Appends an audit entry on `conn`, usually the transaction of the change it records.
pub async fn record(
    conn: &mut PgConnection,
    user_id: &str,
    action: ActivityAction,
    details: &str,
    origin: &Origin,
) -> Result<(), sqlx::Error> {
    sqlx::query::<sqlx::Postgres>(
        r#"
        INSERT INTO activity_log (user_id, action, details, ip_address, user_agent, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW() at time zone 'utc')
        "#,
    )
    .bind(user_id)
    .bind(action.as_str())
    .bind(details)
    .bind(&origin.ip_address)
    .bind(&origin.user_agent)
    .execute(conn)
    .await
    .map(|_| ())
}

pub async fn fetch_recent(
    pool: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<models::Activity>, String> {
    let query_span = tracing::info_span!("Fetch recent activity.", user_id = user_id);
    sqlx::query_as::<_, models::Activity>(
        r#"
        SELECT * FROM activity_log
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch activity, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}
