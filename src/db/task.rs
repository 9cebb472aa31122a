use crate::db::activity;
use crate::forms::TaskFilter;
use crate::models::{self, ActivityAction, Origin, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}

/// Escapes LIKE wildcards so the search term is matched literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn list_query<'a>(user_id: &'a str, filter: &'a TaskFilter) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM tasks WHERE user_id = ");
    builder.push_bind(user_id);

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }

    builder.push(" ORDER BY created_at DESC, id DESC");
    builder
}

pub async fn fetch_by_user(
    pool: &PgPool,
    user_id: &str,
    filter: &TaskFilter,
) -> Result<Vec<models::Task>, String> {
    let query_span = tracing::info_span!("Fetch tasks by user.", user_id = user_id);
    list_query(user_id, filter)
        .build_query_as::<models::Task>()
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch tasks, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn fetch(pool: &PgPool, id: i32, user_id: &str) -> Result<Option<models::Task>, String> {
    tracing::info!("Fetch task {}", id);
    sqlx::query_as::<_, models::Task>(
        r#"SELECT * FROM tasks WHERE id=$1 AND user_id=$2 LIMIT 1"#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch task, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn insert(
    pool: &PgPool,
    user_id: &str,
    task: NewTask,
    origin: &Origin,
) -> Result<models::Task, String> {
    let query_span = tracing::info_span!("Saving new task into the database");
    async move {
        let mut tx = pool.begin().await?;
        let task = sqlx::query_as::<_, models::Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, status, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW() at time zone 'utc', NOW() at time zone 'utc')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .fetch_one(&mut *tx)
        .await?;

        let details = format!("Created task: {}", task.title);
        activity::record(&mut *tx, user_id, ActivityAction::TaskCreated, &details, origin).await?;
        tx.commit().await?;
        Ok::<_, sqlx::Error>(task)
    }
    .instrument(query_span)
    .await
    .map(|task| {
        tracing::info!("New task {} have been saved to database", task.id);
        task
    })
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })
}

async fn apply_changes(
    conn: &mut PgConnection,
    id: i32,
    user_id: &str,
    changes: TaskChanges,
) -> Result<Option<models::Task>, sqlx::Error> {
    sqlx::query_as::<_, models::Task>(
        r#"
        UPDATE tasks
        SET
            title = COALESCE($3, title),
            description = COALESCE($4, description),
            priority = COALESCE($5, priority),
            status = COALESCE($6, status),
            due_date = COALESCE($7, due_date),
            updated_at = NOW() at time zone 'utc'
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(changes.title)
    .bind(changes.description)
    .bind(changes.priority.map(|p| p.as_str()))
    .bind(changes.status.map(|s| s.as_str()))
    .bind(changes.due_date)
    .fetch_optional(conn)
    .await
}

/// Applies `changes` and records `action` in the same transaction.
/// Nothing is recorded when the task does not exist.
async fn change_and_record(
    pool: &PgPool,
    id: i32,
    user_id: &str,
    changes: TaskChanges,
    action: ActivityAction,
    origin: &Origin,
) -> Result<Option<models::Task>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let task = match apply_changes(&mut *tx, id, user_id, changes).await? {
        Some(task) => task,
        None => return Ok(None),
    };

    let details = match action {
        ActivityAction::TaskStatusChanged => format!("Changed status to: {}", task.status),
        _ => format!("Updated task: {}", task.title),
    };
    activity::record(&mut *tx, user_id, action, &details, origin).await?;
    tx.commit().await?;
    Ok(Some(task))
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    user_id: &str,
    changes: TaskChanges,
    origin: &Origin,
) -> Result<Option<models::Task>, String> {
    let query_span = tracing::info_span!("Updating task");
    change_and_record(pool, id, user_id, changes, ActivityAction::TaskUpdated, origin)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            "Could not update".to_string()
        })
}

pub async fn set_status(
    pool: &PgPool,
    id: i32,
    user_id: &str,
    status: TaskStatus,
    origin: &Origin,
) -> Result<Option<models::Task>, String> {
    let query_span = tracing::info_span!("Changing task status");
    let changes = TaskChanges {
        status: Some(status),
        ..Default::default()
    };
    change_and_record(
        pool,
        id,
        user_id,
        changes,
        ActivityAction::TaskStatusChanged,
        origin,
    )
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Could not update".to_string()
    })
}

#[tracing::instrument(name = "Delete task.", skip(pool, origin))]
pub async fn delete(
    pool: &PgPool,
    id: i32,
    user_id: &str,
    origin: &Origin,
) -> Result<bool, String> {
    async move {
        let mut tx = pool.begin().await?;
        let title = sqlx::query_scalar::<_, String>(
            "DELETE FROM tasks WHERE id = $1 AND user_id = $2 RETURNING title;",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(title) = title else {
            return Ok(false);
        };
        let details = format!("Deleted task: {}", title);
        activity::record(&mut *tx, user_id, ActivityAction::TaskDeleted, &details, origin).await?;
        tx.commit().await?;
        Ok::<_, sqlx::Error>(true)
    }
    .await
    .map_err(|err| {
        tracing::error!("Failed to delete task: {:?}", err);
        "Failed to delete task".to_string()
    })
}

/// Every task of the user, newest first. The export itself is audited.
pub async fn export(
    pool: &PgPool,
    user_id: &str,
    origin: &Origin,
) -> Result<Vec<models::Task>, String> {
    let tasks = fetch_by_user(pool, user_id, &TaskFilter::default()).await?;

    let details = format!("Exported {} tasks", tasks.len());
    let mut conn = pool.acquire().await.map_err(|err| {
        tracing::error!("Failed to acquire connection: {:?}", err);
        "Could not fetch data".to_string()
    })?;
    activity::record(&mut *conn, user_id, ActivityAction::TasksExported, &details, origin)
        .await
        .map_err(|err| {
            tracing::error!("Failed to record export: {:?}", err);
            "Could not fetch data".to_string()
        })?;

    Ok(tasks)
}

pub async fn stats(pool: &PgPool, user_id: &str) -> Result<models::TaskStats, String> {
    let query_span = tracing::info_span!("Task statistics.", user_id = user_id);
    sqlx::query_as::<_, models::TaskStats>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE status = 'completed') AS completed,
            COUNT(*) FILTER (WHERE status = 'pending') AS pending,
            COUNT(*) FILTER (WHERE priority = 'high') AS high_priority
        FROM tasks
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to count tasks: {:?}", err);
        "Could not fetch data".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("report"), "%report%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_list_query_only_filters_on_given_fields() {
        let filter = TaskFilter::default();
        let mut builder = list_query("7", &filter);
        let sql = builder.build().sql().to_string();
        assert_eq!(
            sql,
            "SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );

        let filter = TaskFilter {
            search: Some("rent".to_string()),
            priority: Some(TaskPriority::High),
            status: Some(TaskStatus::Pending),
        };
        let mut builder = list_query("7", &filter);
        let sql = builder.build().sql().to_string();
        assert_eq!(
            sql,
            "SELECT * FROM tasks WHERE user_id = $1 \
             AND (title ILIKE $2 OR description ILIKE $3) \
             AND priority = $4 AND status = $5 \
             ORDER BY created_at DESC, id DESC"
        );
    }
}
