use crate::forms::LoginField;
use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

/// Fields of a new account; `password` is already hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<models::User>, String> {
    let query_span = tracing::info_span!("Fetch all users.");
    sqlx::query_as::<_, models::User>(r#"SELECT * FROM users ORDER BY created_at DESC, id DESC"#)
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch users, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn fetch(pool: &PgPool, id: i32) -> Result<Option<models::User>, String> {
    tracing::info!("Fetch user {}", id);
    sqlx::query_as::<_, models::User>(r#"SELECT * FROM users WHERE id=$1 LIMIT 1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch user, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn fetch_by_login(
    pool: &PgPool,
    field: LoginField<'_>,
) -> Result<Option<models::User>, String> {
    let query_span = tracing::info_span!("Fetch user by login field.");
    let (sql, value) = match field {
        LoginField::Email(email) => (r#"SELECT * FROM users WHERE email=$1 LIMIT 1"#, email),
        LoginField::Username(username) => {
            (r#"SELECT * FROM users WHERE username=$1 LIMIT 1"#, username)
        }
    };

    sqlx::query_as::<_, models::User>(sql)
        .bind(value)
        .fetch_optional(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch user, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

/// Whether another account (not `except_id`) already uses the email or username.
pub async fn is_taken(
    pool: &PgPool,
    email: Option<&str>,
    username: Option<&str>,
    except_id: Option<i32>,
) -> Result<bool, String> {
    let query_span = tracing::info_span!("Check username/email uniqueness.");
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
            WHERE (email = $1 OR username = $2)
              AND ($3::INT IS NULL OR id <> $3)
        )
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(except_id)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to check user uniqueness, error: {:?}", err);
        "Could not fetch data".to_string()
    })
}

pub async fn insert(pool: &PgPool, user: NewUser) -> Result<models::User, String> {
    let query_span = tracing::info_span!("Saving new user into the database");
    sqlx::query_as::<_, models::User>(
        r#"
        INSERT INTO users (username, email, password, full_name, phone, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW() at time zone 'utc', NOW() at time zone 'utc')
        RETURNING *
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.full_name)
    .bind(&user.phone)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map(|user| {
        tracing::info!("New user {} have been saved to database", user.id);
        user
    })
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: UserChanges,
) -> Result<Option<models::User>, String> {
    let query_span = tracing::info_span!("Updating user");
    sqlx::query_as::<_, models::User>(
        r#"
        UPDATE users
        SET
            username = COALESCE($2, username),
            email = COALESCE($3, email),
            password = COALESCE($4, password),
            full_name = COALESCE($5, full_name),
            phone = COALESCE($6, phone),
            updated_at = NOW() at time zone 'utc'
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.username)
    .bind(changes.email)
    .bind(changes.password)
    .bind(changes.full_name)
    .bind(changes.phone)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Could not update".to_string()
    })
}

/// Deletes the user with its tasks and activity. `false` if no such user.
#[tracing::instrument(name = "Delete user.", skip(pool))]
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, String> {
    let mut tx = pool.begin().await.map_err(|err| {
        tracing::error!("Failed to begin transaction: {:?}", err);
        "Failed to delete user".to_string()
    })?;

    sqlx::query::<sqlx::Postgres>("DELETE FROM tasks WHERE user_id = $1;")
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            tracing::error!("Failed to delete tasks of user: {:?}", err);
            "Failed to delete user".to_string()
        })?;

    sqlx::query::<sqlx::Postgres>("DELETE FROM activity_log WHERE user_id = $1;")
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            tracing::error!("Failed to delete activity of user: {:?}", err);
            "Failed to delete user".to_string()
        })?;

    let deleted = sqlx::query::<sqlx::Postgres>("DELETE FROM users WHERE id = $1;")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            tracing::error!("Failed to delete user: {:?}", err);
            "Failed to delete user".to_string()
        })?
        .rows_affected();

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit user deletion: {:?}", err);
        "Failed to delete user".to_string()
    })?;

    Ok(deleted > 0)
}
