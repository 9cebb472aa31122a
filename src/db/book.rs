use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<models::Book>, String> {
    let query_span = tracing::info_span!("Fetch all books.");
    sqlx::query_as::<_, models::Book>(r#"SELECT * FROM books ORDER BY id DESC"#)
        .fetch_all(pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch books, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn fetch(pool: &PgPool, id: i32) -> Result<Option<models::Book>, String> {
    tracing::info!("Fetch book {}", id);
    sqlx::query_as::<_, models::Book>(r#"SELECT * FROM books WHERE id=$1 LIMIT 1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch book, error: {:?}", err);
            "Could not fetch data".to_string()
        })
}

pub async fn insert(pool: &PgPool, book: NewBook) -> Result<models::Book, String> {
    let query_span = tracing::info_span!("Saving new book into the database");
    sqlx::query_as::<_, models::Book>(
        r#"
        INSERT INTO books (title, author, genre, year, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW() at time zone 'utc', NOW() at time zone 'utc')
        RETURNING *
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.genre)
    .bind(book.year)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map(|book| {
        tracing::info!("New book {} have been saved to database", book.id);
        book
    })
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Failed to insert".to_string()
    })
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: BookChanges,
) -> Result<Option<models::Book>, String> {
    let query_span = tracing::info_span!("Updating book");
    sqlx::query_as::<_, models::Book>(
        r#"
        UPDATE books
        SET
            title = COALESCE($2, title),
            author = COALESCE($3, author),
            genre = COALESCE($4, genre),
            year = COALESCE($5, year),
            updated_at = NOW() at time zone 'utc'
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.title)
    .bind(changes.author)
    .bind(changes.genre)
    .bind(changes.year)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        "Could not update".to_string()
    })
}

#[tracing::instrument(name = "Delete book.", skip(pool))]
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, String> {
    sqlx::query::<sqlx::Postgres>("DELETE FROM books WHERE id = $1;")
        .bind(id)
        .execute(pool)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete book: {:?}", err);
            "Failed to delete book".to_string()
        })
}
