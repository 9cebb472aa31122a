use crate::db;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;

#[tracing::instrument(name = "Get all books.", skip(pg_pool))]
#[get("")]
pub async fn list(pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    db::book::fetch_all(pg_pool.get_ref())
        .await
        .map(|books| JsonResponse::build().set_item(books).ok("Books list."))
        .map_err(|err| JsonResponse::<Vec<models::Book>>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Get book.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item(path: web::Path<(i32,)>, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    db::book::fetch(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<models::Book>::build().internal_server_error(err))
        .and_then(|book| match book {
            Some(book) => Ok(JsonResponse::build().set_item(book).ok("Book details.")),
            None => Err(JsonResponse::<models::Book>::build().not_found("Book not found.")),
        })
}
