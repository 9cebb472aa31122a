use crate::db;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{get, web, Responder, Result};
use sqlx::PgPool;

#[tracing::instrument(name = "Get all accounts.", skip(pg_pool))]
#[get("/fetch-all-accounts")]
pub async fn list(pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    db::user::fetch_all(pg_pool.get_ref())
        .await
        .map(|users| JsonResponse::build().set_item(users).ok("Users list."))
        .map_err(|err| JsonResponse::<Vec<models::User>>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Get account.", skip(pg_pool))]
#[get("/retrieve-account/{id}")]
pub async fn item(path: web::Path<(i32,)>, pg_pool: web::Data<PgPool>) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    db::user::fetch(pg_pool.get_ref(), id)
        .await
        .map_err(|err| JsonResponse::<models::User>::build().internal_server_error(err))
        .and_then(|user| match user {
            Some(user) => Ok(JsonResponse::build().set_item(user).ok("User details.")),
            None => Err(JsonResponse::<models::User>::build().not_found("User not found.")),
        })
}
