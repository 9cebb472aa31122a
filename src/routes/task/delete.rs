use crate::db;
use crate::helpers::{request_origin, JsonResponse};
use crate::middleware::authentication::Identity;
use actix_web::{delete, web, HttpRequest, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Delete task.", skip(req, identity, pg_pool))]
#[delete("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(i32,)>,
    identity: web::ReqData<Arc<Identity>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let origin = request_origin(&req);
    db::task::delete(pg_pool.get_ref(), id, identity.subject_id(), &origin)
        .await
        .map_err(|err| JsonResponse::<()>::build().internal_server_error(err))
        .and_then(|deleted| match deleted {
            true => Ok(JsonResponse::<()>::build().ok("Task deleted successfully.")),
            false => Err(JsonResponse::<()>::build().not_found("Task not found.")),
        })
}
