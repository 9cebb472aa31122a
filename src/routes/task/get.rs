use crate::db;
use crate::forms::{TaskFilter, TaskQuery};
use crate::helpers::{request_origin, JsonResponse};
use crate::middleware::authentication::Identity;
use crate::models;
use actix_web::{get, web, HttpRequest, Responder, Result};
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Get all tasks.", skip(identity, pg_pool))]
#[get("")]
pub async fn list(
    identity: web::ReqData<Arc<Identity>>,
    query: web::Query<TaskQuery>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let filter = TaskFilter::from(query.into_inner());
    db::task::fetch_by_user(pg_pool.get_ref(), identity.subject_id(), &filter)
        .await
        .map(|tasks| JsonResponse::build().set_item(tasks).ok("Tasks list."))
        .map_err(|err| JsonResponse::<Vec<models::Task>>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Get task statistics.", skip(identity, pg_pool))]
#[get("/stats")]
pub async fn stats(
    identity: web::ReqData<Arc<Identity>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::task::stats(pg_pool.get_ref(), identity.subject_id())
        .await
        .map(|stats| JsonResponse::build().set_item(stats).ok("Task statistics."))
        .map_err(|err| JsonResponse::<models::TaskStats>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Get recent activity.", skip(identity, pg_pool))]
#[get("/activity")]
pub async fn activity(
    identity: web::ReqData<Arc<Identity>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    db::activity::fetch_recent(
        pg_pool.get_ref(),
        identity.subject_id(),
        db::activity::RECENT_LIMIT,
    )
    .await
    .map(|entries| JsonResponse::build().set_item(entries).ok("Recent activity."))
    .map_err(|err| JsonResponse::<Vec<models::Activity>>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Export tasks.", skip(req, identity, pg_pool))]
#[get("/export")]
pub async fn export(
    req: HttpRequest,
    identity: web::ReqData<Arc<Identity>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let origin = request_origin(&req);
    db::task::export(pg_pool.get_ref(), identity.subject_id(), &origin)
        .await
        .map(|tasks| JsonResponse::build().set_item(tasks).ok("Tasks export."))
        .map_err(|err| JsonResponse::<Vec<models::Task>>::build().internal_server_error(err))
}

#[tracing::instrument(name = "Get task.", skip(identity, pg_pool))]
#[get("/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    identity: web::ReqData<Arc<Identity>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    db::task::fetch(pg_pool.get_ref(), id, identity.subject_id())
        .await
        .map_err(|err| JsonResponse::<models::Task>::build().internal_server_error(err))
        .and_then(|task| match task {
            Some(task) => Ok(JsonResponse::build().set_item(task).ok("Task details.")),
            None => Err(JsonResponse::<models::Task>::build().not_found("Task not found.")),
        })
}
