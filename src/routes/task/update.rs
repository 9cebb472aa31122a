use crate::db;
use crate::forms;
use crate::helpers::{request_origin, JsonResponse};
use crate::middleware::authentication::Identity;
use crate::models;
use actix_web::{post, put, web, HttpRequest, Responder, Result};
use serde_derive::Serialize;
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Update task.", skip(req, identity, pg_pool))]
#[put("/{id}")]
pub async fn item(
    req: HttpRequest,
    path: web::Path<(i32,)>,
    identity: web::ReqData<Arc<Identity>>,
    form: web::Json<forms::TaskForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid task data {:?}", errors);
        return Err(JsonResponse::<models::Task>::build().form_error(errors.to_string()));
    }

    let form = form.into_inner();
    let changes = db::task::TaskChanges {
        priority: form.known_priority(),
        status: form.known_status(),
        title: Some(form.title),
        description: form.description,
        due_date: form.due_date,
    };

    let origin = request_origin(&req);
    db::task::update(pg_pool.get_ref(), id, identity.subject_id(), changes, &origin)
        .await
        .map_err(|err| JsonResponse::<models::Task>::build().internal_server_error(err))
        .and_then(|task| match task {
            Some(task) => Ok(JsonResponse::build()
                .set_item(task)
                .ok("Task updated successfully.")),
            None => Err(JsonResponse::<models::Task>::build().not_found("Task not found.")),
        })
}

#[derive(Debug, Serialize)]
pub struct ToggledStatus {
    pub id: i32,
    pub status: models::TaskStatus,
}

#[tracing::instrument(name = "Toggle task status.", skip(req, identity, pg_pool))]
#[post("/{id}/toggle")]
pub async fn toggle(
    req: HttpRequest,
    path: web::Path<(i32,)>,
    identity: web::ReqData<Arc<Identity>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let pool = pg_pool.get_ref();

    let task = db::task::fetch(pool, id, identity.subject_id())
        .await
        .map_err(|err| JsonResponse::<ToggledStatus>::build().internal_server_error(err))?
        .ok_or_else(|| JsonResponse::<ToggledStatus>::build().not_found("Task not found."))?;

    let status = task.status().toggled();
    let origin = request_origin(&req);
    db::task::set_status(pool, id, identity.subject_id(), status, &origin)
        .await
        .map_err(|err| JsonResponse::<ToggledStatus>::build().internal_server_error(err))
        .and_then(|task| match task {
            Some(task) => Ok(JsonResponse::build()
                .set_item(ToggledStatus {
                    id: task.id,
                    status: task.status(),
                })
                .ok("Task status updated.")),
            None => Err(JsonResponse::<ToggledStatus>::build().not_found("Task not found.")),
        })
}
