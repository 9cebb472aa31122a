use crate::db;
use crate::forms;
use crate::helpers::{request_origin, JsonResponse};
use crate::middleware::authentication::Identity;
use crate::models;
use actix_web::{post, web, HttpRequest, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;
use std::sync::Arc;

#[tracing::instrument(name = "Add task.", skip(req, identity, pg_pool))]
#[post("")]
pub async fn add(
    req: HttpRequest,
    identity: web::ReqData<Arc<Identity>>,
    form: web::Json<forms::TaskForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid task data {:?}", errors);
        return Err(JsonResponse::<models::Task>::build().form_error(errors.to_string()));
    }

    let form = form.into_inner();
    let task = db::task::NewTask {
        priority: form.priority_or_default(),
        status: form.known_status().unwrap_or_default(),
        title: form.title,
        description: form.description.unwrap_or_default(),
        due_date: form.due_date,
    };

    let origin = request_origin(&req);
    db::task::insert(pg_pool.get_ref(), identity.subject_id(), task, &origin)
        .await
        .map(|task| {
            JsonResponse::build()
                .set_item(task)
                .created("Task created successfully.")
        })
        .map_err(|err| JsonResponse::<models::Task>::build().internal_server_error(err))
}
