use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{put, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Update book.", skip(pg_pool))]
#[put("/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    form: web::Json<forms::BookUpdateForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let form = form.into_inner();

    if form.is_empty() {
        return Err(JsonResponse::<models::Book>::build().bad_request("No fields to update."));
    }
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid book data {:?}", errors);
        return Err(JsonResponse::<models::Book>::build().form_error(errors.to_string()));
    }

    let changes = db::book::BookChanges {
        title: form.title,
        author: form.author,
        genre: form.genre,
        year: form.year,
    };

    db::book::update(pg_pool.get_ref(), id, changes)
        .await
        .map_err(|err| JsonResponse::<models::Book>::build().internal_server_error(err))
        .and_then(|book| match book {
            Some(book) => Ok(JsonResponse::build()
                .set_item(book)
                .ok("Book updated successfully.")),
            None => Err(JsonResponse::<models::Book>::build().not_found("Book not found.")),
        })
}
