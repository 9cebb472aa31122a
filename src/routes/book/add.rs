use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Add book.", skip(pg_pool))]
#[post("")]
pub async fn add(
    form: web::Json<forms::BookForm>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid book data {:?}", errors);
        return Err(JsonResponse::<models::Book>::build().form_error(errors.to_string()));
    }

    let form = form.into_inner();
    let book = db::book::NewBook {
        title: form.title,
        author: form.author,
        genre: form.genre,
        year: form.year,
    };

    db::book::insert(pg_pool.get_ref(), book)
        .await
        .map(|book| {
            JsonResponse::build()
                .set_item(book)
                .created("Book created successfully.")
        })
        .map_err(|err| JsonResponse::<models::Book>::build().internal_server_error(err))
}
