use crate::auth::hash_password;
use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{put, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Modify account.", skip(form, pg_pool, settings))]
#[put("/modify-account/{id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    form: web::Json<forms::AccountUpdateForm>,
    pg_pool: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    let (id,) = path.into_inner();
    let form = form.into_inner();

    if form.is_empty() {
        return Err(JsonResponse::<models::User>::build().bad_request("No fields to update."));
    }
    if let Some(email) = form.email.as_deref() {
        if !forms::is_valid_email(email) {
            return Err(JsonResponse::<models::User>::build().bad_request("Invalid email format."));
        }
    }
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid account data {:?}", errors);
        return Err(JsonResponse::<models::User>::build().form_error(errors.to_string()));
    }

    let pool = pg_pool.get_ref();
    if form.email.is_some() || form.username.is_some() {
        let taken = db::user::is_taken(
            pool,
            form.email.as_deref(),
            form.username.as_deref(),
            Some(id),
        )
        .await
        .map_err(|err| JsonResponse::<models::User>::build().internal_server_error(err))?;
        if taken {
            return Err(JsonResponse::<models::User>::build()
                .bad_request("User already exists (username or email)."));
        }
    }

    let password = match form.password.as_deref() {
        Some(password) => Some(
            hash_password(password, settings.auth.bcrypt_cost)
                .await
                .map_err(|err| {
                    tracing::error!("Failed to hash password: {:?}", err);
                    JsonResponse::<models::User>::build().internal_server_error("")
                })?,
        ),
        None => None,
    };

    let changes = db::user::UserChanges {
        username: form.username,
        email: form.email,
        password,
        full_name: form.full_name,
        phone: form.phone,
    };

    db::user::update(pool, id, changes)
        .await
        .map_err(|err| JsonResponse::<models::User>::build().internal_server_error(err))
        .and_then(|user| match user {
            Some(user) => Ok(JsonResponse::build()
                .set_item(user)
                .ok("User updated successfully.")),
            None => Err(JsonResponse::<models::User>::build().not_found("User not found.")),
        })
}
