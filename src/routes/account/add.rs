use crate::auth::hash_password;
use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Register account.", skip(form, pg_pool, settings))]
#[post("/register-account")]
pub async fn add(
    form: web::Json<forms::AccountForm>,
    pg_pool: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    if form.username.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty()
    {
        return Err(JsonResponse::<models::User>::build()
            .bad_request("Please provide username, email and password."));
    }
    if !forms::is_valid_email(&form.email) {
        return Err(JsonResponse::<models::User>::build().bad_request("Invalid email format."));
    }
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid account data {:?}", errors);
        return Err(JsonResponse::<models::User>::build().form_error(errors.to_string()));
    }

    let pool = pg_pool.get_ref();
    let taken = db::user::is_taken(pool, Some(&form.email), Some(&form.username), None)
        .await
        .map_err(|err| JsonResponse::<models::User>::build().internal_server_error(err))?;
    if taken {
        return Err(JsonResponse::<models::User>::build()
            .bad_request("User already exists (username or email)."));
    }

    let password = hash_password(&form.password, settings.auth.bcrypt_cost)
        .await
        .map_err(|err| {
            tracing::error!("Failed to hash password: {:?}", err);
            JsonResponse::<models::User>::build().internal_server_error("")
        })?;

    let new_user = db::user::NewUser {
        username: form.username,
        email: form.email,
        password,
        full_name: form.full_name,
        phone: form.phone,
    };

    db::user::insert(pool, new_user)
        .await
        .map(|user| {
            JsonResponse::build()
                .set_item(user)
                .created("User created successfully.")
        })
        .map_err(|err| JsonResponse::<models::User>::build().internal_server_error(err))
}
