use crate::auth::hash_password;
use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models::UserSummary;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::PgPool;

#[tracing::instrument(name = "Sign up.", skip(form, pg_pool, settings))]
#[post("/signup")]
pub async fn signup(
    form: web::Json<forms::SignupForm>,
    pg_pool: web::Data<PgPool>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    if form.username.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty()
    {
        return Err(JsonResponse::<UserSummary>::build()
            .bad_request("Please provide username, email and password."));
    }
    if !forms::is_valid_email(&form.email) {
        return Err(JsonResponse::<UserSummary>::build().bad_request("Invalid email format."));
    }
    if let Err(errors) = form.validate() {
        tracing::debug!("Invalid signup data {:?}", errors);
        return Err(JsonResponse::<UserSummary>::build().form_error(errors.to_string()));
    }

    let pool = pg_pool.get_ref();
    let email_taken = db::user::is_taken(pool, Some(&form.email), None, None)
        .await
        .map_err(|err| JsonResponse::<UserSummary>::build().internal_server_error(err))?;
    if email_taken {
        return Err(JsonResponse::<UserSummary>::build().bad_request("Email already exists."));
    }
    let username_taken = db::user::is_taken(pool, None, Some(&form.username), None)
        .await
        .map_err(|err| JsonResponse::<UserSummary>::build().internal_server_error(err))?;
    if username_taken {
        return Err(JsonResponse::<UserSummary>::build().bad_request("Username already exists."));
    }

    let password = hash_password(&form.password, settings.auth.bcrypt_cost)
        .await
        .map_err(|err| {
            tracing::error!("Failed to hash password: {:?}", err);
            JsonResponse::<UserSummary>::build().internal_server_error("")
        })?;

    let new_user = db::user::NewUser {
        username: form.username,
        email: form.email,
        password,
        ..Default::default()
    };

    db::user::insert(pool, new_user)
        .await
        .map(|user| {
            JsonResponse::build()
                .set_item(UserSummary::from(&user))
                .created("User registered successfully.")
        })
        .map_err(|err| JsonResponse::<UserSummary>::build().internal_server_error(err))
}
