use crate::auth::{verify_password, Claims, Subject, TokenCodec, TokenError};
use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models::{User, UserSummary};
use actix_web::{post, web, Responder, Result};
use chrono::Utc;
use serde_derive::Serialize;
use sqlx::PgPool;

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

fn claims_for(user: &User, settings: &Settings, now: i64) -> Result<Claims, TokenError> {
    let subject = Subject::new(user.id.to_string())
        .with_attribute("username", user.username.clone())?
        .with_attribute("email", user.email.clone())?;
    Claims::new(
        settings.auth.issuer.clone(),
        subject,
        now,
        settings.auth.token_ttl_secs,
    )
}

#[tracing::instrument(name = "Log in.", skip(form, pg_pool, codec, settings))]
#[post("/login")]
pub async fn login(
    form: web::Json<forms::LoginForm>,
    pg_pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    let field = form.login_field().ok_or_else(|| {
        JsonResponse::<LoginResponse>::build()
            .bad_request("Please provide email or username and password.")
    })?;
    if form.password.is_empty() {
        return Err(JsonResponse::<LoginResponse>::build()
            .bad_request("Please provide email or username and password."));
    }

    let user = db::user::fetch_by_login(pg_pool.get_ref(), field)
        .await
        .map_err(|err| JsonResponse::<LoginResponse>::build().internal_server_error(err))?
        .filter(|user| user.is_active)
        .ok_or_else(|| JsonResponse::<LoginResponse>::build().unauthorized(INVALID_CREDENTIALS))?;

    let matches = verify_password(&form.password, &user.password)
        .await
        .map_err(|err| {
            tracing::error!("Stored password hash of user {} is unusable: {:?}", user.id, err);
            JsonResponse::<LoginResponse>::build().unauthorized(INVALID_CREDENTIALS)
        })?;
    if !matches {
        return Err(JsonResponse::<LoginResponse>::build().unauthorized(INVALID_CREDENTIALS));
    }

    let token = claims_for(&user, settings.get_ref(), Utc::now().timestamp())
        .and_then(|claims| codec.encode(&claims))
        .map_err(|err| {
            tracing::error!("Failed to issue token: {:?}", err);
            JsonResponse::<LoginResponse>::build().internal_server_error("")
        })?;

    tracing::info!("User {} logged in", user.id);
    Ok(JsonResponse::build()
        .set_item(LoginResponse {
            token,
            user: UserSummary::from(&user),
        })
        .ok("Login successful."))
}
