use crate::auth::{Claims, TokenCodec, TokenError};
use crate::helpers::JsonResponse;
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// The verified principal of one request.
#[derive(Debug, Clone)]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    pub fn subject_id(&self) -> &str {
        &self.claims.subject.id
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Why a request was not authenticated. Only logged; clients always get the
/// same 401 body.
#[derive(Debug, thiserror::Error)]
pub enum Unauthenticated {
    #[error("no bearer credential presented")]
    MissingCredential,
    #[error("authorization header is not a bearer credential")]
    MalformedCredential,
    #[error("bearer token rejected: {0}")]
    Rejected(#[source] TokenError),
}

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Please provide a valid token.";

impl ResponseError for Unauthenticated {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        JsonResponse::<()>::build().respond(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
    }
}

/// Returns the token of a `Bearer <token>` header value.
///
/// The keyword is case-sensitive, followed by exactly one space, and the
/// token must be non-empty with no whitespace.
pub fn extract_bearer(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    codec: TokenCodec,
}

impl AccessGate {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, Unauthenticated> {
        self.authenticate_with(headers, |token| self.codec.decode(token))
    }

    pub fn authenticate_at(
        &self,
        headers: &HeaderMap,
        now: i64,
    ) -> Result<Identity, Unauthenticated> {
        self.authenticate_with(headers, |token| self.codec.decode_at(token, now))
    }

    fn authenticate_with<F>(&self, headers: &HeaderMap, decode: F) -> Result<Identity, Unauthenticated>
    where
        F: FnOnce(&str) -> Result<Claims, TokenError>,
    {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(Unauthenticated::MissingCredential)?
            .to_str()
            .map_err(|_| Unauthenticated::MalformedCredential)?;
        let token = extract_bearer(value).ok_or(Unauthenticated::MalformedCredential)?;

        decode(token)
            .map(|claims| Identity { claims })
            .map_err(Unauthenticated::Rejected)
    }
}
