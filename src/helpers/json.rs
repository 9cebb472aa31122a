use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse};
use serde_derive::Serialize;

/// Body shape shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub struct JsonResponseBuilder<T> {
    data: Option<T>,
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder { data: None }
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    pub fn set_item(mut self, item: T) -> Self {
        self.data = Some(item);
        self
    }

    pub fn body(self, status: StatusCode, message: impl Into<String>) -> JsonResponse<T> {
        let success = status.is_success();
        JsonResponse {
            success,
            message: message.into(),
            error: if success { None } else { Some(status.as_u16()) },
            data: self.data,
        }
    }

    pub fn respond(self, status: StatusCode, message: impl Into<String>) -> HttpResponse {
        HttpResponse::build(status).json(self.body(status, message))
    }

    pub fn ok(self, message: impl Into<String>) -> HttpResponse {
        self.respond(StatusCode::OK, message)
    }

    pub fn created(self, message: impl Into<String>) -> HttpResponse {
        self.respond(StatusCode::CREATED, message)
    }

    fn fail(self, status: StatusCode, message: impl Into<String>) -> Error {
        let message = message.into();
        let response = self.respond(status, message.clone());
        InternalError::from_response(message, response).into()
    }

    pub fn bad_request(self, message: impl Into<String>) -> Error {
        self.fail(StatusCode::BAD_REQUEST, message)
    }

    pub fn form_error(self, message: impl Into<String>) -> Error {
        self.fail(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(self, message: impl Into<String>) -> Error {
        self.fail(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(self, message: impl Into<String>) -> Error {
        self.fail(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(self, message: impl Into<String>) -> Error {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Internal error".to_string()
        } else {
            message
        };
        self.fail(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_has_no_error_code() {
        let body = JsonResponse::build()
            .set_item(json!({"id": 1}))
            .body(StatusCode::CREATED, "User created successfully.");

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"success": true, "message": "User created successfully.", "data": {"id": 1}})
        );
    }

    #[test]
    fn test_failure_envelope_carries_status_as_error() {
        let body = JsonResponse::<()>::build().body(StatusCode::NOT_FOUND, "User not found.");

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"success": false, "message": "User not found.", "error": 404})
        );
    }

    #[test]
    fn test_error_builders_keep_status() {
        let err = JsonResponse::<()>::build().unauthorized("nope");
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let err = JsonResponse::<()>::build().internal_server_error("");
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(err.to_string(), "Internal error");
    }
}
