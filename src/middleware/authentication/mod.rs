mod gate;
mod manager;
mod manager_middleware;

pub use gate::*;
pub use manager::*;
pub use manager_middleware::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, Keyring, Subject, TokenCodec};
    use actix_web::{get, http::StatusCode, test, web, App, HttpResponse, Responder};
    use std::sync::Arc;

    #[get("/whoami")]
    async fn whoami(identity: web::ReqData<Arc<Identity>>) -> impl Responder {
        HttpResponse::Ok().body(identity.subject_id().to_string())
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(Keyring::new("middleware-secret"))
    }

    #[actix_web::test]
    async fn test_gate_passes_identity_to_handler() {
        let codec = codec();
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(Gate::new(AccessGate::new(codec.clone())))
                    .service(whoami),
            ),
        )
        .await;

        let now = chrono::Utc::now().timestamp();
        let claims = Claims::new("localhost", Subject::new("42"), now, 3600).unwrap();
        let token = codec.encode(&claims).unwrap();

        let req = test::TestRequest::get()
            .uri("/api/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, web::Bytes::from_static(b"42"));
    }

    #[actix_web::test]
    async fn test_gate_rejects_without_calling_handler() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(Gate::new(AccessGate::new(codec())))
                    .service(whoami),
            ),
        )
        .await;

        for header in [None, Some("bearer abc.def.ghi"), Some("Bearer"), Some("Bearer abc.def.ghi")] {
            let mut req = test::TestRequest::get().uri("/api/whoami");
            if let Some(value) = header {
                req = req.insert_header(("Authorization", value));
            }
            let resp = test::try_call_service(&app, req.to_request()).await;
            let err = resp.expect_err("gate should reject");
            assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

            let body: serde_json::Value = serde_json::from_slice(
                &actix_web::body::to_bytes(err.error_response().into_body())
                    .await
                    .unwrap(),
            )
            .unwrap();
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], 401);
            assert_eq!(body["message"], UNAUTHORIZED_MESSAGE);
        }
    }
}
