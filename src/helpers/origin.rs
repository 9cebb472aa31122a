use crate::models::Origin;
use actix_web::http::header;
use actix_web::HttpRequest;

/// Client address and user agent of `req`, "unknown" where absent.
pub fn request_origin(req: &HttpRequest) -> Origin {
    let fallback = Origin::default();
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string)
        .unwrap_or(fallback.ip_address);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or(fallback.user_agent);

    Origin {
        ip_address,
        user_agent,
    }
}
