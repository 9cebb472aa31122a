use account_api::auth::{Claims, Keyring, Subject, TokenCodec, TokenError};
use account_api::middleware::authentication::AccessGate;
use actix_web::http::header::{HeaderMap, HeaderValue, AUTHORIZATION};

const T: i64 = 1_700_000_000;

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[test]
fn token_lives_exactly_one_hour() {
    let codec = TokenCodec::new(Keyring::new("s3cr3t"));
    let claims = Claims::new(
        "localhost",
        Subject::new("42").with_attribute("username", "ann").unwrap(),
        T,
        3600,
    )
    .unwrap();
    let token = codec.encode(&claims).unwrap();

    assert_eq!(codec.decode_at(&token, T).unwrap(), claims);
    assert_eq!(codec.decode_at(&token, T + 3600).unwrap(), claims);
    assert!(matches!(
        codec.decode_at(&token, T + 3601),
        Err(TokenError::TokenExpired)
    ));

    let gate = AccessGate::new(codec);
    let identity = gate.authenticate_at(&bearer(&token), T + 3600).unwrap();
    assert_eq!(identity.subject_id(), "42");
    assert!(gate.authenticate_at(&bearer(&token), T + 3601).is_err());
}

#[test]
fn decode_uses_the_wall_clock() {
    let codec = TokenCodec::new(Keyring::new("s3cr3t"));
    let now = chrono::Utc::now().timestamp();

    let fresh = codec
        .encode(&Claims::new("localhost", Subject::new("7"), now, 3600).unwrap())
        .unwrap();
    assert!(codec.decode(&fresh).is_ok());

    let stale = codec
        .encode(&Claims::new("localhost", Subject::new("7"), now - 3601, 3600).unwrap())
        .unwrap();
    assert!(matches!(codec.decode(&stale), Err(TokenError::TokenExpired)));
}
