//! Compact signed bearer tokens.
//!
//! A token is `header.payload.signature`. Every segment is base64url without
//! padding; the signature is HMAC-SHA256 over the exact bytes
//! `header_segment + "." + payload_segment`. The header is always
//! `{"typ":"JWT","alg":"HS256"}`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"typ":"JWT","alg":"HS256"}"#;

/// Payload keys owned by `Claims`; passthrough fields may not reuse them.
const RESERVED_CLAIMS: [&str; 4] = ["issuer", "issued_at", "expires_at", "subject"];
const SUBJECT_ID: &str = "id";

/// Encodes without padding, decodes with or without it.
const SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    #[error("signing key rejected")]
    InvalidKey,
    #[error("failed to serialize claims: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The principal a token was issued for.
///
/// Only `id` identifies the principal. Anything else (username, email) is
/// carried for display and must not drive authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Subject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Adds a display attribute. `id` is taken by the subject itself.
    pub fn with_attribute(
        mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Self, TokenError> {
        if name == SUBJECT_ID {
            return Err(TokenError::InvalidClaims(format!(
                "subject attribute {:?} is reserved",
                name
            )));
        }
        self.attributes.insert(name.to_string(), value.into());
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub issuer: String,
    /// Unix seconds.
    pub issued_at: i64,
    /// Unix seconds. Tokens minted here always carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub subject: Subject,
    /// Passthrough fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Claims valid from `issued_at` for `ttl_secs` seconds.
    pub fn new(
        issuer: impl Into<String>,
        subject: Subject,
        issued_at: i64,
        ttl_secs: i64,
    ) -> Result<Self, TokenError> {
        if ttl_secs <= 0 {
            return Err(TokenError::InvalidClaims(
                "token lifetime must be positive".to_string(),
            ));
        }
        let expires_at = issued_at
            .checked_add(ttl_secs)
            .ok_or_else(|| TokenError::InvalidClaims("expiry overflows".to_string()))?;

        Ok(Self {
            issuer: issuer.into(),
            issued_at,
            expires_at: Some(expires_at),
            subject,
            extra: Map::new(),
        })
    }
}

/// Signing secrets, newest first.
///
/// Tokens are always signed with the newest secret. Verification accepts a
/// signature made by any secret in the ring, so an older secret can stay
/// listed while the tokens it signed run out.
#[derive(Clone)]
pub struct Keyring {
    secrets: Vec<Vec<u8>>,
}

impl Keyring {
    pub fn new(current: impl Into<Vec<u8>>) -> Self {
        Self {
            secrets: vec![current.into()],
        }
    }

    pub fn with_previous(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secrets.push(secret.into());
        self
    }

    fn current(&self) -> &[u8] {
        &self.secrets[0]
    }

    fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.secrets.iter().map(Vec::as_slice)
    }
}

impl fmt::Debug for Keyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyring")
            .field("secrets", &self.secrets.len())
            .finish()
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Header {
    typ: String,
    alg: String,
}

#[derive(Debug, Clone)]
pub struct TokenCodec {
    keyring: Keyring,
}

impl TokenCodec {
    pub fn new(keyring: Keyring) -> Self {
        Self { keyring }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        match claims.expires_at {
            Some(expires_at) if expires_at > claims.issued_at => {}
            Some(_) => {
                return Err(TokenError::InvalidClaims(
                    "expires_at must be after issued_at".to_string(),
                ))
            }
            None => return Err(TokenError::InvalidClaims("expires_at is required".to_string())),
        }
        if let Some(key) = RESERVED_CLAIMS
            .iter()
            .find(|key| claims.extra.contains_key(**key))
        {
            return Err(TokenError::InvalidClaims(format!(
                "passthrough field {:?} is reserved",
                key
            )));
        }
        if claims.subject.attributes.contains_key(SUBJECT_ID) {
            return Err(TokenError::InvalidClaims(format!(
                "subject attribute {:?} is reserved",
                SUBJECT_ID
            )));
        }

        let payload = serde_json::to_vec(claims).map_err(TokenError::Serialize)?;
        let header = SEGMENT.encode(HEADER_JSON);
        let payload = SEGMENT.encode(payload);
        let signature = self.sign(&header, &payload)?;

        Ok(format!("{}.{}.{}", header, payload, SEGMENT.encode(signature)))
    }

    /// Verifies `token` against the system clock.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_at(token, chrono::Utc::now().timestamp())
    }

    /// Verifies `token` as of `now` (Unix seconds).
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (header, payload, signature) = split(token)?;
        let signature = SEGMENT
            .decode(signature)
            .map_err(|_| TokenError::MalformedToken)?;

        self.verify(header, payload, &signature)?;

        let header: Header = parse_segment(header)?;
        if header.alg != "HS256" || header.typ != "JWT" {
            return Err(TokenError::MalformedToken);
        }
        let claims: Claims = parse_segment(payload)?;

        // Missing expiry means the token never expires.
        if let Some(expires_at) = claims.expires_at {
            if expires_at < now {
                return Err(TokenError::TokenExpired);
            }
        }

        Ok(claims)
    }

    fn mac(secret: &[u8], header: &str, payload: &str) -> Result<HmacSha256, TokenError> {
        let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::InvalidKey)?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn sign(&self, header: &str, payload: &str) -> Result<Vec<u8>, TokenError> {
        let mac = Self::mac(self.keyring.current(), header, payload)?;
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Checks `signature` against every secret in the ring.
    ///
    /// The comparison is `Mac::verify_slice`, which goes through the
    /// `subtle` crate's constant-time equality, so timing does not depend on
    /// where a forged signature first differs.
    fn verify(&self, header: &str, payload: &str, signature: &[u8]) -> Result<(), TokenError> {
        for secret in self.keyring.iter() {
            if Self::mac(secret, header, payload)?
                .verify_slice(signature)
                .is_ok()
            {
                return Ok(());
            }
        }
        Err(TokenError::InvalidSignature)
    }
}

fn split(token: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(TokenError::MalformedToken),
    }
}

fn parse_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = SEGMENT
        .decode(segment)
        .map_err(|_| TokenError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::MalformedToken)
}
