use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Capabilities, Did, UserId},
    error::{ApiError, ErrorCode},
};
use storage::StoredUser;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::Identity, mutation::PersistenceError, store::Store};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        ApiError::new(ErrorCode::Internal, value.to_string())
    }
}

/// Claims carried by the signed session cookie.
///
/// `pizza_uuid` is embedded so the lunch page can show the stored order
/// without a database read; it is re-issued whenever the order changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub uid: i64,
    #[serde(default)]
    pub lab: bool,
    #[serde(default)]
    pub admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pizza_uuid: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_user(user: &StoredUser, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_seconds);
        Self {
            sub: user.did.0.clone(),
            uid: user.user_id.0,
            lab: user.capabilities.lab,
            admin: user.capabilities.admin,
            pizza_uuid: user.pizza_uuid,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: UserId(self.uid),
            did: Did(self.sub.clone()),
            capabilities: Capabilities {
                lab: self.lab,
                admin: self.admin,
            },
            pizza_uuid: self.pizza_uuid,
        }
    }
}

pub trait SessionCodec: Send + Sync {
    fn encode(&self, claims: &SessionClaims) -> Result<String, SessionError>;

    /// Rejects tampered, malformed and expired tokens.
    fn decode(&self, token: &str) -> Result<SessionClaims, SessionError>;

    fn ttl_seconds(&self) -> i64;
}

pub struct JwtSessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl JwtSessionCodec {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_seconds,
        }
    }
}

impl SessionCodec for JwtSessionCodec {
    fn encode(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, SessionError> {
        Ok(decode::<SessionClaims>(token, &self.decoding, &self.validation)?.claims)
    }

    fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }
}

#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "session".into(),
            secure: false,
        }
    }
}

/// Picks the named cookie out of a raw `Cookie` header.
pub fn session_credential<'a>(cookie_header: Option<&'a str>, name: &str) -> Option<&'a str> {
    cookie_header?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Encodes the claims into a `Set-Cookie` header value.
pub fn commit_session(
    sessions: &dyn SessionCodec,
    claims: &SessionClaims,
    cookie: &CookieSettings,
) -> Result<String, SessionError> {
    let token = sessions.encode(claims)?;
    let mut value = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cookie.name,
        sessions.ttl_seconds()
    );
    if cookie.secure {
        value.push_str("; Secure");
    }
    Ok(value)
}

/// Re-reads the user behind `did` and derives fresh session claims from the
/// stored row. Never writes.
pub async fn revalidate(
    store: &dyn Store,
    sessions: &dyn SessionCodec,
    did: &Did,
) -> Result<SessionClaims, PersistenceError> {
    let user = store
        .find_user(did)
        .await?
        .ok_or(PersistenceError::NotFound("user"))?;
    Ok(SessionClaims::for_user(&user, sessions.ttl_seconds()))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
