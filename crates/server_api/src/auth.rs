use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{Capabilities, Did, Requirement, UserId},
    error::{ApiError, ErrorCode},
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    session::{session_credential, SessionCodec},
    PageRequest,
};

/// Caller resolved from the session cookie, never from form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub did: Did,
    pub capabilities: Capabilities,
    pub pizza_uuid: Option<Uuid>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(&'static str),
    #[error("missing capability: {0}")]
    Forbidden(Requirement),
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Unauthenticated(_) => {
                ApiError::new(ErrorCode::Unauthorized, "login required")
            }
            AuthError::Forbidden(requirement) => ApiError::new(
                ErrorCode::Forbidden,
                format!("{requirement} access required"),
            ),
        }
    }
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(
        &self,
        request: &PageRequest,
        requirement: Requirement,
    ) -> Result<Identity, AuthError>;
}

/// Trusts the signed session cookie and nothing else.
pub struct SessionAuthorizer {
    sessions: Arc<dyn SessionCodec>,
    cookie_name: String,
}

impl SessionAuthorizer {
    pub fn new(sessions: Arc<dyn SessionCodec>, cookie_name: impl Into<String>) -> Self {
        Self {
            sessions,
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl Authorizer for SessionAuthorizer {
    async fn authorize(
        &self,
        request: &PageRequest,
        requirement: Requirement,
    ) -> Result<Identity, AuthError> {
        let token = session_credential(request.cookie_header.as_deref(), &self.cookie_name)
            .ok_or(AuthError::Unauthenticated("missing session cookie"))?;
        let claims = self.sessions.decode(token).map_err(|error| {
            debug!(%error, "rejecting session cookie");
            AuthError::Unauthenticated("invalid session")
        })?;
        let identity = claims.identity();
        if !identity.capabilities.satisfies(requirement) {
            debug!(did = %identity.did, %requirement, "capability check failed");
            return Err(AuthError::Forbidden(requirement));
        }
        Ok(identity)
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
