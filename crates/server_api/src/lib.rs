use std::sync::Arc;

use shared::{
    error::{ApiError, ErrorCode},
    protocol::{Subject, SUBJECT_FIELD},
};
use storage::Storage;

pub mod auth;
pub mod forms;
pub mod mutation;
pub mod pages;
pub mod respond;
pub mod session;
pub mod store;
pub mod validate;

use auth::{Authorizer, SessionAuthorizer};
use session::{CookieSettings, JwtSessionCodec, SessionCodec};
use store::Store;
use validate::FormPayload;

pub use respond::{compose, respond, respond_error, Responded};

/// Collaborators shared by every page handler.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn Store>,
    pub authorizer: Arc<dyn Authorizer>,
    pub sessions: Arc<dyn SessionCodec>,
    pub cookie: CookieSettings,
}

impl ApiContext {
    pub fn new(
        store: Arc<dyn Store>,
        authorizer: Arc<dyn Authorizer>,
        sessions: Arc<dyn SessionCodec>,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            store,
            authorizer,
            sessions,
            cookie,
        }
    }

    /// Storage-backed context authorizing through HS256 session cookies.
    pub fn with_storage(
        storage: Storage,
        session_secret: &str,
        session_ttl_seconds: i64,
        cookie: CookieSettings,
    ) -> Self {
        let sessions: Arc<dyn SessionCodec> =
            Arc::new(JwtSessionCodec::new(session_secret, session_ttl_seconds));
        let authorizer = Arc::new(SessionAuthorizer::new(sessions.clone(), cookie.name.clone()));
        Self::new(Arc::new(storage), authorizer, sessions, cookie)
    }
}

/// What a loader or action gets to see of the inbound HTTP request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub cookie_header: Option<String>,
    pub form: FormPayload,
    /// Why the body could not be read as a form. Reported only once the
    /// caller is authorized.
    pub malformed_body: Option<String>,
}

impl PageRequest {
    pub fn new(cookie_header: Option<String>) -> Self {
        Self {
            cookie_header,
            form: FormPayload::new(),
            malformed_body: None,
        }
    }

    pub fn with_form(mut self, form: FormPayload) -> Self {
        self.form = form;
        self
    }

    pub fn with_malformed_body(mut self, reason: impl Into<String>) -> Self {
        self.malformed_body = Some(reason.into());
        self
    }

    /// The submitted form, or a validation error when the body was unreadable.
    pub fn payload(&self) -> Result<&FormPayload, ApiError> {
        match &self.malformed_body {
            Some(reason) => Err(ApiError::new(
                ErrorCode::Validation,
                format!("unreadable form body: {reason}"),
            )),
            None => Ok(&self.form),
        }
    }

    pub fn subject(&self) -> Option<Subject> {
        self.form
            .get(SUBJECT_FIELD)
            .and_then(|raw| Subject::parse(raw.trim()))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
