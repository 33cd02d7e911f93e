use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::{Capabilities, Did, UserId};
use storage::{Storage, StorageError, StoredCategory, StoredPizza, StoredUser};
use uuid::Uuid;

use crate::{
    auth::SessionAuthorizer,
    session::{CookieSettings, JwtSessionCodec, SessionClaims, SessionCodec},
    store::Store,
    validate::FormPayload,
    ApiContext, PageRequest,
};

pub(crate) const SECRET: &str = "test-secret";
pub(crate) const TTL_SECONDS: i64 = 3600;

pub(crate) async fn storage() -> Storage {
    Storage::new("sqlite::memory:").await.expect("db")
}

pub(crate) fn context_for(store: Arc<dyn Store>) -> ApiContext {
    let sessions: Arc<dyn SessionCodec> = Arc::new(JwtSessionCodec::new(SECRET, TTL_SECONDS));
    let cookie = CookieSettings::default();
    let authorizer = Arc::new(SessionAuthorizer::new(sessions.clone(), cookie.name.clone()));
    ApiContext::new(store, authorizer, sessions, cookie)
}

pub(crate) async fn seed_user(storage: &Storage, did: &str, capabilities: Capabilities) -> StoredUser {
    let did = Did::new(did);
    storage.create_user(&did, "Test User").await.expect("user");
    storage
        .set_capabilities(&did, capabilities)
        .await
        .expect("capabilities");
    storage
        .find_user_by_did(&did)
        .await
        .expect("lookup")
        .expect("user exists")
}

pub(crate) fn lab() -> Capabilities {
    Capabilities {
        lab: true,
        admin: false,
    }
}

pub(crate) fn admin() -> Capabilities {
    Capabilities {
        lab: false,
        admin: true,
    }
}

/// A request carrying a freshly signed session for `user`.
pub(crate) fn signed_request(ctx: &ApiContext, user: &StoredUser) -> PageRequest {
    let claims = SessionClaims::for_user(user, TTL_SECONDS);
    let token = ctx.sessions.encode(&claims).expect("token");
    PageRequest::new(Some(format!("theme=dark; {}={token}", ctx.cookie.name)))
}

pub(crate) fn form(pairs: &[(&str, &str)]) -> FormPayload {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Reads go to the wrapped storage, writes fail as if the pool were gone.
pub(crate) struct UnavailableWrites {
    pub(crate) inner: Storage,
    pub(crate) write_attempts: AtomicUsize,
}

impl UnavailableWrites {
    pub(crate) fn new(inner: Storage) -> Self {
        Self {
            inner,
            write_attempts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for UnavailableWrites {
    async fn find_user(&self, did: &Did) -> Result<Option<StoredUser>, StorageError> {
        self.inner.find_user_by_did(did).await
    }

    async fn list_pizzas(&self) -> Result<Vec<StoredPizza>, StorageError> {
        self.inner.list_pizzas().await
    }

    async fn select_pizza(&self, _did: &Did, _pizza_uuid: Uuid) -> Result<UserId, StorageError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create_page_category(
        &self,
        _name: &str,
        _created_by: UserId,
    ) -> Result<StoredCategory, StorageError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_page_categories(&self) -> Result<Vec<StoredCategory>, StorageError> {
        self.inner.list_page_categories().await
    }
}
