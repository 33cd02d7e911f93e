use std::collections::BTreeMap;

use serde::Serialize;
use shared::{
    domain::Did,
    error::{ApiError, ErrorCode},
};
use tracing::info;

use crate::{
    compose,
    mutation::PersistenceError,
    session::{commit_session, SessionClaims},
    ApiContext, Responded,
};

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user_id: i64,
    pub headers: BTreeMap<String, String>,
    pub status: u16,
}

/// Issues a session cookie for a known DID.
pub async fn handle_login(ctx: &ApiContext, did: &Did) -> Result<LoginData, ApiError> {
    let user = ctx
        .store
        .find_user(did)
        .await
        .map_err(PersistenceError::from)?
        .ok_or_else(|| ApiError::new(ErrorCode::Unauthorized, "unknown identity"))?;

    let claims = SessionClaims::for_user(&user, ctx.sessions.ttl_seconds());
    let cookie = commit_session(ctx.sessions.as_ref(), &claims, &ctx.cookie)?;
    info!(%did, user_id = user.user_id.0, "session issued");

    Ok(LoginData {
        user_id: user.user_id.0,
        headers: BTreeMap::from([("Set-Cookie".to_string(), cookie)]),
        status: 200,
    })
}

pub async fn login(ctx: &ApiContext, did: &Did) -> Responded {
    compose(handle_login(ctx, did).await)
}
