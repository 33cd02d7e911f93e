use super::*;
use crate::{
    session::{JwtSessionCodec, SessionClaims},
    test_support::{admin, context_for, lab, seed_user, signed_request, storage, TTL_SECONDS},
};

#[tokio::test]
async fn missing_cookie_is_unauthenticated() {
    let ctx = context_for(Arc::new(storage().await));
    let err = ctx
        .authorizer
        .authorize(&PageRequest::new(Some("theme=dark".into())), Requirement::LAB)
        .await
        .expect_err("no session");
    assert!(matches!(err, AuthError::Unauthenticated(_)));
}

#[tokio::test]
async fn forged_cookie_is_unauthenticated() {
    let storage = storage().await;
    let user = seed_user(&storage, "did:example:alice", lab()).await;
    let ctx = context_for(Arc::new(storage));

    let forged = JwtSessionCodec::new("attacker", TTL_SECONDS)
        .encode(&SessionClaims::for_user(&user, TTL_SECONDS))
        .expect("token");
    let request = PageRequest::new(Some(format!("session={forged}")));
    let err = ctx
        .authorizer
        .authorize(&request, Requirement::LAB)
        .await
        .expect_err("forged");
    assert!(matches!(err, AuthError::Unauthenticated(_)));
}

#[tokio::test]
async fn valid_session_without_capability_is_forbidden() {
    let storage = storage().await;
    let user = seed_user(&storage, "did:example:bob", admin()).await;
    let ctx = context_for(Arc::new(storage));

    let err = ctx
        .authorizer
        .authorize(&signed_request(&ctx, &user), Requirement::LAB)
        .await
        .expect_err("no lab access");
    assert!(matches!(err, AuthError::Forbidden(Requirement::LAB)));

    let api_error = ApiError::from(err);
    assert_eq!(api_error.code, ErrorCode::Forbidden);
    assert_eq!(api_error.message, "lab access required");
}

#[tokio::test]
async fn identity_comes_from_the_session_not_the_form() {
    let storage = storage().await;
    let user = seed_user(&storage, "did:example:alice", lab()).await;
    let ctx = context_for(Arc::new(storage));

    let mut request = signed_request(&ctx, &user);
    request.form.insert("did".into(), "did:example:mallory".into());
    request.form.insert("uid".into(), "999".into());

    let identity = ctx
        .authorizer
        .authorize(&request, Requirement::LAB)
        .await
        .expect("authorized");
    assert_eq!(identity.did, user.did);
    assert_eq!(identity.user_id, user.user_id);
    assert!(identity.capabilities.lab);
}
