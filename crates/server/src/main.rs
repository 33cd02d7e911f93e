use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use server_api::{
    pages::{lab_pizza, login, page_admin},
    session::CookieSettings,
    validate::FormPayload,
    ApiContext, PageRequest,
};
use shared::{domain::Did, protocol::LoginRequest};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod respond;

use app_state::AppState;
use config::{load_settings, prepare_database_url, DEV_SESSION_SECRET};
use respond::into_response;

const MAX_FORM_BYTES: usize = 16 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    if settings.session_secret == DEV_SESSION_SECRET {
        warn!("using the development session secret; set APP__SESSION_SECRET in production");
    }

    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let api = ApiContext::with_storage(
        storage.clone(),
        &settings.session_secret,
        settings.session_ttl_seconds,
        CookieSettings {
            name: settings.session_cookie.clone(),
            secure: settings.secure_cookies,
        },
    );

    let app = build_router(Arc::new(AppState { api, storage }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(http_login))
        .route(page_admin::ROUTE, get(page_admin_loader).post(page_admin_action))
        .route(lab_pizza::ROUTE, get(lab_pizza_loader).post(lab_pizza_action))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

fn page_request(headers: &HeaderMap, form: FormPayload) -> PageRequest {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    PageRequest::new(cookie_header).with_form(form)
}

/// The body is parsed by the extractor but a rejection is only reported by
/// the pipeline, after authorization.
fn action_request(
    headers: &HeaderMap,
    form: Result<Form<FormPayload>, FormRejection>,
) -> PageRequest {
    match form {
        Ok(Form(form)) => page_request(headers, form),
        Err(rejection) => {
            debug!(status = %rejection.status(), "form body rejected");
            page_request(headers, FormPayload::new()).with_malformed_body(rejection.body_text())
        }
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    match state.storage.health_check().await {
        Ok(()) => "ok".into_response(),
        Err(error) => {
            error!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response()
        }
    }
}

async fn http_login(State(state): State<Arc<AppState>>, Json(req): Json<LoginRequest>) -> Response {
    into_response(login::login(&state.api, &Did::new(req.did)).await)
}

async fn page_admin_loader(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let request = page_request(&headers, FormPayload::new());
    into_response(page_admin::loader(&state.api, &request).await)
}

async fn page_admin_action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<FormPayload>, FormRejection>,
) -> Response {
    let request = action_request(&headers, form);
    into_response(page_admin::action(&state.api, &request).await)
}

async fn lab_pizza_loader(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let request = page_request(&headers, FormPayload::new());
    into_response(lab_pizza::loader(&state.api, &request).await)
}

async fn lab_pizza_action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<FormPayload>, FormRejection>,
) -> Response {
    let request = action_request(&headers, form);
    into_response(lab_pizza::action(&state.api, &request).await)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
