use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use server_api::Responded;
use tracing::warn;

/// Lifted headers are appended after the framework defaults, never replacing
/// them.
pub(crate) fn into_response(responded: Responded) -> Response {
    let status =
        StatusCode::from_u16(responded.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(responded.body)).into_response();

    for (name, value) in responded.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(header_name), Ok(header_value)) => {
                response.headers_mut().append(header_name, header_value);
            }
            _ => warn!(%name, "dropping invalid response header"),
        }
    }

    response
}
