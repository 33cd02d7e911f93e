use serde::Serialize;
use serde_json::{Map, Value};
use shared::error::{ApiError, ErrorCode};
use tracing::warn;

const DEFAULT_STATUS: u16 = 200;
const INVALID_STATUS_FALLBACK: u16 = 500;

/// Framework independent response: the body is `{ ...data, status }` and any
/// top-level `headers` object of the data has been lifted out.
#[derive(Debug, Clone, PartialEq)]
pub struct Responded {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Responded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub fn respond<T: Serialize>(data: &T) -> Result<Responded, serde_json::Error> {
    let mut body = match serde_json::to_value(data)? {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".into(), other);
            map
        }
    };

    let headers = match body.remove("headers") {
        Some(Value::Object(headers)) => headers
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect(),
        _ => Vec::new(),
    };

    let status = match body.get("status") {
        None | Some(Value::Null) => DEFAULT_STATUS,
        Some(raw) => match raw.as_u64().filter(|status| (100..=599).contains(status)) {
            Some(status) => status as u16,
            None => {
                warn!(status = %raw, "response data carries an unusable status");
                INVALID_STATUS_FALLBACK
            }
        },
    };
    body.insert("status".into(), Value::from(status));

    Ok(Responded {
        status,
        headers,
        body: Value::Object(body),
    })
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(flatten)]
    error: &'a ApiError,
    status: u16,
}

pub fn respond_error(error: &ApiError) -> Responded {
    let status = error.status();
    respond(&ErrorBody { error, status }).unwrap_or_else(|_| Responded {
        status,
        headers: Vec::new(),
        body: serde_json::json!({ "message": error.message, "status": status }),
    })
}

/// Composes a loader or action result, routing errors through the same
/// envelope.
pub fn compose<T: Serialize>(result: Result<T, ApiError>) -> Responded {
    let composed = result.and_then(|data| {
        respond(&data).map_err(|e| ApiError::new(ErrorCode::Internal, e.to_string()))
    });
    match composed {
        Ok(responded) => responded,
        Err(error) => respond_error(&error),
    }
}

#[cfg(test)]
#[path = "tests/respond_tests.rs"]
mod tests;
