use shared::error::{ApiError, FieldErrors};
use thiserror::Error;

use crate::{
    picker::PickerError,
    surface::{Settled, SurfaceError},
};

pub(crate) const UNREACHABLE_MESSAGE: &str = "The server could not be reached.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {}", .error.message)]
    Api { status: u16, error: ApiError },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Picker(#[from] PickerError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// How a failed submission is shown on the form: inline field errors
    /// when the server sent them, one form-level message otherwise.
    pub fn settled(&self) -> Settled {
        match self {
            ClientError::Api { error, .. } => {
                let form_error = match &error.form_error {
                    Some(message) => Some(message.clone()),
                    None if error.field_errors.is_empty() => Some(error.message.clone()),
                    None => None,
                };
                Settled::Failure {
                    field_errors: error.field_errors.clone(),
                    form_error,
                }
            }
            _ => Settled::Failure {
                field_errors: FieldErrors::new(),
                form_error: Some(UNREACHABLE_MESSAGE.to_string()),
            },
        }
    }
}
