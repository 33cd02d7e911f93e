use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to a single human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::Validation => 422,
            ErrorCode::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: FieldErrors::new(),
            form_error: None,
        }
    }

    /// Inline, per-field errors the form re-renders next to each input.
    pub fn validation(field_errors: FieldErrors) -> Self {
        Self {
            code: ErrorCode::Validation,
            message: "form validation failed".to_string(),
            field_errors,
            form_error: None,
        }
    }

    /// A single generic message rendered below the form.
    pub fn form(code: ErrorCode, form_error: impl Into<String>) -> Self {
        let form_error = form_error.into();
        Self {
            code,
            message: form_error.clone(),
            field_errors: FieldErrors::new(),
            form_error: Some(form_error),
        }
    }

    pub fn status(&self) -> u16 {
        self.code.status()
    }
}
