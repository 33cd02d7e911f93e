//! Data-driven form validation.
//!
//! A [`Schema`] lists the declared fields of a form together with a
//! [`FieldRule`]. [`Schema::validate`] interprets it against the raw payload
//! and either returns the typed values of the declared fields or one message
//! per failing field. Every field is checked so a form can show all problems
//! at once.

use std::collections::BTreeMap;

use shared::error::FieldErrors;
use uuid::Uuid;

/// Raw form submission, field name to submitted string.
pub type FormPayload = BTreeMap<String, String>;

const REQUIRED: &str = "Required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed text, length counted in characters.
    Text { min_len: usize, max_len: usize },
    Uuid,
    Integer { min: i64, max: i64 },
    /// Checkbox style: `on`, `true`, `1` or `off`, `false`, `0`.
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldRule {
    pub fn required(kind: FieldKind) -> Self {
        Self {
            required: true,
            kind,
        }
    }

    pub fn optional(kind: FieldKind) -> Self {
        Self {
            required: false,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Uuid(Uuid),
    Integer(i64),
    Boolean(bool),
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.fields.push((name, rule));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn validate(&self, payload: &FormPayload) -> Result<ValidatedData, FieldErrors> {
        let mut values = BTreeMap::new();
        let mut errors = FieldErrors::new();

        for (name, rule) in &self.fields {
            let raw = payload
                .get(*name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty());
            let Some(raw) = raw else {
                if rule.required {
                    errors.insert((*name).to_string(), REQUIRED.to_string());
                }
                continue;
            };
            match check(&rule.kind, raw) {
                Ok(value) => {
                    values.insert(*name, value);
                }
                Err(message) => {
                    errors.insert((*name).to_string(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(ValidatedData { values })
        } else {
            Err(errors)
        }
    }
}

fn check(kind: &FieldKind, raw: &str) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Text { min_len, max_len } => {
            let len = raw.chars().count();
            if len < *min_len {
                Err(format!("Must contain at least {min_len} character(s)"))
            } else if len > *max_len {
                Err(format!("Must contain at most {max_len} character(s)"))
            } else {
                Ok(FieldValue::Text(raw.to_string()))
            }
        }
        FieldKind::Uuid => Uuid::parse_str(raw)
            .map(FieldValue::Uuid)
            .map_err(|_| "Invalid uuid".to_string()),
        FieldKind::Integer { min, max } => {
            let value: i64 = raw
                .parse()
                .map_err(|_| "Expected a whole number".to_string())?;
            if value < *min || value > *max {
                return Err(format!("Must be between {min} and {max}"));
            }
            Ok(FieldValue::Integer(value))
        }
        FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Ok(FieldValue::Boolean(true)),
            "off" | "false" | "0" => Ok(FieldValue::Boolean(false)),
            _ => Err("Expected a boolean".to_string()),
        },
    }
}

/// Declared fields that passed validation. Undeclared input never gets here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedData {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ValidatedData {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn uuid(&self, name: &str) -> Option<Uuid> {
        match self.values.get(name) {
            Some(FieldValue::Uuid(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(FieldValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }
}

/// A typed form backed by a [`Schema`].
pub trait FormInput: Sized {
    fn schema() -> Schema;

    fn from_validated(data: ValidatedData) -> Result<Self, FieldErrors>;
}

pub fn parse_form<T: FormInput>(payload: &FormPayload) -> Result<T, FieldErrors> {
    T::from_validated(T::schema().validate(payload)?)
}

pub(crate) fn single_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.into());
    errors
}

pub(crate) fn missing(field: &str) -> FieldErrors {
    single_error(field, REQUIRED)
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
