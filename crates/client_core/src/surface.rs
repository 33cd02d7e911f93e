use shared::error::FieldErrors;
use thiserror::Error;

/// Payload of a form submission, field name to raw value.
pub type FormValues = std::collections::BTreeMap<String, String>;

/// Receives the side effects a surface communicates to its container.
pub trait SurfaceObserver {
    /// Whether an outside interaction may dismiss the enclosing container.
    fn set_closeable(&mut self, closeable: bool);

    fn focus_field(&mut self, _field: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Closed,
    Open,
    Submitting,
}

/// Outcome of the in-flight submission as observed by the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Success,
    Failure {
        field_errors: FieldErrors,
        form_error: Option<String>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("cannot {action} while the surface is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: SurfaceState,
    },
}

/// Headless popover form: `Closed -> Open -> Submitting -> Closed`, or back
/// to `Open` with inline errors when the submission fails.
pub struct FormSurface<O: SurfaceObserver> {
    fields: Vec<&'static str>,
    hidden: Vec<(&'static str, String)>,
    state: SurfaceState,
    submitted: bool,
    focused: Option<&'static str>,
    field_errors: FieldErrors,
    form_error: Option<String>,
    observer: O,
}

impl<O: SurfaceObserver> FormSurface<O> {
    /// `fields` are the visible inputs in display order; the first one takes
    /// focus when the surface opens.
    pub fn new(fields: Vec<&'static str>, mut observer: O) -> Self {
        observer.set_closeable(true);
        Self {
            fields,
            hidden: Vec::new(),
            state: SurfaceState::Closed,
            submitted: false,
            focused: None,
            field_errors: FieldErrors::new(),
            form_error: None,
            observer,
        }
    }

    /// Adds a hidden input sent with every submission, e.g. `_subject`.
    pub fn with_hidden(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.hidden.push((name, value.into()));
        self
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn focused(&self) -> Option<&'static str> {
        self.focused
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn open(&mut self) -> Result<(), SurfaceError> {
        match self.state {
            SurfaceState::Closed => {
                self.state = SurfaceState::Open;
                self.observer.set_closeable(false);
                let first = self.fields.first().copied();
                self.move_focus(first);
                Ok(())
            }
            SurfaceState::Open => Ok(()),
            state => Err(SurfaceError::InvalidTransition {
                action: "open",
                state,
            }),
        }
    }

    /// Marks the submission as in flight and returns the payload to send,
    /// hidden inputs included.
    pub fn submit(&mut self, values: FormValues) -> Result<FormValues, SurfaceError> {
        if self.state != SurfaceState::Open {
            return Err(SurfaceError::InvalidTransition {
                action: "submit",
                state: self.state,
            });
        }
        self.state = SurfaceState::Submitting;
        self.submitted = true;

        let mut payload = values;
        for (name, value) in &self.hidden {
            payload.insert((*name).to_string(), value.clone());
        }
        Ok(payload)
    }

    /// Settle events without a submission of our own are ignored.
    pub fn submission_settled(&mut self, settled: Settled) {
        if !self.submitted {
            return;
        }
        self.submitted = false;

        match settled {
            Settled::Success => {
                self.field_errors.clear();
                self.form_error = None;
                self.focused = None;
                self.state = SurfaceState::Closed;
                self.observer.set_closeable(true);
            }
            Settled::Failure {
                field_errors,
                form_error,
            } => {
                let target = self
                    .fields
                    .iter()
                    .copied()
                    .find(|field| field_errors.contains_key(*field))
                    .or_else(|| self.fields.first().copied());
                self.field_errors = field_errors;
                self.form_error = form_error;
                self.state = SurfaceState::Open;
                self.move_focus(target);
            }
        }
    }

    /// Close button. Focus stays trapped while a submission is in flight.
    pub fn close(&mut self) -> Result<(), SurfaceError> {
        match self.state {
            SurfaceState::Open => {
                self.state = SurfaceState::Closed;
                self.field_errors.clear();
                self.form_error = None;
                self.focused = None;
                self.observer.set_closeable(true);
                Ok(())
            }
            SurfaceState::Closed => Ok(()),
            state => Err(SurfaceError::InvalidTransition {
                action: "close",
                state,
            }),
        }
    }

    fn move_focus(&mut self, field: Option<&'static str>) {
        self.focused = field;
        if let Some(field) = field {
            self.observer.focus_field(field);
        }
    }
}

impl<O: SurfaceObserver> Drop for FormSurface<O> {
    fn drop(&mut self) {
        if self.state != SurfaceState::Closed {
            self.observer.set_closeable(true);
        }
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
