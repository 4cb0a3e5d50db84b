// src/config.rs
use crate::utils::validation::FieldSpec;
use reqwest::Method;
use url::Url;

/// Submit button wiring: the element id plus the labels shown while the
/// form is idle and while a submission runs.
#[derive(Debug, Clone)]
pub struct ButtonConfig {
    pub id: String,
    pub idle_label: String,
    pub busy_label: String,
}

impl ButtonConfig {
    pub fn new(
        id: impl Into<String>,
        idle_label: impl Into<String>,
        busy_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            idle_label: idle_label.into(),
            busy_label: busy_label.into(),
        }
    }
}

/// A validation check re-run while the user edits, before any submission.
/// Each check names the inputs it watches and the field it reports on.
#[derive(Debug, Clone)]
pub enum LiveCheck {
    /// Re-validates the email grammar whenever `field` changes.
    EmailShape { field: String },
    /// Re-checks equality of a password pair whenever either side changes.
    /// A mismatch is reported on the `password` field.
    PasswordsMatch {
        password: String,
        confirmation: String,
    },
}

impl LiveCheck {
    /// Whether a change to `field` should re-run this check.
    pub fn watches(&self, field: &str) -> bool {
        match self {
            Self::EmailShape { field: watched } => watched == field,
            Self::PasswordsMatch {
                password,
                confirmation,
            } => password == field || confirmation == field,
        }
    }
}

/// Everything a workflow needs to know about one form: the elements it
/// drives, the fields it validates, and the endpoint it submits to.
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub form_id: String,
    pub endpoint: Url,
    pub method: Method,
    pub button: ButtonConfig,
    pub fields: Vec<FieldSpec>,
    pub live_checks: Vec<LiveCheck>,
}

impl FormConfig {
    /// Starts a config with no fields and no live checks, submitting via
    /// POST.
    pub fn new(form_id: impl Into<String>, endpoint: Url, button: ButtonConfig) -> Self {
        Self {
            form_id: form_id.into(),
            endpoint,
            method: Method::POST,
            button,
            fields: Vec::new(),
            live_checks: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn live_check(mut self, check: LiveCheck) -> Self {
        self.live_checks.push(check);
        self
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.id.as_str())
    }

    /// Label of the field `id`, falling back to the id itself for fields
    /// the config does not declare.
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.label.as_str())
            .unwrap_or(id)
    }
}
