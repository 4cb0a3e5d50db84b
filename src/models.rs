// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Canonical messages shared by validation and the submit flow
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input!";
pub const PASSWORDS_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// Field-keyed validation errors, in the shape the backend also uses:
/// a JSON object mapping a field identifier to a list of messages.
///
/// A map is built fresh for every validation pass; nothing ever removes
/// single entries from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(HashMap<String, Vec<String>>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the list for `field`, creating the list on
    /// first use. Messages keep their insertion order per field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|messages| messages.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Response envelope shared by every form endpoint.
///
/// Decoding is tolerant: absent members become their defaults so that a
/// minimal `{"message": "..."}` body is always accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Outcome of a completed exchange, after the envelope has been decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Success {
        message: String,
        data: Option<serde_json::Value>,
    },
    Failure {
        message: String,
        errors: Option<ErrorMap>,
    },
}

impl SubmissionResult {
    /// Classifies an envelope. A submission failed when the HTTP status was
    /// not a success, or when the envelope itself says `success: false`.
    /// An absent flag on a 2xx response still counts as success.
    pub fn from_envelope(status_ok: bool, envelope: ApiResponse) -> Self {
        if !status_ok || envelope.success == Some(false) {
            Self::Failure {
                message: envelope.message,
                errors: envelope.errors,
            }
        } else {
            Self::Success {
                message: envelope.message,
                data: envelope.data,
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Desired state of the submit button at a point in the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    pub enabled: bool,
    pub label: String,
}

impl ButtonState {
    /// Button state for a loading flag: disabled with the busy label while
    /// a submission runs, enabled with the idle label otherwise.
    pub fn from_loading(loading: bool, idle_label: &str, busy_label: &str) -> Self {
        if loading {
            Self {
                enabled: false,
                label: busy_label.to_string(),
            }
        } else {
            Self {
                enabled: true,
                label: idle_label.to_string(),
            }
        }
    }
}
