// src/utils/validation.rs
use crate::models::{ErrorMap, PASSWORDS_MISMATCH_MESSAGE};
use regex::Regex;
use std::collections::HashMap;

lazy_static::lazy_static! {
    // Conservative grammar: dotted atoms in the local part, at least one dot
    // in the domain, labels start and end alphanumeric. "a@b" does not pass.
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$"
    ).unwrap();
}

/// Checks a value against the email grammar. The raw value is matched as
/// typed; surrounding whitespace makes it invalid.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// A required value must contain at least one non-whitespace character.
pub fn is_required_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Password pair check. Stays silent while either side is still empty so
/// a mismatch only surfaces once both have been typed.
pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password.is_empty() || confirmation.is_empty() || password == confirmation
}

pub fn required_message(label: &str) -> String {
    format!("{} is required", label)
}

pub fn email_message(label: &str) -> String {
    format!("{} must be a valid email address", label)
}

/// One declarative constraint on a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Must be non-empty after trimming.
    Required,
    /// Must match the email grammar.
    Email,
    /// Must equal the current value of the field `other`. Skipped while
    /// either side is empty; `Required` covers the empty case.
    Matches { other: String },
}

/// A form field together with the rules that apply to it. The `label` is
/// the human-readable name used inside generated messages.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rules: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    pub fn email(mut self) -> Self {
        self.rules.push(Rule::Email);
        self
    }

    pub fn matches(mut self, other: impl Into<String>) -> Self {
        self.rules.push(Rule::Matches {
            other: other.into(),
        });
        self
    }
}

/// Runs every rule of every field against the raw input values and collects
/// the failures into a fresh map. Within one field the messages keep the
/// declaration order of the rules. Fields absent from `values` count as
/// empty.
pub fn validate_fields(fields: &[FieldSpec], values: &HashMap<String, String>) -> ErrorMap {
    let mut errors = ErrorMap::new();

    for field in fields {
        let value = values.get(&field.id).map(String::as_str).unwrap_or("");

        for rule in &field.rules {
            match rule {
                Rule::Required => {
                    if !is_required_filled(value) {
                        errors.add(&field.id, required_message(&field.label));
                    }
                }
                Rule::Email => {
                    if !is_valid_email(value) {
                        errors.add(&field.id, email_message(&field.label));
                    }
                }
                Rule::Matches { other } => {
                    let other_value = values.get(other).map(String::as_str).unwrap_or("");
                    if !passwords_match(value, other_value) {
                        errors.add(&field.id, PASSWORDS_MISMATCH_MESSAGE);
                    }
                }
            }
        }
    }

    errors
}
