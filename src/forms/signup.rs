// src/forms/signup.rs
use crate::config::{ButtonConfig, FormConfig, LiveCheck};
use crate::dom::Dom;
use crate::error::ConfigError;
use crate::forms::FormWorkflow;
use crate::services::transport::Transport;
use crate::ui::notification::Notifier;
use crate::utils::validation::FieldSpec;
use std::sync::Arc;
use url::Url;

pub const SIGNUP_FORM_ID: &str = "frmSignup";
pub const SIGNUP_BUTTON_ID: &str = "btnSignup";
pub const SIGNUP_PATH: &str = "/api/signup";

/// Config of the stock sign-up form: email plus a password pair, posting
/// to `/api/signup` under `base`. A pair mismatch is reported on the
/// `password` field, and the confirmation input is keyed
/// `password_confirmation` both in the page and on the wire.
pub fn signup_config(base: &Url) -> Result<FormConfig, ConfigError> {
    let endpoint = base
        .join(SIGNUP_PATH)
        .map_err(|source| ConfigError::InvalidEndpoint {
            base: base.to_string(),
            path: SIGNUP_PATH.to_string(),
            source,
        })?;

    Ok(FormConfig::new(
        SIGNUP_FORM_ID,
        endpoint,
        ButtonConfig::new(SIGNUP_BUTTON_ID, "Sign Up", "Signing up..."),
    )
    .field(FieldSpec::new("email", "Email").required().email())
    .field(
        FieldSpec::new("password", "Password")
            .required()
            .matches("password_confirmation"),
    )
    .field(FieldSpec::new("password_confirmation", "Password confirmation").required())
    .live_check(LiveCheck::EmailShape {
        field: "email".to_string(),
    })
    .live_check(LiveCheck::PasswordsMatch {
        password: "password".to_string(),
        confirmation: "password_confirmation".to_string(),
    }))
}

/// Ready-to-mount sign-up workflow.
pub fn signup_workflow(
    base: &Url,
    dom: Arc<dyn Dom>,
    transport: Arc<dyn Transport>,
    notifier: Arc<Notifier>,
) -> Result<FormWorkflow, ConfigError> {
    Ok(FormWorkflow::new(
        signup_config(base)?,
        dom,
        transport,
        notifier,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validate_fields;
    use std::collections::HashMap;

    #[test]
    fn test_signup_config_matches_the_page() {
        let base = Url::parse("http://localhost:8888").unwrap();
        let config = signup_config(&base).unwrap();

        assert_eq!(config.form_id, "frmSignup");
        assert_eq!(config.button.id, "btnSignup");
        assert_eq!(config.button.idle_label, "Sign Up");
        assert_eq!(config.button.busy_label, "Signing up...");
        assert_eq!(config.endpoint.as_str(), "http://localhost:8888/api/signup");

        let ids: Vec<&str> = config.field_ids().collect();
        assert_eq!(ids, vec!["email", "password", "password_confirmation"]);
        assert_eq!(config.label_of("password_confirmation"), "Password confirmation");
        assert_eq!(config.live_checks.len(), 2);
    }

    #[test]
    fn test_missing_confirmation_is_only_a_required_error() {
        let base = Url::parse("http://localhost:8888").unwrap();
        let config = signup_config(&base).unwrap();
        let values = HashMap::from([
            ("email".to_string(), "user@example.com".to_string()),
            ("password".to_string(), "secret".to_string()),
            ("password_confirmation".to_string(), String::new()),
        ]);

        let errors = validate_fields(&config.fields, &values);

        // The pair rule stays silent while one side is empty
        assert_eq!(errors.get("password"), None);
        assert_eq!(
            errors.get("password_confirmation"),
            Some(&["Password confirmation is required".to_string()][..])
        );
    }
}
