// src/forms/signin.rs
use crate::config::{ButtonConfig, FormConfig, LiveCheck};
use crate::dom::Dom;
use crate::error::ConfigError;
use crate::forms::FormWorkflow;
use crate::services::transport::Transport;
use crate::ui::notification::Notifier;
use crate::utils::validation::FieldSpec;
use std::sync::Arc;
use url::Url;

pub const SIGNIN_FORM_ID: &str = "frmSignin";
pub const SIGNIN_BUTTON_ID: &str = "btnSignin";
pub const SIGNIN_PATH: &str = "/api/signin";

/// Config of the stock sign-in form: email and password, both required,
/// posting to `/api/signin` under `base`. The email field re-validates
/// live while the user edits.
pub fn signin_config(base: &Url) -> Result<FormConfig, ConfigError> {
    let endpoint = base
        .join(SIGNIN_PATH)
        .map_err(|source| ConfigError::InvalidEndpoint {
            base: base.to_string(),
            path: SIGNIN_PATH.to_string(),
            source,
        })?;

    Ok(FormConfig::new(
        SIGNIN_FORM_ID,
        endpoint,
        ButtonConfig::new(SIGNIN_BUTTON_ID, "Sign In", "Signing in..."),
    )
    .field(FieldSpec::new("email", "Email").required().email())
    .field(FieldSpec::new("password", "Password").required())
    .live_check(LiveCheck::EmailShape {
        field: "email".to_string(),
    }))
}

/// Ready-to-mount sign-in workflow.
pub fn signin_workflow(
    base: &Url,
    dom: Arc<dyn Dom>,
    transport: Arc<dyn Transport>,
    notifier: Arc<Notifier>,
) -> Result<FormWorkflow, ConfigError> {
    Ok(FormWorkflow::new(
        signin_config(base)?,
        dom,
        transport,
        notifier,
    ))
}
