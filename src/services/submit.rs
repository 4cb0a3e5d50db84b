// src/services/submit.rs
use crate::config::{FormConfig, LiveCheck};
use crate::dom::Dom;
use crate::models::{
    ButtonState, ErrorMap, SubmissionResult, INVALID_INPUT_MESSAGE, PASSWORDS_MISMATCH_MESSAGE,
};
use crate::services::transport::{FormRequest, Transport};
use crate::ui::field_errors::ErrorPresenter;
use crate::ui::notification::{NotificationKind, Notifier};
use crate::utils::validation::{email_message, is_valid_email, passwords_match, validate_fields};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a submit attempt amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation rejected the input; nothing was sent.
    Invalid(ErrorMap),
    /// An exchange completed and the envelope was decoded.
    Completed(SubmissionResult),
    /// The request failed before an envelope was obtained.
    TransportFailed(String),
    /// Another attempt on this form was still running; this one was
    /// dropped.
    InFlight,
}

/// Drives one form through its submit lifecycle: validate, render errors,
/// exchange with the backend, and report the result. The submit button is
/// restored whichever way an attempt ends.
pub struct SubmitController {
    config: FormConfig,
    dom: Arc<dyn Dom>,
    transport: Arc<dyn Transport>,
    notifier: Arc<Notifier>,
    errors: ErrorPresenter,
    in_flight: AtomicBool,
}

impl SubmitController {
    pub fn new(
        config: FormConfig,
        dom: Arc<dyn Dom>,
        transport: Arc<dyn Transport>,
        notifier: Arc<Notifier>,
    ) -> Self {
        let errors = ErrorPresenter::new(dom.clone());
        Self {
            config,
            dom,
            transport,
            notifier,
            errors,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Runs one submit attempt end to end. Re-entry while an attempt is
    /// already running is dropped, mirroring the disabled submit button.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                "submit on {} ignored, another attempt is in flight",
                self.config.form_id
            );
            return SubmitOutcome::InFlight;
        }
        let _restore = ButtonGuard::engage(self);

        self.errors.clear_all(self.config.field_ids());

        let values = self.read_values();
        let validation = validate_fields(&self.config.fields, &values);
        if !validation.is_empty() {
            self.errors.render_map(&validation);
            self.notifier
                .notify(NotificationKind::Error, INVALID_INPUT_MESSAGE);
            return SubmitOutcome::Invalid(validation);
        }

        match self.transport.send(&self.build_request(&values)).await {
            Ok(response) => {
                let result = response.into_result();
                match &result {
                    SubmissionResult::Success { message, .. } => {
                        tracing::info!("{} submitted: {}", self.config.form_id, message);
                        self.notifier.notify(NotificationKind::Success, message);
                    }
                    SubmissionResult::Failure { message, errors } => {
                        tracing::info!("{} rejected: {}", self.config.form_id, message);
                        if let Some(map) = errors {
                            self.errors.render_map(map);
                        }
                        self.notifier.notify(NotificationKind::Error, message);
                    }
                }
                SubmitOutcome::Completed(result)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!("{} submission failed: {}", self.config.form_id, message);
                self.notifier.notify(NotificationKind::Error, &message);
                SubmitOutcome::TransportFailed(message)
            }
        }
    }

    /// Applies the configured live checks for a change to `field`. Only
    /// the fields a triggered check reports on are touched; everything
    /// else keeps its current state.
    pub fn input_changed(&self, field: &str) {
        for check in &self.config.live_checks {
            if !check.watches(field) {
                continue;
            }
            match check {
                LiveCheck::EmailShape { field: email_field } => {
                    let value = self.dom.input_value(email_field).unwrap_or_default();
                    if is_valid_email(&value) {
                        self.errors.clear_field_errors(email_field);
                    } else {
                        self.errors.show_field_errors(
                            email_field,
                            &[email_message(self.config.label_of(email_field))],
                        );
                    }
                }
                LiveCheck::PasswordsMatch {
                    password,
                    confirmation,
                } => {
                    let first = self.dom.input_value(password).unwrap_or_default();
                    let second = self.dom.input_value(confirmation).unwrap_or_default();
                    if passwords_match(&first, &second) {
                        self.errors.clear_field_errors(password);
                    } else {
                        self.errors.show_field_errors(
                            password,
                            &[PASSWORDS_MISMATCH_MESSAGE.to_string()],
                        );
                    }
                }
            }
        }
    }

    fn read_values(&self) -> HashMap<String, String> {
        self.config
            .fields
            .iter()
            .map(|field| {
                let value = self.dom.input_value(&field.id).unwrap_or_default();
                (field.id.clone(), value)
            })
            .collect()
    }

    /// Serializes the submission: one JSON member per configured field,
    /// values trimmed. Validation always sees the raw values; only the
    /// wire form is trimmed.
    fn build_request(&self, values: &HashMap<String, String>) -> FormRequest {
        let body = self
            .config
            .fields
            .iter()
            .map(|field| {
                let value = values.get(&field.id).map(String::as_str).unwrap_or("");
                (field.id.clone(), value.trim().to_string())
            })
            .collect();
        FormRequest {
            endpoint: self.config.endpoint.clone(),
            method: self.config.method.clone(),
            body,
        }
    }

    fn set_button(&self, loading: bool) {
        let state = ButtonState::from_loading(
            loading,
            &self.config.button.idle_label,
            &self.config.button.busy_label,
        );
        self.dom.set_enabled(&self.config.button.id, state.enabled);
        self.dom.set_text(&self.config.button.id, &state.label);
    }
}

/// Puts the button into its busy state on construction and restores the
/// idle state plus the in-flight flag when the attempt ends, early
/// returns and panics included.
struct ButtonGuard<'a> {
    controller: &'a SubmitController,
}

impl<'a> ButtonGuard<'a> {
    fn engage(controller: &'a SubmitController) -> Self {
        controller.set_button(true);
        Self { controller }
    }
}

impl Drop for ButtonGuard<'_> {
    fn drop(&mut self) {
        self.controller.set_button(false);
        self.controller.in_flight.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ButtonConfig;
    use crate::dom::MemoryDom;
    use crate::error::TransportError;
    use crate::models::ApiResponse;
    use crate::services::transport::{FormResponse, ScriptedTransport};
    use crate::ui::field_errors::ERROR_CLASS;
    use crate::ui::notification::DEFAULT_BANNER_ID;
    use crate::utils::validation::FieldSpec;
    use async_trait::async_trait;
    use reqwest::{Method, StatusCode};
    use std::sync::atomic::AtomicUsize;
    use url::Url;

    fn signin_config() -> FormConfig {
        FormConfig::new(
            "frmSignin",
            Url::parse("http://localhost:8888/api/signin").unwrap(),
            ButtonConfig::new("btnSignin", "Sign In", "Signing in..."),
        )
        .field(FieldSpec::new("email", "Email").required().email())
        .field(FieldSpec::new("password", "Password").required())
        .live_check(LiveCheck::EmailShape {
            field: "email".to_string(),
        })
    }

    struct Harness {
        dom: Arc<MemoryDom>,
        transport: Arc<ScriptedTransport>,
        controller: SubmitController,
    }

    // Run with RUST_LOG=naviform=debug to see the flow in test output
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn harness(config: FormConfig) -> Harness {
        init_tracing();
        let dom = Arc::new(MemoryDom::new());
        dom.install_form(&config);
        let transport = Arc::new(ScriptedTransport::new());
        let notifier = Arc::new(Notifier::new(dom.clone() as Arc<dyn Dom>));
        let controller = SubmitController::new(
            config,
            dom.clone() as Arc<dyn Dom>,
            transport.clone() as Arc<dyn Transport>,
            notifier,
        );
        Harness {
            dom,
            transport,
            controller,
        }
    }

    #[tokio::test]
    async fn test_empty_signin_renders_errors_and_sends_nothing() {
        let h = harness(signin_config());

        let outcome = h.controller.submit().await;

        let errors = match outcome {
            SubmitOutcome::Invalid(map) => map,
            other => panic!("expected invalid outcome, got {:?}", other),
        };
        assert_eq!(
            errors.get("email"),
            Some(
                &[
                    "Email is required".to_string(),
                    "Email must be a valid email address".to_string(),
                ][..]
            )
        );
        assert_eq!(
            errors.get("password"),
            Some(&["Password is required".to_string()][..])
        );

        assert!(h.dom.has_class("email", ERROR_CLASS));
        assert_eq!(
            h.dom.text("email-help"),
            Some("Email is required\nEmail must be a valid email address".to_string())
        );
        assert!(h.dom.has_class("password", ERROR_CLASS));
        assert_eq!(
            h.dom.text(DEFAULT_BANNER_ID),
            Some("ERROR: Invalid input!".to_string())
        );
        assert!(h.dom.has_class(DEFAULT_BANNER_ID, "error"));

        assert_eq!(h.transport.calls(), 0);
        assert!(h.dom.is_enabled("btnSignin"));
        assert_eq!(h.dom.text("btnSignin"), Some("Sign In".to_string()));
    }

    #[tokio::test]
    async fn test_successful_signin_shows_banner_and_restores_button() {
        let h = harness(signin_config());
        h.dom.set_value("email", "user@example.com");
        h.dom.set_value("password", "secret");
        h.transport.respond(FormResponse::new(
            StatusCode::OK,
            ApiResponse {
                message: "Logged in.".to_string(),
                ..Default::default()
            },
        ));

        let outcome = h.controller.submit().await;

        match outcome {
            SubmitOutcome::Completed(result) => {
                assert!(result.is_success());
                assert_eq!(result.message(), "Logged in.");
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(
            h.dom.text(DEFAULT_BANNER_ID),
            Some("SUCCESS: Logged in.".to_string())
        );
        assert!(h.dom.has_class(DEFAULT_BANNER_ID, "success"));
        assert_eq!(h.transport.calls(), 1);
        assert!(h.dom.is_enabled("btnSignin"));
        assert_eq!(h.dom.text("btnSignin"), Some("Sign In".to_string()));
    }

    #[tokio::test]
    async fn test_submitted_values_are_trimmed() {
        let h = harness(signin_config());
        h.dom.set_value("email", "user@example.com");
        h.dom.set_value("password", "  secret  ");
        h.transport.respond(FormResponse::new(
            StatusCode::OK,
            ApiResponse {
                message: "Logged in.".to_string(),
                ..Default::default()
            },
        ));

        h.controller.submit().await;

        let sent = h.transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].endpoint.path(), "/api/signin");
        assert_eq!(sent[0].body.get("email"), Some(&"user@example.com".to_string()));
        assert_eq!(sent[0].body.get("password"), Some(&"secret".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_reports_the_error_message() {
        let h = harness(signin_config());
        h.dom.set_value("email", "user@example.com");
        h.dom.set_value("password", "secret");
        h.transport
            .fail(TransportError::General("Network request failed".to_string()));

        let outcome = h.controller.submit().await;

        match outcome {
            SubmitOutcome::TransportFailed(message) => {
                assert_eq!(message, "Network request failed");
            }
            other => panic!("expected transport failure, got {:?}", other),
        }
        assert_eq!(
            h.dom.text(DEFAULT_BANNER_ID),
            Some("ERROR: Network request failed".to_string())
        );
        assert!(h.dom.is_enabled("btnSignin"));
        assert_eq!(h.dom.text("btnSignin"), Some("Sign In".to_string()));
    }

    #[tokio::test]
    async fn test_server_rejection_renders_its_field_errors() {
        let h = harness(signin_config());
        h.dom.set_value("email", "user@example.com");
        h.dom.set_value("password", "wrong");
        let mut server_errors = ErrorMap::new();
        server_errors.add("password", "incorrect password");
        h.transport.respond(FormResponse::new(
            StatusCode::UNAUTHORIZED,
            ApiResponse {
                message: "Bad credentials".to_string(),
                errors: Some(server_errors),
                ..Default::default()
            },
        ));

        let outcome = h.controller.submit().await;

        match outcome {
            SubmitOutcome::Completed(result) => assert!(!result.is_success()),
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(h.dom.has_class("password", ERROR_CLASS));
        assert_eq!(
            h.dom.text("password-help"),
            Some("incorrect password".to_string())
        );
        assert!(h.dom.is_visible("password-help"));
        // The email field had no server error and stays untouched
        assert!(!h.dom.has_class("email", ERROR_CLASS));
        assert_eq!(h.dom.text("email-help"), Some(String::new()));
        assert_eq!(
            h.dom.text(DEFAULT_BANNER_ID),
            Some("ERROR: Bad credentials".to_string())
        );
        assert!(h.dom.is_enabled("btnSignin"));
    }

    #[tokio::test]
    async fn test_unmatched_server_error_keys_are_ignored() {
        let h = harness(signin_config());
        h.dom.set_value("email", "user@example.com");
        h.dom.set_value("password", "secret");
        let mut server_errors = ErrorMap::new();
        server_errors.add("username", "Username is taken");
        h.transport.respond(FormResponse::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse {
                message: "Invalid input!".to_string(),
                errors: Some(server_errors),
                ..Default::default()
            },
        ));

        let outcome = h.controller.submit().await;

        // No page element is called "username"; the rejection still lands
        // in the banner and the known fields stay untouched
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert!(!h.dom.has_class("email", ERROR_CLASS));
        assert!(!h.dom.has_class("password", ERROR_CLASS));
        assert_eq!(
            h.dom.text(DEFAULT_BANNER_ID),
            Some("ERROR: Invalid input!".to_string())
        );
        assert!(h.dom.is_enabled("btnSignin"));
    }

    #[tokio::test]
    async fn test_next_attempt_clears_stale_errors() {
        let h = harness(signin_config());
        h.controller.submit().await;
        assert!(h.dom.has_class("email", ERROR_CLASS));

        h.dom.set_value("email", "user@example.com");
        h.dom.set_value("password", "secret");
        h.transport.respond(FormResponse::new(
            StatusCode::OK,
            ApiResponse {
                message: "Logged in.".to_string(),
                ..Default::default()
            },
        ));
        h.controller.submit().await;

        assert!(!h.dom.has_class("email", ERROR_CLASS));
        assert!(!h.dom.has_class("password", ERROR_CLASS));
        assert!(!h.dom.is_visible("email-help"));
        assert_eq!(
            h.dom.text(DEFAULT_BANNER_ID),
            Some("SUCCESS: Logged in.".to_string())
        );
    }

    struct GatedTransport {
        gate: tokio::sync::Notify,
        calls: AtomicUsize,
    }

    impl GatedTransport {
        fn new() -> Self {
            Self {
                gate: tokio::sync::Notify::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn release(&self) {
            self.gate.notify_one();
        }
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn send(&self, _request: &FormRequest) -> Result<FormResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(FormResponse::new(
                StatusCode::OK,
                ApiResponse {
                    message: "Welcome".to_string(),
                    ..Default::default()
                },
            ))
        }
    }

    #[tokio::test]
    async fn test_second_submit_is_dropped_while_first_runs() {
        let config = signin_config();
        let dom = Arc::new(MemoryDom::new());
        dom.install_form(&config);
        dom.set_value("email", "user@example.com");
        dom.set_value("password", "secret");
        let transport = Arc::new(GatedTransport::new());
        let notifier = Arc::new(Notifier::new(dom.clone() as Arc<dyn Dom>));
        let controller = Arc::new(SubmitController::new(
            config,
            dom.clone() as Arc<dyn Dom>,
            transport.clone() as Arc<dyn Transport>,
            notifier,
        ));

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        // Let the first attempt reach the transport
        for _ in 0..32 {
            if !dom.is_enabled("btnSignin") {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!dom.is_enabled("btnSignin"));
        assert_eq!(dom.text("btnSignin"), Some("Signing in...".to_string()));

        let second = controller.submit().await;
        assert_eq!(second, SubmitOutcome::InFlight);
        assert!(!dom.is_enabled("btnSignin"));

        transport.release();
        let first = background.await.unwrap();
        assert!(matches!(first, SubmitOutcome::Completed(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(dom.is_enabled("btnSignin"));
        assert_eq!(dom.text("btnSignin"), Some("Sign In".to_string()));
    }

    #[test]
    fn test_live_email_check_toggles_the_inline_error() {
        let h = harness(signin_config());

        h.dom.set_value("email", "not-an-email");
        h.controller.input_changed("email");
        assert!(h.dom.has_class("email", ERROR_CLASS));
        assert_eq!(
            h.dom.text("email-help"),
            Some("Email must be a valid email address".to_string())
        );

        h.dom.set_value("email", "user@example.com");
        h.controller.input_changed("email");
        assert!(!h.dom.has_class("email", ERROR_CLASS));
        assert!(!h.dom.is_visible("email-help"));
    }

    #[test]
    fn test_live_pair_check_reports_on_the_password_field() {
        let config = FormConfig::new(
            "frmSignup",
            Url::parse("http://localhost:8888/api/signup").unwrap(),
            ButtonConfig::new("btnSignup", "Sign Up", "Signing up..."),
        )
        .field(
            FieldSpec::new("password", "Password")
                .required()
                .matches("password_confirmation"),
        )
        .field(FieldSpec::new("password_confirmation", "Password confirmation").required())
        .live_check(LiveCheck::PasswordsMatch {
            password: "password".to_string(),
            confirmation: "password_confirmation".to_string(),
        });
        let h = harness(config);

        h.dom.set_value("password", "secret");
        h.dom.set_value("password_confirmation", "secrte");
        h.controller.input_changed("password_confirmation");
        assert!(h.dom.has_class("password", ERROR_CLASS));
        assert_eq!(
            h.dom.text("password-help"),
            Some("Passwords do not match".to_string())
        );

        h.dom.set_value("password_confirmation", "secret");
        h.controller.input_changed("password_confirmation");
        assert!(!h.dom.has_class("password", ERROR_CLASS));
        assert!(!h.dom.is_visible("password-help"));
    }

    #[test]
    fn test_changes_to_unwatched_fields_do_nothing() {
        let h = harness(signin_config());

        h.dom.set_value("password", "whatever");
        h.controller.input_changed("password");

        assert!(!h.dom.has_class("password", ERROR_CLASS));
        assert!(!h.dom.has_class("email", ERROR_CLASS));
    }
}
