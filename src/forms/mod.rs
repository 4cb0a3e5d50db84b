// src/forms/mod.rs
use crate::config::FormConfig;
use crate::dom::{Dom, EventSink, FormEvent, Subscription};
use crate::services::submit::{SubmitController, SubmitOutcome};
use crate::services::transport::Transport;
use crate::ui::notification::Notifier;
use async_trait::async_trait;
use std::sync::Arc;

pub mod signin;
pub mod signup;

/// A form wired to its page: the submit controller plus the event binding
/// that feeds it. Binding happens at [`FormWorkflow::mount`]; calling
/// [`FormWorkflow::unmount`] or dropping the workflow removes it again,
/// so a binding never outlives its workflow.
pub struct FormWorkflow {
    controller: Arc<SubmitController>,
    dom: Arc<dyn Dom>,
    binding: Option<Subscription>,
}

impl FormWorkflow {
    pub fn new(
        config: FormConfig,
        dom: Arc<dyn Dom>,
        transport: Arc<dyn Transport>,
        notifier: Arc<Notifier>,
    ) -> Self {
        let controller = Arc::new(SubmitController::new(
            config,
            dom.clone(),
            transport,
            notifier,
        ));
        Self {
            controller,
            dom,
            binding: None,
        }
    }

    /// Starts listening for submit and change events on the form.
    /// Mounting an already mounted workflow keeps the existing binding.
    pub fn mount(&mut self) {
        if self.binding.is_some() {
            return;
        }
        let form_id = self.controller.config().form_id.clone();
        tracing::debug!("mounting {}", form_id);
        let sink = Arc::new(ControllerSink {
            controller: self.controller.clone(),
        });
        let id = self.dom.register(&form_id, sink);
        self.binding = Some(Subscription::new(self.dom.clone(), id));
    }

    /// Removes the event binding. The page keeps whatever state the last
    /// attempt left behind.
    pub fn unmount(&mut self) {
        if self.binding.take().is_some() {
            tracing::debug!("unmounting {}", self.controller.config().form_id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.binding.is_some()
    }

    /// The controller driving this form, for hosts that trigger submits
    /// programmatically.
    pub fn controller(&self) -> Arc<SubmitController> {
        self.controller.clone()
    }

    /// Submits once, as if the user pressed the button.
    pub async fn submit(&self) -> SubmitOutcome {
        self.controller.submit().await
    }
}

struct ControllerSink {
    controller: Arc<SubmitController>,
}

#[async_trait]
impl EventSink for ControllerSink {
    async fn handle_event(&self, event: FormEvent) {
        match event {
            FormEvent::Submit => {
                self.controller.submit().await;
            }
            FormEvent::InputChanged { field } => self.controller.input_changed(&field),
        }
    }
}
