// src/lib.rs
//! Form workflows for sign-in and sign-up pages: declarative validation,
//! inline error rendering, submit-button state, and asynchronous JSON
//! submission to a backend API.
//!
//! The document a workflow drives sits behind the [`Dom`] trait, so the
//! same flow runs against a real page bridge in production and against
//! the in-memory [`MemoryDom`] in tests. A mounted workflow listens for
//! submit and change events on its form and owns the binding; dropping
//! the workflow unbinds it.
//!
//! ```
//! use naviform::{signin_workflow, Dom, HttpTransport, MemoryDom, Notifier};
//! use std::sync::Arc;
//! use url::Url;
//!
//! let base = Url::parse("http://localhost:8888").unwrap();
//! let dom = Arc::new(MemoryDom::new());
//! let transport = Arc::new(HttpTransport::new());
//! let notifier = Arc::new(Notifier::new(dom.clone() as Arc<dyn Dom>));
//!
//! let mut workflow = signin_workflow(&base, dom, transport, notifier).unwrap();
//! workflow.mount();
//! assert!(workflow.is_mounted());
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod forms;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

pub use config::{ButtonConfig, FormConfig, LiveCheck};
pub use dom::{Dom, EventSink, FormEvent, MemoryDom, Subscription, SubscriptionId};
pub use error::{ConfigError, TransportError};
pub use forms::signin::{signin_config, signin_workflow};
pub use forms::signup::{signup_config, signup_workflow};
pub use forms::FormWorkflow;
pub use models::{ApiResponse, ButtonState, ErrorMap, SubmissionResult};
pub use services::submit::{SubmitController, SubmitOutcome};
pub use services::transport::{
    FormRequest, FormResponse, HttpTransport, ScriptedTransport, Transport,
};
pub use ui::field_errors::ErrorPresenter;
pub use ui::notification::{NotificationKind, Notifier};
pub use utils::validation::{FieldSpec, Rule};
