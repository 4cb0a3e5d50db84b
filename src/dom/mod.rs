// src/dom/mod.rs
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;

pub use memory::MemoryDom;

/// Identifier handed out by [`Dom::register`] and consumed by
/// [`Dom::unregister`].
pub type SubscriptionId = u64;

/// An event observed on a bound form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The form was submitted.
    Submit,
    /// The value of one input changed and was committed.
    InputChanged { field: String },
}

/// Receiver for events delivered by a [`Dom`] implementation.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one event from the host document.
    async fn handle_event(&self, event: FormEvent);
}

/// The document surface a form workflow runs against.
///
/// Implementations wrap whatever actually renders the page: a browser
/// bridge, a native widget tree, or [`MemoryDom`] in tests. All element
/// operations address elements by their id and silently ignore ids that do
/// not exist; a workflow must keep working when a page omits an optional
/// element such as the notification banner.
pub trait Dom: Send + Sync {
    /// Current value of the input `id`, or `None` when the element does not
    /// exist.
    fn input_value(&self, id: &str) -> Option<String>;

    /// Replaces the text content of the element `id`.
    fn set_text(&self, id: &str, text: &str);

    /// Shows or hides the element `id`.
    fn set_visible(&self, id: &str, visible: bool);

    /// Adds a style class to the element `id`. Adding a class twice is a
    /// no-op.
    fn add_class(&self, id: &str, class: &str);

    /// Removes a style class from the element `id`.
    fn remove_class(&self, id: &str, class: &str);

    /// Enables or disables the interactive element `id`.
    fn set_enabled(&self, id: &str, enabled: bool);

    /// Starts delivering events observed on the form `form_id` to `sink`.
    /// The returned id stays valid until passed to [`Dom::unregister`].
    fn register(&self, form_id: &str, sink: Arc<dyn EventSink>) -> SubscriptionId;

    /// Stops the delivery started by [`Dom::register`]. Unknown ids are
    /// ignored.
    fn unregister(&self, id: SubscriptionId);
}

/// Owned handle to an event registration. Dropping it unregisters the
/// sink, so bindings cannot outlive the workflow that created them.
pub struct Subscription {
    dom: Arc<dyn Dom>,
    id: SubscriptionId,
    active: bool,
}

impl Subscription {
    pub fn new(dom: Arc<dyn Dom>, id: SubscriptionId) -> Self {
        Self {
            dom,
            id,
            active: true,
        }
    }

    /// Leaves the registration in place for the lifetime of the host
    /// document instead of tying it to this handle.
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.active {
            self.dom.unregister(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
