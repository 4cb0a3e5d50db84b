// src/dom/memory.rs
use crate::config::FormConfig;
use crate::dom::{Dom, EventSink, FormEvent, SubscriptionId};
use crate::ui::field_errors::help_text_id;
use crate::ui::notification::DEFAULT_BANNER_ID;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Element {
    value: String,
    text: String,
    classes: Vec<String>,
    visible: bool,
    enabled: bool,
}

impl Element {
    fn new() -> Self {
        Self {
            value: String::new(),
            text: String::new(),
            classes: Vec::new(),
            visible: true,
            enabled: true,
        }
    }
}

/// In-memory document for tests and headless hosts.
///
/// Behaves like a real page as far as the [`Dom`] contract goes: elements
/// are addressed by id, operations on ids that were never added are
/// silently ignored, and registered sinks receive the events emitted on
/// their form. Extra inspection methods expose the state the trait only
/// writes.
pub struct MemoryDom {
    elements: Mutex<HashMap<String, Element>>,
    sinks: Mutex<BTreeMap<SubscriptionId, (String, Arc<dyn EventSink>)>>,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            elements: Mutex::new(HashMap::new()),
            sinks: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Adds an empty element that is visible and enabled.
    pub fn add_element(&self, id: &str) {
        lock(&self.elements).insert(id.to_string(), Element::new());
    }

    /// Adds an input element holding `value`.
    pub fn add_input(&self, id: &str, value: &str) {
        let mut element = Element::new();
        element.value = value.to_string();
        lock(&self.elements).insert(id.to_string(), element);
    }

    /// Builds the standard page for a form: the form element itself, one
    /// input and one hidden help region per field, the submit button with
    /// its idle label, and a hidden notification banner.
    pub fn install_form(&self, config: &FormConfig) {
        self.add_element(&config.form_id);
        for field in &config.fields {
            self.add_input(&field.id, "");
            self.add_element(&help_text_id(&field.id));
            self.set_visible(&help_text_id(&field.id), false);
        }
        self.add_element(&config.button.id);
        self.set_text(&config.button.id, &config.button.idle_label);
        self.add_element(DEFAULT_BANNER_ID);
        self.set_visible(DEFAULT_BANNER_ID, false);
    }

    /// Overwrites the value of an existing input, like a user typing.
    pub fn set_value(&self, id: &str, value: &str) {
        self.with_element(id, |element| element.value = value.to_string());
    }

    pub fn text(&self, id: &str) -> Option<String> {
        lock(&self.elements).get(id).map(|element| element.text.clone())
    }

    pub fn is_visible(&self, id: &str) -> bool {
        lock(&self.elements)
            .get(id)
            .map(|element| element.visible)
            .unwrap_or(false)
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        lock(&self.elements)
            .get(id)
            .map(|element| element.enabled)
            .unwrap_or(false)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        lock(&self.elements)
            .get(id)
            .map(|element| element.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Number of currently registered sinks, across all forms.
    pub fn sink_count(&self) -> usize {
        lock(&self.sinks).len()
    }

    /// Delivers `event` to every sink registered for `form_id`, in
    /// registration order.
    pub async fn emit(&self, form_id: &str, event: FormEvent) {
        let sinks: Vec<Arc<dyn EventSink>> = {
            let registered = lock(&self.sinks);
            registered
                .values()
                .filter(|(form, _)| form == form_id)
                .map(|(_, sink)| Arc::clone(sink))
                .collect()
        };
        // Dispatch outside the lock so a sink may register or unregister.
        for sink in sinks {
            sink.handle_event(event.clone()).await;
        }
    }

    fn with_element<F: FnOnce(&mut Element)>(&self, id: &str, apply: F) {
        if let Some(element) = lock(&self.elements).get_mut(id) {
            apply(element);
        }
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    fn input_value(&self, id: &str) -> Option<String> {
        lock(&self.elements).get(id).map(|element| element.value.clone())
    }

    fn set_text(&self, id: &str, text: &str) {
        self.with_element(id, |element| element.text = text.to_string());
    }

    fn set_visible(&self, id: &str, visible: bool) {
        self.with_element(id, |element| element.visible = visible);
    }

    fn add_class(&self, id: &str, class: &str) {
        self.with_element(id, |element| {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, id: &str, class: &str) {
        self.with_element(id, |element| element.classes.retain(|c| c != class));
    }

    fn set_enabled(&self, id: &str, enabled: bool) {
        self.with_element(id, |element| element.enabled = enabled);
    }

    fn register(&self, form_id: &str, sink: Arc<dyn EventSink>) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.sinks).insert(id, (form_id.to_string(), sink));
        id
    }

    fn unregister(&self, id: SubscriptionId) {
        lock(&self.sinks).remove(&id);
    }
}
