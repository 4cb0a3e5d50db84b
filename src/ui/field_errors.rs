// src/ui/field_errors.rs
use crate::dom::Dom;
use crate::models::ErrorMap;
use std::sync::Arc;

/// Class added to an input while it carries validation errors.
pub const ERROR_CLASS: &str = "error";

/// Id of the help region paired with the input `field`.
pub fn help_text_id(field: &str) -> String {
    format!("{}-help", field)
}

/// Renders field-level validation errors: the input gets the error class,
/// the help region paired with it shows the messages.
pub struct ErrorPresenter {
    dom: Arc<dyn Dom>,
}

impl ErrorPresenter {
    pub fn new(dom: Arc<dyn Dom>) -> Self {
        Self { dom }
    }

    /// Shows `messages` for `field`, replacing whatever was shown before.
    /// One message per line. An empty list means "no error" and clears the
    /// field instead.
    pub fn show_field_errors(&self, field: &str, messages: &[String]) {
        if messages.is_empty() {
            self.clear_field_errors(field);
            return;
        }
        self.dom.add_class(field, ERROR_CLASS);
        let help = help_text_id(field);
        self.dom.set_text(&help, &messages.join("\n"));
        self.dom.set_visible(&help, true);
    }

    /// Returns `field` to its untouched look: no error class, empty and
    /// hidden help region. Clearing an already clear field changes nothing.
    pub fn clear_field_errors(&self, field: &str) {
        self.dom.remove_class(field, ERROR_CLASS);
        let help = help_text_id(field);
        self.dom.set_text(&help, "");
        self.dom.set_visible(&help, false);
    }

    /// Clears every listed field.
    pub fn clear_all<'a, I>(&self, fields: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for field in fields {
            self.clear_field_errors(field);
        }
    }

    /// Renders a whole validation map. Fields without an entry are left
    /// untouched.
    pub fn render_map(&self, errors: &ErrorMap) {
        for (field, messages) in errors.iter() {
            self.show_field_errors(field, messages);
        }
    }
}
