// src/ui/notification.rs
use crate::dom::Dom;
use std::sync::Arc;

/// Default id of the banner element.
pub const DEFAULT_BANNER_ID: &str = "notification";

/// Banner flavor. Each kind maps to a style class and a text prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS: ",
            Self::Error => "ERROR: ",
        }
    }

    fn opposite(&self) -> Self {
        match self {
            Self::Success => Self::Error,
            Self::Error => Self::Success,
        }
    }
}

/// Owns the notification banner. The banner shows one message at a time,
/// newer messages replace older ones, and the two flavor classes never
/// overlap. A page without a banner element turns every call into a no-op.
pub struct Notifier {
    dom: Arc<dyn Dom>,
    banner_id: String,
}

impl Notifier {
    pub fn new(dom: Arc<dyn Dom>) -> Self {
        Self::with_banner(dom, DEFAULT_BANNER_ID)
    }

    pub fn with_banner(dom: Arc<dyn Dom>, banner_id: impl Into<String>) -> Self {
        Self {
            dom,
            banner_id: banner_id.into(),
        }
    }

    /// Shows `message` with the kind's class and prefix.
    pub fn notify(&self, kind: NotificationKind, message: &str) {
        self.dom
            .remove_class(&self.banner_id, kind.opposite().class());
        self.dom.add_class(&self.banner_id, kind.class());
        self.dom
            .set_text(&self.banner_id, &format!("{}{}", kind.prefix(), message));
        self.dom.set_visible(&self.banner_id, true);
    }

    /// Empties and hides the banner.
    pub fn clear(&self) {
        self.dom
            .remove_class(&self.banner_id, NotificationKind::Success.class());
        self.dom
            .remove_class(&self.banner_id, NotificationKind::Error.class());
        self.dom.set_text(&self.banner_id, "");
        self.dom.set_visible(&self.banner_id, false);
    }
}
