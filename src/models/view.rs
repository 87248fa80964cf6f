use askama::Template;
use std::fmt;

use super::StatusKind;

/// Bootstrap alert flavour applied to the message slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    /// Full class attribute for `#email-status-message`.
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Info => "alert alert-info",
            Tone::Success => "alert alert-success",
            Tone::Warning => "alert alert-warning",
            Tone::Danger => "alert alert-danger",
        }
    }
}

/// Font Awesome glyph shown ahead of a terminal message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    CheckCircle,
    ExclamationTriangle,
    InfoCircle,
    TimesCircle,
    Clock,
}

impl Icon {
    pub fn css_class(&self) -> &'static str {
        match self {
            Icon::CheckCircle => "fas fa-check-circle",
            Icon::ExclamationTriangle => "fas fa-exclamation-triangle",
            Icon::InfoCircle => "fas fa-info-circle",
            Icon::TimesCircle => "fas fa-times-circle",
            Icon::Clock => "fas fa-clock",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Desired state of the status display for one status report.
///
/// Built by [`crate::services::presenter::present`] and applied by a
/// [`crate::services::display::StatusDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub status: StatusKind,
    pub spinner_visible: bool,
    pub tone: Tone,
    pub icon: Option<Icon>,
    pub text: String,
    /// Muted trailing remark, e.g. how long delivery usually takes.
    pub note: Option<String>,
    pub stops_polling: bool,
}

#[derive(Template)]
#[template(path = "status_message.html")]
struct MessageTemplate<'a> {
    icon: Option<&'static str>,
    text: &'a str,
    note: Option<&'a str>,
}

impl StatusView {
    pub fn message_class(&self) -> &'static str {
        self.tone.css_class()
    }

    /// Inner HTML for `#email-status-message`. Text and note are escaped.
    pub fn message_html(&self) -> Result<String, askama::Error> {
        MessageTemplate {
            icon: self.icon.map(|icon| icon.css_class()),
            text: &self.text,
            note: self.note.as_deref(),
        }
        .render()
    }
}
