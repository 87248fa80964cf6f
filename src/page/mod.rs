//! Wiring the status display into a host page.
//!
//! The poller only needs two anchors to exist: the spinner
//! (`#email-status-spinner`) and the message slot (`#email-status-message`),
//! both inside `#email-status`. [`bootstrap::bootstrap`] creates them when the
//! page URL asks for it; a [`HostPage`] adapter performs the actual insertion
//! and applies [`crate::models::StatusView`]s to them.

pub mod bootstrap;
pub mod memory;

use crate::error::PageError;
use crate::services::StatusDisplay;
use askama::Template;
use std::sync::Arc;

pub use bootstrap::{activation_from_query, activation_from_url, bootstrap, Activation};
pub use memory::{MemoryPage, PageBlock, StatusElements};

pub const CONTAINER_ID: &str = "email-status-container";
pub const STATUS_ID: &str = "email-status";
pub const SPINNER_ID: &str = "email-status-spinner";
pub const MESSAGE_ID: &str = "email-status-message";
/// Class the message slot carries before the first status arrives.
pub const MESSAGE_BASE_CLASS: &str = "email-status-message";

pub const STATUS_STYLESHEET: &str = include_str!("../../templates/email_status.css");

pub trait HostPage: Send + Sync {
    /// Inserts the status container right before the first alert container,
    /// or the first form when there is none. Returns false when neither exists.
    fn insert_status_container(&self) -> Result<bool, PageError>;

    fn inject_styles(&self, css: &str) -> Result<(), PageError>;

    /// Display bound to the elements created by [`HostPage::insert_status_container`].
    fn status_display(&self) -> Arc<dyn StatusDisplay>;
}

#[derive(Template)]
#[template(path = "status_container.html")]
struct StatusContainerTemplate<'a> {
    container_id: &'static str,
    status_id: &'static str,
    spinner_id: &'static str,
    message_id: &'static str,
    spinner_display: &'static str,
    message_class: &'a str,
    message_html: &'a str,
}

/// Markup of the whole status container in the given state.
pub fn render_status_container(elements: &StatusElements) -> Result<String, askama::Error> {
    StatusContainerTemplate {
        container_id: CONTAINER_ID,
        status_id: STATUS_ID,
        spinner_id: SPINNER_ID,
        message_id: MESSAGE_ID,
        spinner_display: if elements.spinner_visible {
            "inline-block"
        } else {
            "none"
        },
        message_class: &elements.message_class,
        message_html: &elements.message_html,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_container_has_hidden_spinner_and_empty_message() {
        let html = render_status_container(&StatusElements::default()).expect("renders");
        assert!(html.contains(r#"id="email-status-container""#));
        assert!(html.contains(r#"id="email-status" class="email-status-wrapper""#));
        assert!(html.contains(r#"id="email-status-spinner""#));
        assert!(html.contains("display: none;"));
        assert!(html.contains(
            r#"<span id="email-status-message" class="email-status-message"></span>"#
        ));
    }

    #[test]
    fn test_container_keeps_message_markup() {
        let elements = StatusElements {
            spinner_visible: true,
            message_class: "alert alert-info".to_string(),
            message_html: r#"Sending <span class="text-muted">soon</span>"#.to_string(),
        };
        let html = render_status_container(&elements).expect("renders");
        assert!(html.contains("display: inline-block;"));
        assert!(html.contains(r#"<span class="text-muted">soon</span>"#));
    }
}
