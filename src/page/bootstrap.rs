use super::{HostPage, STATUS_STYLESHEET};
use crate::config::PollSettings;
use crate::error::PageError;
use crate::models::EmailCategory;
use crate::services::{StatusPoller, StatusSource};
use reqwest::Url;
use std::sync::Arc;

/// `command` value the registration view redirects with.
pub const VERIFICATION_COMMAND: &str = "verification";

/// Poller parameters taken from a page URL that asked for status checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub email: String,
    pub category: EmailCategory,
}

/// Reads `email`, `command` and `async` from a query string (leading `?` optional).
///
/// Only the first occurrence of each key counts. Returns `None` unless the
/// email is non-empty, `command=verification` and `async=true`.
pub fn activation_from_query(query: &str) -> Option<Activation> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut email = None;
    let mut command = None;
    let mut async_flag = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match &*key {
            "email" => &mut email,
            "command" => &mut command,
            "async" => &mut async_flag,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let email = email.filter(|email| !email.is_empty())?;
    if command.as_deref() != Some(VERIFICATION_COMMAND) || async_flag.as_deref() != Some("true") {
        return None;
    }

    Some(Activation {
        email,
        category: EmailCategory::Verification,
    })
}

pub fn activation_from_url(page_url: &str) -> Result<Option<Activation>, PageError> {
    let url = Url::parse(page_url)
        .map_err(|e| PageError::InvalidUrl(format!("{}: {}", page_url, e)))?;
    Ok(url.query().and_then(activation_from_query))
}

/// Page-load hook: when `page_url` asks for it, adds the status container to
/// `page` and starts one poller for the email in the URL.
///
/// Returns the started poller, or `None` when the URL does not activate status
/// checks. A page without an alert container or form still gets a poller; its
/// renders are dropped by the display.
pub fn bootstrap(
    page: &dyn HostPage,
    page_url: &str,
    source: Arc<dyn StatusSource>,
    settings: PollSettings,
) -> Result<Option<StatusPoller>, PageError> {
    let Some(activation) = activation_from_url(page_url)? else {
        tracing::debug!("Page URL does not request email status checks");
        return Ok(None);
    };

    page.inject_styles(STATUS_STYLESHEET)?;
    if !page.insert_status_container()? {
        tracing::warn!("No alert container or form on page; email status display not inserted");
    }

    let poller = StatusPoller::new(
        activation.email,
        activation.category,
        settings,
        source,
        page.status_display(),
    );
    poller.start();

    Ok(Some(poller))
}
