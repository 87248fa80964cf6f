use thiserror::Error;

/// Failures while querying the status endpoint.
///
/// These never leave the poller: [`crate::services::StatusPoller::query_status`]
/// turns every one of them into an `error` status.
#[derive(Debug, Error)]
pub enum StatusQueryError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Invalid status response: {0}")]
    Decode(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Failures while applying a view to the status display.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Missing page element: #{0}")]
    MissingElement(&'static str),
}

/// Failures while wiring the status display into a host page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        PageError::Display(DisplayError::Template(err))
    }
}
