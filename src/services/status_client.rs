//! Client for the email status endpoint.
//!
//! The endpoint lives at `/accounts/api/check-email-status/` and reports the
//! latest delivery attempt for an account's email of a given category:
//!
//! ```text
//! GET /accounts/api/check-email-status/?email=a%40b.com&type=verification
//! X-Requested-With: XMLHttpRequest
//!
//! {"status": "pending", "retry_count": 0, "error_message": null}
//! ```

use crate::config::PollerConfig;
use crate::error::StatusQueryError;
use crate::models::{EmailCategory, PollStatus};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Url;
use std::time::Duration;

pub const STATUS_PATH: &str = "/accounts/api/check-email-status/";

const REQUESTED_WITH: &str = "X-Requested-With";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Anything that can report the delivery status of an email.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(
        &self,
        email: &str,
        category: EmailCategory,
    ) -> Result<PollStatus, StatusQueryError>;
}

/// [`StatusSource`] backed by the site's HTTP endpoint.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Clone, Debug)]
pub struct HttpStatusClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpStatusClient {
    /// Creates a client for the site at `base_url` (scheme and host, any path
    /// is replaced by [`STATUS_PATH`]).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatusQueryError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(STATUS_PATH))
            .map_err(|e| StatusQueryError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &PollerConfig) -> Result<Self, StatusQueryError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn fetch_status(
        &self,
        email: &str,
        category: EmailCategory,
    ) -> Result<PollStatus, StatusQueryError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("email", email), ("type", category.as_str())])
            .header(REQUESTED_WITH, HeaderValue::from_static(XML_HTTP_REQUEST))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusQueryError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StatusQueryError::Decode(e.to_string()))
    }
}
