use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// The six states an asynchronous email send can be reported in.
///
/// `pending`, `sent`, `failed`, `not_found` and `error` come from the status
/// endpoint. `timeout` is only ever produced locally, when the poller gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Pending,
    Sent,
    Failed,
    NotFound,
    Error,
    Timeout,
}

impl StatusKind {
    pub const ALL: [StatusKind; 6] = [
        StatusKind::Pending,
        StatusKind::Sent,
        StatusKind::Failed,
        StatusKind::NotFound,
        StatusKind::Error,
        StatusKind::Timeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Pending => "pending",
            StatusKind::Sent => "sent",
            StatusKind::Failed => "failed",
            StatusKind::NotFound => "not_found",
            StatusKind::Error => "error",
            StatusKind::Timeout => "timeout",
        }
    }

    /// Every status except `pending` ends polling.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusKind::Pending)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// One status report, as returned by `/accounts/api/check-email-status/`.
///
/// The endpoint sends `null` for absent optional fields; both `null` and a
/// missing key decode to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStatus {
    pub status: StatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
}

impl PollStatus {
    pub fn new(status: StatusKind) -> Self {
        Self {
            status,
            error_message: None,
            message: None,
            created_at: None,
            sent_at: None,
            retry_count: None,
        }
    }

    pub fn pending() -> Self {
        Self::new(StatusKind::Pending)
    }

    pub fn sent() -> Self {
        Self::new(StatusKind::Sent)
    }

    /// A locally synthesized `error`, used when the endpoint could not be queried.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(StatusKind::Error)
        }
    }

    /// A locally synthesized `timeout`, used once the attempt ceiling is hit.
    pub fn timeout() -> Self {
        Self::new(StatusKind::Timeout)
    }

    pub fn with_error_message(mut self, error_message: impl Into<String>) -> Self {
        self.error_message = Some(error_message.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
