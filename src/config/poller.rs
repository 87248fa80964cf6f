use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
/// Ceiling of polling ticks, roughly a minute and a half at the default cadence.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Cadence of a single poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSettings {
    /// Rejects a zero interval or attempt ceiling; the tick loop needs both.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::Zero("poll interval"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Zero("max attempts"));
        }
        Ok(())
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Origin of the site serving `/accounts/api/check-email-status/`.
    pub base_url: String,
    pub request_timeout: Duration,
    pub poll: PollSettings,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll: PollSettings::default(),
        }
    }
}

impl PollerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("EMAIL_STATUS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let initial_delay = env_millis("EMAIL_STATUS_INITIAL_DELAY_MS", DEFAULT_INITIAL_DELAY)?;
        let interval = env_millis("EMAIL_STATUS_INTERVAL_MS", DEFAULT_INTERVAL)?;
        if interval.is_zero() {
            return Err(ConfigError::Zero("EMAIL_STATUS_INTERVAL_MS"));
        }

        let max_attempts = env_parse("EMAIL_STATUS_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ConfigError::Zero("EMAIL_STATUS_MAX_ATTEMPTS"));
        }

        let timeout_secs = env_parse(
            "EMAIL_STATUS_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Zero("EMAIL_STATUS_REQUEST_TIMEOUT_SECS"));
        }

        Ok(PollerConfig {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            poll: PollSettings {
                initial_delay,
                interval,
                max_attempts,
            },
        })
    }
}

fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::InvalidValue { key, value })
        }
        _ => Ok(default),
    }
}

fn env_millis(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    env_parse(key, default.as_millis() as u64).map(Duration::from_millis)
}
