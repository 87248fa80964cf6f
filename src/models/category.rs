use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// Which asynchronous email the status endpoint should report on.
///
/// Sent as the `type` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailCategory {
    #[default]
    Verification,
    PasswordReset,
}

impl EmailCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailCategory::Verification => "verification",
            EmailCategory::PasswordReset => "password_reset",
        }
    }

    /// Human wording used in status messages.
    pub fn label(&self) -> &'static str {
        match self {
            EmailCategory::Verification => "verification email",
            EmailCategory::PasswordReset => "password reset email",
        }
    }
}

impl fmt::Display for EmailCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verification" => Ok(EmailCategory::Verification),
            "password_reset" => Ok(EmailCategory::PasswordReset),
            other => Err(ModelError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_categories() {
        assert_eq!(
            "verification".parse::<EmailCategory>().ok(),
            Some(EmailCategory::Verification)
        );
        assert_eq!(
            "password_reset".parse::<EmailCategory>().ok(),
            Some(EmailCategory::PasswordReset)
        );
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "newsletter".parse::<EmailCategory>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown email category: newsletter");
    }
}
