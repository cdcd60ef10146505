//! Application (tool) context enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The tool context a session belongs to.
///
/// A user may hold at most one active session per tool context, but may be
/// logged in to several different tools at once. The client onboarding
/// portal is exempt from the single-session rule entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    /// The main audit platform.
    Main,
    /// The external confirmation tool.
    Confirmation,
    /// The sampling tool.
    Sampling,
    /// The client onboarding portal.
    #[serde(rename = "clientonboard")]
    #[sqlx(rename = "clientonboard")]
    ClientOnboard,
}

impl ApplicationType {
    /// Whether the single-session-per-tool rule applies to this context.
    pub fn enforces_single_session(&self) -> bool {
        !matches!(self, Self::ClientOnboard)
    }

    /// Whether this context requires an explicit tool grant.
    ///
    /// The main platform and the onboarding portal are open to every
    /// active user; the remaining tools check `allowed_tools`.
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Self::Main | Self::ClientOnboard)
    }

    /// Return the tag as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Confirmation => "confirmation",
            Self::Sampling => "sampling",
            Self::ClientOnboard => "clientonboard",
        }
    }
}

impl Default for ApplicationType {
    fn default() -> Self {
        Self::Main
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationType {
    type Err = audithub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "confirmation" => Ok(Self::Confirmation),
            "sampling" => Ok(Self::Sampling),
            "clientonboard" => Ok(Self::ClientOnboard),
            _ => Err(audithub_core::AppError::validation(format!(
                "Invalid application type: '{s}'. Expected one of: main, confirmation, sampling, clientonboard"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_session_exemption() {
        assert!(ApplicationType::Main.enforces_single_session());
        assert!(ApplicationType::Confirmation.enforces_single_session());
        assert!(!ApplicationType::ClientOnboard.enforces_single_session());
    }

    #[test]
    fn test_restriction() {
        assert!(!ApplicationType::Main.is_restricted());
        assert!(!ApplicationType::ClientOnboard.is_restricted());
        assert!(ApplicationType::Sampling.is_restricted());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "clientonboard".parse::<ApplicationType>().unwrap(),
            ApplicationType::ClientOnboard
        );
        assert!("desktop".parse::<ApplicationType>().is_err());
    }
}
