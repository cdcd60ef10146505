//! Organizational seniority enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seniority level of a user within an audit firm.
///
/// This describes the organizational hierarchy, not authorization:
/// permissions come from role memberships, never from seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seniority_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeniorityType {
    /// Firm partner.
    Partner,
    /// Engagement manager.
    Manager,
    /// Audit associate.
    Associate,
    /// Article trainee.
    Article,
}

impl SeniorityType {
    /// Return the seniority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "partner",
            Self::Manager => "manager",
            Self::Associate => "associate",
            Self::Article => "article",
        }
    }
}

impl fmt::Display for SeniorityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SeniorityType {
    type Err = audithub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "partner" => Ok(Self::Partner),
            "manager" => Ok(Self::Manager),
            "associate" => Ok(Self::Associate),
            "article" => Ok(Self::Article),
            _ => Err(audithub_core::AppError::validation(format!(
                "Invalid seniority type: '{s}'. Expected one of: partner, manager, associate, article"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "partner".parse::<SeniorityType>().unwrap(),
            SeniorityType::Partner
        );
        assert_eq!(
            "ARTICLE".parse::<SeniorityType>().unwrap(),
            SeniorityType::Article
        );
        assert!("intern".parse::<SeniorityType>().is_err());
    }
}
