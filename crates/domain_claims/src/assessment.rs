//! Advisory assessment values
//!
//! The advisory service never decides a claim. Its recommendation is stored
//! on the claim for members to read before voting, and its fund health
//! analysis is shown on the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClaimError;

/// Justification recorded when the advisory service could not be reached
pub const ASSESSMENT_FAILED_JUSTIFICATION: &str =
    "Assessment failed; proceeding with community validation.";

/// Analysis shown when the fund health prediction could not be obtained
pub const HEALTH_FAILED_ANALYSIS: &str = "Analysis failed.";

/// Advisory recommendation on a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Approve,
    Deny,
    #[serde(rename = "Needs Review")]
    NeedsReview,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Approve => "Approve",
            Recommendation::Deny => "Deny",
            Recommendation::NeedsReview => "Needs Review",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact match only; anything else is a malformed answer
impl FromStr for Recommendation {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approve" => Ok(Recommendation::Approve),
            "Deny" => Ok(Recommendation::Deny),
            "Needs Review" => Ok(Recommendation::NeedsReview),
            other => Err(ClaimError::invalid_input(format!("unknown recommendation '{other}'"))),
        }
    }
}

/// Advisory assessment attached to a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAssessment {
    pub recommendation: Recommendation,
    pub justification: String,
}

impl AiAssessment {
    pub fn new(recommendation: Recommendation, justification: impl Into<String>) -> Self {
        Self {
            recommendation,
            justification: justification.into(),
        }
    }

    /// Placeholder substituted when the assessment attempt failed
    pub fn needs_review_fallback() -> Self {
        Self::new(Recommendation::NeedsReview, ASSESSMENT_FAILED_JUSTIFICATION)
    }
}

/// Fund health as reported by the advisory service
///
/// `Unknown` is never reported by the service itself; it marks a failed
/// prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Stable,
    #[serde(rename = "At Risk")]
    AtRisk,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Stable => "Stable",
            HealthStatus::AtRisk => "At Risk",
            HealthStatus::Unknown => "Unknown",
        }
    }

    /// Parses a status reported by the advisory service
    ///
    /// Only the three reportable values are accepted.
    pub fn parse_reported(s: &str) -> Result<Self, ClaimError> {
        match s {
            "Healthy" => Ok(HealthStatus::Healthy),
            "Stable" => Ok(HealthStatus::Stable),
            "At Risk" => Ok(HealthStatus::AtRisk),
            other => Err(ClaimError::invalid_input(format!("unknown health status '{other}'"))),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fund health prediction with a one-sentence analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundHealth {
    pub status: HealthStatus,
    pub analysis: String,
}

impl FundHealth {
    pub fn new(status: HealthStatus, analysis: impl Into<String>) -> Self {
        Self {
            status,
            analysis: analysis.into(),
        }
    }

    /// Shown before the first prediction arrives
    pub fn awaiting() -> Self {
        Self::new(HealthStatus::Stable, "Awaiting initial analysis...")
    }

    /// Shown after a failed prediction
    pub fn unknown() -> Self {
        Self::new(HealthStatus::Unknown, HEALTH_FAILED_ANALYSIS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_wire_names() {
        let json = serde_json::to_string(&Recommendation::NeedsReview).unwrap();
        assert_eq!(json, "\"Needs Review\"");

        let parsed: Recommendation = serde_json::from_str("\"Approve\"").unwrap();
        assert_eq!(parsed, Recommendation::Approve);
    }

    #[test]
    fn test_recommendation_parse_is_exact() {
        assert_eq!("Needs Review".parse::<Recommendation>().unwrap(), Recommendation::NeedsReview);
        assert!("approve".parse::<Recommendation>().is_err());
        assert!("NeedsReview".parse::<Recommendation>().is_err());
    }

    #[test]
    fn test_health_status_rejects_unknown_from_service() {
        assert_eq!(HealthStatus::parse_reported("At Risk").unwrap(), HealthStatus::AtRisk);
        assert!(HealthStatus::parse_reported("Unknown").is_err());
        assert!(HealthStatus::parse_reported("Critical").is_err());
    }

    #[test]
    fn test_fallbacks() {
        let fallback = AiAssessment::needs_review_fallback();
        assert_eq!(fallback.recommendation, Recommendation::NeedsReview);
        assert_eq!(fallback.justification, ASSESSMENT_FAILED_JUSTIFICATION);

        assert_eq!(FundHealth::unknown().status, HealthStatus::Unknown);
    }
}
