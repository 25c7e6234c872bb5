//! Enum vocabularies for resources, log entries and conversation roles.
//!
//! The string forms match the assistant wire contract exactly
//! ("Not Delivered", "Leadership Action"). `FromStr` is case-insensitive.

use crate::error::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RESOURCE VOCABULARY
// ============================================================================

/// Kind of an acquired resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Team member
    Human,
    /// Equipment, material or infrastructure
    Physical,
}

impl ResourceKind {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Human => "Human",
            ResourceKind::Physical => "Physical",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" => Ok(ResourceKind::Human),
            "physical" => Ok(ResourceKind::Physical),
            _ => Err(ParseEnumError::new("resource kind", s)),
        }
    }
}

/// Where a resource was acquired from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceSource {
    Internal,
    External,
}

impl ResourceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceSource::Internal => "Internal",
            ResourceSource::External => "External",
        }
    }
}

impl fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(ResourceSource::Internal),
            "external" => Ok(ResourceSource::External),
            _ => Err(ParseEnumError::new("resource source", s)),
        }
    }
}

/// Assignment state of a human resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Assigned,
    Onboarding,
    Pending,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "Assigned",
            AssignmentStatus::Onboarding => "Onboarding",
            AssignmentStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assigned" => Ok(AssignmentStatus::Assigned),
            "onboarding" => Ok(AssignmentStatus::Onboarding),
            "pending" => Ok(AssignmentStatus::Pending),
            _ => Err(ParseEnumError::new("assignment status", s)),
        }
    }
}

/// Delivery state of a physical resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Delivered,
    #[serde(rename = "Not Delivered")]
    NotDelivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::NotDelivered => "Not Delivered",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delivered" => Ok(DeliveryStatus::Delivered),
            "not delivered" | "notdelivered" => Ok(DeliveryStatus::NotDelivered),
            _ => Err(ParseEnumError::new("delivery status", s)),
        }
    }
}

// ============================================================================
// LEDGER VOCABULARY
// ============================================================================

/// Kind of a leadership ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    /// A problem affecting the team or project
    Issue,
    /// A deliberate leadership intervention
    #[serde(rename = "Leadership Action")]
    LeadershipAction,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Issue => "Issue",
            LogKind::LeadershipAction => "Leadership Action",
        }
    }

    /// Whether this entry counts toward the active issues KPI.
    pub fn is_issue(&self) -> bool {
        matches!(self, LogKind::Issue)
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "issue" => Ok(LogKind::Issue),
            "leadership action" | "leadershipaction" => Ok(LogKind::LeadershipAction),
            _ => Err(ParseEnumError::new("log kind", s)),
        }
    }
}

/// Impact level of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(ParseEnumError::new("severity", s)),
        }
    }
}

// ============================================================================
// CONVERSATION VOCABULARY
// ============================================================================

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fmt::Debug;

    /// `wire` parses back to `value` under any ASCII casing and surrounding
    /// whitespace.
    fn assert_parses_back<T>(value: T, wire: &str, upper: &[bool], pad: &str)
    where
        T: FromStr + PartialEq + Debug,
        T::Err: Debug,
    {
        let cased: String = wire
            .chars()
            .zip(upper.iter().cycle())
            .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect();
        let input = format!("{}{}{}", pad, cased, pad);
        assert_eq!(input.parse::<T>().unwrap(), value);
    }

    proptest! {
        #[test]
        fn from_str_inverts_as_str(
            upper in prop::collection::vec(any::<bool>(), 1..20),
            pad in "[ \t]{0,2}",
            kind in prop::sample::select(vec![ResourceKind::Human, ResourceKind::Physical]),
            source in prop::sample::select(vec![ResourceSource::Internal, ResourceSource::External]),
            assignment in prop::sample::select(vec![
                AssignmentStatus::Assigned,
                AssignmentStatus::Onboarding,
                AssignmentStatus::Pending,
            ]),
            delivery in prop::sample::select(vec![
                DeliveryStatus::Delivered,
                DeliveryStatus::NotDelivered,
            ]),
            log_kind in prop::sample::select(vec![LogKind::Issue, LogKind::LeadershipAction]),
            severity in prop::sample::select(vec![Severity::Low, Severity::Medium, Severity::High]),
        ) {
            assert_parses_back(kind, kind.as_str(), &upper, &pad);
            assert_parses_back(source, source.as_str(), &upper, &pad);
            assert_parses_back(assignment, assignment.as_str(), &upper, &pad);
            assert_parses_back(delivery, delivery.as_str(), &upper, &pad);
            assert_parses_back(log_kind, log_kind.as_str(), &upper, &pad);
            assert_parses_back(severity, severity.as_str(), &upper, &pad);
        }
    }

    #[test]
    fn test_wire_spellings() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::NotDelivered).unwrap(),
            "\"Not Delivered\""
        );
        assert_eq!(
            serde_json::to_string(&LogKind::LeadershipAction).unwrap(),
            "\"Leadership Action\""
        );
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_serde_rejects_unknown_variant() {
        assert!(serde_json::from_str::<ResourceKind>("\"Robot\"").is_err());
        assert!(serde_json::from_str::<Severity>("\"Critical\"").is_err());
        // serde matching is exact; only FromStr is lenient
        assert!(serde_json::from_str::<ResourceSource>("\"internal\"").is_err());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("HUMAN".parse::<ResourceKind>().unwrap(), ResourceKind::Human);
        assert_eq!(
            "not delivered".parse::<DeliveryStatus>().unwrap(),
            DeliveryStatus::NotDelivered
        );
        assert_eq!(
            "Leadership Action".parse::<LogKind>().unwrap(),
            LogKind::LeadershipAction
        );
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(AssignmentStatus::Onboarding.to_string(), "Onboarding");
        assert_eq!(Severity::High.to_string(), "High");
        assert_eq!(ResourceSource::External.to_string(), "External");
    }

    #[test]
    fn test_severity_defaults_to_low() {
        assert_eq!(Severity::default(), Severity::Low);
    }
}
