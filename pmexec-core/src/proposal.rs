//! Assistant proposal types.
//!
//! Pure data for what the assistant gateway hands to the reconciler. The
//! gateway trait and wire parsing live in pmexec-llm.

use crate::{
    CoreResult, KpiUpdate, LogKind, ResourceDetails, ResourceKind, ResourceSource, Severity,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource the assistant wants recorded. Has no id or date yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceProposal {
    pub name: String,
    pub source: ResourceSource,
    pub details: ResourceDetails,
}

impl ResourceProposal {
    pub fn new(
        name: impl Into<String>,
        source: ResourceSource,
        details: ResourceDetails,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "must not be blank"));
        }
        Ok(Self {
            name,
            source,
            details,
        })
    }

    /// Shorthand for a team member proposal.
    pub fn human(
        name: impl Into<String>,
        source: ResourceSource,
        role: Option<String>,
        assignment_status: Option<crate::AssignmentStatus>,
    ) -> CoreResult<Self> {
        Self::new(
            name,
            source,
            ResourceDetails::Human {
                role,
                assignment_status,
            },
        )
    }

    /// Shorthand for an equipment or material proposal.
    pub fn physical(
        name: impl Into<String>,
        source: ResourceSource,
        delivery_status: Option<crate::DeliveryStatus>,
    ) -> CoreResult<Self> {
        Self::new(name, source, ResourceDetails::Physical { delivery_status })
    }

    pub fn kind(&self) -> ResourceKind {
        self.details.kind()
    }
}

/// A ledger entry the assistant wants recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogProposal {
    pub kind: LogKind,
    pub description: String,
    pub strategy: String,
    pub severity: Severity,
    pub mitigation_plan: String,
}

impl LogProposal {
    pub fn new(
        kind: LogKind,
        description: impl Into<String>,
        strategy: impl Into<String>,
        severity: Severity,
        mitigation_plan: impl Into<String>,
    ) -> CoreResult<Self> {
        let description = description.into();
        let strategy = strategy.into();
        if description.trim().is_empty() {
            return Err(ValidationError::invalid("description", "must not be blank"));
        }
        if strategy.trim().is_empty() {
            return Err(ValidationError::invalid("strategy", "must not be blank"));
        }
        Ok(Self {
            kind,
            description,
            strategy,
            severity,
            mitigation_plan: mitigation_plan.into(),
        })
    }
}

/// Non-fatal finding raised while validating a proposal at the boundary.
///
/// The offending field has already been dropped when one of these exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Position of the entity in its proposal list
    pub index: usize,
    /// Display name of the entity, for logs
    pub entity: String,
    pub field: String,
    pub reason: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dropped {} on '{}' (#{}): {}",
            self.field, self.entity, self.index, self.reason
        )
    }
}

/// Structured output of one assistant call, already schema-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantProposal {
    /// Conversational reply for the transcript
    pub message: String,
    pub new_resources: Vec<ResourceProposal>,
    pub new_logs: Vec<LogProposal>,
    pub updated_kpis: KpiUpdate,
    #[serde(default)]
    pub warnings: Vec<ValidationWarning>,
}

impl AssistantProposal {
    /// A reply with no entities and the given KPI values.
    pub fn message_only(message: impl Into<String>, updated_kpis: KpiUpdate) -> Self {
        Self {
            message: message.into(),
            new_resources: Vec::new(),
            new_logs: Vec::new(),
            updated_kpis,
            warnings: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: ResourceProposal) -> Self {
        self.new_resources.push(resource);
        self
    }

    pub fn with_log(mut self, log: LogProposal) -> Self {
        self.new_logs.push(log);
        self
    }

    pub fn proposed_issue_count(&self) -> usize {
        self.new_logs.iter().filter(|l| l.kind.is_issue()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssignmentStatus, DeliveryStatus};

    #[test]
    fn test_blank_resource_name_rejected() {
        let err = ResourceProposal::physical("   ", ResourceSource::Internal, None).unwrap_err();
        assert_eq!(err, ValidationError::invalid("name", "must not be blank"));
    }

    #[test]
    fn test_human_shorthand_sets_kind() {
        let proposal = ResourceProposal::human(
            "Mark Lin",
            ResourceSource::Internal,
            Some("QA Lead".to_string()),
            Some(AssignmentStatus::Assigned),
        )
        .unwrap();
        assert_eq!(proposal.kind(), ResourceKind::Human);
    }

    #[test]
    fn test_log_requires_description_and_strategy() {
        assert!(LogProposal::new(LogKind::Issue, "", "Negotiation", Severity::Low, "").is_err());
        assert!(LogProposal::new(LogKind::Issue, "Vendor slip", " ", Severity::Low, "").is_err());
        assert!(LogProposal::new(LogKind::Issue, "Vendor slip", "Negotiation", Severity::Low, "")
            .is_ok());
    }

    #[test]
    fn test_builder_counts_issues() {
        let proposal = AssistantProposal::message_only("ok", KpiUpdate::default())
            .with_resource(
                ResourceProposal::physical(
                    "Cloud Server 2",
                    ResourceSource::External,
                    Some(DeliveryStatus::Delivered),
                )
                .unwrap(),
            )
            .with_log(
                LogProposal::new(LogKind::Issue, "Blocked on access", "Escalation", Severity::High, "1. Ask IT")
                    .unwrap(),
            )
            .with_log(
                LogProposal::new(
                    LogKind::LeadershipAction,
                    "Ran retro",
                    "Team Building",
                    Severity::Low,
                    "1. Book room",
                )
                .unwrap(),
            );
        assert_eq!(proposal.new_resources.len(), 1);
        assert_eq!(proposal.proposed_issue_count(), 1);
    }

    #[test]
    fn test_warning_display() {
        let warning = ValidationWarning {
            index: 0,
            entity: "Mark Lin".to_string(),
            field: "deliveryStatus".to_string(),
            reason: "only applies to Physical resources".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("deliveryStatus"));
        assert!(msg.contains("Mark Lin"));
    }
}
