//! Core entity structures

use crate::{
    AssignmentStatus, Date, DeliveryStatus, LogEntryId, LogKind, MessageRole, PerformanceKpis,
    ResourceId, ResourceKind, ResourceSource, Severity, Timestamp,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// RESOURCES
// ============================================================================

/// Kind-specific payload of a resource.
///
/// Human-only and Physical-only attributes live on their own variant, so a
/// team member can never carry a delivery status and vice versa. Serialized
/// with a `type` tag that matches the assistant wire vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ResourceDetails {
    Human {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        assignment_status: Option<AssignmentStatus>,
    },
    Physical {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delivery_status: Option<DeliveryStatus>,
    },
}

impl ResourceDetails {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceDetails::Human { .. } => ResourceKind::Human,
            ResourceDetails::Physical { .. } => ResourceKind::Physical,
        }
    }
}

/// One acquired project resource. Append-only once reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub source: ResourceSource,
    #[serde(flatten)]
    pub details: ResourceDetails,
    pub assigned_date: Date,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.details.kind()
    }

    pub fn is_human(&self) -> bool {
        self.kind() == ResourceKind::Human
    }

    pub fn is_physical(&self) -> bool {
        self.kind() == ResourceKind::Physical
    }

    pub fn role(&self) -> Option<&str> {
        match &self.details {
            ResourceDetails::Human { role, .. } => role.as_deref(),
            ResourceDetails::Physical { .. } => None,
        }
    }

    pub fn assignment_status(&self) -> Option<AssignmentStatus> {
        match &self.details {
            ResourceDetails::Human {
                assignment_status, ..
            } => *assignment_status,
            ResourceDetails::Physical { .. } => None,
        }
    }

    pub fn delivery_status(&self) -> Option<DeliveryStatus> {
        match &self.details {
            ResourceDetails::Physical { delivery_status } => *delivery_status,
            ResourceDetails::Human { .. } => None,
        }
    }
}

// ============================================================================
// LEADERSHIP LEDGER
// ============================================================================

/// One issue or leadership action record. Append-only once reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipLogEntry {
    pub id: LogEntryId,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub description: String,
    /// PMBOK technique, e.g. "Conflict Management" or "Influencing".
    pub strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation_plan: Option<String>,
    pub timestamp: Timestamp,
}

impl LeadershipLogEntry {
    /// Severity shown to the user; absent severity reads as Low.
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    pub fn is_issue(&self) -> bool {
        self.kind.is_issue()
    }
}

// ============================================================================
// AGGREGATE ROOT
// ============================================================================

/// Everything the console knows for the current session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub resources: Vec<Resource>,
    pub logs: Vec<LeadershipLogEntry>,
    pub kpis: PerformanceKpis,
}

impl ApplicationState {
    /// Empty state with zeroed KPIs.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn human_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_human()).count()
    }

    pub fn physical_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_physical()).count()
    }

    pub fn issue_count(&self) -> usize {
        self.logs.iter().filter(|l| l.is_issue()).count()
    }

    pub fn contains_resource(&self, id: ResourceId) -> bool {
        self.resources.iter().any(|r| r.id == id)
    }

    pub fn contains_log(&self, id: LogEntryId) -> bool {
        self.logs.iter().any(|l| l.id == id)
    }

    /// Serialize as the context document sent to the assistant.
    pub fn to_context_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// CONVERSATION
// ============================================================================

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl ConversationMessage {
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(MessageRole::User, content, timestamp)
    }

    pub fn assistant(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(MessageRole::Assistant, content, timestamp)
    }

    /// Hour and minute, as shown beside the transcript bubble.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}
