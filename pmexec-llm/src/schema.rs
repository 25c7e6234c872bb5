//! Wire schema for assistant responses.
//!
//! The response must be a JSON object with exactly `message`, `newResources`,
//! `newLogs` and `updatedKPIs`. Enum domains are enforced by serde; required
//! fields have no defaults. Fields that do not apply to a resource's kind are
//! dropped with a [`ValidationWarning`] instead of being stored.

use crate::{GatewayError, GatewayResult};
use pmexec_core::{
    AssignmentStatus, AssistantProposal, DeliveryStatus, KpiUpdate, LogKind, LogProposal,
    ResourceDetails, ResourceKind, ResourceProposal, ResourceSource, Severity, ValidationWarning,
};
use serde::Deserialize;
use serde_json::{json, Value};

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct WireProposal {
    message: String,
    new_resources: Vec<WireResource>,
    new_logs: Vec<WireLog>,
    #[serde(rename = "updatedKPIs")]
    updated_kpis: KpiUpdate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResource {
    name: String,
    #[serde(rename = "type")]
    kind: ResourceKind,
    source: ResourceSource,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    assignment_status: Option<AssignmentStatus>,
    #[serde(default)]
    delivery_status: Option<DeliveryStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLog {
    #[serde(rename = "type")]
    kind: LogKind,
    description: String,
    strategy: String,
    severity: Severity,
    mitigation_plan: String,
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse and validate the assistant's raw JSON text.
///
/// # Errors
/// `GatewayError::Schema` for malformed JSON, missing or unknown top-level
/// fields, out-of-domain enum values, blank required text, or non-finite
/// KPI numbers. Nothing partial is ever returned.
pub fn parse_proposal(text: &str) -> GatewayResult<AssistantProposal> {
    let wire: WireProposal =
        serde_json::from_str(text).map_err(|e| GatewayError::schema(e.to_string()))?;
    into_proposal(wire)
}

/// Same as [`parse_proposal`] for an already-decoded JSON value.
pub fn proposal_from_value(value: Value) -> GatewayResult<AssistantProposal> {
    let wire: WireProposal =
        serde_json::from_value(value).map_err(|e| GatewayError::schema(e.to_string()))?;
    into_proposal(wire)
}

fn into_proposal(wire: WireProposal) -> GatewayResult<AssistantProposal> {
    if !wire.updated_kpis.is_finite() {
        return Err(GatewayError::schema("updatedKPIs must be finite numbers"));
    }

    let mut warnings = Vec::new();
    let new_resources = wire
        .new_resources
        .into_iter()
        .enumerate()
        .map(|(index, resource)| resource_proposal(index, resource, &mut warnings))
        .collect::<GatewayResult<Vec<_>>>()?;

    let new_logs = wire
        .new_logs
        .into_iter()
        .enumerate()
        .map(|(index, log)| {
            LogProposal::new(
                log.kind,
                log.description,
                log.strategy,
                log.severity,
                log.mitigation_plan,
            )
            .map_err(|e| GatewayError::schema(format!("newLogs[{}]: {}", index, e)))
        })
        .collect::<GatewayResult<Vec<_>>>()?;

    for warning in &warnings {
        tracing::warn!(
            index = warning.index,
            entity = %warning.entity,
            field = %warning.field,
            "Dropped field inapplicable to resource kind"
        );
    }

    Ok(AssistantProposal {
        message: wire.message,
        new_resources,
        new_logs,
        updated_kpis: wire.updated_kpis,
        warnings,
    })
}

fn resource_proposal(
    index: usize,
    resource: WireResource,
    warnings: &mut Vec<ValidationWarning>,
) -> GatewayResult<ResourceProposal> {
    let mut warn = |field: &str, kind: ResourceKind| {
        warnings.push(ValidationWarning {
            index,
            entity: resource.name.clone(),
            field: field.to_string(),
            reason: format!("only applies to {} resources", kind),
        });
    };

    let details = match resource.kind {
        ResourceKind::Human => {
            if resource.delivery_status.is_some() {
                warn("deliveryStatus", ResourceKind::Physical);
            }
            ResourceDetails::Human {
                role: resource.role.clone(),
                assignment_status: resource.assignment_status,
            }
        }
        ResourceKind::Physical => {
            if resource.role.is_some() {
                warn("role", ResourceKind::Human);
            }
            if resource.assignment_status.is_some() {
                warn("assignmentStatus", ResourceKind::Human);
            }
            ResourceDetails::Physical {
                delivery_status: resource.delivery_status,
            }
        }
    };

    ResourceProposal::new(resource.name, resource.source, details)
        .map_err(|e| GatewayError::schema(format!("newResources[{}]: {}", index, e)))
}

// ============================================================================
// RESPONSE SCHEMA DOCUMENT
// ============================================================================

/// Structured-output schema sent to providers that support one, in the
/// OpenAPI subset used by `generateContent`.
pub fn response_schema() -> Value {
    let kinds = [ResourceKind::Human, ResourceKind::Physical].map(|v| v.as_str());
    let sources = [ResourceSource::Internal, ResourceSource::External].map(|v| v.as_str());
    let assignment = [
        AssignmentStatus::Assigned,
        AssignmentStatus::Onboarding,
        AssignmentStatus::Pending,
    ]
    .map(|v| v.as_str());
    let delivery = [DeliveryStatus::Delivered, DeliveryStatus::NotDelivered].map(|v| v.as_str());
    let log_kinds = [LogKind::Issue, LogKind::LeadershipAction].map(|v| v.as_str());
    let severities = [Severity::Low, Severity::Medium, Severity::High].map(|v| v.as_str());

    json!({
        "type": "OBJECT",
        "properties": {
            "message": { "type": "STRING" },
            "newResources": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "type": { "type": "STRING", "enum": kinds },
                        "source": { "type": "STRING", "enum": sources },
                        "role": { "type": "STRING" },
                        "assignmentStatus": {
                            "type": "STRING",
                            "enum": assignment
                        },
                        "deliveryStatus": {
                            "type": "STRING",
                            "enum": delivery
                        }
                    },
                    "required": ["name", "type", "source"]
                }
            },
            "newLogs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": log_kinds },
                        "description": { "type": "STRING" },
                        "strategy": { "type": "STRING" },
                        "severity": { "type": "STRING", "enum": severities },
                        "mitigationPlan": { "type": "STRING" }
                    },
                    "required": ["type", "description", "strategy", "severity", "mitigationPlan"]
                }
            },
            "updatedKPIs": {
                "type": "OBJECT",
                "properties": {
                    "onTimeCompletionRate": { "type": "NUMBER" },
                    "issueResolutionTime": { "type": "NUMBER" },
                    "resourceUtilization": { "type": "NUMBER" }
                },
                "required": ["onTimeCompletionRate", "issueResolutionTime", "resourceUtilization"]
            }
        },
        "required": ["message", "newResources", "newLogs", "updatedKPIs"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KPIS: &str = r#""updatedKPIs": {"onTimeCompletionRate": 0, "issueResolutionTime": 0, "resourceUtilization": 0}"#;

    fn wrap(resources: &str, logs: &str) -> String {
        format!(
            r#"{{"message": "Recorded.", "newResources": [{}], "newLogs": [{}], {}}}"#,
            resources, logs, KPIS
        )
    }

    #[test]
    fn test_parses_human_resource() {
        let text = wrap(
            r#"{"name": "Mark Lin", "type": "Human", "source": "Internal", "role": "QA Lead", "assignmentStatus": "Assigned"}"#,
            "",
        );
        let proposal = parse_proposal(&text).unwrap();
        assert_eq!(proposal.message, "Recorded.");
        assert_eq!(proposal.new_resources.len(), 1);
        let resource = &proposal.new_resources[0];
        assert_eq!(resource.name, "Mark Lin");
        assert_eq!(
            resource.details,
            ResourceDetails::Human {
                role: Some("QA Lead".to_string()),
                assignment_status: Some(AssignmentStatus::Assigned),
            }
        );
        assert!(proposal.warnings.is_empty());
    }

    #[test]
    fn test_parses_log_with_spaced_variants() {
        let text = wrap(
            r#"{"name": "Cloud Server 2", "type": "Physical", "source": "External", "deliveryStatus": "Not Delivered"}"#,
            r#"{"type": "Leadership Action", "description": "Resolved scheduling conflict", "strategy": "Compromise", "severity": "Medium", "mitigationPlan": "1. Rotate shifts"}"#,
        );
        let proposal = parse_proposal(&text).unwrap();
        assert_eq!(proposal.new_logs[0].kind, LogKind::LeadershipAction);
        assert_eq!(proposal.new_logs[0].severity, Severity::Medium);
        assert_eq!(
            proposal.new_resources[0].details,
            ResourceDetails::Physical {
                delivery_status: Some(DeliveryStatus::NotDelivered)
            }
        );
    }

    #[test]
    fn test_human_delivery_status_is_stripped_with_warning() {
        let text = wrap(
            r#"{"name": "Mark Lin", "type": "Human", "source": "Internal", "deliveryStatus": "Delivered"}"#,
            "",
        );
        let proposal = parse_proposal(&text).unwrap();
        assert_eq!(
            proposal.new_resources[0].details,
            ResourceDetails::Human {
                role: None,
                assignment_status: None
            }
        );
        assert_eq!(proposal.warnings.len(), 1);
        assert_eq!(proposal.warnings[0].field, "deliveryStatus");
        assert_eq!(proposal.warnings[0].entity, "Mark Lin");
    }

    #[test]
    fn test_physical_human_fields_are_stripped_with_warnings() {
        let text = wrap(
            r#"{"name": "Laptop", "type": "Physical", "source": "Internal", "role": "Dev box", "assignmentStatus": "Pending"}"#,
            "",
        );
        let proposal = parse_proposal(&text).unwrap();
        assert_eq!(proposal.warnings.len(), 2);
        assert_eq!(proposal.new_resources[0].details, ResourceDetails::Physical { delivery_status: None });
    }

    #[test]
    fn test_unknown_enum_value_is_schema_error() {
        let text = wrap(r#"{"name": "R2", "type": "Robot", "source": "Internal"}"#, "");
        assert!(parse_proposal(&text).unwrap_err().is_schema());

        let text = wrap(
            "",
            r#"{"type": "Issue", "description": "x", "strategy": "y", "severity": "Critical", "mitigationPlan": "z"}"#,
        );
        assert!(parse_proposal(&text).unwrap_err().is_schema());
    }

    #[test]
    fn test_missing_required_fields_are_schema_errors() {
        let text = wrap(r#"{"name": "Mark Lin", "type": "Human"}"#, "");
        assert!(parse_proposal(&text).unwrap_err().is_schema());

        let text = wrap(
            "",
            r#"{"type": "Issue", "description": "x", "strategy": "y", "severity": "Low"}"#,
        );
        assert!(parse_proposal(&text).unwrap_err().is_schema());

        let text = r#"{"message": "hi", "newResources": [], "newLogs": []}"#;
        assert!(parse_proposal(text).unwrap_err().is_schema());
    }

    #[test]
    fn test_extra_top_level_field_is_schema_error() {
        let text = format!(
            r#"{{"message": "hi", "newResources": [], "newLogs": [], {}, "activeIssuesCount": 9}}"#,
            KPIS
        );
        assert!(parse_proposal(&text).unwrap_err().is_schema());
    }

    #[test]
    fn test_extra_kpi_field_is_ignored() {
        let text = r#"{"message": "hi", "newResources": [], "newLogs": [],
            "updatedKPIs": {"onTimeCompletionRate": 90, "issueResolutionTime": 4, "resourceUtilization": 70, "activeIssuesCount": 42}}"#;
        let proposal = parse_proposal(text).unwrap();
        assert_eq!(proposal.updated_kpis.on_time_completion_rate, 90.0);
    }

    #[test]
    fn test_blank_text_fields_are_schema_errors() {
        let text = wrap(r#"{"name": "  ", "type": "Human", "source": "Internal"}"#, "");
        let err = parse_proposal(&text).unwrap_err();
        assert!(err.to_string().contains("newResources[0]"));

        let text = wrap(
            "",
            r#"{"type": "Issue", "description": "", "strategy": "y", "severity": "Low", "mitigationPlan": ""}"#,
        );
        assert!(parse_proposal(&text).unwrap_err().is_schema());
    }

    #[test]
    fn test_malformed_json_is_schema_error() {
        assert!(parse_proposal("not json").unwrap_err().is_schema());
        assert!(parse_proposal("").unwrap_err().is_schema());
        assert!(parse_proposal("{}").unwrap_err().is_schema());
    }

    #[test]
    fn test_response_schema_lists_wire_enums() {
        let schema = response_schema();
        let delivery = &schema["properties"]["newResources"]["items"]["properties"]["deliveryStatus"]["enum"];
        assert_eq!(delivery, &json!(["Delivered", "Not Delivered"]));
        let required = &schema["required"];
        assert_eq!(required, &json!(["message", "newResources", "newLogs", "updatedKPIs"]));
    }

    proptest! {
        #[test]
        fn valid_kpis_pass_through_verbatim(
            rate in 0.0f64..=100.0,
            hours in 0.0f64..10_000.0,
            utilization in 0.0f64..=100.0,
        ) {
            let value = json!({
                "message": "ok",
                "newResources": [],
                "newLogs": [],
                "updatedKPIs": {
                    "onTimeCompletionRate": rate,
                    "issueResolutionTime": hours,
                    "resourceUtilization": utilization,
                }
            });
            let proposal = proposal_from_value(value).unwrap();
            prop_assert_eq!(proposal.updated_kpis.on_time_completion_rate, rate);
            prop_assert_eq!(proposal.updated_kpis.issue_resolution_time, hours);
            prop_assert_eq!(proposal.updated_kpis.resource_utilization, utilization);
        }
    }
}
