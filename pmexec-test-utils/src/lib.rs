//! PMBOK Exec Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for entity and proposal types
//! - Fixtures for common console scenarios
//! - Custom assertions for gateway and session results

pub use pmexec_core::{
    ApplicationState, AssignmentStatus, AssistantProposal, DeliveryStatus, EntityIdType,
    KpiUpdate, LeadershipLogEntry, LogEntryId, LogKind, LogProposal, PerformanceKpis, Resource,
    ResourceDetails, ResourceId, ResourceProposal, ResourceSource, Severity, Timestamp,
};
pub use pmexec_llm::{GatewayError, GatewayResult, MockGateway};
pub use pmexec_session::{
    FixedClock, Reconciler, SequentialIdGenerator, Session, SessionError, SubmitOutcome,
};

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for console entity types.

    use super::*;
    use proptest::prelude::*;

    // === Identity ===

    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    pub fn arb_resource_id() -> impl Strategy<Value = ResourceId> {
        arb_uuid().prop_map(ResourceId::new)
    }

    pub fn arb_log_entry_id() -> impl Strategy<Value = LogEntryId> {
        arb_uuid().prop_map(LogEntryId::new)
    }

    /// Timestamps between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    // === Vocabularies ===

    pub fn arb_resource_source() -> impl Strategy<Value = ResourceSource> {
        prop_oneof![Just(ResourceSource::Internal), Just(ResourceSource::External)]
    }

    pub fn arb_assignment_status() -> impl Strategy<Value = AssignmentStatus> {
        prop_oneof![
            Just(AssignmentStatus::Assigned),
            Just(AssignmentStatus::Onboarding),
            Just(AssignmentStatus::Pending),
        ]
    }

    pub fn arb_delivery_status() -> impl Strategy<Value = DeliveryStatus> {
        prop_oneof![Just(DeliveryStatus::Delivered), Just(DeliveryStatus::NotDelivered)]
    }

    pub fn arb_log_kind() -> impl Strategy<Value = LogKind> {
        prop_oneof![Just(LogKind::Issue), Just(LogKind::LeadershipAction)]
    }

    pub fn arb_severity() -> impl Strategy<Value = Severity> {
        prop_oneof![Just(Severity::Low), Just(Severity::Medium), Just(Severity::High)]
    }

    // === Text ===

    /// Non-blank display text.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,23}"
    }

    pub fn arb_strategy_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Conflict Management".to_string()),
            Just("Influencing".to_string()),
            Just("Decision Making".to_string()),
            Just("Negotiation".to_string()),
        ]
    }

    // === Entities ===

    pub fn arb_resource_details() -> impl Strategy<Value = ResourceDetails> {
        prop_oneof![
            (
                proptest::option::of(arb_name()),
                proptest::option::of(arb_assignment_status())
            )
                .prop_map(|(role, assignment_status)| ResourceDetails::Human {
                    role,
                    assignment_status
                }),
            proptest::option::of(arb_delivery_status())
                .prop_map(|delivery_status| ResourceDetails::Physical { delivery_status }),
        ]
    }

    pub fn arb_resource() -> impl Strategy<Value = Resource> {
        (
            arb_resource_id(),
            arb_name(),
            arb_resource_source(),
            arb_resource_details(),
            arb_timestamp(),
        )
            .prop_map(|(id, name, source, details, at)| Resource {
                id,
                name,
                source,
                details,
                assigned_date: at.date_naive(),
            })
    }

    pub fn arb_log_entry() -> impl Strategy<Value = LeadershipLogEntry> {
        (
            arb_log_entry_id(),
            arb_log_kind(),
            arb_name(),
            arb_strategy_name(),
            proptest::option::of(arb_severity()),
            proptest::option::of(arb_name()),
            arb_timestamp(),
        )
            .prop_map(
                |(id, kind, description, strategy, severity, mitigation_plan, timestamp)| {
                    LeadershipLogEntry {
                        id,
                        kind,
                        description,
                        strategy,
                        severity,
                        mitigation_plan,
                        timestamp,
                    }
                },
            )
    }

    /// A KPI value from `range`, occasionally NaN or infinite.
    fn arb_kpi_value(range: std::ops::Range<f64>) -> impl Strategy<Value = f64> {
        prop_oneof![
            12 => range,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
            1 => Just(f64::NEG_INFINITY),
        ]
    }

    /// Any KPI values, including out-of-range and non-finite ones.
    pub fn arb_kpi_update() -> impl Strategy<Value = KpiUpdate> {
        (
            arb_kpi_value(-50.0..200.0),
            arb_kpi_value(-10.0..1000.0),
            arb_kpi_value(-50.0..200.0),
        )
            .prop_map(
                |(on_time_completion_rate, issue_resolution_time, resource_utilization)| KpiUpdate {
                    on_time_completion_rate,
                    issue_resolution_time,
                    resource_utilization,
                },
            )
    }

    /// A consistent state: `active_issues_count` matches the ledger.
    pub fn arb_application_state() -> impl Strategy<Value = ApplicationState> {
        (
            prop::collection::vec(arb_resource(), 0..8),
            prop::collection::vec(arb_log_entry(), 0..8),
            arb_kpi_update(),
        )
            .prop_map(|(resources, logs, kpis)| {
                let (kpis, _) = kpis.bounded();
                let active = logs.iter().filter(|l| l.is_issue()).count();
                ApplicationState {
                    resources,
                    logs,
                    kpis: PerformanceKpis::from_update(kpis, active),
                }
            })
    }

    // === Proposals ===

    pub fn arb_resource_proposal() -> impl Strategy<Value = ResourceProposal> {
        (arb_name(), arb_resource_source(), arb_resource_details()).prop_map(
            |(name, source, details)| ResourceProposal {
                name,
                source,
                details,
            },
        )
    }

    pub fn arb_log_proposal() -> impl Strategy<Value = LogProposal> {
        (
            arb_log_kind(),
            arb_name(),
            arb_strategy_name(),
            arb_severity(),
            arb_name(),
        )
            .prop_map(
                |(kind, description, strategy, severity, mitigation_plan)| LogProposal {
                    kind,
                    description,
                    strategy,
                    severity,
                    mitigation_plan,
                },
            )
    }

    pub fn arb_assistant_proposal() -> impl Strategy<Value = AssistantProposal> {
        (
            "[A-Za-z .]{1,40}",
            prop::collection::vec(arb_resource_proposal(), 0..5),
            prop::collection::vec(arb_log_proposal(), 0..5),
            arb_kpi_update(),
        )
            .prop_map(|(message, new_resources, new_logs, updated_kpis)| {
                AssistantProposal {
                    message,
                    new_resources,
                    new_logs,
                    updated_kpis,
                    warnings: Vec::new(),
                }
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common console scenarios.

    use super::*;

    /// The instant every deterministic fixture clock is fixed to.
    pub fn fixed_time() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 4, 20, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn fixed_clock() -> FixedClock {
        FixedClock(fixed_time())
    }

    /// Sequential ids and a fixed clock.
    pub fn deterministic_reconciler() -> Reconciler {
        Reconciler::new(Arc::new(SequentialIdGenerator::new()), Arc::new(fixed_clock()))
    }

    /// Session over `gateway` with deterministic ids and time.
    pub fn deterministic_session(gateway: MockGateway) -> Session<MockGateway> {
        Session::with_reconciler(gateway, deterministic_reconciler())
    }

    pub fn zero_kpis() -> KpiUpdate {
        KpiUpdate::default()
    }

    /// "Add Mark Lin as QA Lead, internal, assigned."
    pub fn qa_lead_proposal() -> AssistantProposal {
        AssistantProposal::message_only("Mark Lin has been acquired as QA Lead.", zero_kpis())
            .with_resource(ResourceProposal {
                name: "Mark Lin".to_string(),
                source: ResourceSource::Internal,
                details: ResourceDetails::Human {
                    role: Some("QA Lead".to_string()),
                    assignment_status: Some(AssignmentStatus::Assigned),
                },
            })
    }

    /// "Cloud Server 2 from vendor, not delivered yet."
    pub fn cloud_server_proposal() -> AssistantProposal {
        AssistantProposal::message_only("Cloud Server 2 is tracked as not delivered.", zero_kpis())
            .with_resource(ResourceProposal {
                name: "Cloud Server 2".to_string(),
                source: ResourceSource::External,
                details: ResourceDetails::Physical {
                    delivery_status: Some(DeliveryStatus::NotDelivered),
                },
            })
    }

    pub fn issue_proposal(description: &str) -> LogProposal {
        LogProposal {
            kind: LogKind::Issue,
            description: description.to_string(),
            strategy: "Conflict Management".to_string(),
            severity: Severity::High,
            mitigation_plan: "1. Meet both parties 2. Agree on a schedule".to_string(),
        }
    }

    pub fn leadership_proposal(description: &str) -> LogProposal {
        LogProposal {
            kind: LogKind::LeadershipAction,
            description: description.to_string(),
            strategy: "Influencing".to_string(),
            severity: Severity::Low,
            mitigation_plan: "1. Share the roadmap".to_string(),
        }
    }

    /// Two issues and one leadership action.
    pub fn mixed_ledger_proposal() -> AssistantProposal {
        AssistantProposal::message_only("Ledger updated.", zero_kpis())
            .with_log(issue_proposal("Vendor delay on servers"))
            .with_log(leadership_proposal("Kickoff briefing"))
            .with_log(issue_proposal("Scheduling conflict in QA"))
    }

    /// Raw assistant JSON for the QA lead scenario.
    pub fn qa_lead_json() -> String {
        serde_json::json!({
            "message": "Mark Lin has been acquired as QA Lead.",
            "newResources": [{
                "name": "Mark Lin",
                "type": "Human",
                "source": "Internal",
                "role": "QA Lead",
                "assignmentStatus": "Assigned"
            }],
            "newLogs": [],
            "updatedKPIs": {
                "onTimeCompletionRate": 0,
                "issueResolutionTime": 0,
                "resourceUtilization": 0
            }
        })
        .to_string()
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for gateway and session results.

    use super::*;

    #[track_caller]
    pub fn assert_schema_error<T: std::fmt::Debug>(result: &GatewayResult<T>) {
        match result {
            Err(GatewayError::Schema { .. }) => {}
            other => panic!("Expected Schema error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_transport_error<T: std::fmt::Debug>(result: &GatewayResult<T>) {
        match result {
            Err(GatewayError::Transport { .. }) => {}
            other => panic!("Expected Transport error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_applied(outcome: &Result<SubmitOutcome, SessionError>) {
        match outcome {
            Ok(SubmitOutcome::Applied(_)) => {}
            other => panic!("Expected Applied, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_failed(outcome: &Result<SubmitOutcome, SessionError>) {
        match outcome {
            Ok(SubmitOutcome::Failed(_)) => {}
            other => panic!("Expected Failed, got: {:?}", other),
        }
    }

    /// Every resource and log id is distinct.
    #[track_caller]
    pub fn assert_unique_ids(state: &ApplicationState) {
        let mut seen = std::collections::HashSet::new();
        for id in state
            .resources
            .iter()
            .map(|r| r.id.as_uuid())
            .chain(state.logs.iter().map(|l| l.id.as_uuid()))
        {
            assert!(seen.insert(id), "Duplicate id {}", id);
        }
    }

    /// `active_issues_count` equals the number of Issue entries.
    #[track_caller]
    pub fn assert_issue_count_consistent(state: &ApplicationState) {
        assert_eq!(
            state.kpis.active_issues_count,
            state.issue_count(),
            "active_issues_count out of sync with ledger"
        );
    }

    /// `prefix` appears unchanged at the start of `state`.
    #[track_caller]
    pub fn assert_extends(prefix: &ApplicationState, state: &ApplicationState) {
        assert!(
            state.resources.starts_with(&prefix.resources),
            "Prior resources changed"
        );
        assert!(state.logs.starts_with(&prefix.logs), "Prior logs changed");
    }
}
