//! End-to-end submission cycles against the scripted gateway.

use pmexec_core::{ApplicationState, KpiUpdate, MessageRole, ResourceKind};
use pmexec_session::{SessionError, FALLBACK_MESSAGE};
use pmexec_test_utils::assertions::{assert_applied, assert_failed, assert_unique_ids};
use pmexec_test_utils::fixtures::{
    cloud_server_proposal, deterministic_session, issue_proposal, qa_lead_json, zero_kpis,
};
use pmexec_test_utils::{AssistantProposal, MockGateway};

#[tokio::test]
async fn test_acquire_human_resource() {
    let mut session = deterministic_session(MockGateway::new().with_json(qa_lead_json()));
    let before = session.messages().len();

    let outcome = session
        .submit("Acquire: Mark Lin, QA Lead, Internal, Assigned")
        .await;
    assert_applied(&outcome);

    let state = session.state();
    assert_eq!(state.resources.len(), 1);
    assert_eq!(state.resources[0].kind(), ResourceKind::Human);
    assert_eq!(state.resources[0].role(), Some("QA Lead"));
    assert_eq!(state.kpis.active_issues_count, 0);

    let new_messages = &session.messages()[before..];
    assert_eq!(new_messages.len(), 2);
    assert_eq!(new_messages[0].role, MessageRole::User);
    assert_eq!(new_messages[1].role, MessageRole::Assistant);
    assert_eq!(new_messages[1].content, "Mark Lin has been acquired as QA Lead.");
}

#[tokio::test]
async fn test_new_issue_increments_active_issues() {
    let first = AssistantProposal::message_only("Logged.", zero_kpis())
        .with_log(issue_proposal("Vendor delay on servers"));
    let second = AssistantProposal::message_only("Logged again.", zero_kpis())
        .with_log(issue_proposal("QA environment down"));
    let mut session = deterministic_session(
        MockGateway::new()
            .with_proposal(first)
            .with_proposal(second),
    );

    assert_applied(&session.submit("Vendor is late").await);
    assert_eq!(session.state().kpis.active_issues_count, 1);

    assert_applied(&session.submit("QA env is down").await);
    assert_eq!(session.state().kpis.active_issues_count, 2);
    assert_unique_ids(session.state());
}

#[tokio::test]
async fn test_transport_failure_leaves_state_and_recovers() {
    let mut session = deterministic_session(
        MockGateway::new()
            .with_proposal(cloud_server_proposal())
            .with_failure("connection reset")
            .with_proposal(cloud_server_proposal()),
    );
    assert_applied(&session.submit("Cloud Server 2 from vendor").await);
    let before_state = session.state().clone();
    let before_len = session.messages().len();

    let outcome = session.submit("Add another server").await;
    assert_failed(&outcome);

    assert_eq!(session.state(), &before_state);
    let new_messages = &session.messages()[before_len..];
    assert_eq!(new_messages.len(), 2);
    assert_eq!(new_messages[0].content, "Add another server");
    assert_eq!(new_messages[1].content, FALLBACK_MESSAGE);
    assert!(!session.is_in_flight());

    assert_applied(&session.submit("Try again").await);
    assert_eq!(session.state().physical_count(), 2);
}

#[tokio::test]
async fn test_schema_failure_is_handled_like_transport_failure() {
    let mut session = deterministic_session(
        MockGateway::new().with_json(r#"{"message": "hi", "newResources": [], "newLogs": []}"#),
    );
    let outcome = session.submit("hello").await;
    assert_failed(&outcome);
    assert_eq!(session.state(), &ApplicationState::new());
    assert_eq!(session.messages().last().unwrap().content, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_blank_input_never_reaches_gateway() {
    let mut session = deterministic_session(MockGateway::new().with_json(qa_lead_json()));
    assert_eq!(session.submit("  \n").await.unwrap_err(), SessionError::EmptyInput);
    assert_eq!(session.gateway().call_count(), 0);
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn test_gateway_sees_current_state() {
    let mut session = deterministic_session(
        MockGateway::new()
            .with_proposal(cloud_server_proposal())
            .with_proposal(AssistantProposal::message_only("ok", KpiUpdate::default())),
    );
    session.submit("Cloud Server 2").await.unwrap();
    session.submit("Status?").await.unwrap();

    let calls = session.gateway().calls();
    assert!(!calls[0].content.contains("Cloud Server 2\""));
    assert!(calls[1].content.contains("\"name\":\"Cloud Server 2\""));
    assert!(calls[1].content.contains("\"deliveryStatus\":\"Not Delivered\""));
}

#[tokio::test]
async fn test_kind_inconsistent_field_is_dropped_and_reported() {
    let json = qa_lead_json().replace(
        "\"assignmentStatus\":\"Assigned\"",
        "\"assignmentStatus\":\"Assigned\",\"deliveryStatus\":\"Delivered\"",
    );
    let mut session = deterministic_session(MockGateway::new().with_json(json));
    let outcome = session.submit("Add Mark").await.unwrap();

    match outcome {
        pmexec_session::SubmitOutcome::Applied(report) => {
            assert_eq!(report.warnings.len(), 1);
            assert_eq!(report.warnings[0].field, "deliveryStatus");
        }
        other => panic!("expected Applied, got {:?}", other),
    }
    assert_eq!(session.state().resources[0].delivery_status(), None);
}
