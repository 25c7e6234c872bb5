//! Property tests for reconciliation and filtering.

use pmexec_core::{filter_resources, DashboardView};
use pmexec_test_utils::assertions::{
    assert_extends, assert_issue_count_consistent, assert_unique_ids,
};
use pmexec_test_utils::fixtures::deterministic_reconciler;
use pmexec_test_utils::generators::{
    arb_application_state, arb_assistant_proposal, arb_resource,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn reconcile_appends_without_touching_prior_entries(
        state in arb_application_state(),
        proposal in arb_assistant_proposal(),
    ) {
        let result = deterministic_reconciler().reconcile(&state, &proposal);

        prop_assert_eq!(
            result.state.resources.len(),
            state.resources.len() + proposal.new_resources.len()
        );
        prop_assert_eq!(result.state.logs.len(), state.logs.len() + proposal.new_logs.len());
        assert_extends(&state, &result.state);
    }

    #[test]
    fn reconcile_recounts_active_issues(
        state in arb_application_state(),
        proposal in arb_assistant_proposal(),
    ) {
        let result = deterministic_reconciler().reconcile(&state, &proposal);
        let expected = state.issue_count() + proposal.proposed_issue_count();
        prop_assert_eq!(result.state.kpis.active_issues_count, expected);
        assert_issue_count_consistent(&result.state);
    }

    #[test]
    fn reconcile_assigns_fresh_unique_ids(
        state in arb_application_state(),
        proposal in arb_assistant_proposal(),
    ) {
        let result = deterministic_reconciler().reconcile(&state, &proposal);
        assert_unique_ids(&result.state);
        for id in &result.report.added_resources {
            prop_assert!(!state.contains_resource(*id));
        }
        for id in &result.report.added_logs {
            prop_assert!(!state.contains_log(*id));
        }
    }

    #[test]
    fn reconcile_keeps_kpis_in_range(
        state in arb_application_state(),
        proposal in arb_assistant_proposal(),
    ) {
        let kpis = deterministic_reconciler().reconcile(&state, &proposal).state.kpis;
        prop_assert!((0.0..=100.0).contains(&kpis.on_time_completion_rate));
        prop_assert!((0.0..=100.0).contains(&kpis.resource_utilization));
        prop_assert!(kpis.issue_resolution_time >= 0.0);
        prop_assert!(kpis.issue_resolution_time.is_finite());
    }

    #[test]
    fn blank_filter_is_identity(
        resources in prop::collection::vec(arb_resource(), 0..10),
        blank in "[ \t]{0,4}",
    ) {
        let filtered = filter_resources(&resources, &blank);
        prop_assert_eq!(filtered.len(), resources.len());
        for (a, b) in filtered.iter().zip(&resources) {
            prop_assert_eq!(*a, b);
        }
    }

    #[test]
    fn filter_is_case_insensitive_subsequence(
        resources in prop::collection::vec(arb_resource(), 0..10),
        term in "[A-Za-z]{1,3}",
    ) {
        let upper = filter_resources(&resources, &term.to_uppercase());
        let lower = filter_resources(&resources, &term.to_lowercase());
        prop_assert_eq!(&upper, &lower);

        // relative order preserved
        let mut positions = upper
            .iter()
            .map(|r| resources.iter().position(|x| std::ptr::eq(x, *r)));
        let mut last = None;
        for pos in positions.by_ref() {
            prop_assert!(pos.is_some());
            prop_assert!(pos > last);
            last = pos;
        }
    }

    #[test]
    fn dashboard_counts_ignore_filter(
        state in arb_application_state(),
        term in "[a-z]{0,3}",
    ) {
        let view = DashboardView::from_state(&state, &term);
        prop_assert_eq!(view.summary.active_team, state.human_count());
        prop_assert_eq!(view.summary.inventory, state.physical_count());
        prop_assert!(view.team.iter().all(|r| r.is_human()));
        prop_assert!(view.logistics.iter().all(|r| r.is_physical()));
    }
}
