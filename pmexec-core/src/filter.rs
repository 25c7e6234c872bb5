//! Free-text search over the dashboard tables.
//!
//! A term matches when it is a case-insensitive substring of any searchable
//! field. Blank terms select everything. Results borrow from the source
//! slice and keep its order.

use crate::{ApplicationState, LeadershipLogEntry, PerformanceKpis, Resource};
use serde::Serialize;

/// Normalized search term. `None` means "show everything".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm(Option<String>);

impl SearchTerm {
    /// Blank or whitespace-only input yields the match-all term. Otherwise
    /// the term is lowercased as typed, surrounding spaces included.
    pub fn new(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(raw.to_lowercase()))
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.0.is_none()
    }

    /// Whether any of the given fields contains the term. Absent fields
    /// never match.
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        match &self.0 {
            None => true,
            Some(needle) => fields
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Something that can be found by [`SearchTerm`].
pub trait Searchable {
    fn matches(&self, term: &SearchTerm) -> bool;
}

impl Searchable for Resource {
    fn matches(&self, term: &SearchTerm) -> bool {
        term.matches_any([
            Some(self.name.as_str()),
            self.role(),
            Some(self.kind().as_str()),
            self.assignment_status().map(|s| s.as_str()),
            self.delivery_status().map(|s| s.as_str()),
            Some(self.source.as_str()),
        ])
    }
}

impl Searchable for LeadershipLogEntry {
    fn matches(&self, term: &SearchTerm) -> bool {
        term.matches_any([
            Some(self.description.as_str()),
            Some(self.kind.as_str()),
            Some(self.strategy.as_str()),
            self.severity.map(|s| s.as_str()),
            self.mitigation_plan.as_deref(),
        ])
    }
}

/// Order-preserving subsequence of `items` matching `term`.
pub fn filter_items<'a, T: Searchable>(items: &'a [T], term: &SearchTerm) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(term)).collect()
}

/// Resources matching the raw search input.
pub fn filter_resources<'a>(resources: &'a [Resource], term: &str) -> Vec<&'a Resource> {
    filter_items(resources, &SearchTerm::new(term))
}

/// Ledger entries matching the raw search input.
pub fn filter_logs<'a>(
    logs: &'a [LeadershipLogEntry],
    term: &str,
) -> Vec<&'a LeadershipLogEntry> {
    filter_items(logs, &SearchTerm::new(term))
}

// ============================================================================
// DASHBOARD PROJECTION
// ============================================================================

/// Headline numbers. Counts are taken over the unfiltered state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_team: usize,
    pub inventory: usize,
    pub kpis: PerformanceKpis,
}

impl DashboardSummary {
    pub fn from_state(state: &ApplicationState) -> Self {
        Self {
            active_team: state.human_count(),
            inventory: state.physical_count(),
            kpis: state.kpis,
        }
    }
}

/// Everything a frontend needs to draw the console for one search term.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    pub summary: DashboardSummary,
    /// Human resources matching the term
    pub team: Vec<&'a Resource>,
    /// Physical resources matching the term
    pub logistics: Vec<&'a Resource>,
    pub ledger: Vec<&'a LeadershipLogEntry>,
}

impl<'a> DashboardView<'a> {
    pub fn from_state(state: &'a ApplicationState, term: &str) -> Self {
        let term = SearchTerm::new(term);
        let (team, logistics): (Vec<&Resource>, Vec<&Resource>) = filter_items(&state.resources, &term)
            .into_iter()
            .partition(|r| r.is_human());
        Self {
            summary: DashboardSummary::from_state(state),
            team,
            logistics,
            ledger: filter_items(&state.logs, &term),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.team.is_empty() && self.logistics.is_empty() && self.ledger.is_empty()
    }
}
