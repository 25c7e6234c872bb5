//! Performance indicators and the bounds policy applied to assistant updates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a percentage KPI.
pub const PERCENT_MAX: f64 = 100.0;

/// Aggregate KPIs, one per session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceKpis {
    /// On-time task completion, 0-100 percent
    pub on_time_completion_rate: f64,
    /// Average hours to resolve an issue, non-negative
    pub issue_resolution_time: f64,
    /// Count of Issue entries in the ledger; always derived, never supplied
    pub active_issues_count: usize,
    /// Resource utilization, 0-100 percent
    pub resource_utilization: f64,
}

impl PerformanceKpis {
    /// Apply an assistant update verbatim, with a freshly derived issue count.
    pub fn from_update(update: KpiUpdate, active_issues_count: usize) -> Self {
        Self {
            on_time_completion_rate: update.on_time_completion_rate,
            issue_resolution_time: update.issue_resolution_time,
            active_issues_count,
            resource_utilization: update.resource_utilization,
        }
    }
}

/// The three KPI values the assistant is allowed to set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiUpdate {
    pub on_time_completion_rate: f64,
    pub issue_resolution_time: f64,
    pub resource_utilization: f64,
}

/// Which KPI a bounds adjustment touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiField {
    OnTimeCompletionRate,
    IssueResolutionTime,
    ResourceUtilization,
}

impl KpiField {
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiField::OnTimeCompletionRate => "onTimeCompletionRate",
            KpiField::IssueResolutionTime => "issueResolutionTime",
            KpiField::ResourceUtilization => "resourceUtilization",
        }
    }
}

impl fmt::Display for KpiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed KPI value that was pulled back into range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiAdjustment {
    pub field: KpiField,
    pub proposed: f64,
    pub applied: f64,
}

impl KpiUpdate {
    /// Clamp percentages into [0, 100] and resolution time to >= 0.
    ///
    /// NaN becomes 0 and infinities go to the nearest bound. Returns the
    /// bounded update and one adjustment per value that moved.
    pub fn bounded(&self) -> (KpiUpdate, Vec<KpiAdjustment>) {
        let mut adjustments = Vec::new();
        let mut clamp = |field: KpiField, value: f64, max: f64| {
            let applied = if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, max)
            };
            // NaN never compares equal, so it is always recorded
            if applied != value {
                adjustments.push(KpiAdjustment {
                    field,
                    proposed: value,
                    applied,
                });
            }
            applied
        };

        let bounded = KpiUpdate {
            on_time_completion_rate: clamp(
                KpiField::OnTimeCompletionRate,
                self.on_time_completion_rate,
                PERCENT_MAX,
            ),
            issue_resolution_time: clamp(
                KpiField::IssueResolutionTime,
                self.issue_resolution_time,
                f64::MAX,
            ),
            resource_utilization: clamp(
                KpiField::ResourceUtilization,
                self.resource_utilization,
                PERCENT_MAX,
            ),
        };
        (bounded, adjustments)
    }

    /// Whether every value is a finite number.
    pub fn is_finite(&self) -> bool {
        self.on_time_completion_rate.is_finite()
            && self.issue_resolution_time.is_finite()
            && self.resource_utilization.is_finite()
    }
}
