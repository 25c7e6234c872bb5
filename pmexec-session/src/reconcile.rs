//! Merge of a validated assistant proposal into the console state.
//!
//! Reconciliation is pure apart from the injected [`IdGenerator`] and
//! [`Clock`]: the previous state is never mutated, prior entries are kept in
//! order, and every new entity receives exactly one fresh identifier.

use chrono::Utc;
use pmexec_core::{
    ApplicationState, AssistantProposal, Date, EntityIdType, KpiAdjustment, LeadershipLogEntry,
    LogEntryId, PerformanceKpis, Resource, ResourceId, Timestamp, ValidationWarning,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Draws allowed from an injected generator before falling back to UUIDv7.
const MAX_GENERATOR_DRAWS: usize = 16;

// ============================================================================
// INJECTED SERVICES
// ============================================================================

/// Source of identifiers for new entities.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Calendar date of [`Clock::now`].
    fn today(&self) -> Date {
        self.now().date_naive()
    }
}

/// Timestamp-sortable identifiers for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Deterministic identifiers: 1, 2, 3, ... encoded as UUIDs.
///
/// The sequence is 1-based and wraps to 0 after `u64::MAX`.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// First identifier handed out is `start`, or 1 when `start` is 0.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start.saturating_sub(1)),
        }
    }

    /// Numeric value of the last identifier handed out, 0 if none.
    pub fn last_issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        Uuid::from_u128(n as u128)
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ============================================================================
// RECONCILER
// ============================================================================

/// What a reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added_resources: Vec<ResourceId>,
    pub added_logs: Vec<LogEntryId>,
    /// KPI values that were pulled back into range
    pub kpi_adjustments: Vec<KpiAdjustment>,
    /// Non-fatal findings carried over from proposal validation
    pub warnings: Vec<ValidationWarning>,
}

impl ReconcileReport {
    pub fn added_count(&self) -> usize {
        self.added_resources.len() + self.added_logs.len()
    }
}

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub state: ApplicationState,
    pub report: ReconcileReport,
}

/// Applies assistant proposals to console state.
#[derive(Clone)]
pub struct Reconciler {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Reconciler {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// UUIDv7 identifiers and the wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(UuidV7Generator), Arc::new(SystemClock))
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Produce the next state from `previous` and `proposal`.
    ///
    /// New resources and logs are appended in proposal order after the
    /// existing ones. KPI values replace the previous ones after the bounds
    /// policy; `active_issues_count` is always recounted from the ledger.
    pub fn reconcile(
        &self,
        previous: &ApplicationState,
        proposal: &AssistantProposal,
    ) -> Reconciled {
        let mut taken: HashSet<Uuid> = previous
            .resources
            .iter()
            .map(|r| r.id.as_uuid())
            .chain(previous.logs.iter().map(|l| l.id.as_uuid()))
            .collect();

        let mut report = ReconcileReport {
            warnings: proposal.warnings.clone(),
            ..ReconcileReport::default()
        };

        let today = self.clock.today();
        let mut resources = previous.resources.clone();
        for proposed in &proposal.new_resources {
            let id = ResourceId::new(self.fresh_id(&mut taken));
            report.added_resources.push(id);
            resources.push(Resource {
                id,
                name: proposed.name.clone(),
                source: proposed.source,
                details: proposed.details.clone(),
                assigned_date: today,
            });
        }

        let now = self.clock.now();
        let mut logs = previous.logs.clone();
        for proposed in &proposal.new_logs {
            let id = LogEntryId::new(self.fresh_id(&mut taken));
            report.added_logs.push(id);
            logs.push(LeadershipLogEntry {
                id,
                kind: proposed.kind,
                description: proposed.description.clone(),
                strategy: proposed.strategy.clone(),
                severity: Some(proposed.severity),
                mitigation_plan: Some(proposed.mitigation_plan.clone())
                    .filter(|plan| !plan.trim().is_empty()),
                timestamp: now,
            });
        }

        let (bounded, adjustments) = proposal.updated_kpis.bounded();
        for adjustment in &adjustments {
            tracing::warn!(
                field = %adjustment.field,
                proposed = adjustment.proposed,
                applied = adjustment.applied,
                "KPI value out of range, clamped"
            );
        }
        report.kpi_adjustments = adjustments;

        let active_issues = logs.iter().filter(|l| l.is_issue()).count();
        let state = ApplicationState {
            resources,
            logs,
            kpis: PerformanceKpis::from_update(bounded, active_issues),
        };

        tracing::info!(
            added_resources = report.added_resources.len(),
            added_logs = report.added_logs.len(),
            active_issues,
            "Proposal reconciled"
        );

        Reconciled { state, report }
    }

    /// Next identifier not in `taken`, which is then marked as taken.
    fn fresh_id(&self, taken: &mut HashSet<Uuid>) -> Uuid {
        for _ in 0..MAX_GENERATOR_DRAWS {
            let id = self.ids.next_id();
            if taken.insert(id) {
                return id;
            }
            tracing::debug!(%id, "Identifier collision, drawing again");
        }

        tracing::warn!("Identifier generator keeps colliding, using UUIDv7");
        loop {
            let id = Uuid::now_v7();
            if taken.insert(id) {
                return id;
            }
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}
