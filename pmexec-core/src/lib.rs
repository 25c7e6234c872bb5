//! PMBOK Exec Core - Entity Types
//!
//! Pure data structures for the execution console: acquired resources, the
//! leadership ledger, KPIs and the conversation transcript. All other crates
//! depend on this. Reconciliation and the assistant gateway live elsewhere.

pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;
pub mod identity;
pub mod kpi;
pub mod proposal;

pub use entities::{
    ApplicationState, ConversationMessage, LeadershipLogEntry, Resource, ResourceDetails,
};
pub use enums::{
    AssignmentStatus, DeliveryStatus, LogKind, MessageRole, ResourceKind, ResourceSource,
    Severity,
};
pub use error::{CoreResult, ParseEnumError, ValidationError};
pub use filter::{
    filter_items, filter_logs, filter_resources, DashboardSummary, DashboardView, SearchTerm,
    Searchable,
};
pub use identity::{Date, EntityId, EntityIdType, LogEntryId, ResourceId, Timestamp};
pub use kpi::{KpiAdjustment, KpiField, KpiUpdate, PerformanceKpis, PERCENT_MAX};
pub use proposal::{AssistantProposal, LogProposal, ResourceProposal, ValidationWarning};
