//! PMBOK Exec Session
//!
//! Reconciliation of assistant proposals, the conversation transcript and
//! the single-flight session controller, plus configuration and logging for
//! the `pmexec` console.

pub mod config;
pub mod conversation;
pub mod error;
pub mod reconcile;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, ConsoleConfig, GatewayConfig, LoggingConfig};
pub use conversation::{ConversationLog, FALLBACK_MESSAGE, GREETING};
pub use error::ConsoleError;
pub use reconcile::{
    Clock, FixedClock, IdGenerator, ReconcileReport, Reconciled, Reconciler,
    SequentialIdGenerator, SystemClock, UuidV7Generator,
};
pub use session::{Session, SessionError, SubmitOutcome};
pub use telemetry::{init_tracing, TelemetryError};
