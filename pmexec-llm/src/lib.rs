//! PMBOK Exec LLM - Assistant Gateway
//!
//! Provider-agnostic contract for turning a free-text command plus the
//! current console state into a structured [`AssistantProposal`].
//!
//! Every gateway call is a single outbound request. There is no retry and no
//! caching. Responses are validated against the proposal schema at this
//! boundary, so callers only ever see a complete proposal or an error.

pub mod mock;
pub mod prompt;
pub mod providers;
pub mod schema;

use async_trait::async_trait;
use pmexec_core::{ApplicationState, AssistantProposal};
use std::sync::Arc;
use thiserror::Error;

pub use mock::{MockCall, MockGateway, MockOutcome};
pub use providers::gemini::{GeminiClient, GeminiConfig, GeminiGateway};
pub use schema::parse_proposal;

// ============================================================================
// ERRORS
// ============================================================================

/// Everything that can go wrong between the console and the assistant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Query must not be empty")]
    EmptyQuery,

    /// The service could not be reached or answered with a failure status.
    #[error("Request to {provider} failed{}: {message}", status_suffix(.status))]
    Transport {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// A response arrived but does not satisfy the proposal schema.
    #[error("Response violates proposal schema: {reason}")]
    Schema { reason: String },

    #[error("Failed to encode console state: {reason}")]
    StateEncoding { reason: String },
}

impl GatewayError {
    pub fn transport(provider: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with status {}", code))
        .unwrap_or_default()
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

// ============================================================================
// GATEWAY TRAIT
// ============================================================================

/// A reasoning service that proposes console updates.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Identifier used in logs and transport errors.
    fn provider_id(&self) -> &str;

    /// Send `query` with the full `state` as context and return the
    /// validated proposal.
    ///
    /// # Errors
    /// * `GatewayError::EmptyQuery` - `query` is blank; nothing is sent
    /// * `GatewayError::Transport` - network failure or non-success status
    /// * `GatewayError::Schema` - the response is not a valid proposal
    async fn propose_update(
        &self,
        query: &str,
        state: &ApplicationState,
    ) -> GatewayResult<AssistantProposal>;
}

#[async_trait]
impl<G: AssistantGateway + ?Sized> AssistantGateway for Arc<G> {
    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }

    async fn propose_update(
        &self,
        query: &str,
        state: &ApplicationState,
    ) -> GatewayResult<AssistantProposal> {
        (**self).propose_update(query, state).await
    }
}

#[async_trait]
impl<G: AssistantGateway + ?Sized> AssistantGateway for Box<G> {
    fn provider_id(&self) -> &str {
        (**self).provider_id()
    }

    async fn propose_update(
        &self,
        query: &str,
        state: &ApplicationState,
    ) -> GatewayResult<AssistantProposal> {
        (**self).propose_update(query, state).await
    }
}

/// Trim `query` and reject it when nothing is left.
pub fn normalize_query(query: &str) -> GatewayResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(GatewayError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_trims() {
        assert_eq!(normalize_query("  add Mark  ").unwrap(), "add Mark");
    }

    #[test]
    fn test_normalize_query_rejects_blank() {
        assert_eq!(normalize_query(" \n\t").unwrap_err(), GatewayError::EmptyQuery);
        assert_eq!(normalize_query("").unwrap_err(), GatewayError::EmptyQuery);
    }

    #[test]
    fn test_transport_error_display_with_status() {
        let err = GatewayError::transport("gemini", Some(503), "overloaded");
        let msg = err.to_string();
        assert!(msg.contains("gemini"));
        assert!(msg.contains("503"));
        assert!(msg.contains("overloaded"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_transport_error_display_without_status() {
        let msg = GatewayError::transport("gemini", None, "connection refused").to_string();
        assert_eq!(msg, "Request to gemini failed: connection refused");
    }

    #[test]
    fn test_schema_error_classification() {
        let err = GatewayError::schema("missing field `message`");
        assert!(err.is_schema());
        assert!(!err.is_transport());
    }
}
