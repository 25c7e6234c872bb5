//! Scripted gateway for tests and offline runs.

use crate::{normalize_query, prompt, schema, AssistantGateway, GatewayError, GatewayResult};
use async_trait::async_trait;
use pmexec_core::{ApplicationState, AssistantProposal};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

const PROVIDER_ID: &str = "mock";

/// What the mock does on one call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Raw response text, run through the same schema check as a real
    /// provider.
    Json(String),
    /// An already-valid proposal.
    Proposal(AssistantProposal),
    /// Fail as if the network call had failed.
    TransportFailure(String),
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub query: String,
    /// The exact user turn a provider would have sent
    pub content: String,
}

/// Gateway that replays a fixed script of outcomes in order.
///
/// Once the script runs out every further call fails with a transport error.
#[derive(Debug, Default)]
pub struct MockGateway {
    script: Mutex<VecDeque<MockOutcome>>,
    calls: Mutex<Vec<MockCall>>,
    call_count: AtomicU32,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue another outcome.
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        lock(&self.script).push_back(outcome);
        self
    }

    pub fn with_json(self, text: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::Json(text.into()))
    }

    pub fn with_proposal(self, proposal: AssistantProposal) -> Self {
        self.with_outcome(MockOutcome::Proposal(proposal))
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::TransportFailure(message.into()))
    }

    /// Number of calls that reached the "network".
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AssistantGateway for MockGateway {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn propose_update(
        &self,
        query: &str,
        state: &ApplicationState,
    ) -> GatewayResult<AssistantProposal> {
        let query = normalize_query(query)?;
        let content = prompt::user_content(query, state)?;

        self.call_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.calls).push(MockCall {
            query: query.to_string(),
            content,
        });

        let outcome = lock(&self.script).pop_front();
        match outcome {
            Some(MockOutcome::Json(text)) => schema::parse_proposal(&text),
            Some(MockOutcome::Proposal(proposal)) => Ok(proposal),
            Some(MockOutcome::TransportFailure(message)) => {
                Err(GatewayError::transport(PROVIDER_ID, None, message))
            }
            None => Err(GatewayError::transport(
                PROVIDER_ID,
                None,
                "no scripted outcome left",
            )),
        }
    }
}
