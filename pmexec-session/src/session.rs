//! Session controller.
//!
//! A [`Session`] owns the console state and transcript and runs the
//! request/response cycle: at most one assistant request is outstanding at a
//! time, and a failed request leaves the state exactly as it was.

use crate::conversation::ConversationLog;
use crate::reconcile::{ReconcileReport, Reconciler};
use pmexec_core::{ApplicationState, AssistantProposal, ConversationMessage, DashboardView};
use pmexec_llm::{AssistantGateway, GatewayError, GatewayResult};
use thiserror::Error;

/// Why a submission was not started.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("A request is already in flight")]
    Busy,
    #[error("No request is in flight")]
    NotInFlight,
}

/// How a completed submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The proposal was reconciled into the state.
    Applied(ReconcileReport),
    /// The gateway failed; the fallback message was appended and the state
    /// is unchanged.
    Failed(GatewayError),
}

impl SubmitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// One console session over gateway `G`.
#[derive(Debug)]
pub struct Session<G> {
    gateway: G,
    reconciler: Reconciler,
    state: ApplicationState,
    conversation: ConversationLog,
    in_flight: bool,
}

impl<G: AssistantGateway> Session<G> {
    /// Fresh session with empty state, system identifiers and clock.
    pub fn new(gateway: G) -> Self {
        Self::with_reconciler(gateway, Reconciler::system())
    }

    pub fn with_reconciler(gateway: G, reconciler: Reconciler) -> Self {
        let conversation = ConversationLog::greeted(reconciler.clock().now());
        Self {
            gateway,
            reconciler,
            state: ApplicationState::new(),
            conversation,
            in_flight: false,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        self.conversation.messages()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Filtered dashboard for `term`.
    pub fn view(&self, term: &str) -> DashboardView<'_> {
        DashboardView::from_state(&self.state, term)
    }

    /// Send `input` to the assistant and apply the result.
    ///
    /// Dropping the returned future before it resolves cancels the
    /// submission as if the gateway had failed.
    ///
    /// # Errors
    /// `SessionError::EmptyInput` for blank input and `SessionError::Busy`
    /// while another request is pending. Gateway failures are not errors
    /// here; they come back as [`SubmitOutcome::Failed`].
    pub async fn submit(&mut self, input: &str) -> Result<SubmitOutcome, SessionError> {
        let query = self.begin_submission(input)?;
        let mut pending = PendingSubmission {
            session: self,
            armed: true,
        };
        let result = pending
            .session
            .gateway
            .propose_update(&query, &pending.session.state)
            .await;
        pending.armed = false;
        pending.session.complete_submission(result)
    }

    /// First half of [`Session::submit`] for frontends that drive the
    /// gateway call themselves.
    ///
    /// Marks the session in flight, appends the user message and returns the
    /// trimmed query to send along with [`Session::state`].
    pub fn begin_submission(&mut self, input: &str) -> Result<String, SessionError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.in_flight {
            tracing::debug!("Submission rejected while busy");
            return Err(SessionError::Busy);
        }

        self.in_flight = true;
        self.conversation
            .push_user(query, self.reconciler.clock().now());
        tracing::info!(query_len = query.len(), "Submission started");
        Ok(query.to_string())
    }

    /// Second half of [`Session::submit`]: apply the gateway result and
    /// clear the in-flight flag.
    pub fn complete_submission(
        &mut self,
        result: GatewayResult<AssistantProposal>,
    ) -> Result<SubmitOutcome, SessionError> {
        if !self.in_flight {
            return Err(SessionError::NotInFlight);
        }
        self.in_flight = false;

        let at = self.reconciler.clock().now();
        let outcome = match result {
            Ok(proposal) => {
                let reconciled = self.reconciler.reconcile(&self.state, &proposal);
                self.state = reconciled.state;
                self.conversation.push_assistant(proposal.message, at);
                SubmitOutcome::Applied(reconciled.report)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Assistant request failed, state unchanged");
                self.conversation.push_fallback(at);
                SubmitOutcome::Failed(err)
            }
        };
        Ok(outcome)
    }

    /// Abandon the pending request: clear the in-flight flag and append the
    /// fallback message. The state is unchanged.
    pub fn cancel_submission(&mut self) -> Result<(), SessionError> {
        if !self.in_flight {
            return Err(SessionError::NotInFlight);
        }
        self.in_flight = false;
        tracing::warn!("Assistant request cancelled, state unchanged");
        self.conversation.push_fallback(self.reconciler.clock().now());
        Ok(())
    }
}

/// Cancels the submission on drop unless disarmed.
struct PendingSubmission<'a, G: AssistantGateway> {
    session: &'a mut Session<G>,
    armed: bool,
}

impl<G: AssistantGateway> Drop for PendingSubmission<'_, G> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.session.cancel_submission();
        }
    }
}
