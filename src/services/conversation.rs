use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::turn::{self, FAILURE_NOTICE};
use crate::models::Turn;
use crate::services::{extractor, resolver};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingReply,
}

/// One process-lifetime conversation with a single patient. The turn log is
/// append-only; the phase guard allows exactly one outstanding backend call.
#[derive(Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
    phase: Phase,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    fn begin_submit(&mut self, text: &str) -> Result<(), AppError> {
        if self.phase != Phase::Idle {
            return Err(AppError::Busy);
        }
        self.turns.push(Turn::user(text));
        self.phase = Phase::AwaitingReply;
        Ok(())
    }

    fn complete(&mut self, reply: Turn) {
        self.turns.push(reply);
        self.phase = Phase::Idle;
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Send one user turn through the full cycle: append, call the backend,
/// resolve the reply, extract any booking intent, append the assistant turn.
///
/// The session mutex is never held across the backend call; the phase guard
/// is what keeps a second submit out while the first is in flight. Transport
/// failures and timeouts append the fixed failure notice instead of a reply
/// and are not rolled back.
pub async fn submit(
    state: &Arc<AppState>,
    patient_id: i64,
    text: &str,
) -> Result<Turn, AppError> {
    {
        let mut sessions = state.sessions.lock().unwrap();
        let conv = sessions.entry(patient_id).or_default();
        conv.begin_submit(text)?;
    }

    tracing::info!(patient_id, text, "submitting turn");

    // The exchange runs on its own task: if the caller's future is dropped
    // (client disconnect mid-request), the backend call still runs to
    // completion, the reply still lands in history, and the conversation
    // returns to idle instead of staying wedged in awaiting-reply.
    let task = tokio::spawn(run_exchange(
        Arc::clone(state),
        patient_id,
        text.to_string(),
    ));

    match task.await {
        Ok(reply) => Ok(reply),
        Err(e) => {
            tracing::error!(patient_id, error = %e, "submit task failed");
            Err(AppError::Internal)
        }
    }
}

async fn run_exchange(state: Arc<AppState>, patient_id: i64, text: String) -> Turn {
    let timeout = Duration::from_secs(state.config.backend_timeout_secs);
    let outcome = tokio::time::timeout(timeout, state.backend.execute(patient_id, &text)).await;

    let reply = match outcome {
        Ok(Ok(raw)) => {
            let resolved = resolver::resolve_reply(raw);
            let intent = extractor::extract(&resolved);
            if let Some(intent) = &intent {
                tracing::info!(
                    patient_id,
                    reference = %intent.reference,
                    kind = ?intent.kind,
                    "extracted booking intent"
                );
            }
            Turn::assistant(resolved, intent)
        }
        Ok(Err(e)) => {
            tracing::error!(patient_id, error = %e, "backend call failed");
            Turn::assistant(FAILURE_NOTICE, None)
        }
        Err(_) => {
            tracing::error!(
                patient_id,
                timeout_secs = state.config.backend_timeout_secs,
                "backend call timed out"
            );
            Turn::assistant(FAILURE_NOTICE, None)
        }
    };

    let mut sessions = state.sessions.lock().unwrap();
    let conv = sessions.entry(patient_id).or_default();
    conv.complete(reply.clone());

    reply
}

/// Tile actions re-enter `submit` as synthetic user turns; from here on they
/// are indistinguishable from organic input.
pub async fn confirm_booking(
    state: &Arc<AppState>,
    patient_id: i64,
    reference: &str,
) -> Result<Turn, AppError> {
    submit(state, patient_id, &turn::confirm_action_text(reference)).await
}

pub async fn process_payment(
    state: &Arc<AppState>,
    patient_id: i64,
    reference: &str,
    payment: &Value,
) -> Result<Turn, AppError> {
    submit(state, patient_id, &turn::pay_action_text(reference, payment)).await
}

pub async fn cancel_booking(
    state: &Arc<AppState>,
    patient_id: i64,
    reference: &str,
) -> Result<Turn, AppError> {
    submit(state, patient_id, &turn::cancel_action_text(reference)).await
}
